//! dexview - Pokemon browser on PokeAPI built with tui-dispatch

pub mod action;
pub mod api;
pub mod audio;
pub mod detail;
pub mod effect;
pub mod reducer;
pub mod settings;
pub mod state;
pub mod ui;
