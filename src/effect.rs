//! Side effects declared by the reducer

use crate::state::Settings;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch and aggregate the first `limit` entities; results are tagged with `epoch`.
    LoadEntities { epoch: u64, limit: u16 },
    SaveSettings(Settings),
    PlayCry { name: String, url: String, volume: f32 },
}
