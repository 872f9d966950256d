use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{DetailTab, Entity, Language};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // ===== Entities =====
    /// Result of the list fetch started at `epoch`.
    EntitiesDidLoad { epoch: u64, entities: Vec<Entity> },
    EntitiesDidError { epoch: u64, error: String },
    /// Refetch the current tier.
    EntitiesReload,

    // ===== Settings =====
    /// Select a tier by generation number.
    SettingsTierSet(u8),
    SettingsTierNext,
    SettingsTierPrev,
    SettingsLanguageSet(Language),
    SettingsLanguageNext,
    SettingsVolumeSet(f32),
    SettingsVolumeUp,
    SettingsVolumeDown,
    SettingsDidSave,
    SettingsDidError(String),

    // ===== Search =====
    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,
    SearchTermChange(String),

    // ===== List cursor =====
    ListMove(i16),
    ListPage(i16),
    ListJumpTop,
    ListJumpBottom,
    ListSelect(usize),
    /// Select the entity under the cursor.
    ListOpen,

    // ===== Selection =====
    EntitySelect(u32),
    SelectNext,
    SelectPrev,
    SelectRandom,

    // ===== Detail =====
    DetailTabOpen(DetailTab),
    DetailTabNext,
    DetailTabPrev,
    DetailClose,

    // ===== Cry =====
    PlayCry,
    CryDidFinish,
    CryDidError(String),

    FocusNext,
    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
