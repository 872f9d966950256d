use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::detail::DetailView;

/// Search terms shorter than this (in characters) leave the list unfiltered.
pub const SEARCH_MIN_CHARS: usize = 3;
pub const DEFAULT_AUDIO_VOLUME: f32 = 0.25;
pub const VOLUME_STEP: f32 = 0.05;
const DEFAULT_SEED: u64 = 0x5eed_d3c5_0000_0097;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
    Fr,
    Es,
    It,
    Ja,
    Ko,
    Pt,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::En,
        Language::De,
        Language::Fr,
        Language::Es,
        Language::It,
        Language::Ja,
        Language::Ko,
        Language::Pt,
    ];

    /// Language code as used by PokeAPI `language.name`.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::It => "it",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Pt => "pt",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|language| language.code() == code)
    }

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|language| *language == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// A predefined ceiling on how many entities to load, one per game generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LimitTier {
    pub generation: u8,
    pub limit: u16,
}

pub const LIMIT_TIERS: [LimitTier; 9] = [
    LimitTier { generation: 1, limit: 151 },
    LimitTier { generation: 2, limit: 251 },
    LimitTier { generation: 3, limit: 386 },
    LimitTier { generation: 4, limit: 493 },
    LimitTier { generation: 5, limit: 649 },
    LimitTier { generation: 6, limit: 721 },
    LimitTier { generation: 7, limit: 809 },
    LimitTier { generation: 8, limit: 905 },
    LimitTier { generation: 9, limit: 1025 },
];

pub const DEFAULT_TIER: LimitTier = LIMIT_TIERS[0];

impl LimitTier {
    pub fn for_generation(generation: u8) -> Option<Self> {
        LIMIT_TIERS
            .iter()
            .copied()
            .find(|tier| tier.generation == generation)
    }

    pub fn for_limit(limit: u16) -> Option<Self> {
        LIMIT_TIERS.iter().copied().find(|tier| tier.limit == limit)
    }

    fn index(self) -> usize {
        LIMIT_TIERS
            .iter()
            .position(|tier| *tier == self)
            .unwrap_or(0)
    }

    pub fn step(self, delta: i16) -> Self {
        let len = LIMIT_TIERS.len() as i16;
        let mut next = self.index() as i16 + delta;
        if next < 0 {
            next = len - 1;
        } else if next >= len {
            next = 0;
        }
        LIMIT_TIERS[next as usize]
    }
}

impl Default for LimitTier {
    fn default() -> Self {
        DEFAULT_TIER
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    pub audio_volume: f32,
    pub language: Language,
    pub tier: LimitTier,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_volume: DEFAULT_AUDIO_VOLUME,
            language: Language::default(),
            tier: DEFAULT_TIER,
        }
    }
}

impl Settings {
    /// Clamps into `[0, 1]` and rounds to two decimals. Returns whether the value changed.
    pub fn set_volume(&mut self, volume: f32) -> bool {
        if !volume.is_finite() {
            return false;
        }
        let volume = (volume.clamp(0.0, 1.0) * 100.0).round() / 100.0;
        if (volume - self.audio_volume).abs() < f32::EPSILON {
            return false;
        }
        self.audio_volume = volume;
        true
    }

    /// Every tier with a flag marking the selected one.
    pub fn tiers(&self) -> impl Iterator<Item = (LimitTier, bool)> + '_ {
        LIMIT_TIERS
            .iter()
            .map(move |tier| (*tier, *tier == self.tier))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocalizedName {
    pub name: String,
    pub language: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntityStat {
    pub name: String,
    pub base: u16,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub dream_world: Option<String>,
    pub official_artwork: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VersionRarity {
    pub version: String,
    pub rarity: u16,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItemDetail {
    pub name: String,
    pub names: Vec<LocalizedName>,
    pub sprite: Option<String>,
    pub cost: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HeldItem {
    pub name: String,
    pub rarity_by_version: Vec<VersionRarity>,
    pub detail: Option<ItemDetail>,
}

impl HeldItem {
    pub fn localized_name(&self, language: Language) -> &str {
        self.detail
            .as_ref()
            .and_then(|detail| localized(&detail.names, language))
            .unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Cries {
    pub latest: Option<String>,
    pub legacy: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlavorText {
    pub text: String,
    pub language: String,
    pub version: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Genus {
    pub genus: String,
    pub language: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ability {
    pub name: String,
    pub hidden: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameIndex {
    pub index: u32,
    pub version: String,
}

/// One aggregated Pokemon: the core record merged with its species record and
/// the details of every held item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Entity {
    pub id: u32,
    pub name: String,
    /// Species the descriptive fields came from; differs from `name` for forms.
    pub species_name: String,
    pub names: Vec<LocalizedName>,
    pub types: Vec<String>,
    pub stats: Vec<EntityStat>,
    pub abilities: Vec<Ability>,
    /// Decimetres.
    pub height: u16,
    /// Hectograms.
    pub weight: u32,
    pub sprites: Sprites,
    pub cries: Option<Cries>,
    pub held_items: Vec<HeldItem>,
    pub game_indices: Vec<GameIndex>,
    pub flavor_text_entries: Vec<FlavorText>,
    pub genera: Vec<Genus>,
}

impl Entity {
    pub fn localized_name(&self, language: Language) -> &str {
        localized(&self.names, language).unwrap_or(&self.name)
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    pub fn stat(&self, name: &str) -> Option<u16> {
        self.stats
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.base)
    }

    pub fn cry_url(&self) -> Option<&str> {
        let cries = self.cries.as_ref()?;
        cries.latest.as_deref().or(cries.legacy.as_deref())
    }

    pub fn sprite_url(&self) -> Option<&str> {
        self.sprites
            .dream_world
            .as_deref()
            .or(self.sprites.official_artwork.as_deref())
            .or(self.sprites.front_default.as_deref())
    }

    pub fn flavor_texts(&self, language: Language) -> Vec<&FlavorText> {
        self.flavor_text_entries
            .iter()
            .filter(|entry| entry.language == language.code())
            .collect()
    }

    pub fn genus(&self, language: Language) -> Option<&str> {
        self.genera
            .iter()
            .find(|genus| genus.language == language.code())
            .map(|genus| genus.genus.as_str())
    }
}

fn localized(names: &[LocalizedName], language: Language) -> Option<&str> {
    names
        .iter()
        .find(|entry| entry.language == language.code())
        .map(|entry| entry.name.as_str())
}

/// Indices into `all` whose localized name contains `term`, case-insensitive.
/// Terms under [`SEARCH_MIN_CHARS`] characters match everything.
pub fn filter_indices(all: &[Entity], term: &str, language: Language) -> Vec<usize> {
    let term = term.trim().to_lowercase();
    if term.chars().count() < SEARCH_MIN_CHARS {
        return (0..all.len()).collect();
    }
    all.iter()
        .enumerate()
        .filter(|(_, entity)| {
            entity
                .localized_name(language)
                .to_lowercase()
                .contains(&term)
        })
        .map(|(idx, _)| idx)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub editing: bool,
    pub term: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListState {
    /// Last fully fetched set, ascending id.
    pub all: Vec<Entity>,
    /// Indices into `all` that pass the current search.
    pub displayed: Vec<usize>,
    /// Cursor position within `displayed`.
    pub cursor: usize,
    /// Id of the selected entity; always present in `all`.
    pub selected: Option<u32>,
    pub loading: bool,
    /// Generation of the newest list request; older results are dropped.
    pub epoch: u64,
    pub loaded_tier: Option<LimitTier>,
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DetailTab {
    #[default]
    About,
    Stats,
    Items,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::About, DetailTab::Stats, DetailTab::Items];

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::About => "About",
            DetailTab::Stats => "Stats",
            DetailTab::Items => "Items",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DetailTab::About => 0,
            DetailTab::Stats => 1,
            DetailTab::Items => 2,
        }
    }

    pub fn step(self, delta: i16) -> Self {
        let len = Self::ALL.len() as i16;
        let next = (self.index() as i16 + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailState {
    pub visible: bool,
    pub active_tab: DetailTab,
    /// Random draw used to pick the flavor text; re-rolled on every selection.
    pub roll: u64,
}

/// Single-flight guard for cry playback.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum CryState {
    #[default]
    Idle,
    Playing {
        name: String,
    },
}

impl CryState {
    pub fn is_playing(&self) -> bool {
        matches!(self, CryState::Playing { .. })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FocusArea {
    #[default]
    List,
    Detail,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub focus: FocusArea,
    pub settings: Settings,
    pub search: SearchState,
    pub list: ListState,
    pub detail: DetailState,
    pub cry: CryState,
    pub message: Option<String>,
    pub tick: u64,
    pub rng_seed: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default(), DEFAULT_SEED)
    }
}

impl AppState {
    pub fn new(settings: Settings, rng_seed: u64) -> Self {
        Self {
            terminal_size: (80, 24),
            focus: FocusArea::List,
            settings,
            search: SearchState::default(),
            list: ListState::default(),
            detail: DetailState::default(),
            cry: CryState::Idle,
            message: None,
            tick: 0,
            rng_seed,
        }
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.list.all.iter().find(|entity| entity.id == id)
    }

    pub fn selected_entity(&self) -> Option<&Entity> {
        self.entity(self.list.selected?)
    }

    /// Position of the selected entity within the full set.
    pub fn selection_index(&self) -> Option<usize> {
        let id = self.list.selected?;
        self.list.all.iter().position(|entity| entity.id == id)
    }

    pub fn displayed_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.list
            .displayed
            .iter()
            .filter_map(|idx| self.list.all.get(*idx))
    }

    pub fn cursor_entity(&self) -> Option<&Entity> {
        self.list
            .displayed
            .get(self.list.cursor)
            .and_then(|idx| self.list.all.get(*idx))
    }

    pub fn detail_view(&self) -> Option<DetailView> {
        if !self.detail.visible {
            return None;
        }
        let entity = self.selected_entity()?;
        Some(DetailView::derive(
            entity,
            self.settings.language,
            self.detail.roll,
        ))
    }

    pub fn set_cursor(&mut self, index: usize) -> bool {
        if self.list.displayed.is_empty() {
            self.list.cursor = 0;
            return false;
        }
        let bounded = index.min(self.list.displayed.len() - 1);
        if bounded != self.list.cursor {
            self.list.cursor = bounded;
            return true;
        }
        false
    }

    /// Recomputes `displayed` from `all`, keeping the cursor on the selection
    /// when it is still visible.
    pub fn rebuild_displayed(&mut self) {
        self.list.displayed = filter_indices(
            &self.list.all,
            &self.search.term,
            self.settings.language,
        );
        if !self.sync_cursor_to_selection() && self.list.cursor >= self.list.displayed.len() {
            self.list.cursor = 0;
        }
    }

    pub fn sync_cursor_to_selection(&mut self) -> bool {
        let Some(selected) = self.selection_index() else {
            return false;
        };
        match self.list.displayed.iter().position(|idx| *idx == selected) {
            Some(position) => {
                self.list.cursor = position;
                true
            }
            None => false,
        }
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("List")
                .entry("total", ron_string(&self.list.all.len()))
                .entry("displayed", ron_string(&self.list.displayed.len()))
                .entry("cursor", ron_string(&self.list.cursor))
                .entry("selected", ron_string(&self.list.selected))
                .entry("epoch", ron_string(&self.list.epoch))
                .entry("loaded_tier", ron_string(&self.list.loaded_tier)),
            DebugSection::new("Settings")
                .entry("tier", ron_string(&self.settings.tier))
                .entry("language", ron_string(&self.settings.language))
                .entry("volume", ron_string(&self.settings.audio_volume))
                .entry("search", ron_string(&self.search.term))
                .entry("search_editing", ron_string(&self.search.editing)),
            DebugSection::new("Detail")
                .entry("visible", ron_string(&self.detail.visible))
                .entry("tab", ron_string(&self.detail.active_tab))
                .entry("focus", ron_string(&self.focus))
                .entry("cry", ron_string(&self.cry)),
            DebugSection::new("Status")
                .entry("loading", ron_string(&self.list.loading))
                .entry("error", ron_string(&self.list.error))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
