use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, CryState, FocusArea, Language, LimitTier, VOLUME_STEP};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.message = None;
            DispatchResult::changed_with(start_load(state))
        }

        Action::EntitiesDidLoad { epoch, entities } => {
            if epoch != state.list.epoch {
                return DispatchResult::unchanged();
            }
            state.list.all = entities;
            state.list.loading = false;
            state.list.error = None;
            state.list.loaded_tier = Some(state.settings.tier);
            state.list.selected = None;
            state.list.cursor = 0;
            state.detail.visible = false;
            state.focus = FocusArea::List;
            state.message = None;
            state.rebuild_displayed();
            DispatchResult::changed()
        }

        Action::EntitiesDidError { epoch, error } => {
            if epoch != state.list.epoch {
                return DispatchResult::unchanged();
            }
            state.list.loading = false;
            state.message = Some(format!("Load error: {error}"));
            state.list.error = Some(error);
            DispatchResult::changed()
        }

        Action::EntitiesReload => DispatchResult::changed_with(start_load(state)),

        Action::SettingsTierSet(generation) => match LimitTier::for_generation(generation) {
            Some(tier) => apply_tier(state, tier),
            None => DispatchResult::unchanged(),
        },
        Action::SettingsTierNext => apply_tier(state, state.settings.tier.step(1)),
        Action::SettingsTierPrev => apply_tier(state, state.settings.tier.step(-1)),

        Action::SettingsLanguageSet(language) => apply_language(state, language),
        Action::SettingsLanguageNext => apply_language(state, state.settings.language.next()),

        Action::SettingsVolumeSet(volume) => apply_volume(state, volume),
        Action::SettingsVolumeUp => apply_volume(state, state.settings.audio_volume + VOLUME_STEP),
        Action::SettingsVolumeDown => {
            apply_volume(state, state.settings.audio_volume - VOLUME_STEP)
        }

        Action::SettingsDidSave => DispatchResult::unchanged(),

        Action::SettingsDidError(error) => {
            state.message = Some(format!("Settings error: {error}"));
            DispatchResult::changed()
        }

        Action::SearchStart => {
            if state.search.editing {
                return DispatchResult::unchanged();
            }
            state.search.editing = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.editing && state.search.term.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.editing = false;
            state.search.term.clear();
            state.rebuild_displayed();
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            if !state.search.editing {
                return DispatchResult::unchanged();
            }
            state.search.editing = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            let mut term = state.search.term.clone();
            term.push(ch);
            apply_search_term(state, term)
        }

        Action::SearchBackspace => {
            let mut term = state.search.term.clone();
            if term.pop().is_none() {
                return DispatchResult::unchanged();
            }
            apply_search_term(state, term)
        }

        Action::SearchTermChange(term) => apply_search_term(state, term),

        Action::ListMove(delta) => {
            let index = (state.list.cursor as i64 + i64::from(delta)).max(0) as usize;
            cursor_result(state.set_cursor(index))
        }

        Action::ListPage(delta) => {
            let page = list_page_size(state) as i64;
            let index = (state.list.cursor as i64 + i64::from(delta) * page).max(0) as usize;
            cursor_result(state.set_cursor(index))
        }

        Action::ListJumpTop => cursor_result(state.set_cursor(0)),

        Action::ListJumpBottom => {
            let last = state.list.displayed.len().saturating_sub(1);
            cursor_result(state.set_cursor(last))
        }

        Action::ListSelect(index) => cursor_result(state.set_cursor(index)),

        Action::ListOpen => {
            let Some(id) = state.cursor_entity().map(|entity| entity.id) else {
                return DispatchResult::unchanged();
            };
            let selected = select_entity(state, id);
            if state.focus != FocusArea::Detail {
                state.focus = FocusArea::Detail;
                return DispatchResult::changed();
            }
            cursor_result(selected)
        }

        Action::EntitySelect(id) => cursor_result(select_entity(state, id)),

        Action::SelectNext => step_selection(state, 1),
        Action::SelectPrev => step_selection(state, -1),

        Action::SelectRandom => {
            let bound = usize::from(state.settings.tier.limit).min(state.list.all.len());
            if bound == 0 {
                return DispatchResult::unchanged();
            }
            let index = next_rand(state) as usize % bound;
            let id = state.list.all[index].id;
            select_entity(state, id);
            match request_cry(state) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::changed(),
            }
        }

        Action::DetailTabOpen(tab) => {
            if state.detail.active_tab == tab {
                return DispatchResult::unchanged();
            }
            state.detail.active_tab = tab;
            DispatchResult::changed()
        }

        Action::DetailTabNext => {
            state.detail.active_tab = state.detail.active_tab.step(1);
            DispatchResult::changed()
        }

        Action::DetailTabPrev => {
            state.detail.active_tab = state.detail.active_tab.step(-1);
            DispatchResult::changed()
        }

        Action::DetailClose => {
            if !state.detail.visible && state.list.selected.is_none() {
                return DispatchResult::unchanged();
            }
            state.detail.visible = false;
            state.list.selected = None;
            state.focus = FocusArea::List;
            DispatchResult::changed()
        }

        Action::PlayCry => match request_cry(state) {
            Some(effect) => DispatchResult::changed_with(effect),
            None => DispatchResult::unchanged(),
        },

        Action::CryDidFinish => {
            if !state.cry.is_playing() {
                return DispatchResult::unchanged();
            }
            state.cry = CryState::Idle;
            DispatchResult::changed()
        }

        Action::CryDidError(error) => {
            state.cry = CryState::Idle;
            state.message = Some(format!("Cry error: {error}"));
            DispatchResult::changed()
        }

        Action::FocusNext => {
            if state.search.editing || !state.detail.visible {
                return DispatchResult::unchanged();
            }
            state.focus = match state.focus {
                FocusArea::List => FocusArea::Detail,
                FocusArea::Detail => FocusArea::List,
            };
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            if state.list.loading {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Starts a new list generation; results from older ones are dropped.
fn start_load(state: &mut AppState) -> Effect {
    state.list.epoch += 1;
    state.list.loading = true;
    state.list.error = None;
    log::info!(
        "loading {} entities (epoch {})",
        state.settings.tier.limit,
        state.list.epoch
    );
    Effect::LoadEntities {
        epoch: state.list.epoch,
        limit: state.settings.tier.limit,
    }
}

fn apply_tier(state: &mut AppState, tier: LimitTier) -> DispatchResult<Effect> {
    if state.settings.tier == tier {
        return DispatchResult::unchanged();
    }
    state.settings.tier = tier;
    let load = start_load(state);
    DispatchResult::changed_with_many(vec![load, Effect::SaveSettings(state.settings)])
}

fn apply_language(state: &mut AppState, language: Language) -> DispatchResult<Effect> {
    if state.settings.language == language {
        return DispatchResult::unchanged();
    }
    state.settings.language = language;
    state.rebuild_displayed();
    DispatchResult::changed_with(Effect::SaveSettings(state.settings))
}

fn apply_volume(state: &mut AppState, volume: f32) -> DispatchResult<Effect> {
    if !state.settings.set_volume(volume) {
        return DispatchResult::unchanged();
    }
    DispatchResult::changed_with(Effect::SaveSettings(state.settings))
}

fn apply_search_term(state: &mut AppState, term: String) -> DispatchResult<Effect> {
    if state.search.term == term {
        return DispatchResult::unchanged();
    }
    state.search.term = term;
    state.rebuild_displayed();
    DispatchResult::changed()
}

/// Reveals `id` and re-rolls the description. Unknown ids are ignored.
fn select_entity(state: &mut AppState, id: u32) -> bool {
    if state.entity(id).is_none() {
        return false;
    }
    if state.list.selected == Some(id) && state.detail.visible {
        return false;
    }
    state.list.selected = Some(id);
    state.detail.visible = true;
    state.detail.roll = u64::from(next_rand(state));
    state.sync_cursor_to_selection();
    true
}

/// Moves through the full set with wraparound.
fn step_selection(state: &mut AppState, delta: i64) -> DispatchResult<Effect> {
    let len = state.list.all.len();
    if len == 0 {
        return DispatchResult::unchanged();
    }
    let index = match state.selection_index() {
        Some(current) => (current as i64 + delta).rem_euclid(len as i64) as usize,
        None if delta >= 0 => 0,
        None => len - 1,
    };
    let id = state.list.all[index].id;
    cursor_result(select_entity(state, id))
}

/// Single-flight: nothing is emitted while a cry is playing, without a cry
/// URL, or when muted.
fn request_cry(state: &mut AppState) -> Option<Effect> {
    if state.cry.is_playing() || state.settings.audio_volume <= 0.0 {
        return None;
    }
    let entity = state.selected_entity()?;
    let url = entity.cry_url()?.to_string();
    let name = entity.name.clone();
    state.cry = CryState::Playing { name: name.clone() };
    Some(Effect::PlayCry {
        name,
        url,
        volume: state.settings.audio_volume,
    })
}

fn cursor_result(changed: bool) -> DispatchResult<Effect> {
    if changed {
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    }
}

fn next_rand(state: &mut AppState) -> u32 {
    state.rng_seed = state
        .rng_seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1);
    (state.rng_seed >> 32) as u32
}

fn list_page_size(state: &AppState) -> usize {
    (state.terminal_size.1.saturating_sub(8) as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Cries, DetailTab, Entity, LocalizedName, LIMIT_TIERS};

    fn entity(id: u32, name: &str) -> Entity {
        Entity {
            id,
            name: name.to_string(),
            names: vec![LocalizedName {
                name: name.to_string(),
                language: "en".to_string(),
            }],
            cries: Some(Cries {
                latest: Some(format!("https://cries.example/{id}.ogg")),
                legacy: None,
            }),
            ..Default::default()
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        let Effect::LoadEntities { epoch, .. } = start_load(&mut state) else {
            unreachable!();
        };
        reducer(
            &mut state,
            Action::EntitiesDidLoad {
                epoch,
                entities: vec![
                    entity(1, "bulbasaur"),
                    entity(2, "ivysaur"),
                    entity(3, "venusaur"),
                ],
            },
        );
        state
    }

    #[test]
    fn test_init_starts_first_load() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);

        assert!(result.changed);
        assert!(state.list.loading);
        assert_eq!(
            result.effects,
            vec![Effect::LoadEntities {
                epoch: 1,
                limit: 151
            }]
        );
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::SettingsTierSet(2));
        assert_eq!(state.list.epoch, 2);

        let stale = reducer(
            &mut state,
            Action::EntitiesDidLoad {
                epoch: 1,
                entities: vec![entity(1, "bulbasaur")],
            },
        );
        assert!(!stale.changed);
        assert!(state.list.all.is_empty());
        assert!(state.list.loading);
    }

    #[test]
    fn test_tier_change_saves_and_reloads() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::SettingsTierNext);

        assert_eq!(state.settings.tier, LIMIT_TIERS[1]);
        assert_eq!(result.effects.len(), 2);
        assert!(matches!(
            result.effects[0],
            Effect::LoadEntities { limit: 251, .. }
        ));
        assert!(matches!(result.effects[1], Effect::SaveSettings(_)));

        let same = reducer(&mut state, Action::SettingsTierSet(2));
        assert!(!same.changed);
        let unknown = reducer(&mut state, Action::SettingsTierSet(42));
        assert!(!unknown.changed);
    }

    #[test]
    fn test_close_clears_selection_and_returns_focus() {
        let mut state = loaded_state();
        reducer(&mut state, Action::ListMove(1));
        reducer(&mut state, Action::ListOpen);
        assert_eq!(state.list.selected, Some(2));
        assert_eq!(state.focus, FocusArea::Detail);

        let result = reducer(&mut state, Action::DetailClose);
        assert!(result.changed);
        assert!(!state.detail.visible);
        assert_eq!(state.list.selected, None);
        assert_eq!(state.focus, FocusArea::List);
        assert_eq!(state.list.cursor, 1);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut state = loaded_state();
        let result = reducer(&mut state, Action::EntitySelect(999));
        assert!(!result.changed);
        assert_eq!(state.list.selected, None);
    }

    #[test]
    fn test_cry_is_single_flight() {
        let mut state = loaded_state();
        reducer(&mut state, Action::EntitySelect(1));

        let first = reducer(&mut state, Action::PlayCry);
        assert_eq!(first.effects.len(), 1);
        assert!(state.cry.is_playing());

        let second = reducer(&mut state, Action::PlayCry);
        assert!(!second.changed);
        assert!(second.effects.is_empty());

        reducer(&mut state, Action::CryDidFinish);
        assert_eq!(state.cry, CryState::Idle);
        assert_eq!(reducer(&mut state, Action::PlayCry).effects.len(), 1);
    }

    #[test]
    fn test_muted_volume_skips_cry() {
        let mut state = loaded_state();
        reducer(&mut state, Action::SettingsVolumeSet(0.0));
        reducer(&mut state, Action::EntitySelect(3));
        let result = reducer(&mut state, Action::PlayCry);
        assert!(result.effects.is_empty());
        assert_eq!(state.cry, CryState::Idle);
    }

    #[test]
    fn test_tab_cycle_wraps() {
        let mut state = AppState::default();
        reducer(&mut state, Action::DetailTabPrev);
        assert_eq!(state.detail.active_tab, DetailTab::Items);
        reducer(&mut state, Action::DetailTabNext);
        assert_eq!(state.detail.active_tab, DetailTab::About);
        let same = reducer(&mut state, Action::DetailTabOpen(DetailTab::About));
        assert!(!same.changed);
    }
}
