//! Reducer - the list controller and the navigation shell's state transitions

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::loader::{self, PageRequest};
use crate::projection::grid_columns;
use crate::route::{DetailTab, Route};
use crate::state::{AppState, DetailState, QueryState};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.references = DataResource::Loading;
            let mut effects = vec![Effect::LoadReferences];
            let term = state.query.search_term.clone();
            effects.extend(reset_query(state, &term));
            let route = state.route.clone();
            effects.extend(enter_route(state, route));
            DispatchResult::changed_with_many(effects)
        }

        Action::ReferencesDidLoad(references) => {
            tracing::info!(count = references.len(), "reference index loaded");
            state.references = DataResource::Loaded(references);
            if state.query.awaiting_index {
                state.query.awaiting_index = false;
                return DispatchResult::changed_with_many(begin_fill(state));
            }
            DispatchResult::changed()
        }

        Action::ReferencesDidError(error) => {
            tracing::warn!(%error, "reference index failed");
            state.references = DataResource::Failed(error.clone());
            if state.query.awaiting_index {
                state.query.awaiting_index = false;
                fail_fill(state, format!("Search index unavailable: {error}"));
            }
            DispatchResult::changed()
        }

        Action::SearchStart => {
            if !state.route.is_list() || state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = true;
            DispatchResult::changed()
        }

        Action::SearchClose => {
            if !state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = false;
            DispatchResult::changed()
        }

        Action::SearchChange(term) => {
            let input_changed = term != state.search_input;
            state.search_input = term;
            if normalize_term(&state.search_input) == state.query.search_term
                && state.query.current_page > 0
            {
                return if input_changed {
                    DispatchResult::changed()
                } else {
                    DispatchResult::unchanged()
                };
            }
            let input = state.search_input.clone();
            DispatchResult::changed_with_many(reset_query(state, &input))
        }

        Action::LoadNextPage => effects_result(load_next_page(state)),

        Action::ScrollNearBottom => {
            if state.query.error.is_some() {
                return DispatchResult::unchanged();
            }
            effects_result(load_next_page(state))
        }

        Action::Retry => retry(state),

        Action::PageDidLoad {
            generation,
            page,
            items,
            has_more,
        } => {
            if is_stale(&state.query, generation, page) {
                tracing::debug!(generation, page, "discarding stale page-fill");
                return DispatchResult::unchanged();
            }
            tracing::info!(page, count = items.len(), has_more, "page-fill complete");
            if page == 1 {
                state.results = items;
            } else {
                state.results.extend(items);
            }
            state.query.has_more = has_more;
            state.query.loading = false;
            state.query.error = None;
            state.query.completed_once = true;
            state.clamp_selection();
            DispatchResult::changed()
        }

        Action::PageDidError {
            generation,
            page,
            error,
        } => {
            if is_stale(&state.query, generation, page) {
                tracing::debug!(generation, page, "discarding stale page-fill failure");
                return DispatchResult::unchanged();
            }
            tracing::warn!(page, %error, "page-fill aborted");
            fail_fill(state, error);
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            if state.results.is_empty() {
                return DispatchResult::unchanged();
            }
            let current = state.selected_index as i64;
            let max_index = state.results.len() as i64 - 1;
            let next = (current + delta as i64).clamp(0, max_index) as usize;
            select(state, next)
        }

        Action::SelectionSet(index) => {
            if index >= state.results.len() {
                return DispatchResult::unchanged();
            }
            select(state, index)
        }

        Action::OpenSelected => {
            if !state.route.is_list() {
                return DispatchResult::unchanged();
            }
            let Some(item) = state.selected_item() else {
                return DispatchResult::unchanged();
            };
            let route = Route::detail(item.id.to_string());
            DispatchResult::changed_with_many(enter_route(state, route))
        }

        Action::Navigate(route) => {
            if route == state.route {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with_many(enter_route(state, route))
        }

        Action::NavigateBack => {
            if state.route.is_list() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with_many(enter_route(state, Route::List))
        }

        Action::DetailDidLoad { id, detail } => match state.detail.as_mut() {
            Some(current) if current.id == id => {
                current.record = DataResource::Loaded(detail);
                DispatchResult::changed()
            }
            _ => {
                tracing::debug!(%id, "discarding detail for inactive route");
                DispatchResult::unchanged()
            }
        },

        Action::DetailDidError { id, error } => match state.detail.as_mut() {
            Some(current) if current.id == id => {
                tracing::warn!(%id, %error, "detail fetch failed");
                current.record = DataResource::Failed(error);
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::DetailTabSelect(index) => {
            let Some(tab) = DetailTab::from_index(index) else {
                return DispatchResult::unchanged();
            };
            set_tab(state, |_| tab)
        }

        Action::DetailSwipe(direction) => set_tab(state, |tab| tab.swipe(direction)),

        Action::UiTerminalResize(width, height) => {
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Tick => {
            if state.is_busy() {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Start over for `term`: page 1, empty results, fresh generation.
fn reset_query(state: &mut AppState, term: &str) -> Vec<Effect> {
    state.query = QueryState {
        search_term: normalize_term(term),
        generation: state.query.generation.wrapping_add(1),
        ..QueryState::default()
    };
    state.results.clear();
    state.selected_index = 0;
    load_next_page(state)
}

fn load_next_page(state: &mut AppState) -> Vec<Effect> {
    if state.query.loading || !state.query.has_more {
        return Vec::new();
    }
    state.query.loading = true;
    state.query.error = None;
    state.query.current_page += 1;
    begin_fill(state)
}

/// Issue the fill for `current_page`; `loading` is already set.
fn begin_fill(state: &mut AppState) -> Vec<Effect> {
    let generation = state.query.generation;
    let page = state.query.current_page;

    if !state.query.is_filtered() {
        return vec![Effect::FillPage {
            generation,
            page,
            request: PageRequest::for_page(page, state.page_size),
        }];
    }

    let window = match &state.references {
        DataResource::Loaded(references) => loader::filtered_window(
            references,
            &state.query.search_term,
            page,
            state.page_size,
        ),
        DataResource::Failed(error) => {
            let message = format!("Search index unavailable: {error}");
            fail_fill(state, message);
            return Vec::new();
        }
        DataResource::Empty | DataResource::Loading => {
            state.query.awaiting_index = true;
            return Vec::new();
        }
    };

    if window.total_matches == 0 {
        state.results.clear();
        state.selected_index = 0;
        finish_exhausted(state);
        return Vec::new();
    }
    if window.references.is_empty() {
        state.query.current_page -= 1;
        finish_exhausted(state);
        return Vec::new();
    }

    vec![Effect::FillPage {
        generation,
        page,
        request: PageRequest::References {
            references: window.references,
            has_more: window.has_more,
        },
    }]
}

fn finish_exhausted(state: &mut AppState) {
    state.query.has_more = false;
    state.query.loading = false;
    state.query.completed_once = true;
}

/// Abort the in-flight fill and roll the cursor back to the last full page.
fn fail_fill(state: &mut AppState, error: String) {
    state.query.loading = false;
    state.query.current_page = state.query.current_page.saturating_sub(1);
    state.query.error = Some(error);
    state.query.completed_once = true;
}

fn retry(state: &mut AppState) -> DispatchResult<Effect> {
    if let Some(detail) = state.detail.as_mut() {
        if !detail.record.is_failed() {
            return DispatchResult::unchanged();
        }
        detail.record = DataResource::Loading;
        let id = detail.id.clone();
        return DispatchResult::changed_with(Effect::LoadDetail { id });
    }

    if state.query.error.is_none() {
        return DispatchResult::unchanged();
    }
    state.query.error = None;
    let mut effects = Vec::new();
    if state.query.is_filtered() && state.references.is_failed() {
        state.references = DataResource::Loading;
        effects.push(Effect::LoadReferences);
    }
    effects.extend(load_next_page(state));
    DispatchResult::changed_with_many(effects)
}

fn is_stale(query: &QueryState, generation: u64, page: usize) -> bool {
    generation != query.generation || page != query.current_page || !query.loading
}

fn select(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    let moved = index != state.selected_index;
    state.selected_index = index;

    let columns = grid_columns(state.terminal_size.0);
    let near_bottom = index + columns >= state.results.len();
    let effects = if near_bottom && state.query.error.is_none() {
        load_next_page(state)
    } else {
        Vec::new()
    };

    if !moved && effects.is_empty() {
        return DispatchResult::unchanged();
    }
    DispatchResult::changed_with_many(effects)
}

fn enter_route(state: &mut AppState, route: Route) -> Vec<Effect> {
    state.search_active = false;
    state.route = route;
    match &state.route {
        Route::Detail { id } => {
            let id = id.clone();
            state.detail = Some(DetailState::loading(id.clone()));
            vec![Effect::LoadDetail { id }]
        }
        Route::List | Route::NotFound { .. } => {
            state.detail = None;
            Vec::new()
        }
    }
}

fn set_tab(state: &mut AppState, next: impl FnOnce(DetailTab) -> DetailTab) -> DispatchResult<Effect> {
    let Some(detail) = state.detail.as_mut() else {
        return DispatchResult::unchanged();
    };
    let tab = next(detail.tab);
    if tab == detail.tab {
        return DispatchResult::unchanged();
    }
    detail.tab = tab;
    DispatchResult::changed()
}

fn effects_result(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::unchanged()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::SwipeDirection;
    use crate::state::{ItemDetail, ItemReference, LoadPhase};

    fn item(id: u16, name: &str) -> ItemDetail {
        ItemDetail {
            id,
            name: name.into(),
            sprite_url: None,
            height: 4,
            weight: 60,
            base_experience: Some(100),
            types: vec!["normal".into()],
            abilities: Vec::new(),
            stats: Vec::new(),
            moves: Vec::new(),
        }
    }

    fn reference(name: &str) -> ItemReference {
        ItemReference {
            name: name.into(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{name}/"),
        }
    }

    #[test]
    fn test_init_loads_index_and_first_page() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);

        assert!(result.changed);
        assert!(state.references.is_loading());
        assert!(state.query.loading);
        assert_eq!(state.query.current_page, 1);
        assert_eq!(result.effects.len(), 2);
        assert_eq!(result.effects[0], Effect::LoadReferences);
        assert!(matches!(
            result.effects[1],
            Effect::FillPage {
                page: 1,
                request: PageRequest::Offset { offset: 0, limit: 20 },
                ..
            }
        ));
    }

    #[test]
    fn test_load_next_page_is_noop_while_loading() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let before = state.query.clone();

        let result = reducer(&mut state, Action::LoadNextPage);

        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.query, before);
    }

    #[test]
    fn test_search_change_normalizes_and_resets() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let generation = state.query.generation;
        reducer(
            &mut state,
            Action::PageDidLoad {
                generation,
                page: 1,
                items: vec![item(1, "bulbasaur")],
                has_more: true,
            },
        );

        reducer(&mut state, Action::SearchChange("  PIK ".into()));

        assert_eq!(state.query.search_term, "pik");
        assert_eq!(state.query.current_page, 1);
        assert!(state.results.is_empty());
        assert!(state.query.generation > generation);
        // Index still loading: the fill waits for it.
        assert!(state.query.awaiting_index);
        assert_eq!(state.query.phase(), LoadPhase::Loading);
    }

    #[test]
    fn test_awaiting_fill_starts_when_index_arrives() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::SearchChange("pik".into()));

        let result = reducer(
            &mut state,
            Action::ReferencesDidLoad(vec![reference("bulbasaur"), reference("pikachu")]),
        );

        assert!(!state.query.awaiting_index);
        assert_eq!(result.effects.len(), 1);
        match &result.effects[0] {
            Effect::FillPage {
                page,
                request: PageRequest::References { references, has_more },
                ..
            } => {
                assert_eq!(*page, 1);
                assert_eq!(references, &vec![reference("pikachu")]);
                assert!(!has_more);
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn test_index_failure_fails_parked_search() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::SearchChange("pik".into()));

        reducer(&mut state, Action::ReferencesDidError("timed out".into()));

        assert_eq!(state.query.phase(), LoadPhase::Failed);
        assert_eq!(state.query.current_page, 0);
        assert!(state
            .query
            .error
            .as_deref()
            .is_some_and(|error| error.contains("timed out")));

        // Retry reloads the index and parks the fill again.
        let result = reducer(&mut state, Action::Retry);

        assert!(result.changed);
        assert_eq!(result.effects, vec![Effect::LoadReferences]);
        assert!(state.references.is_loading());
        assert!(state.query.awaiting_index);
        assert!(state.query.loading);
        assert_eq!(state.query.current_page, 1);
        assert_eq!(state.query.error, None);
    }

    #[test]
    fn test_search_input_keeps_spaces_and_case() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);

        for input in ["M", "Mr", "Mr ", "Mr m"] {
            reducer(&mut state, Action::SearchChange(input.into()));
        }

        assert_eq!(state.search_input, "Mr m");
        assert_eq!(state.query.search_term, "mr m");
    }

    #[test]
    fn test_trailing_space_updates_input_without_reset() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::SearchChange("Mr".into()));
        let generation = state.query.generation;

        let result = reducer(&mut state, Action::SearchChange("Mr ".into()));

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.search_input, "Mr ");
        assert_eq!(state.query.generation, generation);
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        let old_generation = state.query.generation;
        reducer(&mut state, Action::SearchChange("zzz".into()));

        let result = reducer(
            &mut state,
            Action::PageDidLoad {
                generation: old_generation,
                page: 1,
                items: vec![item(1, "bulbasaur")],
                has_more: true,
            },
        );

        assert!(!result.changed);
        assert!(state.results.is_empty());
    }

    #[test]
    fn test_swipe_cycles_tabs() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Navigate(Route::detail("25")));

        reducer(&mut state, Action::DetailSwipe(SwipeDirection::Backward));
        assert_eq!(state.detail.as_ref().unwrap().tab, DetailTab::Moves);

        reducer(&mut state, Action::DetailSwipe(SwipeDirection::Forward));
        assert_eq!(state.detail.as_ref().unwrap().tab, DetailTab::BasicInfo);

        let result = reducer(&mut state, Action::DetailTabSelect(7));
        assert!(!result.changed);
    }

    #[test]
    fn test_detail_for_other_id_is_ignored() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Navigate(Route::detail("25")));

        let result = reducer(
            &mut state,
            Action::DetailDidLoad {
                id: "4".into(),
                detail: item(4, "charmander"),
            },
        );

        assert!(!result.changed);
        assert!(state.detail.as_ref().unwrap().record.is_loading());
    }

    #[test]
    fn test_tick_only_rerenders_when_busy() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);

        reducer(&mut state, Action::Init);
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick, 1);
    }
}
