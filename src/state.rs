use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::route::{DetailTab, Route};

pub const PAGE_SIZE: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReference {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: u16,
    pub name: String,
    pub sprite_url: Option<String>,
    /// Decimetres.
    pub height: u16,
    /// Hectograms.
    pub weight: u16,
    pub base_experience: Option<u16>,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<ItemStat>,
    pub moves: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemStat {
    pub name: String,
    pub value: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadPhase {
    Idle,
    Loading,
    Exhausted,
    Failed,
}

/// Cursor and flags for the live list query.
///
/// `current_page` is the last page requested; pages `1..=current_page` are
/// what the result list holds once `loading` is false. Zero means nothing
/// has been requested for this term yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub search_term: String,
    pub current_page: usize,
    pub has_more: bool,
    pub loading: bool,
    /// Bumped on every reset; page-fill completions carry the value they
    /// were issued with.
    pub generation: u64,
    pub error: Option<String>,
    pub completed_once: bool,
    /// A filtered fill is parked until the reference index arrives.
    pub awaiting_index: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            current_page: 0,
            has_more: true,
            loading: false,
            generation: 0,
            error: None,
            completed_once: false,
            awaiting_index: false,
        }
    }
}

impl QueryState {
    pub fn phase(&self) -> LoadPhase {
        if self.loading {
            LoadPhase::Loading
        } else if self.error.is_some() {
            LoadPhase::Failed
        } else if !self.has_more {
            LoadPhase::Exhausted
        } else {
            LoadPhase::Idle
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.search_term.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetailState {
    pub id: String,
    pub record: DataResource<ItemDetail>,
    pub tab: DetailTab,
}

impl DetailState {
    pub fn loading(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            record: DataResource::Loading,
            tab: DetailTab::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub route: Route,
    pub page_size: usize,
    pub query: QueryState,
    pub results: Vec<ItemDetail>,
    pub references: DataResource<Vec<ItemReference>>,
    pub selected_index: usize,
    pub search_active: bool,
    /// Search box text exactly as typed; `query.search_term` is its
    /// normalized form.
    pub search_input: String,
    pub detail: Option<DetailState>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            route: Route::List,
            page_size: PAGE_SIZE,
            query: QueryState::default(),
            results: Vec::new(),
            references: DataResource::Empty,
            selected_index: 0,
            search_active: false,
            search_input: String::new(),
            detail: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn new(route: Route, page_size: usize) -> Self {
        Self {
            route,
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn selected_item(&self) -> Option<&ItemDetail> {
        self.results.get(self.selected_index)
    }

    pub fn current_detail(&self) -> Option<&ItemDetail> {
        self.detail.as_ref().and_then(|detail| detail.record.data())
    }

    pub fn reference_count(&self) -> usize {
        self.references.data().map(Vec::len).unwrap_or(0)
    }

    /// Keep the selection inside the result list.
    pub fn clamp_selection(&mut self) {
        if self.results.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.results.len() {
            self.selected_index = self.results.len() - 1;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.query.loading
            || self.references.is_loading()
            || self
                .detail
                .as_ref()
                .is_some_and(|detail| detail.record.is_loading())
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Query")
                .entry("input", ron_string(&self.search_input))
                .entry("term", ron_string(&self.query.search_term))
                .entry("page", ron_string(&self.query.current_page))
                .entry("phase", ron_string(&self.query.phase()))
                .entry("generation", ron_string(&self.query.generation))
                .entry("results", ron_string(&self.results.len()))
                .entry("error", ron_string(&self.query.error)),
            DebugSection::new("Index")
                .entry("references", ron_string(&self.reference_count()))
                .entry("loading", ron_string(&self.references.is_loading()))
                .entry("awaiting", ron_string(&self.query.awaiting_index)),
            DebugSection::new("Shell")
                .entry("route", ron_string(&self.route.path()))
                .entry("selected", ron_string(&self.selected_index))
                .entry("search_active", ron_string(&self.search_active))
                .entry(
                    "tab",
                    ron_string(&self.detail.as_ref().map(|detail| detail.tab)),
                ),
        ]
    }
}
