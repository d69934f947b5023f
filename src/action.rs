use serde::{Deserialize, Serialize};

use crate::route::{Route, SwipeDirection};
use crate::state::{ItemDetail, ItemReference};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    ReferencesDidLoad(Vec<ItemReference>),
    ReferencesDidError(String),

    SearchStart,
    SearchClose,
    /// Full replacement term, as typed.
    SearchChange(String),

    LoadNextPage,
    ScrollNearBottom,
    Retry,
    PageDidLoad {
        generation: u64,
        page: usize,
        items: Vec<ItemDetail>,
        has_more: bool,
    },
    PageDidError {
        generation: u64,
        page: usize,
        error: String,
    },

    SelectionMove(i16),
    SelectionSet(usize),
    OpenSelected,

    Navigate(Route),
    NavigateBack,

    DetailDidLoad { id: String, detail: ItemDetail },
    DetailDidError { id: String, error: String },
    DetailTabSelect(usize),
    DetailSwipe(SwipeDirection),

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
