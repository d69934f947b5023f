//! Effects - side effects declared by the reducer

use crate::loader::PageRequest;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Walk the paged list endpoint to build the search index.
    LoadReferences,
    /// Run one page-fill; the completion is tagged with `generation`.
    FillPage {
        generation: u64,
        page: usize,
        request: PageRequest,
    },
    LoadDetail { id: String },
}
