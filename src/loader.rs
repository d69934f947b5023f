//! Page-fill execution: one batch of serial, throttled detail fetches

use std::ops::Range;
use std::time::Duration;

use crate::api::{CatalogSource, SourceError};
use crate::state::{ItemDetail, ItemReference};

/// What a single page-fill has to fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum PageRequest {
    /// Unfiltered: ask the paged endpoint for this window, then fetch each entry.
    Offset { offset: usize, limit: usize },
    /// Filtered: the window was already cut from the reference index.
    References {
        references: Vec<ItemReference>,
        has_more: bool,
    },
}

impl PageRequest {
    pub fn for_page(page: usize, page_size: usize) -> Self {
        let limit = page_size.max(1);
        PageRequest::Offset {
            offset: page.saturating_sub(1) * limit,
            limit,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageBatch {
    pub items: Vec<ItemDetail>,
    pub has_more: bool,
}

/// Filtered window for one page of a prefix search.
#[derive(Clone, Debug, PartialEq)]
pub struct FilteredWindow {
    pub references: Vec<ItemReference>,
    pub total_matches: usize,
    pub has_more: bool,
}

/// Run one page-fill. Any failure aborts the batch and drops what was
/// fetched so far.
pub async fn fill_page<S>(
    source: &S,
    request: &PageRequest,
    delay: Duration,
) -> Result<PageBatch, SourceError>
where
    S: CatalogSource + ?Sized,
{
    match request {
        PageRequest::Offset { offset, limit } => {
            let page = source.list_page(*offset, *limit).await?;
            let items = fetch_serially(source, &page.results, delay).await?;
            Ok(PageBatch {
                items,
                has_more: page.next.is_some(),
            })
        }
        PageRequest::References {
            references,
            has_more,
        } => {
            let items = fetch_serially(source, references, delay).await?;
            Ok(PageBatch {
                items,
                has_more: *has_more,
            })
        }
    }
}

async fn fetch_serially<S>(
    source: &S,
    references: &[ItemReference],
    delay: Duration,
) -> Result<Vec<ItemDetail>, SourceError>
where
    S: CatalogSource + ?Sized,
{
    let mut items = Vec::with_capacity(references.len());
    for (index, reference) in references.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        items.push(source.fetch_detail(reference).await?);
    }
    Ok(items)
}

/// Case-insensitive name-prefix match, preserving index order.
pub fn prefix_matches<'a>(references: &'a [ItemReference], term: &str) -> Vec<&'a ItemReference> {
    let term = term.trim().to_lowercase();
    references
        .iter()
        .filter(|reference| reference.name.to_lowercase().starts_with(&term))
        .collect()
}

/// `[start, end)` of a 1-based page, clipped to `len`.
pub fn page_window(len: usize, page: usize, page_size: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

pub fn filtered_window(
    references: &[ItemReference],
    term: &str,
    page: usize,
    page_size: usize,
) -> FilteredWindow {
    let matches = prefix_matches(references, term);
    let window = page_window(matches.len(), page, page_size);
    let has_more = window.end < matches.len();
    FilteredWindow {
        references: matches[window].iter().map(|&reference| reference.clone()).collect(),
        total_matches: matches.len(),
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(names: &[&str]) -> Vec<ItemReference> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| ItemReference {
                name: name.to_string(),
                url: format!("https://pokeapi.co/api/v2/pokemon/{}/", idx + 1),
            })
            .collect()
    }

    #[test]
    fn test_prefix_match_is_case_insensitive_and_anchored() {
        let index = refs(&["pikachu", "Pidgey", "raichu", "pichu"]);
        let names: Vec<_> = prefix_matches(&index, "PI")
            .into_iter()
            .map(|reference| reference.name.as_str())
            .collect();
        assert_eq!(names, vec!["pikachu", "Pidgey", "pichu"]);
        assert!(prefix_matches(&index, "chu").is_empty());
    }

    #[test]
    fn test_page_window_clips() {
        assert_eq!(page_window(25, 1, 20), 0..20);
        assert_eq!(page_window(25, 2, 20), 20..25);
        assert_eq!(page_window(25, 3, 20), 25..25);
        assert_eq!(page_window(0, 1, 20), 0..0);
    }

    #[test]
    fn test_filtered_window_flags_more_pages() {
        let names: Vec<String> = (0..45).map(|idx| format!("bulba{idx:02}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let index = refs(&name_refs);

        let first = filtered_window(&index, "bulba", 1, 20);
        assert_eq!(first.references.len(), 20);
        assert_eq!(first.total_matches, 45);
        assert!(first.has_more);

        let last = filtered_window(&index, "bulba", 3, 20);
        assert_eq!(last.references.len(), 5);
        assert!(!last.has_more);
    }

    #[test]
    fn test_offset_request_for_page() {
        assert_eq!(
            PageRequest::for_page(3, 20),
            PageRequest::Offset {
                offset: 40,
                limit: 20
            }
        );
    }
}
