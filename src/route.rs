//! Path-based routes and detail-tab cycling

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the shell is pointed: the catalog list or one item's detail page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    #[default]
    List,
    Detail {
        id: String,
    },
    NotFound {
        path: String,
    },
}

impl Route {
    /// Parse a path such as `/`, `/pokemon/25` or `/pokemon/pikachu/`.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        match segments.as_slice() {
            [] => Route::List,
            ["pokemon", id] => Route::Detail {
                id: id.to_ascii_lowercase(),
            },
            _ => Route::NotFound {
                path: trimmed.to_string(),
            },
        }
    }

    pub fn detail(id: impl Into<String>) -> Self {
        Route::Detail { id: id.into() }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Detail { id } => format!("/pokemon/{id}"),
            Route::NotFound { path } => path.clone(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Route::List)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Swipe gesture direction on the detail page.
///
/// A left swipe moves forward through the tabs, a right swipe moves back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeDirection {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailTab {
    #[default]
    BasicInfo,
    Stats,
    Moves,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::BasicInfo, DetailTab::Stats, DetailTab::Moves];

    pub fn index(self) -> usize {
        match self {
            DetailTab::BasicInfo => 0,
            DetailTab::Stats => 1,
            DetailTab::Moves => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::BasicInfo => "Basic Info",
            DetailTab::Stats => "Base Stats",
            DetailTab::Moves => "Moves",
        }
    }

    /// Step one tab in the swipe direction, wrapping around at either end.
    pub fn swipe(self, direction: SwipeDirection) -> Self {
        let count = Self::ALL.len();
        let next = match direction {
            SwipeDirection::Forward => (self.index() + 1) % count,
            SwipeDirection::Backward => (self.index() + count - 1) % count,
        };
        Self::ALL[next]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(Route::parse("/pokemon/25"), Route::detail("25"));
        assert_eq!(Route::parse("/pokemon/Pikachu/"), Route::detail("pikachu"));
        assert_eq!(
            Route::parse("/berries/1"),
            Route::NotFound {
                path: "/berries/1".into()
            }
        );
        assert!(matches!(Route::parse("/pokemon"), Route::NotFound { .. }));
    }

    #[test]
    fn test_route_path_round_trip() {
        let route = Route::detail("132");
        assert_eq!(route.path(), "/pokemon/132");
        assert_eq!(Route::parse(&route.path()), route);
        assert_eq!(Route::List.to_string(), "/");
    }

    #[test]
    fn test_swipe_wraps_both_ways() {
        assert_eq!(DetailTab::Moves.swipe(SwipeDirection::Forward), DetailTab::BasicInfo);
        assert_eq!(
            DetailTab::BasicInfo.swipe(SwipeDirection::Backward),
            DetailTab::Moves
        );

        let mut tab = DetailTab::BasicInfo;
        for _ in 0..3 {
            tab = tab.swipe(SwipeDirection::Forward);
        }
        assert_eq!(tab, DetailTab::BasicInfo);
    }

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(DetailTab::from_index(1), Some(DetailTab::Stats));
        assert_eq!(DetailTab::from_index(3), None);
    }
}
