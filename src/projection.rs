//! View models derived from `AppState`; nothing here mutates state

use ratatui::style::Color;

use crate::route::DetailTab;
use crate::state::{AppState, ItemDetail, LoadPhase};

pub const HEADING: &str = "Pokémon List";
pub const LOADING_MESSAGE: &str = "Loading more Pokémon...";
pub const EMPTY_MESSAGE: &str = "No Pokémon found. Please check the name and try again.";
pub const DETAIL_LOADING_MESSAGE: &str = "Loading...";
pub const DETAIL_MISSING_MESSAGE: &str = "Pokemon not found";
pub const MOVE_PREVIEW: usize = 5;

pub const CARD_WIDTH: u16 = 24;
pub const CARD_HEIGHT: u16 = 5;

/// Cards per grid row for a terminal `width` columns wide.
pub fn grid_columns(width: u16) -> usize {
    (width.saturating_sub(2) / CARD_WIDTH).max(1) as usize
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardView {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
    pub accent: Color,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListView {
    pub heading: &'static str,
    pub search_input: String,
    pub search_active: bool,
    pub cards: Vec<CardView>,
    pub show_loading: bool,
    pub show_empty: bool,
    pub failure: Option<String>,
    pub exhausted: bool,
    pub index_size: Option<usize>,
}

pub fn list_view(state: &AppState) -> ListView {
    let query = &state.query;
    let phase = query.phase();
    let cards = state
        .results
        .iter()
        .enumerate()
        .map(|(idx, item)| card_view(item, idx == state.selected_index))
        .collect::<Vec<_>>();
    ListView {
        heading: HEADING,
        search_input: state.search_input.clone(),
        search_active: state.search_active,
        show_loading: query.loading,
        show_empty: !query.loading
            && query.completed_once
            && query.error.is_none()
            && cards.is_empty(),
        failure: query.error.clone(),
        exhausted: phase == LoadPhase::Exhausted && !cards.is_empty(),
        index_size: state.references.data().map(Vec::len),
        cards,
    }
}

pub fn card_view(item: &ItemDetail, selected: bool) -> CardView {
    CardView {
        id: item.id,
        name: format_name(&item.name),
        types: item.types.clone(),
        accent: type_accent(&item.types),
        selected,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DetailBody {
    Loading,
    Missing,
    Lines(Vec<String>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub types: Vec<String>,
    pub sprite_url: Option<String>,
    pub accent: Color,
    pub tabs: [&'static str; 3],
    pub active_tab: usize,
    pub body: DetailBody,
}

pub fn detail_view(state: &AppState) -> Option<DetailView> {
    let detail = state.detail.as_ref()?;
    let tabs = DetailTab::ALL.map(DetailTab::title);
    let view = match detail.record.data() {
        Some(item) => DetailView {
            title: format_name(&item.name),
            types: item.types.clone(),
            sprite_url: item.sprite_url.clone(),
            accent: type_accent(&item.types),
            tabs,
            active_tab: detail.tab.index(),
            body: DetailBody::Lines(tab_lines(item, detail.tab)),
        },
        None => DetailView {
            title: format!("#{}", detail.id),
            types: Vec::new(),
            sprite_url: None,
            accent: type_accent(&[]),
            tabs,
            active_tab: detail.tab.index(),
            body: if detail.record.is_loading() {
                DetailBody::Loading
            } else {
                DetailBody::Missing
            },
        },
    };
    Some(view)
}

pub fn tab_lines(item: &ItemDetail, tab: DetailTab) -> Vec<String> {
    match tab {
        DetailTab::BasicInfo => {
            let experience = item
                .base_experience
                .map(|value| value.to_string())
                .unwrap_or_else(|| "--".to_string());
            vec![
                format!("Height: {} m", f64::from(item.height) / 10.0),
                format!("Weight: {} kg", f64::from(item.weight) / 10.0),
                format!("Base Experience: {experience}"),
                format!("Abilities: {}", item.abilities.join(" | ")),
            ]
        }
        DetailTab::Stats => item
            .stats
            .iter()
            .map(|stat| format!("{}: {}", stat.name.replace('-', " "), stat.value))
            .collect(),
        DetailTab::Moves => {
            if item.moves.is_empty() {
                return vec!["No moves found".to_string()];
            }
            item.moves
                .iter()
                .take(MOVE_PREVIEW)
                .map(|name| format!("• {name}"))
                .collect()
        }
    }
}

pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Card and header colour keyed by the primary type.
pub fn type_accent(types: &[String]) -> Color {
    let Some(primary) = types.first() else {
        return Color::Rgb(168, 167, 122);
    };
    match primary.as_str() {
        "fire" => Color::Rgb(238, 129, 48),
        "water" => Color::Rgb(99, 144, 240),
        "grass" => Color::Rgb(122, 199, 76),
        "electric" => Color::Rgb(247, 208, 44),
        "ice" => Color::Rgb(150, 217, 214),
        "fighting" => Color::Rgb(194, 46, 40),
        "poison" => Color::Rgb(163, 62, 161),
        "ground" => Color::Rgb(226, 191, 101),
        "flying" => Color::Rgb(169, 143, 243),
        "psychic" => Color::Rgb(249, 85, 135),
        "bug" => Color::Rgb(166, 185, 26),
        "rock" => Color::Rgb(182, 161, 54),
        "ghost" => Color::Rgb(115, 87, 151),
        "dragon" => Color::Rgb(111, 53, 252),
        "dark" => Color::Rgb(112, 87, 70),
        "steel" => Color::Rgb(183, 183, 206),
        "fairy" => Color::Rgb(214, 133, 173),
        _ => Color::Rgb(168, 167, 122),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ItemStat;

    fn charizard() -> ItemDetail {
        ItemDetail {
            id: 6,
            name: "charizard".into(),
            sprite_url: Some("https://img/6.png".into()),
            height: 17,
            weight: 905,
            base_experience: Some(267),
            types: vec!["fire".into(), "flying".into()],
            abilities: vec!["blaze".into(), "solar-power".into()],
            stats: vec![
                ItemStat {
                    name: "hp".into(),
                    value: 78,
                },
                ItemStat {
                    name: "special-attack".into(),
                    value: 109,
                },
            ],
            moves: (1..=8).map(|idx| format!("move-{idx}")).collect(),
        }
    }

    #[test]
    fn test_empty_state_needs_a_completed_query() {
        let mut state = AppState::default();
        assert!(!list_view(&state).show_empty);

        state.query.completed_once = true;
        state.query.has_more = false;
        let view = list_view(&state);
        assert!(view.show_empty);
        assert!(!view.show_loading);

        state.query.loading = true;
        assert!(!list_view(&state).show_empty);
    }

    #[test]
    fn test_failure_is_distinct_from_empty() {
        let mut state = AppState::default();
        state.query.completed_once = true;
        state.query.error = Some("request failed: timed out".into());

        let view = list_view(&state);
        assert!(!view.show_empty);
        assert_eq!(view.failure.as_deref(), Some("request failed: timed out"));
    }

    #[test]
    fn test_basic_info_lines() {
        let lines = tab_lines(&charizard(), DetailTab::BasicInfo);
        assert_eq!(lines[0], "Height: 1.7 m");
        assert_eq!(lines[1], "Weight: 90.5 kg");
        assert_eq!(lines[2], "Base Experience: 267");
        assert_eq!(lines[3], "Abilities: blaze | solar-power");
    }

    #[test]
    fn test_stats_and_moves_lines() {
        let item = charizard();
        assert_eq!(
            tab_lines(&item, DetailTab::Stats),
            vec!["hp: 78".to_string(), "special attack: 109".to_string()]
        );
        assert_eq!(tab_lines(&item, DetailTab::Moves).len(), MOVE_PREVIEW);

        let bare = ItemDetail {
            moves: Vec::new(),
            ..item
        };
        assert_eq!(tab_lines(&bare, DetailTab::Moves), vec!["No moves found"]);
    }

    #[test]
    fn test_grid_columns_never_zero() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(80), 3);
        assert_eq!(grid_columns(122), 5);
    }

    #[test]
    fn test_format_name() {
        assert_eq!(format_name("mr-mime"), "Mr Mime");
        assert_eq!(format_name("pikachu"), "Pikachu");
    }
}
