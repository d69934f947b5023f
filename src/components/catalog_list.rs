use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
};

use super::{
    spinner, status_bar_style, Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_BASE,
    BG_HIGHLIGHT, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::projection::{
    grid_columns, list_view, CardView, ListView, CARD_HEIGHT, CARD_WIDTH, EMPTY_MESSAGE,
    LOADING_MESSAGE,
};
use crate::state::AppState;

pub struct CatalogListProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Search line, card grid and load indicator for the list route.
#[derive(Default)]
pub struct CatalogList {
    scroll_row: usize,
    visible_rows: usize,
}

impl CatalogList {
    pub fn new() -> Self {
        Self::default()
    }

    fn search_keys(key_code: KeyCode, modifiers: KeyModifiers, term: &str) -> Vec<Action> {
        match key_code {
            KeyCode::Esc | KeyCode::Enter => vec![Action::SearchClose],
            KeyCode::Backspace => {
                let mut next = term.to_string();
                if next.pop().is_none() {
                    return Vec::new();
                }
                vec![Action::SearchChange(next)]
            }
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                let mut next = term.to_string();
                next.push(c);
                vec![Action::SearchChange(next)]
            }
            _ => Vec::new(),
        }
    }

    fn bottom_visible(&self, result_count: usize, columns: usize) -> bool {
        let total_rows = result_count.div_ceil(columns);
        self.scroll_row + self.visible_rows.max(1) >= total_rows
    }

    /// Keep the selected row inside the visible window.
    fn follow_selection(&mut self, selected: usize, columns: usize, visible_rows: usize) {
        let selected_row = selected / columns;
        if selected_row < self.scroll_row {
            self.scroll_row = selected_row;
        } else if selected_row >= self.scroll_row + visible_rows {
            self.scroll_row = selected_row + 1 - visible_rows;
        }
        self.visible_rows = visible_rows;
    }
}

impl Component<Action> for CatalogList {
    type Props<'a> = CatalogListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let state = props.state;
        let columns = grid_columns(state.terminal_size.0);
        let step = columns as i16;

        match event {
            EventKind::Key(key) => {
                if state.search_active {
                    return Self::search_keys(key.code, key.modifiers, &state.search_input);
                }
                match key.code {
                    KeyCode::Char('/') => vec![Action::SearchStart],
                    KeyCode::Char('q') => vec![Action::Quit],
                    KeyCode::Char('r') | KeyCode::F(5) => vec![Action::Retry],
                    KeyCode::Char('n') | KeyCode::PageDown => vec![Action::LoadNextPage],
                    KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectionMove(-step)],
                    KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectionMove(step)],
                    KeyCode::Left | KeyCode::Char('h') => vec![Action::SelectionMove(-1)],
                    KeyCode::Right | KeyCode::Char('l') => vec![Action::SelectionMove(1)],
                    KeyCode::Home | KeyCode::Char('g') => vec![Action::SelectionSet(0)],
                    KeyCode::Enter => vec![Action::OpenSelected],
                    KeyCode::Esc if state.query.is_filtered() => {
                        vec![Action::SearchChange(String::new())]
                    }
                    _ => Vec::new(),
                }
            }
            EventKind::Scroll { delta, .. } => {
                let rows = *delta as i16;
                let mut actions = vec![Action::SelectionMove(rows.saturating_mul(step))];
                if *delta > 0 && self.bottom_visible(state.results.len(), columns) {
                    actions.push(Action::ScrollNearBottom);
                }
                actions
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let view = list_view(state);
        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {} ", view.heading),
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(BG_BASE).fg(TEXT_MAIN))
            .border_style(Style::default().fg(if props.is_focused {
                ACCENT_TEAL
            } else {
                TEXT_DIM
            }));
        if let Some(count) = view.index_size {
            block = block.title(Line::from(format!(" {count} indexed ")).right_aligned());
        }
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);

        let body = Layout::vertical([
            Constraint::Length(1), // Search line
            Constraint::Min(1),    // Card grid
            Constraint::Length(1), // Load indicator
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(search_line(&view)), body[0]);
        self.render_grid(frame, body[1], &view, state.selected_index);
        frame.render_widget(
            Paragraph::new(indicator_line(&view, state.tick)),
            body[2],
        );

        let route = state.route.path();
        let route_items = [StatusBarItem::span(Span::styled(
            route.as_str(),
            Style::default().fg(ACCENT_GOLD),
        ))];
        let hints = if state.search_active {
            vec![
                StatusBarHint::new("type", "filter"),
                StatusBarHint::new("Bksp", "delete"),
                StatusBarHint::new("Enter/Esc", "done"),
            ]
        } else {
            vec![
                StatusBarHint::new("/", "search"),
                StatusBarHint::new("Enter", "open"),
                StatusBarHint::new("n", "more"),
                StatusBarHint::new("r", "retry"),
                StatusBarHint::new("q", "quit"),
            ]
        };
        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[1],
            StatusBarProps {
                left: StatusBarSection::hints(&hints).with_separator("  "),
                center: StatusBarSection::empty(),
                right: StatusBarSection::items(&route_items),
                style: status_bar_style(),
                is_focused: false,
            },
        );
    }
}

impl CatalogList {
    fn render_grid(&mut self, frame: &mut Frame, area: Rect, view: &ListView, selected: usize) {
        if view.show_empty {
            frame.render_widget(
                Paragraph::new(EMPTY_MESSAGE)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                area,
            );
            return;
        }

        let columns = grid_columns(area.width.saturating_add(2));
        let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
        self.follow_selection(selected, columns, visible_rows);

        let first = self.scroll_row * columns;
        for (offset, card) in view
            .cards
            .iter()
            .skip(first)
            .take(columns * visible_rows)
            .enumerate()
        {
            let row = (offset / columns) as u16;
            let col = (offset % columns) as u16;
            let card_area = Rect {
                x: area.x + col * CARD_WIDTH,
                y: area.y + row * CARD_HEIGHT,
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            }
            .intersection(area);
            if card_area.is_empty() {
                continue;
            }
            render_card(frame, card_area, card);
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &CardView) {
    let bg = if card.selected { BG_HIGHLIGHT } else { BG_PANEL };
    let mut border = Style::default().fg(card.accent);
    if card.selected {
        border = border.add_modifier(Modifier::BOLD);
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" #{:03} ", card.id))
        .style(Style::default().bg(bg).fg(TEXT_MAIN))
        .border_style(border);
    let lines = vec![
        Line::from(Span::styled(
            card.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            card.types.join(" / "),
            Style::default().fg(card.accent),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn search_line(view: &ListView) -> Line<'static> {
    let label = Span::styled("Search: ", Style::default().fg(TEXT_DIM));
    if view.search_active {
        return Line::from(vec![
            label,
            Span::styled(view.search_input.clone(), Style::default().fg(TEXT_MAIN)),
            Span::styled("_", Style::default().fg(ACCENT_TEAL)),
        ]);
    }
    if view.search_input.is_empty() {
        return Line::from(vec![
            label,
            Span::styled("press / to search by name", Style::default().fg(TEXT_DIM)),
        ]);
    }
    Line::from(vec![
        label,
        Span::styled(view.search_input.clone(), Style::default().fg(ACCENT_GOLD)),
        Span::styled("  (Esc clears)", Style::default().fg(TEXT_DIM)),
    ])
}

fn indicator_line(view: &ListView, tick: u64) -> Line<'static> {
    if let Some(error) = &view.failure {
        return Line::from(vec![
            Span::styled(format!("Failed to load: {error}"), Style::default().fg(ACCENT_RED)),
            Span::styled("  press r to retry", Style::default().fg(TEXT_DIM)),
        ]);
    }
    if view.show_loading {
        return Line::from(Span::styled(
            format!("{} {LOADING_MESSAGE}", spinner(tick)),
            Style::default().fg(ACCENT_GOLD),
        ));
    }
    if view.exhausted {
        return Line::from(Span::styled(
            format!("End of list, {} shown", view.cards.len()),
            Style::default().fg(TEXT_DIM),
        ));
    }
    if view.cards.is_empty() {
        return Line::default();
    }
    Line::from(Span::styled(
        format!("{} shown", view.cards.len()),
        Style::default().fg(TEXT_DIM),
    ))
}
