use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{StatusBar, StatusBarHint, StatusBarProps, StatusBarSection};

use super::{
    spinner, status_bar_style, Component, ACCENT_RED, ACCENT_TEAL, BG_BASE, BG_PANEL, TEXT_DIM,
    TEXT_MAIN,
};
use crate::action::Action;
use crate::projection::{detail_view, DetailBody, DETAIL_LOADING_MESSAGE, DETAIL_MISSING_MESSAGE};
use crate::route::SwipeDirection;
use crate::state::AppState;

pub struct DetailPanelProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Tabbed detail page for a single item.
#[derive(Default)]
pub struct DetailPanel;

impl Component<Action> for DetailPanel {
    type Props<'a> = DetailPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char(c @ '1'..='3') => {
                    let index = c as usize - '1' as usize;
                    Some(Action::DetailTabSelect(index))
                }
                KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                    Some(Action::DetailSwipe(SwipeDirection::Forward))
                }
                KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                    Some(Action::DetailSwipe(SwipeDirection::Backward))
                }
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                    Some(Action::NavigateBack)
                }
                KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Retry),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Detail body
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let Some(view) = detail_view(props.state) else {
            frame.render_widget(
                Paragraph::new(DETAIL_MISSING_MESSAGE).alignment(Alignment::Center),
                chunks[0],
            );
            return;
        };

        let mut title = vec![Span::styled(
            format!(" {} ", view.title),
            Style::default()
                .fg(view.accent)
                .add_modifier(Modifier::BOLD),
        )];
        if !view.types.is_empty() {
            title.push(Span::styled(
                format!("{} ", view.types.join(" / ")),
                Style::default().fg(TEXT_DIM),
            ));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(title))
            .style(Style::default().bg(BG_BASE).fg(TEXT_MAIN))
            .border_style(Style::default().fg(view.accent));
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);

        let layout = Layout::vertical([
            Constraint::Length(1), // Sprite link
            Constraint::Length(2), // Tabs
            Constraint::Min(1),    // Tab body
        ])
        .split(inner);

        if let Some(url) = &view.sprite_url {
            frame.render_widget(
                Paragraph::new(Span::styled(url.as_str(), Style::default().fg(TEXT_DIM))),
                layout[0],
            );
        }

        let tabs = Tabs::new(view.tabs.to_vec())
            .select(view.active_tab)
            .style(Style::default().fg(TEXT_DIM).bg(BG_PANEL))
            .highlight_style(
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, layout[1]);

        let body = match &view.body {
            DetailBody::Loading => Paragraph::new(Span::styled(
                format!("{} {DETAIL_LOADING_MESSAGE}", spinner(props.state.tick)),
                Style::default().fg(TEXT_DIM),
            )),
            DetailBody::Missing => Paragraph::new(vec![
                Line::from(Span::styled(
                    DETAIL_MISSING_MESSAGE,
                    Style::default().fg(ACCENT_RED),
                )),
                Line::from(Span::styled(
                    "press r to retry or Esc to go back",
                    Style::default().fg(TEXT_DIM),
                )),
            ]),
            DetailBody::Lines(lines) => Paragraph::new(
                lines
                    .iter()
                    .map(|line| Line::from(line.as_str()))
                    .collect::<Vec<_>>(),
            )
            .wrap(Wrap { trim: true }),
        };
        frame.render_widget(body, layout[2]);

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[1],
            StatusBarProps {
                left: StatusBarSection::hints(&[
                    StatusBarHint::new("1-3", "tab"),
                    StatusBarHint::new("h/l", "swipe"),
                    StatusBarHint::new("Esc", "back"),
                    StatusBarHint::new("q", "quit"),
                ])
                .with_separator("  "),
                center: StatusBarSection::empty(),
                right: StatusBarSection::empty(),
                style: status_bar_style(),
                is_focused: false,
            },
        );
    }
}
