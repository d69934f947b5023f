use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT_RED, BG_BASE, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::route::Route;

pub struct NotFoundProps<'a> {
    pub path: &'a str,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct NotFoundPage;

impl Component<Action> for NotFoundPage {
    type Props<'a> = NotFoundProps<'a>;

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
                KeyCode::Enter | KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                    Some(Action::Navigate(Route::List))
                }
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(BG_BASE).fg(TEXT_MAIN))
            .border_style(Style::default().fg(ACCENT_RED));
        let lines = vec![
            Line::default(),
            Line::from(Span::styled(
                "Page not found",
                Style::default()
                    .fg(ACCENT_RED)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(props.path.to_string()),
            Line::default(),
            Line::from(Span::styled(
                "press Enter to return to the list",
                Style::default().fg(TEXT_DIM),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    #[test]
    fn test_any_exit_key_returns_to_list() {
        let mut component = NotFoundPage;
        let actions: Vec<_> = component
            .handle_event(
                &EventKind::Key(key("b")),
                NotFoundProps {
                    path: "/berries",
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::Navigate(Route::List));
    }

    #[test]
    fn test_render_shows_path() {
        let mut render = RenderHarness::new(50, 10);
        let mut component = NotFoundPage;
        let output = render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                NotFoundProps {
                    path: "/berries/1",
                    is_focused: true,
                },
            );
        });
        assert!(output.contains("Page not found"));
        assert!(output.contains("/berries/1"));
    }
}
