//! Rendering for the auth method prompt.

use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};

use crate::tui::AuthSelector;

pub const PROMPT_TITLE: &str = "How would you like to authenticate?";

/// Draw the prompt: question, numbered options with the selection
/// highlighted, and the hint line.
pub fn draw_auth_selector(frame: &mut Frame<'_>, selector: &AuthSelector) {
    let mut lines = vec![Line::from(PROMPT_TITLE), Line::default()];

    for (index, method) in selector.options().iter().enumerate() {
        let is_selected = index == selector.selected_index();
        let (marker, style) = if is_selected {
            ("› ", Style::default().fg(Color::Cyan))
        } else {
            ("  ", Style::default().fg(Color::Gray))
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}. {}", index + 1, method.label()),
            style,
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        selector.hint(),
        Style::default().add_modifier(Modifier::DIM),
    )));

    let paragraph = Paragraph::new(lines).block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(paragraph, frame.area());
}
