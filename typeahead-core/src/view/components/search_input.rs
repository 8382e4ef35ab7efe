//! src/view/components/search_input.rs
//! Labelled single-line input with placeholder and terminal cursor.

use crate::{model::input::TextInput, view::theme};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub struct SearchInputField<'a> {
    label: &'a str,
    placeholder: &'a str,
}

impl<'a> SearchInputField<'a> {
    pub const fn new(label: &'a str, placeholder: &'a str) -> Self {
        Self { label, placeholder }
    }

    pub fn render(&self, frame: &mut Frame<'_>, input: &TextInput, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.label))
            .border_style(theme::input_border_style())
            .style(theme::base_style());

        let line = if input.is_empty() {
            Line::from(Span::styled(self.placeholder, theme::placeholder_style()))
        } else {
            Line::from(input.value())
        };

        let inner = block.inner(area);
        // Cursor column counts chars, not bytes.
        let col = u16::try_from(input.value()[..input.cursor()].chars().count())
            .unwrap_or(u16::MAX);
        let offset = scroll_offset(col, inner.width);

        frame.render_widget(
            Paragraph::new(line).block(block).scroll((0, offset)),
            area,
        );

        if inner.width > 0 && inner.height > 0 {
            frame.set_cursor_position((inner.x + col - offset, inner.y));
        }
    }
}

/// Columns to scroll so the cursor stays on the last visible cell.
const fn scroll_offset(col: u16, width: u16) -> u16 {
    col.saturating_sub(width.saturating_sub(1))
}
