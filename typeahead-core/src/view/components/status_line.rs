//! src/view/components/status_line.rs
//! One line under the input: loading text, last failure, or key hints.

use crate::{model::search_state::SearchState, view::theme};
use ratatui::{prelude::*, widgets::Paragraph};

const HINTS: &str = "Esc quit · Ctrl+U clear";

pub struct StatusLine<'a> {
    loading_text: &'a str,
}

impl<'a> StatusLine<'a> {
    pub const fn new(loading_text: &'a str) -> Self {
        Self { loading_text }
    }

    pub fn line(&self, state: &SearchState) -> Line<'a> {
        if state.loading {
            Line::from(Span::styled(self.loading_text, theme::loading_style()))
        } else if let Some(err) = &state.last_error {
            Line::from(Span::styled(
                format!("Search failed: {err}"),
                theme::error_style(),
            ))
        } else {
            Line::from(Span::styled(HINTS, theme::index_style()))
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, state: &SearchState, area: Rect) {
        frame.render_widget(
            Paragraph::new(self.line(state)).style(theme::hint_style()),
            area,
        );
    }
}
