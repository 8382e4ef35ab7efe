//! src/view/components/results_list.rs
//! Ordered list of result titles, replaced wholesale on every render.

use crate::{search::response::SearchDoc, view::theme};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem},
};

pub struct ResultsList;

impl ResultsList {
    pub const fn new() -> Self {
        Self
    }

    /// `1. title`, one row per doc; untitled docs keep their number only.
    pub fn items(docs: &[SearchDoc]) -> Vec<ListItem<'_>> {
        docs.iter()
            .enumerate()
            .map(|(i, doc)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>2}. ", i + 1), theme::index_style()),
                    Span::raw(doc.display_title()),
                ]))
            })
            .collect()
    }

    pub fn title(shown: usize, total: Option<u64>) -> String {
        match total {
            Some(total) if total > shown as u64 => format!(" Results ({shown} of {total}) "),
            _ => format!(" Results ({shown}) "),
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, docs: &[SearchDoc], total: Option<u64>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Self::title(docs.len(), total))
            .border_style(theme::results_border_style())
            .style(theme::base_style());

        frame.render_widget(List::new(Self::items(docs)).block(block), area);
    }
}

impl Default for ResultsList {
    fn default() -> Self {
        Self::new()
    }
}
