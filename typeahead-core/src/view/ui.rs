//! src/view/ui.rs
//! ============================================================
//! Frame renderer: maps the input and the search state onto the
//! screen. Pure presentation; nothing here mutates widget state.

use std::time::{Duration, Instant};

use ratatui::prelude::*;
use tracing::{instrument, warn};

use crate::{
    config::UiConfig,
    model::{input::TextInput, search_state::SearchState},
    view::components::{
        results_list::ResultsList, search_input::SearchInputField, status_line::StatusLine,
    },
};

pub struct UIRenderer {
    texts: UiConfig,
    results: ResultsList,
    stats: RenderStats,
}

#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl RenderStats {
    #[must_use]
    pub fn avg(&self) -> Duration {
        if self.frames == 0 {
            Duration::ZERO
        } else {
            self.total.div_f64(self.frames as f64)
        }
    }
}

impl UIRenderer {
    #[must_use]
    pub fn new(texts: UiConfig) -> Self {
        Self {
            texts,
            results: ResultsList::new(),
            stats: RenderStats::default(),
        }
    }

    #[must_use]
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Input box, status line, then the result list filling the rest.
    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, input: &TextInput, state: &SearchState) {
        let start = Instant::now();

        let [input_area, status_area, results_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(f.area());

        SearchInputField::new(&self.texts.label, &self.texts.placeholder)
            .render(f, input, input_area);
        StatusLine::new(&self.texts.loading_text).render(f, state, status_area);
        self.results
            .render(f, &state.results, state.total, results_area);

        let dur = start.elapsed();
        self.stats.total += dur;
        self.stats.frames += 1;
        if dur.as_millis() > 16 {
            self.stats.slow += 1;
            warn!("Slow render: {}ms (target: <16ms)", dur.as_millis());
        }
    }
}
