//! Search widget state and its reducer.
//!
//! `SearchState::apply` is the only place state changes. It never sleeps,
//! spawns or performs I/O; it returns `Effect`s for the controller to carry
//! out. Timer firings and query completions carry the generation they were
//! scheduled under and are dropped unless it is still the latest one.

use compact_str::CompactString;
use smallvec::{SmallVec, smallvec};
use tracing::{debug, error, trace};

use crate::error::AppError;
use crate::search::response::{SearchDoc, SearchHits};

/// Monotonic tag for one scheduled query.
pub type Generation = u64;

/// Where the widget is in its schedule / fetch cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing scheduled, nothing fetched yet.
    #[default]
    Idle,
    /// Timer pending.
    Scheduled,
    /// Timer fired, request in flight.
    Fetching,
    /// Latest request answered or failed.
    Settled,
}

/// Inputs to the reducer.
#[derive(Debug)]
pub enum SearchEvent {
    /// The input's raw text changed.
    Input(String),

    /// The debounce timer for `generation` elapsed.
    TimerFired(Generation),

    /// A request finished.
    Completed {
        generation: Generation,
        query: String,
        outcome: Result<SearchHits, AppError>,
    },

    /// The widget is being removed.
    Teardown,
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CancelTimer,
    ScheduleTimer(Generation),
    ExecuteQuery { generation: Generation, query: String },
}

pub type Effects = SmallVec<[Effect; 2]>;

#[derive(Debug, Default)]
pub struct SearchState {
    /// Raw input text, never trimmed.
    pub query: String,
    pub loading: bool,
    pub results: Vec<SearchDoc>,
    /// Total hit count reported with the current results.
    pub total: Option<u64>,
    pub last_error: Option<CompactString>,
    pub phase: Phase,
    generation: Generation,
    pending: Option<Generation>,
    torn_down: bool,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest generation handed out.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Generation of the timer currently pending, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<Generation> {
        self.pending
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Trimmed query as it would be sent.
    #[must_use]
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    pub fn apply(&mut self, event: SearchEvent) -> Effects {
        if self.torn_down {
            trace!("Ignoring {:?} after teardown", event);
            return Effects::new();
        }

        match event {
            SearchEvent::Input(value) => self.on_input(value),
            SearchEvent::TimerFired(generation) => self.on_timer(generation),
            SearchEvent::Completed {
                generation,
                query,
                outcome,
            } => {
                self.on_completed(generation, &query, outcome);
                Effects::new()
            }
            SearchEvent::Teardown => self.on_teardown(),
        }
    }

    fn on_input(&mut self, value: String) -> Effects {
        self.query = value;

        let mut effects = Effects::new();
        if self.pending.take().is_some() {
            effects.push(Effect::CancelTimer);
        }

        if self.query.trim().is_empty() {
            // A cancelled timer was the only reason to show loading; an
            // in-flight request still is.
            if self.phase == Phase::Scheduled {
                self.phase = Phase::Idle;
                self.loading = false;
            }
            return effects;
        }

        self.generation += 1;
        self.pending = Some(self.generation);
        self.loading = true;
        self.last_error = None;
        self.phase = Phase::Scheduled;
        effects.push(Effect::ScheduleTimer(self.generation));

        effects
    }

    fn on_timer(&mut self, generation: Generation) -> Effects {
        if self.pending != Some(generation) {
            debug!(generation, pending = ?self.pending, "Dropping stale timer");
            return Effects::new();
        }

        self.pending = None;
        self.phase = Phase::Fetching;
        smallvec![Effect::ExecuteQuery {
            generation,
            query: self.query.trim().to_string(),
        }]
    }

    fn on_completed(
        &mut self,
        generation: Generation,
        query: &str,
        outcome: Result<SearchHits, AppError>,
    ) {
        if generation != self.generation {
            debug!(
                generation,
                latest = self.generation,
                query,
                "Discarding superseded response"
            );
            return;
        }

        match outcome {
            Ok(hits) => {
                debug!(query, docs = hits.docs.len(), "Query settled");
                self.results = hits.docs;
                self.total = hits.total;
                self.last_error = None;
            }
            Err(err) => {
                error!(query, error = %err, "Search query failed");
                self.last_error = Some(CompactString::from(err.to_string()));
            }
        }

        self.loading = false;
        self.phase = Phase::Settled;
    }

    fn on_teardown(&mut self) -> Effects {
        self.torn_down = true;
        self.loading = false;

        if self.pending.take().is_some() {
            smallvec![Effect::CancelTimer]
        } else {
            Effects::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(titles: &[&str]) -> SearchHits {
        titles
            .iter()
            .map(|t| SearchDoc::titled(*t))
            .collect::<Vec<_>>()
            .into()
    }

    fn input(state: &mut SearchState, v: &str) -> Effects {
        state.apply(SearchEvent::Input(v.to_string()))
    }

    fn complete(state: &mut SearchState, generation: Generation, outcome: Result<SearchHits, AppError>) {
        let effects = state.apply(SearchEvent::Completed {
            generation,
            query: state.trimmed_query().to_string(),
            outcome,
        });
        assert!(effects.is_empty());
    }

    #[test]
    fn first_keystroke_schedules() {
        let mut s = SearchState::new();
        assert_eq!(input(&mut s, "c").as_slice(), [Effect::ScheduleTimer(1)]);
        assert!(s.loading);
        assert_eq!(s.phase, Phase::Scheduled);
        assert_eq!(s.pending(), Some(1));
    }

    #[test]
    fn each_keystroke_cancels_and_reschedules() {
        let mut s = SearchState::new();
        input(&mut s, "c");
        let effects = input(&mut s, "ca");
        assert_eq!(
            effects.as_slice(),
            [Effect::CancelTimer, Effect::ScheduleTimer(2)]
        );
        assert_eq!(s.pending(), Some(2));
    }

    #[test]
    fn blank_input_never_schedules() {
        let mut s = SearchState::new();
        assert!(input(&mut s, "").is_empty());
        assert!(input(&mut s, "   \t").is_empty());
        assert!(!s.loading);
        assert_eq!(s.phase, Phase::Idle);
        assert_eq!(s.generation(), 0);
        assert_eq!(s.query, "   \t");
    }

    #[test]
    fn clearing_cancels_pending_timer_and_loading() {
        let mut s = SearchState::new();
        input(&mut s, "dog");
        assert_eq!(input(&mut s, " ").as_slice(), [Effect::CancelTimer]);
        assert!(!s.loading);
        assert_eq!(s.phase, Phase::Idle);

        // The old timer firing late does nothing.
        assert!(s.apply(SearchEvent::TimerFired(1)).is_empty());
    }

    #[test]
    fn timer_executes_trimmed_query() {
        let mut s = SearchState::new();
        input(&mut s, "  hello ");
        let effects = s.apply(SearchEvent::TimerFired(1));
        assert_eq!(
            effects.as_slice(),
            [Effect::ExecuteQuery {
                generation: 1,
                query: "hello".to_string()
            }]
        );
        assert_eq!(s.phase, Phase::Fetching);
        assert!(s.loading);
        assert_eq!(s.query, "  hello ");
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut s = SearchState::new();
        input(&mut s, "a");
        input(&mut s, "ab");
        assert!(s.apply(SearchEvent::TimerFired(1)).is_empty());
        assert_eq!(s.phase, Phase::Scheduled);
    }

    #[test]
    fn success_replaces_results_wholesale() {
        let mut s = SearchState::new();
        input(&mut s, "cat");
        s.apply(SearchEvent::TimerFired(1));
        complete(&mut s, 1, Ok(hits(&["A", "B", "C"])));
        assert_eq!(s.results.len(), 3);

        input(&mut s, "cats");
        s.apply(SearchEvent::TimerFired(2));
        complete(&mut s, 2, Ok(hits(&["D"])));
        assert_eq!(s.results, vec![SearchDoc::titled("D")]);
        assert!(!s.loading);
        assert_eq!(s.phase, Phase::Settled);
    }

    #[test]
    fn failure_clears_loading_and_keeps_results() {
        let mut s = SearchState::new();
        input(&mut s, "cat");
        s.apply(SearchEvent::TimerFired(1));
        complete(&mut s, 1, Ok(hits(&["A"])));

        input(&mut s, "cow");
        s.apply(SearchEvent::TimerFired(2));
        complete(&mut s, 2, Err(AppError::status(500, "http://x/search.json?q=cow")));

        assert!(!s.loading);
        assert_eq!(s.phase, Phase::Settled);
        assert_eq!(s.results, vec![SearchDoc::titled("A")]);
        assert!(s.last_error.as_deref().unwrap().contains("500"));
    }

    #[test]
    fn superseded_response_is_discarded() {
        let mut s = SearchState::new();
        input(&mut s, "cat");
        s.apply(SearchEvent::TimerFired(1));
        input(&mut s, "dog");
        s.apply(SearchEvent::TimerFired(2));

        // "dog" answers first, then the slow "cat" response arrives.
        complete(&mut s, 2, Ok(hits(&["Dog Days"])));
        complete(&mut s, 1, Ok(hits(&["Cat's Cradle"])));

        assert_eq!(s.results, vec![SearchDoc::titled("Dog Days")]);
        assert!(!s.loading);
    }

    #[test]
    fn stale_response_does_not_clear_loading_of_newer_schedule() {
        let mut s = SearchState::new();
        input(&mut s, "cat");
        s.apply(SearchEvent::TimerFired(1));
        input(&mut s, "dog");

        complete(&mut s, 1, Ok(hits(&["Cat's Cradle"])));
        assert!(s.loading);
        assert_eq!(s.phase, Phase::Scheduled);
        assert!(s.results.is_empty());
    }

    #[test]
    fn clearing_while_fetching_keeps_loading_until_settled() {
        let mut s = SearchState::new();
        input(&mut s, "cat");
        s.apply(SearchEvent::TimerFired(1));
        assert!(input(&mut s, "").is_empty());
        assert!(s.loading);

        complete(&mut s, 1, Ok(hits(&["A"])));
        assert!(!s.loading);
        assert_eq!(s.phase, Phase::Settled);
    }

    #[test]
    fn teardown_cancels_and_freezes() {
        let mut s = SearchState::new();
        input(&mut s, "cat");
        assert_eq!(
            s.apply(SearchEvent::Teardown).as_slice(),
            [Effect::CancelTimer]
        );
        assert!(s.is_torn_down());
        assert!(!s.loading);

        assert!(s.apply(SearchEvent::TimerFired(1)).is_empty());
        assert!(input(&mut s, "dog").is_empty());
        complete(&mut s, 1, Ok(hits(&["late"])));
        assert!(s.results.is_empty());
        assert_eq!(s.query, "cat");
    }
}
