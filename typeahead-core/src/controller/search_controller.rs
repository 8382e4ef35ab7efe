//! ``src/controller/search_controller.rs``
//! ============================================================================
//! # Search Controller: owns the widget state and carries out its effects
//!
//! The controller is the only owner of `SearchState`. The debounce sleeper
//! and the request tasks never touch it; they send `SearchEvent`s back over
//! one unbounded channel, and whoever drives the controller feeds those
//! events into `dispatch` from a single task.

use std::sync::Arc;
use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{Instant as TokioInstant, sleep_until},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::{
    model::search_state::{Effect, Generation, Phase, SearchEvent, SearchState},
    search::client::SearchBackend,
    util::debounce::{DebounceConfig, Debouncer},
};

pub struct SearchController {
    state: SearchState,
    debouncer: Debouncer<SearchEvent>,
    backend: Arc<dyn SearchBackend>,
    tx: mpsc::UnboundedSender<SearchEvent>,
    rx: mpsc::UnboundedReceiver<SearchEvent>,
    torn_down: CancellationToken,
    queries_issued: u64,
}

impl SearchController {
    /// Must be created inside a Tokio runtime.
    pub fn new(backend: Arc<dyn SearchBackend>, debounce: DebounceConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        info!("Search controller ready, debounce {:?}", debounce.delay);

        Self {
            state: SearchState::new(),
            debouncer: Debouncer::new(debounce, tx.clone()),
            backend,
            tx,
            rx,
            torn_down: CancellationToken::new(),
            queries_issued: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SearchState {
        &self.state
    }

    /// Number of requests handed to the backend so far.
    #[must_use]
    pub const fn queries_issued(&self) -> u64 {
        self.queries_issued
    }

    #[must_use]
    pub fn timer_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// The input's text changed.
    pub fn input(&mut self, value: impl Into<String>) {
        self.dispatch(SearchEvent::Input(value.into()));
    }

    /// Run one event through the reducer and perform what it asks for.
    pub fn dispatch(&mut self, event: SearchEvent) {
        let effects = self.state.apply(event);
        for effect in effects {
            self.perform(effect);
        }
    }

    /// Next timer firing or request completion.
    pub async fn next_event(&mut self) -> Option<SearchEvent> {
        self.rx.recv().await
    }

    /// Wait for and dispatch one background event.
    pub async fn step(&mut self) {
        if let Some(event) = self.next_event().await {
            self.dispatch(event);
        }
    }

    /// Dispatch background events until nothing is scheduled or in flight.
    pub async fn run_until_settled(&mut self) {
        while matches!(self.state.phase, Phase::Scheduled | Phase::Fetching)
            && !self.state.is_torn_down()
        {
            self.step().await;
        }
    }

    /// Dispatch background events as they arrive for `duration`.
    pub async fn pump_for(&mut self, duration: Duration) {
        let deadline = TokioInstant::now() + duration;
        loop {
            tokio::select! {
                () = sleep_until(deadline) => break,
                event = self.rx.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
            }
        }
    }

    /// Cancel the pending timer and ignore everything that happens afterwards.
    pub fn teardown(&mut self) {
        if self.state.is_torn_down() {
            return;
        }
        debug!("Tearing down search widget");
        self.dispatch(SearchEvent::Teardown);
        self.torn_down.cancel();
    }

    fn perform(&mut self, effect: Effect) {
        trace!("Performing {:?}", effect);
        match effect {
            Effect::CancelTimer => {
                self.debouncer.cancel();
            }
            Effect::ScheduleTimer(generation) => {
                self.debouncer.submit(SearchEvent::TimerFired(generation));
            }
            Effect::ExecuteQuery { generation, query } => self.execute(generation, query),
        }
    }

    fn execute(&mut self, generation: Generation, query: String) {
        self.queries_issued += 1;
        info!(generation, query = %query, "Executing search query");

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let torn_down = self.torn_down.clone();

        // Requests are never aborted; a late answer is dropped here or by
        // the reducer's generation check.
        tokio::spawn(async move {
            let outcome = backend.search(&query).await;
            if torn_down.is_cancelled() {
                debug!(generation, "Widget gone, dropping response");
                return;
            }
            let _ = tx.send(SearchEvent::Completed {
                generation,
                query,
                outcome,
            });
        });
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.teardown();
    }
}
