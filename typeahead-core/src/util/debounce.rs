//!  src/util/debounce.rs
//!  ===================================================================
//!  Single-slot trailing-edge debouncer.
//!
//!  • At most one sleeper task is alive; every `submit` aborts the
//!    previous one before spawning the next.
//!  • Uses `tokio::time::sleep_until` inside a spawned task, so an
//!    aborted sleeper is simply dropped and never delivers its event.
//!  • Fired events are delivered over an unbounded mpsc channel; the
//!    owner decides what "firing" means.

use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant as TokioInstant, sleep_until},
};
use tracing::{debug, trace};

use crate::config::DEFAULT_DEBOUNCE;

/* ======================== DebounceConfig ============================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub delay: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::search_input()
    }
}

impl DebounceConfig {
    /// Quick config for search input debouncing
    #[must_use]
    pub const fn search_input() -> Self {
        Self {
            delay: DEFAULT_DEBOUNCE,
        }
    }

    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

/* ============================ Debouncer ============================ */

/// Holds the one pending sleeper and the channel it reports into.
pub struct Debouncer<T> {
    cfg: DebounceConfig,
    sleeper: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer that reports fired events into an existing channel.
    #[must_use]
    pub fn new(cfg: DebounceConfig, tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            cfg,
            sleeper: None,
            tx,
        }
    }

    /// Create a new debouncer and its Rx endpoint
    #[must_use]
    pub fn with_channel(cfg: DebounceConfig) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(cfg, tx), rx)
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.cfg.delay
    }

    /// Replace any pending event with `ev`, firing after a full quiet period.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&mut self, ev: T) {
        self.cancel();

        let deadline = TokioInstant::now() + self.cfg.delay;
        let tx = self.tx.clone();

        trace!("Debouncer armed for {:?}", self.cfg.delay);
        self.sleeper = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            debug!("Debounce window elapsed, firing");
            let _ = tx.send(ev);
        }));
    }

    /// Drop the pending event, if any. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.sleeper.take() {
            Some(handle) => {
                let was_waiting = !handle.is_finished();
                handle.abort();
                if was_waiting {
                    trace!("Debouncer cancelled pending event");
                }
                was_waiting
            }
            None => false,
        }
    }

    /// Whether a sleeper is armed and has not fired yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.sleeper
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiet_period() {
        let (mut deb, mut rx) = Debouncer::with_channel(DebounceConfig::search_input());
        deb.submit("cat");
        assert!(deb.is_pending());

        assert!(timeout(ms(499), rx.recv()).await.is_err());
        assert_eq!(rx.recv().await, Some("cat"));
        assert!(timeout(ms(2_000), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_only_delivers_last_event() {
        let (mut deb, mut rx) = Debouncer::with_channel(DebounceConfig::search_input());
        for word in ["h", "he", "hel", "hell", "hello"] {
            deb.submit(word);
            sleep(ms(50)).await;
        }

        assert_eq!(rx.recv().await, Some("hello"));
        assert!(timeout(ms(2_000), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn resubmit_restarts_the_full_delay() {
        let (mut deb, mut rx) = Debouncer::with_channel(DebounceConfig::with_delay(ms(100)));
        deb.submit(1);
        sleep(ms(90)).await;
        deb.submit(2);

        let start = TokioInstant::now();
        assert_eq!(rx.recv().await, Some(2));
        assert!(start.elapsed() >= ms(100));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_event() {
        let (mut deb, mut rx) = Debouncer::with_channel(DebounceConfig::search_input());
        deb.submit(7);
        assert!(deb.cancel());
        assert!(!deb.is_pending());
        assert!(!deb.cancel());

        assert!(timeout(ms(2_000), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_sleeper() {
        let (mut deb, mut rx) = Debouncer::with_channel(DebounceConfig::search_input());
        deb.submit(7);
        drop(deb);

        assert_eq!(timeout(ms(2_000), rx.recv()).await, Ok(None));
    }
}
