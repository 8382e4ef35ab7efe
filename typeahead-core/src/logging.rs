//! src/logging.rs
//! ============================================================================
//! File-only tracing setup. The terminal belongs to the widget while it runs,
//! so events go to a daily rolling file through a non-blocking writer.

use std::{
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::{Context, Result};
use tracing::Metadata;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`; keep the guard alive until exit.
    pub fn init_tracing(config: &LoggingConfig) -> Result<WorkerGuard> {
        let log_dir: &Path = &config.log_dir;
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        // daily rolling file appender → logs/<prefix>.YYYY-MM-DD
        let file = rolling::daily(log_dir, &config.file_prefix);
        let (writer, guard) = tracing_appender::non_blocking(file);

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .context("Invalid log level in config")?;

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        Ok(guard)
    }
}

static SEQ: AtomicUsize = AtomicUsize::new(1);

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically‑increasing sequence number
        let seq: usize = SEQ.fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
