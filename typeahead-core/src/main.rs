//! src/main.rs
//! Terminal front-end for the debounced search widget

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    sync::Arc,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event as TerminalEvent, EventStream,
        KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::{signal, sync::Notify};
use tracing::{debug, error, info, warn};

use typeahead_core::{
    Logger,
    config::Config,
    controller::SearchController,
    model::TextInput,
    search::{HttpSearchClient, SearchBackend},
    util::debounce::DebounceConfig,
    view::ui::UIRenderer,
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let loaded = Config::load().await;
    let config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => Config::default(),
    };

    let _log_guard = Logger::init_tracing(&config.logging).context("Failed to initialize logging")?;
    if let Err(e) = loaded {
        warn!("Failed to load config, using defaults: {:#}", e);
    }

    setup_panic_handler();

    let app = App::new(config).context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    controller: SearchController,
    input: TextInput,
    renderer: UIRenderer,
    shutdown: Arc<Notify>,
    dirty: bool,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        info!("Starting typeahead against {}", config.search.endpoint);

        let backend: Arc<dyn SearchBackend> = Arc::new(
            HttpSearchClient::new(&config.search).context("Failed to build search client")?,
        );
        let controller =
            SearchController::new(backend, DebounceConfig::with_delay(config.search.debounce));

        let terminal = setup_terminal().context("Failed to initialize terminal")?;

        Ok(Self {
            terminal,
            controller,
            input: TextInput::new(),
            renderer: UIRenderer::new(config.ui),
            shutdown: Arc::new(Notify::new()),
            dirty: true,
        })
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        info!("Starting event loop");

        let mut event_stream: EventStream = EventStream::new();

        loop {
            self.render()?;

            tokio::select! {
                () = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }

                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(terminal_event)) => {
                        if !self.process_terminal_event(terminal_event) {
                            info!("Quit requested");
                            break;
                        }
                    }
                    Some(Err(e)) => return Err(e).context("Terminal event stream failed"),
                    None => break,
                },

                Some(event) = self.controller.next_event() => {
                    self.controller.dispatch(event);
                    self.dirty = true;
                }
            }
        }

        self.controller.teardown();
        let stats = self.renderer.stats();
        info!(
            "Final metrics: queries issued: {}, frames: {}, avg render: {:?}, slow frames: {}",
            self.controller.queries_issued(),
            stats.frames,
            stats.avg(),
            stats.slow
        );
        Ok(())
    }

    /// Returns `false` when the user asked to quit.
    fn process_terminal_event(&mut self, event: TerminalEvent) -> bool {
        match event {
            TerminalEvent::Key(key) if key.kind != KeyEventKind::Release => self.process_key(key),
            TerminalEvent::Paste(text) => {
                let changed = self.input.insert_str(&text);
                self.apply_edit(changed);
                true
            }
            TerminalEvent::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
                self.dirty = true;
                true
            }
            _ => true,
        }
    }

    fn process_key(&mut self, key: KeyEvent) -> bool {
        let changed = match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => return false,

            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.input.clear(),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.input.insert_char(c)
            }
            (KeyCode::Backspace, _) => self.input.backspace(),
            (KeyCode::Delete, _) => self.input.delete(),

            (KeyCode::Left, _) => {
                self.input.move_left();
                None
            }
            (KeyCode::Right, _) => {
                self.input.move_right();
                None
            }
            (KeyCode::Home, _) => {
                self.input.move_home();
                None
            }
            (KeyCode::End, _) => {
                self.input.move_end();
                None
            }

            _ => return true,
        };

        self.apply_edit(changed);
        true
    }

    fn apply_edit(&mut self, changed: Option<String>) {
        if let Some(value) = changed {
            self.controller.input(value);
        }
        // Cursor moves need a redraw too.
        self.dirty = true;
    }

    fn render(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let Self {
            terminal,
            renderer,
            input,
            controller,
            ..
        } = self;

        terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, input, controller.state()))
            .context("Failed to draw terminal")?;

        self.dirty = false;
        Ok(())
    }

    fn setup_shutdown_handler(&self) {
        let shutdown: Arc<Notify> = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
                    warn!("Failed to create SIGTERM handler");
                    return;
                };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.notify_one();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
