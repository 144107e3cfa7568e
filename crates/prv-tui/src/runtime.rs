//! The event loop and effect executor.
//!
//! The runtime owns the inbox (the channel stream tasks report through),
//! drives the reducer, and executes the effects it returns. Stream tasks
//! run on the tokio runtime, one per dispatched command, each holding a
//! cancellation token registered in `AppState::streams`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event;
use futures_util::StreamExt;
use prv_core::client::ProoverClient;
use prv_core::interrupt;
use prv_core::transcript::EntryId;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::effects::UiEffect;
use crate::events::{StreamUiEvent, UiEvent};
use crate::render::render;
use crate::state::AppState;
use crate::terminal;
use crate::update::update;

/// Render/tick cadence while streams are active.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Input poll timeout when nothing is streaming.
const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

pub struct TuiRuntime {
    client: Arc<ProoverClient>,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
}

impl TuiRuntime {
    pub fn new(client: ProoverClient) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            client: Arc::new(client),
            inbox_tx,
            inbox_rx,
        }
    }

    /// Runs the session until the user quits. Restores the terminal on the
    /// way out, including on error.
    pub async fn run(mut self, app: &mut AppState) -> Result<()> {
        terminal::install_panic_hook();
        let mut term = terminal::setup_terminal()?;
        terminal::enable_input_features()?;

        let result = self.event_loop(&mut term, app).await;

        let _ = terminal::disable_input_features();
        terminal::restore_terminal()?;
        result
    }

    async fn event_loop(
        &mut self,
        term: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
        app: &mut AppState,
    ) -> Result<()> {
        let mut last_tick = Instant::now();

        while !app.should_quit {
            let size = term.size()?;
            let mut effects = update(
                app,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            // Drain everything the stream tasks reported since last frame.
            while let Ok(event) = self.inbox_rx.try_recv() {
                effects.extend(update(app, event));
            }

            if interrupt::is_interrupted() {
                interrupt::reset();
                if app.streams.is_running() {
                    effects.push(UiEffect::CancelAll);
                } else {
                    app.should_quit = true;
                    effects.push(UiEffect::Quit);
                }
            }

            for effect in effects {
                self.execute_effect(app, effect);
            }

            term.draw(|frame| render(frame, app))?;

            if last_tick.elapsed() >= FRAME_DURATION {
                last_tick = Instant::now();
                for effect in update(app, UiEvent::Tick) {
                    self.execute_effect(app, effect);
                }
            }

            let timeout = if app.streams.is_running() {
                FRAME_DURATION
            } else {
                IDLE_POLL_DURATION
            };
            if event::poll(timeout)? {
                let terminal_event = event::read()?;
                for effect in update(app, UiEvent::Terminal(terminal_event)) {
                    self.execute_effect(app, effect);
                }
            }
        }

        // Stragglers get cancelled; their entries were finalized by the
        // reducer if their abort events already landed, and the process is
        // exiting either way.
        app.streams.cancel_all();
        Ok(())
    }

    fn execute_effect(&self, app: &mut AppState, effect: UiEffect) {
        match effect {
            UiEffect::Quit | UiEffect::CancelAll => app.streams.cancel_all(),
            UiEffect::Dispatch { entry, command } => {
                let token = CancellationToken::new();
                app.streams.insert(entry, token.clone());
                spawn_stream_task(
                    Arc::clone(&self.client),
                    self.inbox_tx.clone(),
                    entry,
                    command,
                    token,
                );
            }
        }
    }
}

/// Spawns the task that owns one response stream.
///
/// The task reports every outcome through the inbox: chunks in arrival
/// order, then exactly one of `Completed`, `Failed`, or `Aborted`.
fn spawn_stream_task(
    client: Arc<ProoverClient>,
    tx: mpsc::UnboundedSender<UiEvent>,
    entry: EntryId,
    command: Arc<str>,
    token: CancellationToken,
) {
    tokio::spawn(async move {
        tracing::debug!(entry = ?entry, command = %command, "dispatching");

        let send = client.send(&command);
        let mut stream = tokio::select! {
            () = token.cancelled() => {
                let _ = tx.send(UiEvent::Stream(StreamUiEvent::Aborted { entry }));
                return;
            }
            result = send => match result {
                Ok(stream) => stream,
                Err(error) => {
                    let _ = tx.send(UiEvent::Stream(StreamUiEvent::Failed { entry, error }));
                    return;
                }
            },
        };

        loop {
            tokio::select! {
                () = token.cancelled() => {
                    let _ = tx.send(UiEvent::Stream(StreamUiEvent::Aborted { entry }));
                    return;
                }
                next = stream.next() => match next {
                    Some(Ok(text)) => {
                        let _ = tx.send(UiEvent::Stream(StreamUiEvent::Chunk { entry, text }));
                    }
                    Some(Err(error)) => {
                        let _ = tx.send(UiEvent::Stream(StreamUiEvent::Failed { entry, error }));
                        return;
                    }
                    None => {
                        let _ = tx.send(UiEvent::Stream(StreamUiEvent::Completed { entry }));
                        return;
                    }
                },
            }
        }
    });
}
