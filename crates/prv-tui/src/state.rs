//! Application state composition.
//!
//! `AppState` is the single source of truth the reducer mutates and the
//! render functions project. It owns the core [`Session`] (history +
//! transcript) plus view-only state: input buffer, scroll position, and the
//! table of in-flight streams.

use std::collections::HashMap;
use std::sync::Arc;

use prv_core::config::Config;
use prv_core::session::Session;
use prv_core::transcript::EntryId;
use prv_core::typeset::{Delimiter, Typesetter, UnicodeTex};
use tokio_util::sync::CancellationToken;

use crate::input::InputState;
use crate::scroll::ScrollState;

/// Combined TUI state.
pub struct AppState {
    pub config: Config,
    /// Effective delimiter set; empty when typesetting is disabled, which
    /// makes the adapter a pure pass-through.
    pub delimiters: Vec<Delimiter>,
    /// The pluggable typesetting engine.
    pub engine: Arc<dyn Typesetter>,
    pub session: Session,
    pub input: InputState,
    pub scroll: ScrollState,
    pub streams: Streams,
    /// Advances every tick; drives the status-line spinner.
    pub spinner_frame: usize,
    pub should_quit: bool,
    /// Terminal size from the most recent frame.
    pub viewport: (u16, u16),
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let delimiters = if config.typeset.enabled {
            config.typeset.delimiters()
        } else {
            Vec::new()
        };
        Self {
            config,
            delimiters,
            engine: Arc::new(UnicodeTex),
            session: Session::new(),
            input: InputState::new(),
            scroll: ScrollState::default(),
            streams: Streams::default(),
            spinner_frame: 0,
            should_quit: false,
            viewport: (80, 24),
        }
    }
}

/// In-flight streams keyed by their transcript entry.
///
/// Each stream task owns disjoint state (its entry); this table only holds
/// the cancellation handles so the reducer can abort them through effects.
#[derive(Debug, Default)]
pub struct Streams {
    tokens: HashMap<EntryId, CancellationToken>,
}

impl Streams {
    pub fn insert(&mut self, entry: EntryId, token: CancellationToken) {
        self.tokens.insert(entry, token);
    }

    pub fn remove(&mut self, entry: EntryId) {
        self.tokens.remove(&entry);
    }

    /// Cancels every outstanding stream. The tasks still report `Aborted`
    /// through the inbox so their entries get finalized.
    pub fn cancel_all(&self) {
        for token in self.tokens.values() {
            token.cancel();
        }
    }

    pub fn active(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_running(&self) -> bool {
        !self.tokens.is_empty()
    }
}
