//! The explicit session object.
//!
//! Owns the history store and transcript; the UI layer holds a `Session`
//! and routes every submit, chunk, completion, and failure through it. All
//! failures end up visible in the transcript, never only in the logs.

use std::sync::Arc;

use crate::client::ClientError;
use crate::history::HistoryStore;
use crate::transcript::{EntryId, Transcript};
use crate::typeset::{Delimiter, Typesetter};

/// History + transcript for one interactive session.
#[derive(Default)]
pub struct Session {
    pub history: HistoryStore,
    pub transcript: Transcript,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits a command: records it in history and opens a transcript
    /// entry for its response.
    ///
    /// Returns `None` for empty or whitespace-only input, which is ignored
    /// entirely (nothing dispatched, nothing recorded).
    pub fn submit(&mut self, text: &str) -> Option<(EntryId, Arc<str>)> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let command: Arc<str> = Arc::from(trimmed);
        self.history.append(&command);
        let id = self.transcript.append(Arc::clone(&command));
        Some((id, command))
    }

    /// Applies one decoded chunk to an entry's response text.
    pub fn apply_chunk(&mut self, id: EntryId, text: &str) {
        self.transcript.push_chunk(id, text);
    }

    /// Completes a stream normally and typesets the final text.
    pub fn complete(&mut self, id: EntryId, delimiters: &[Delimiter], engine: &dyn Typesetter) {
        self.transcript.finalize(id, delimiters, engine);
    }

    /// Records a stream failure and finalizes the entry.
    ///
    /// Before any data arrived the entry gets an inert placeholder; after
    /// partial data the accumulated text is kept and a marker is appended.
    pub fn fail(
        &mut self,
        id: EntryId,
        error: &ClientError,
        delimiters: &[Delimiter],
        engine: &dyn Typesetter,
    ) {
        let marker = match self.transcript.get(id).map(|e| e.response().is_empty()) {
            Some(true) => format!("[transport failed: {error}]"),
            Some(false) => format!("\n[stream interrupted: {error}]"),
            None => return,
        };
        tracing::warn!(entry = ?id, %error, "stream failed");
        self.transcript.push_chunk(id, &marker);
        self.transcript.finalize(id, delimiters, engine);
    }

    /// Records a user-initiated abort and finalizes the entry, so a
    /// cancelled stream never leaves its entry hanging unrendered.
    pub fn abort(&mut self, id: EntryId, delimiters: &[Delimiter], engine: &dyn Typesetter) {
        if self
            .transcript
            .get(id)
            .is_some_and(|e| !e.is_finalized())
        {
            let marker = if self.transcript.get(id).is_some_and(|e| e.response().is_empty()) {
                "[aborted]".to_string()
            } else {
                "\n[aborted]".to_string()
            };
            self.transcript.push_chunk(id, &marker);
            self.transcript.finalize(id, delimiters, engine);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, ClientErrorKind};
    use crate::typeset::{UnicodeTex, default_delimiters};

    fn delims() -> Vec<Delimiter> {
        default_delimiters()
    }

    #[test]
    fn submit_records_history_and_opens_entry() {
        let mut session = Session::new();
        let (id, command) = session.submit("  refl x  ").unwrap();

        assert_eq!(&*command, "refl x");
        assert_eq!(session.history.len(), 1);
        let entry = session.transcript.get(id).unwrap();
        assert_eq!(entry.command(), "refl x");
        assert_eq!(entry.response(), "");
        assert!(!entry.is_finalized());
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut session = Session::new();
        assert!(session.submit("   ").is_none());
        assert!(session.transcript.is_empty());
        assert!(session.history.is_empty());
    }

    #[test]
    fn transcript_order_survives_out_of_order_completion() {
        let mut session = Session::new();
        let (x, _) = session.submit("x").unwrap();
        let (y, _) = session.submit("y").unwrap();

        session.apply_chunk(y, "y done");
        session.complete(y, &delims(), &UnicodeTex);
        session.apply_chunk(x, "x done");
        session.complete(x, &delims(), &UnicodeTex);

        let commands: Vec<&str> = session
            .transcript
            .entries()
            .iter()
            .map(|e| e.command())
            .collect();
        assert_eq!(commands, ["x", "y"]);
    }

    #[test]
    fn transport_failure_sets_placeholder() {
        let mut session = Session::new();
        let (id, _) = session.submit("q").unwrap();

        let error = ClientError::new(ClientErrorKind::Connect, "connection refused");
        session.fail(id, &error, &delims(), &UnicodeTex);

        let entry = session.transcript.get(id).unwrap();
        assert!(entry.is_finalized());
        assert_eq!(entry.response(), "[transport failed: connection refused]");
    }

    #[test]
    fn mid_stream_failure_keeps_partial_text() {
        let mut session = Session::new();
        let (id, _) = session.submit("q").unwrap();

        session.apply_chunk(id, "partial");
        let error = ClientError::new(ClientErrorKind::Stream, "reset by peer");
        session.fail(id, &error, &delims(), &UnicodeTex);

        let entry = session.transcript.get(id).unwrap();
        assert_eq!(
            entry.response(),
            "partial\n[stream interrupted: reset by peer]"
        );
        assert!(entry.is_finalized());
    }

    #[test]
    fn abort_finalizes_entry() {
        let mut session = Session::new();
        let (id, _) = session.submit("q").unwrap();
        session.apply_chunk(id, "some");

        session.abort(id, &delims(), &UnicodeTex);
        let entry = session.transcript.get(id).unwrap();
        assert!(entry.is_finalized());
        assert_eq!(entry.response(), "some\n[aborted]");

        // Idempotent with respect to an already-finalized entry.
        session.abort(id, &delims(), &UnicodeTex);
        assert_eq!(session.transcript.get(id).unwrap().response(), "some\n[aborted]");
    }
}
