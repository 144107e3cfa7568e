//! The transcript: the durable in-memory record of the session.
//!
//! Entries are appended at submit time and never removed or reordered, so
//! the transcript stays in submission order no matter how the individual
//! response streams interleave. Response text grows monotonically until the
//! entry is finalized, at which point the typesetting adapter runs exactly
//! once and the text becomes immutable.

use std::sync::Arc;

use crate::typeset::{Delimiter, Document, Typesetter, typeset};

/// Identifier of one transcript entry.
///
/// Stream tasks and UI events refer to entries by id so each in-flight
/// stream owns disjoint state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

/// One (command, response) pair.
#[derive(Debug)]
pub struct TranscriptEntry {
    id: EntryId,
    command: Arc<str>,
    response: String,
    finalized: bool,
    rendered: Option<Document>,
}

impl TranscriptEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Accumulated response text (partial while the stream is draining).
    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Typeset document, present once the entry has been finalized.
    pub fn rendered(&self) -> Option<&Document> {
        self.rendered.as_ref()
    }
}

/// Append-only sequence of transcript entries.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new entry with an empty response and returns its id.
    ///
    /// Called synchronously at submit time so the command shows up before
    /// any response data arrives.
    pub fn append(&mut self, command: Arc<str>) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(TranscriptEntry {
            id,
            command,
            response: String::new(),
            finalized: false,
            rendered: None,
        });
        id
    }

    /// Appends decoded text to an entry, in arrival order.
    ///
    /// Ignored for finalized entries: final text is immutable.
    pub fn push_chunk(&mut self, id: EntryId, text: &str) {
        if let Some(entry) = self.get_mut(id)
            && !entry.finalized
        {
            entry.response.push_str(text);
        }
    }

    /// Marks an entry's text final and runs the typesetting adapter on it.
    ///
    /// Idempotent: re-finalizing an already-finalized entry is a no-op, so
    /// the adapter runs exactly once per entry.
    pub fn finalize(&mut self, id: EntryId, delimiters: &[Delimiter], engine: &dyn Typesetter) {
        let Some(entry) = self.get_mut(id) else {
            return;
        };
        if entry.finalized {
            return;
        }
        entry.finalized = true;
        entry.rendered = Some(typeset(&entry.response, delimiters, engine));
    }

    pub fn get(&self, id: EntryId) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: EntryId) -> Option<&mut TranscriptEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
