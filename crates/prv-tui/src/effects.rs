//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer itself never
//! performs I/O or spawns tasks, which keeps it a pure state transition.

use std::sync::Arc;

use prv_core::transcript::EntryId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application (cancels all outstanding streams).
    Quit,

    /// Dispatch a command to the evaluator, feeding the given entry.
    Dispatch { entry: EntryId, command: Arc<str> },

    /// Cancel every in-flight stream.
    CancelAll,
}
