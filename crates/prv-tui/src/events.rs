//! UI event types.
//!
//! Everything the reducer reacts to: terminal input, frame ticks, and
//! per-stream events forwarded from the dispatch tasks through the inbox.

use prv_core::client::ClientError;
use prv_core::transcript::EntryId;

/// Events processed by the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick; drives the spinner and caps the render rate.
    Tick,
    /// Start-of-loop event carrying the current terminal size.
    Frame { width: u16, height: u16 },
    /// Raw terminal input (keys, mouse, paste).
    Terminal(crossterm::event::Event),
    /// Progress on one in-flight response stream.
    Stream(StreamUiEvent),
}

/// Lifecycle of one dispatched command's response stream.
///
/// Each event names its transcript entry; streams share no other state, so
/// interleaving between concurrent streams is harmless.
#[derive(Debug)]
pub enum StreamUiEvent {
    /// A decoded chunk arrived.
    Chunk { entry: EntryId, text: String },
    /// The stream ended normally.
    Completed { entry: EntryId },
    /// Transport failed, before or during the body.
    Failed { entry: EntryId, error: ClientError },
    /// The user cancelled the stream.
    Aborted { entry: EntryId },
}
