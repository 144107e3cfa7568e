//! Ctrl+C handling shared between the TUI and one-shot modes.
//!
//! The signal handler only sets a flag; whoever owns the screen decides what
//! an interrupt means (cancel in-flight streams vs. quit). A second Ctrl+C
//! force-exits after running the registered terminal-restore hook.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static RESTORE_HOOK: OnceLock<Box<dyn Fn() + Send + Sync>> = OnceLock::new();

#[derive(Debug)]
pub struct InterruptedError;

impl std::fmt::Display for InterruptedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interrupted")
    }
}

impl std::error::Error for InterruptedError {}

/// Initializes the Ctrl+C handler.
///
/// # Panics
/// Panics if a signal handler is already installed.
pub fn init() {
    ctrlc::set_handler(trigger_ctrl_c).expect("Error setting Ctrl+C handler");
}

/// Registers a hook run before a forced exit (terminal restore).
///
/// Only the first registration takes effect.
pub fn set_restore_hook(hook: impl Fn() + Send + Sync + 'static) {
    let _ = RESTORE_HOOK.set(Box::new(hook));
}

/// Triggers an interrupt, force-exiting on a second Ctrl+C.
pub fn trigger_ctrl_c() {
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        // Second interrupt - force exit. Restore the terminal first since
        // process::exit() bypasses Drop handlers.
        if let Some(hook) = RESTORE_HOOK.get() {
            hook();
        }
        std::process::exit(130);
    }
}

/// Checks if an interrupt has been requested.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Resets the interrupt flag.
pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}
