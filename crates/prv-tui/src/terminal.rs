//! Terminal lifecycle management.
//!
//! Raw mode + alternate screen, with restore guaranteed on normal exit,
//! panic, and Ctrl+C. Mouse capture and bracketed paste are enabled only
//! while the event loop runs.

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Enters raw mode and the alternate screen.
///
/// Call `install_panic_hook()` first so a panic mid-setup still restores.
///
/// # Errors
/// Returns an error if the terminal cannot be configured.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

/// Enables mouse capture (transcript scrolling) and bracketed paste.
///
/// # Errors
/// Returns an error if the terminal rejects the escape sequences.
pub fn enable_input_features() -> Result<()> {
    execute!(io::stdout(), EnableBracketedPaste, EnableMouseCapture)
        .context("Failed to enable input features")?;
    Ok(())
}

/// Disables the features enabled by `enable_input_features()`.
///
/// # Errors
/// Returns an error if the terminal rejects the escape sequences.
pub fn disable_input_features() -> Result<()> {
    execute!(io::stdout(), DisableMouseCapture, DisableBracketedPaste)
        .context("Failed to disable input features")?;
    Ok(())
}

/// Restores the terminal. Idempotent; safe on every exit path.
///
/// # Errors
/// Returns an error if raw mode or the alternate screen cannot be left.
pub fn restore_terminal() -> Result<()> {
    // Mouse/paste must be disabled before leaving raw mode; ignore failures
    // since they may never have been enabled.
    let _ = execute!(io::stdout(), DisableMouseCapture, DisableBracketedPaste);
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the
/// panic. Call BEFORE `setup_terminal()`.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
