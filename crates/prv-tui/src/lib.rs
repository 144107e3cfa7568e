//! Interactive terminal session for the Proover evaluator.
//!
//! Elm-shaped: events flow into a pure reducer ([`update::update`]) that
//! mutates [`state::AppState`] and returns effects; the [`runtime`] executes
//! the effects and owns the per-command stream tasks.

pub mod effects;
pub mod events;
pub mod input;
pub mod render;
pub mod runtime;
pub mod scroll;
pub mod state;
pub mod terminal;
pub mod update;
pub mod wrap;

use std::io::IsTerminal;

use anyhow::{Result, bail};
use prv_core::client::{ProoverClient, resolve_backend_url};
use prv_core::config::Config;

use crate::runtime::TuiRuntime;
use crate::state::AppState;

/// Runs the interactive session until the user quits.
///
/// # Errors
/// Returns an error if stdout is not a terminal, the backend URL is
/// invalid, or the terminal cannot be configured.
pub async fn run_session(config: Config, backend_override: Option<&str>) -> Result<()> {
    if !std::io::stdout().is_terminal() {
        bail!("Interactive mode requires a terminal (use `prv eval` for scripts)");
    }

    let base_url = resolve_backend_url(&config, backend_override)?;
    let client = ProoverClient::new(base_url.clone(), config.request_timeout())?;
    tracing::info!(backend = %base_url, "starting interactive session");

    // A double Ctrl+C force-exits from the signal handler; make sure the
    // terminal comes back first.
    prv_core::interrupt::set_restore_hook(|| {
        let _ = terminal::restore_terminal();
    });

    let mut app = AppState::new(config);
    TuiRuntime::new(client).run(&mut app).await?;

    println!("Goodbye!");
    Ok(())
}
