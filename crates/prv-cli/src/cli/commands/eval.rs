//! One-shot evaluation for scripts and pipes.
//!
//! `--raw` streams chunks to stdout as they arrive; the default buffers the
//! whole response and prints it typeset, since math spans can straddle
//! chunk boundaries.

use std::io::Write;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use prv_core::client::{ProoverClient, resolve_backend_url};
use prv_core::config::Config;
use prv_core::interrupt::{self, InterruptedError};
use prv_core::typeset::{UnicodeTex, typeset};

pub struct EvalOptions<'a> {
    pub command: &'a str,
    pub raw: bool,
    pub config: &'a Config,
    pub backend_override: Option<&'a str>,
}

pub async fn run(opts: EvalOptions<'_>) -> Result<()> {
    let base_url = resolve_backend_url(opts.config, opts.backend_override)?;
    let client = ProoverClient::new(base_url, opts.config.request_timeout())?;

    let mut stream = client
        .send(opts.command)
        .await
        .context("dispatch command")?;

    let mut stdout = std::io::stdout();
    let mut buffer = String::new();

    while let Some(item) = stream.next().await {
        if interrupt::is_interrupted() {
            return Err(InterruptedError.into());
        }
        match item {
            Ok(text) => {
                if opts.raw {
                    stdout.write_all(text.as_bytes())?;
                    stdout.flush()?;
                } else {
                    buffer.push_str(&text);
                }
            }
            Err(error) => {
                // Keep the partial text visible, then fail.
                flush_output(&mut stdout, &opts, &buffer)?;
                return Err(error).context("response stream failed");
            }
        }
    }

    flush_output(&mut stdout, &opts, &buffer)?;
    Ok(())
}

fn flush_output(stdout: &mut std::io::Stdout, opts: &EvalOptions<'_>, buffer: &str) -> Result<()> {
    if opts.raw {
        // Already streamed; just make sure the line is terminated.
        writeln!(stdout)?;
        return Ok(());
    }
    if buffer.is_empty() {
        return Ok(());
    }
    let text = if opts.config.typeset.enabled {
        typeset(buffer, &opts.config.typeset.delimiters(), &UnicodeTex).to_text()
    } else {
        buffer.to_string()
    };
    writeln!(stdout, "{}", text.trim_end_matches('\n'))?;
    Ok(())
}
