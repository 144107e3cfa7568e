//! HTTP client for the Proover evaluator.
//!
//! One `POST {base}/eval` per submitted command, body = the literal command
//! text. The response body is an unframed stream of UTF-8 bytes; the
//! [`TextChunks`] adapter decodes it incrementally, carrying partial
//! multi-byte sequences across chunk boundaries so arrival order is
//! preserved without corruption.

use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use serde_json::Value;

use crate::config::Config;

/// Standard User-Agent header for prv requests.
pub const USER_AGENT: &str = concat!("prv/", env!("CARGO_PKG_VERSION"));

/// Default evaluator endpoint for local development.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Categories of client errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// The request could not be sent at all (DNS, refused, TLS).
    Connect,
    /// Non-2xx HTTP status.
    HttpStatus,
    /// The connection dropped while the body was streaming.
    Stream,
    /// Request timeout expired.
    Timeout,
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErrorKind::Connect => write!(f, "connect"),
            ClientErrorKind::HttpStatus => write!(f, "http_status"),
            ClientErrorKind::Stream => write!(f, "stream"),
            ClientErrorKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Structured error from the evaluator transport.
#[derive(Debug, Clone)]
pub struct ClientError {
    /// Error category.
    pub kind: ClientErrorKind,
    /// One-line summary suitable for display in the transcript.
    pub message: String,
    /// Optional additional details (e.g. raw error body).
    pub details: Option<String>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error, extracting a cleaner message from a
    /// JSON error body when the backend provides one.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = format!("HTTP {status}");
        let details = if body.is_empty() {
            None
        } else {
            if let Ok(json) = serde_json::from_str::<Value>(body)
                && let Some(msg) = json.get("error").and_then(|v| v.as_str())
            {
                return Self {
                    kind: ClientErrorKind::HttpStatus,
                    message: format!("HTTP {status}: {msg}"),
                    details: Some(body.to_string()),
                };
            }
            Some(body.to_string())
        };
        Self {
            kind: ClientErrorKind::HttpStatus,
            message,
            details,
        }
    }

    fn from_send(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ClientErrorKind::Timeout, "request timed out")
        } else {
            Self::new(
                ClientErrorKind::Connect,
                format!("could not reach evaluator: {err}"),
            )
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClientError {}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Boxed stream of decoded response text, in arrival order.
pub type EvalStream = BoxStream<'static, ClientResult<String>>;

/// Resolves the backend URL with precedence:
/// CLI override > env > config > default.
///
/// # Errors
/// Returns an error if the resolved value is not a valid URL.
pub fn resolve_backend_url(config: &Config, cli_override: Option<&str>) -> Result<String> {
    let candidate = cli_override
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var("PRV_BACKEND_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
        })
        .or_else(|| {
            let url = config.backend_url.trim();
            (!url.is_empty()).then(|| url.to_string())
        })
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
    let trimmed = candidate.trim().trim_end_matches('/').to_string();
    url::Url::parse(&trimmed).with_context(|| format!("Invalid backend URL: {trimmed}"))?;
    Ok(trimmed)
}

/// Proover evaluator client.
pub struct ProoverClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProoverClient {
    /// Creates a client for the given base URL.
    ///
    /// `timeout` bounds the whole request including the streamed body;
    /// `None` leaves long evaluations unbounded.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build().context("Failed to build HTTP client")?,
            base_url: base_url.into(),
        })
    }

    /// Dispatches one command and returns the decoded response stream.
    ///
    /// Does not wait for the body: the caller gets the stream as soon as
    /// response headers arrive, so multiple sends can drain concurrently.
    ///
    /// # Errors
    /// `Connect`/`Timeout` if the transport cannot be established,
    /// `HttpStatus` for a non-2xx response.
    pub async fn send(&self, command: &str) -> ClientResult<EvalStream> {
        let url = format!("{}/eval", self.base_url);
        tracing::debug!(url = %url, bytes = command.len(), "dispatching command");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .header(reqwest::header::ACCEPT, "text/plain")
            .body(command.to_string())
            .send()
            .await
            .map_err(|e| ClientError::from_send(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::http_status(status.as_u16(), &body));
        }

        Ok(TextChunks::new(response.bytes_stream()).boxed())
    }
}

/// Stream adapter that decodes raw byte chunks to text incrementally.
///
/// A multi-byte sequence split across chunks is held back until its tail
/// arrives; invalid sequences decode to U+FFFD. Chunks are emitted strictly
/// in arrival order.
pub struct TextChunks<S> {
    inner: S,
    carry: Vec<u8>,
    done: bool,
}

impl<S> TextChunks<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            carry: Vec::new(),
            done: false,
        }
    }

    fn decode(&mut self, chunk: &[u8]) -> String {
        self.carry.extend_from_slice(chunk);
        let mut out = String::new();
        let mut rest: &[u8] = &self.carry;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    // Valid prefix is UTF-8 by construction.
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match err.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[bad..];
                        }
                        None => {
                            // Incomplete sequence at the end: wait for the
                            // next chunk.
                            rest = tail;
                            break;
                        }
                    }
                }
            }
        }

        self.carry = rest.to_vec();
        out
    }

    /// Flushes any dangling partial sequence at end of stream.
    fn flush(&mut self) -> Option<String> {
        if self.carry.is_empty() {
            return None;
        }
        self.carry.clear();
        Some(char::REPLACEMENT_CHARACTER.to_string())
    }
}

impl<S, E> Stream for TextChunks<S>
where
    S: Stream<Item = std::result::Result<bytes::Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    type Item = ClientResult<String>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        use std::task::Poll;

        loop {
            if self.done {
                return Poll::Ready(None);
            }
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    let text = self.decode(&bytes);
                    if text.is_empty() {
                        // Chunk held back entirely (partial sequence); poll
                        // for more input rather than emitting nothing.
                        continue;
                    }
                    return Poll::Ready(Some(Ok(text)));
                }
                Poll::Ready(Some(Err(e))) => {
                    self.done = true;
                    return Poll::Ready(Some(Err(ClientError::new(
                        ClientErrorKind::Stream,
                        format!("response stream failed: {e}"),
                    ))));
                }
                Poll::Ready(None) => {
                    self.done = true;
                    if let Some(tail) = self.flush() {
                        return Poll::Ready(Some(Ok(tail)));
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
