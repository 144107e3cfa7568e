//! Tolerant math typesetting.
//!
//! Raw response text is split into pass-through prose and delimiter-marked
//! math spans, and each span is handed to a pluggable [`Typesetter`] engine.
//! Failure is always local: an unterminated delimiter or a span the engine
//! rejects falls back to its literal text, and the rest of the document
//! still renders. A single typo must never blank the transcript.

mod tex;

use std::fmt;

use serde::{Deserialize, Serialize};
pub use tex::UnicodeTex;

/// One recognized math delimiter pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiter {
    pub open: String,
    pub close: String,
    /// Display (block) math renders on its own line; inline flows with prose.
    pub display: bool,
}

impl Delimiter {
    fn new(open: &str, close: &str, display: bool) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
            display,
        }
    }
}

/// Default delimiter set, in priority order.
///
/// `$$` must come before `$` so display spans are not misread as an empty
/// inline span followed by stray text.
pub fn default_delimiters() -> Vec<Delimiter> {
    vec![
        Delimiter::new("$$", "$$", true),
        Delimiter::new("$", "$", false),
        Delimiter::new("\\[", "\\]", true),
        Delimiter::new("\\(", "\\)", false),
    ]
}

/// A piece of a typeset document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Prose passed through unchanged.
    Text(String),
    /// A delimiter-marked math span.
    Math {
        /// The full span as written, delimiters included. Used as the
        /// fallback rendering when the engine rejects the span.
        raw: String,
        /// The span content between the delimiters.
        source: String,
        display: bool,
        /// Engine output; `None` means the span failed to render and the
        /// raw text is shown instead.
        rendered: Option<String>,
    },
}

/// A fully typeset response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub segments: Vec<Segment>,
}

impl Document {
    /// Flattens the document to plain text: rendered math where available,
    /// raw span text where rendering failed.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Math {
                    rendered: Some(rendered),
                    ..
                } => out.push_str(rendered),
                Segment::Math { raw, .. } => out.push_str(raw),
            }
        }
        out
    }
}

/// Per-span rendering error. Local to one span by contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypesetError {
    UnknownCommand(String),
    UnbalancedBraces,
    UnsupportedScript(char),
}

impl fmt::Display for TypesetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypesetError::UnknownCommand(name) => write!(f, "unknown command \\{name}"),
            TypesetError::UnbalancedBraces => write!(f, "unbalanced braces"),
            TypesetError::UnsupportedScript(c) => write!(f, "no script form for {c:?}"),
        }
    }
}

impl std::error::Error for TypesetError {}

/// A pluggable math rendering engine.
///
/// Engines render one span at a time and may fail per span; the caller
/// handles fallback. Implementations must not panic on malformed input.
pub trait Typesetter: Send + Sync {
    fn render(&self, source: &str, display: bool) -> Result<String, TypesetError>;
}

/// Splits `text` on the given delimiters and renders each span with `engine`.
///
/// At each position the first delimiter whose opener matches is committed to:
/// if its closer is found the span becomes math, otherwise the opener passes
/// through as literal text and scanning resumes after it.
pub fn typeset(text: &str, delimiters: &[Delimiter], engine: &dyn Typesetter) -> Document {
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut rest = text;

    'scan: while !rest.is_empty() {
        for delim in delimiters {
            if delim.open.is_empty() || !rest.starts_with(&delim.open) {
                continue;
            }
            let after_open = &rest[delim.open.len()..];
            if let Some(close_at) = after_open.find(&delim.close) {
                let source = &after_open[..close_at];
                let raw_len = delim.open.len() + close_at + delim.close.len();
                flush_text(&mut segments, &mut pending);
                segments.push(Segment::Math {
                    raw: rest[..raw_len].to_string(),
                    source: source.to_string(),
                    display: delim.display,
                    rendered: engine.render(source, delim.display).ok(),
                });
                rest = &rest[raw_len..];
            } else {
                // Unterminated: the opener is literal text.
                pending.push_str(&delim.open);
                rest = after_open;
            }
            continue 'scan;
        }
        let ch = rest.chars().next().unwrap_or_default();
        pending.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    flush_text(&mut segments, &mut pending);
    Document { segments }
}

fn flush_text(segments: &mut Vec<Segment>, pending: &mut String) {
    if !pending.is_empty() {
        segments.push(Segment::Text(std::mem::take(pending)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typeset_default(text: &str) -> Document {
        typeset(text, &default_delimiters(), &UnicodeTex)
    }

    #[test]
    fn plain_text_passes_through() {
        let doc = typeset_default("no math here");
        assert_eq!(doc.segments, vec![Segment::Text("no math here".into())]);
    }

    #[test]
    fn inline_span_renders() {
        let doc = typeset_default("sum: $1+1$ done");
        assert_eq!(doc.to_text(), "sum: 1+1 done");
        assert!(matches!(
            &doc.segments[1],
            Segment::Math { display: false, .. }
        ));
    }

    #[test]
    fn display_span_has_priority_over_inline() {
        let doc = typeset_default("$$P \\land Q$$");
        match &doc.segments[..] {
            [Segment::Math {
                source,
                display,
                rendered,
                ..
            }] => {
                assert_eq!(source, "P \\land Q");
                assert!(display);
                assert_eq!(rendered.as_deref(), Some("P ∧ Q"));
            }
            other => panic!("unexpected segments: {other:?}"),
        }
    }

    #[test]
    fn backslash_delimiters_recognized() {
        let doc = typeset_default("\\(x\\) and \\[y\\]");
        assert_eq!(doc.to_text(), "x and y");
    }

    #[test]
    fn unterminated_span_stays_literal() {
        let doc = typeset_default("$1+1$ and $$bad\\");
        assert_eq!(doc.to_text(), "1+1 and $$bad\\");
        // The well-formed span still rendered as math.
        assert!(matches!(
            &doc.segments[0],
            Segment::Math {
                rendered: Some(r),
                ..
            } if r == "1+1"
        ));
    }

    #[test]
    fn failed_span_falls_back_to_raw_text() {
        let doc = typeset_default("ok $\\nosuchcmd$ still here");
        assert_eq!(doc.to_text(), "ok $\\nosuchcmd$ still here");
        assert!(matches!(
            &doc.segments[1],
            Segment::Math { rendered: None, .. }
        ));
        // Rendering continued past the failed span.
        assert_eq!(doc.segments[2], Segment::Text(" still here".into()));
    }

    #[test]
    fn adjacent_spans_keep_order() {
        let doc = typeset_default("$a$$b$");
        // `$$` wins at the boundary only when it opens a span; here the
        // first `$a$` consumes its closer, leaving `$b$` intact.
        assert_eq!(doc.to_text(), "ab");
        assert_eq!(doc.segments.len(), 2);
    }
}
