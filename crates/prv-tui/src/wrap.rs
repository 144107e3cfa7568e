//! Width-aware line wrapping for styled lines.
//!
//! Content is pre-wrapped before scrolling so the scroll offset counts
//! display rows, not logical lines. Wrapping is word-aware and falls back
//! to grapheme-level breaks for words wider than the viewport.

use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Wraps one styled line to `width` display columns.
///
/// Always returns at least one line. Span styles survive wrapping.
pub fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line.clone()];
    }

    let mut out: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;

    for span in &line.spans {
        for word in split_keeping_spaces(&span.content) {
            let word_width = word.width();
            if current_width + word_width <= width {
                push_span(&mut current, word.to_string(), span);
                current_width += word_width;
                continue;
            }
            // Drop the trailing space that caused the break.
            if word.trim().is_empty() {
                flush(&mut out, &mut current, &mut current_width);
                continue;
            }
            if word_width <= width {
                flush(&mut out, &mut current, &mut current_width);
                push_span(&mut current, word.to_string(), span);
                current_width = word_width;
                continue;
            }
            // Word wider than the viewport: hard-break by grapheme. A
            // grapheme wider than the whole width overflows its own line
            // rather than flushing an empty one first.
            for grapheme in word.graphemes(true) {
                let gw = grapheme.width();
                if current_width + gw > width && !current.is_empty() {
                    flush(&mut out, &mut current, &mut current_width);
                }
                push_span(&mut current, grapheme.to_string(), span);
                current_width += gw;
            }
        }
    }

    out.push(Line::from(current));
    out
}

/// Wraps a batch of lines, concatenating the results.
pub fn wrap_lines(lines: &[Line<'static>], width: usize) -> Vec<Line<'static>> {
    lines
        .iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

fn flush(out: &mut Vec<Line<'static>>, current: &mut Vec<Span<'static>>, width: &mut usize) {
    let mut spans = std::mem::take(current);
    // Trailing spaces at a break point would render as a ragged edge.
    while let Some(last) = spans.last_mut() {
        let trimmed = last.content.trim_end_matches(' ').len();
        if trimmed == last.content.len() {
            break;
        }
        if trimmed == 0 {
            spans.pop();
        } else {
            last.content.to_mut().truncate(trimmed);
            break;
        }
    }
    out.push(Line::from(spans));
    *width = 0;
}

fn push_span(current: &mut Vec<Span<'static>>, text: String, template: &Span<'static>) {
    // Merge into the previous span when the style matches to keep span
    // counts small on long lines.
    if let Some(last) = current.last_mut()
        && last.style == template.style
    {
        last.content.to_mut().push_str(&text);
        return;
    }
    current.push(Span::styled(text, template.style));
}

/// Splits into words, each trailing run of spaces its own item.
fn split_keeping_spaces(text: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, c) in text.char_indices() {
        let is_space = c == ' ';
        match in_space {
            Some(prev) if prev != is_space => {
                items.push(&text[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(is_space);
    }
    if start < text.len() {
        items.push(&text[start..]);
    }
    items
}
