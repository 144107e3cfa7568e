//! Frame rendering.
//!
//! Pure projection of [`AppState`] onto the terminal: transcript viewport,
//! status line, input line. All layout happens here; the reducer never
//! touches presentation.

use prv_core::typeset::{Document, Segment};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::state::AppState;
use crate::wrap::wrap_lines;

pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const PROMPT: &str = "❯ ";

fn prompt_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn math_style() -> Style {
    Style::default().fg(Color::Magenta)
}

fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Renders one frame. Takes `&mut AppState` because the scroll state learns
/// the wrapped line count here, where the width is known.
pub fn render(frame: &mut Frame<'_>, app: &mut AppState) {
    let area = frame.area();
    if area.height < 3 {
        return;
    }
    let transcript_area = Rect::new(area.x, area.y, area.width, area.height - 2);
    let status_area = Rect::new(area.x, area.y + area.height - 2, area.width, 1);
    let input_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);

    render_transcript(frame, app, transcript_area);
    render_status(frame, app, status_area);
    render_input(frame, app, input_area);
}

fn render_transcript(frame: &mut Frame<'_>, app: &mut AppState, area: Rect) {
    let wrapped = wrap_lines(&transcript_lines(app), area.width as usize);
    let total = wrapped.len();
    app.scroll.update_line_count(total);

    let viewport = area.height as usize;
    let offset = app.scroll.offset(viewport);
    let visible: Vec<Line<'static>> = wrapped
        .into_iter()
        .skip(offset)
        .take(viewport)
        .collect();

    // New sessions grow from the bottom, like a shell.
    let pad = viewport.saturating_sub(visible.len()) as u16;
    let content_area = Rect::new(area.x, area.y + pad, area.width, area.height - pad);
    frame.render_widget(Paragraph::new(visible), content_area);

    if total > viewport {
        let mut state = ScrollbarState::new(total - viewport).position(offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut state,
        );
    }
}

/// Flattens the transcript into styled logical lines (pre-wrap).
pub fn transcript_lines(app: &AppState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in app.session.transcript.entries() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(vec![
            Span::styled(PROMPT.to_string(), prompt_style()),
            Span::styled(entry.command().to_string(), prompt_style()),
        ]));
        match entry.rendered() {
            Some(document) => lines.extend(document_lines(document)),
            None => {
                // Still streaming: show the raw text as it arrives.
                for raw in entry.response().split('\n') {
                    lines.push(Line::from(Span::raw(raw.to_string())));
                }
            }
        }
    }
    lines
}

/// Converts a typeset document into lines: display math on its own line,
/// inline math flowing with the surrounding prose.
fn document_lines(document: &Document) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut after_display = false;

    for segment in &document.segments {
        match segment {
            Segment::Text(text) => {
                let mut remaining = text.as_str();
                // A display block already ended its line; the newline that
                // follows it in the source is not a blank line.
                if after_display {
                    remaining = remaining.strip_prefix('\n').unwrap_or(remaining);
                    after_display = false;
                }
                let mut parts = remaining.split('\n');
                if let Some(first) = parts.next()
                    && !first.is_empty()
                {
                    current.push(Span::raw(first.to_string()));
                }
                for part in parts {
                    lines.push(Line::from(std::mem::take(&mut current)));
                    if !part.is_empty() {
                        current.push(Span::raw(part.to_string()));
                    }
                }
            }
            Segment::Math {
                rendered: Some(rendered),
                display: true,
                ..
            } => {
                if !current.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current)));
                }
                lines.push(Line::from(Span::styled(
                    format!("  {rendered}"),
                    math_style(),
                )));
                after_display = true;
            }
            Segment::Math {
                rendered: Some(rendered),
                ..
            } => {
                current.push(Span::styled(rendered.clone(), math_style()));
                after_display = false;
            }
            // Failed span: its literal text, unstyled.
            Segment::Math { raw, .. } => {
                current.push(Span::raw(raw.clone()));
                after_display = false;
            }
        }
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn render_status(frame: &mut Frame<'_>, app: &AppState, area: Rect) {
    let mut spans: Vec<Span<'static>> = Vec::new();
    if app.streams.is_running() {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        let count = app.streams.active();
        let label = if count == 1 {
            format!("{spinner} evaluating")
        } else {
            format!("{spinner} evaluating ({count})")
        };
        spans.push(Span::styled(label, Style::default().fg(Color::Yellow)));
        spans.push(Span::styled("  esc cancel".to_string(), dim_style()));
    } else {
        spans.push(Span::styled(
            "enter send  ↑/↓ history  ctrl+c quit".to_string(),
            dim_style(),
        ));
    }
    if !app.scroll.is_following() {
        spans.push(Span::styled(
            "  [scroll: end to re-follow]".to_string(),
            dim_style(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame<'_>, app: &AppState, area: Rect) {
    let line = Line::from(vec![
        Span::styled(PROMPT.to_string(), prompt_style()),
        Span::raw(app.input.text().to_string()),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + PROMPT.chars().count() as u16 + app.input.cursor_display_col();
    frame.set_cursor_position(Position::new(cursor_x.min(area.right().saturating_sub(1)), area.y));
}

#[cfg(test)]
mod tests {
    use prv_core::config::Config;

    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn finished_app(command: &str, response: &str) -> AppState {
        let mut app = AppState::new(Config::default());
        let (id, _) = app.session.submit(command).unwrap();
        app.session.apply_chunk(id, response);
        let engine = std::sync::Arc::clone(&app.engine);
        app.session.complete(id, &app.delimiters, engine.as_ref());
        app
    }

    #[test]
    fn streaming_entry_shows_raw_text() {
        let mut app = AppState::new(Config::default());
        let (id, _) = app.session.submit("step").unwrap();
        app.session.apply_chunk(id, "partial $x");

        let lines = transcript_lines(&app);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, [format!("{PROMPT}step"), "partial $x".to_string()]);
    }

    #[test]
    fn display_math_gets_its_own_line() {
        let app = finished_app("thm", "goal:\n$$P \\land Q$$\ndone");
        let lines = transcript_lines(&app);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(
            texts,
            [
                format!("{PROMPT}thm"),
                "goal:".to_string(),
                "  P ∧ Q".to_string(),
                "done".to_string(),
            ]
        );
    }

    #[test]
    fn inline_math_flows_with_prose() {
        let app = finished_app("eval", "sum is $1+1$ here");
        let lines = transcript_lines(&app);
        assert_eq!(text_of(&lines[1]), "sum is 1+1 here");
        assert!(lines[1].spans.iter().any(|s| s.style == math_style()));
    }

    #[test]
    fn entries_separated_by_blank_line() {
        let mut app = finished_app("a", "one");
        let (id, _) = app.session.submit("b").unwrap();
        app.session.apply_chunk(id, "two");
        let engine = std::sync::Arc::clone(&app.engine);
        app.session.complete(id, &app.delimiters, engine.as_ref());

        let lines = transcript_lines(&app);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(
            texts,
            [
                format!("{PROMPT}a"),
                "one".to_string(),
                String::new(),
                format!("{PROMPT}b"),
                "two".to_string(),
            ]
        );
    }
}
