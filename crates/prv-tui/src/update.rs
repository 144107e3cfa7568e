//! The state reducer.
//!
//! `update()` is the single entry point for every event. It mutates
//! [`AppState`] and returns the effects the runtime should execute; it never
//! performs I/O itself.

use std::sync::Arc;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::effects::UiEffect;
use crate::events::{StreamUiEvent, UiEvent};
use crate::state::AppState;

/// Rows reserved below the transcript (status line + input line).
const CHROME_ROWS: u16 = 2;

/// Lines scrolled per mouse wheel notch.
const WHEEL_SCROLL_LINES: usize = 3;

/// Transcript viewport height in rows for the current terminal size.
pub fn transcript_viewport(app: &AppState) -> usize {
    app.viewport.1.saturating_sub(CHROME_ROWS) as usize
}

/// Applies one event to the state, returning effects for the runtime.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            Vec::new()
        }
        UiEvent::Frame { width, height } => {
            app.viewport = (width, height);
            Vec::new()
        }
        UiEvent::Terminal(terminal_event) => handle_terminal_event(app, terminal_event),
        UiEvent::Stream(stream_event) => handle_stream_event(app, stream_event),
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        Event::Paste(text) => {
            // Strip newlines so a multi-line paste stays one command.
            let flattened: String = text
                .chars()
                .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                .collect();
            app.input.insert_str(&flattened);
            Vec::new()
        }
        Event::Resize(width, height) => {
            app.viewport = (width, height);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return handle_ctrl_key(app, key.code);
    }

    match key.code {
        KeyCode::Enter => submit_input(app),
        KeyCode::Up => {
            if let Some(command) = app.session.history.navigate_previous() {
                app.input.set_text(&command);
            }
            Vec::new()
        }
        KeyCode::Down => {
            if let Some(command) = app.session.history.navigate_next() {
                app.input.set_text(&command);
            }
            Vec::new()
        }
        KeyCode::Esc => {
            if app.streams.is_running() {
                vec![UiEffect::CancelAll]
            } else {
                Vec::new()
            }
        }
        KeyCode::Char(c) => {
            app.input.insert_char(c);
            Vec::new()
        }
        KeyCode::Backspace => {
            app.input.backspace();
            Vec::new()
        }
        KeyCode::Delete => {
            app.input.delete();
            Vec::new()
        }
        KeyCode::Left => {
            app.input.move_left();
            Vec::new()
        }
        KeyCode::Right => {
            app.input.move_right();
            Vec::new()
        }
        KeyCode::Home => {
            app.input.move_home();
            Vec::new()
        }
        KeyCode::End => {
            app.input.move_end();
            Vec::new()
        }
        KeyCode::PageUp => {
            let viewport = transcript_viewport(app);
            app.scroll.scroll_up(viewport.saturating_sub(1).max(1), viewport);
            Vec::new()
        }
        KeyCode::PageDown => {
            let viewport = transcript_viewport(app);
            app.scroll
                .scroll_down(viewport.saturating_sub(1).max(1), viewport);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_ctrl_key(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
    match code {
        // First Ctrl+C cancels outstanding streams; with nothing running it
        // quits.
        KeyCode::Char('c') => {
            if app.streams.is_running() {
                vec![UiEffect::CancelAll]
            } else {
                app.should_quit = true;
                vec![UiEffect::Quit]
            }
        }
        KeyCode::Char('d') => {
            if app.input.is_empty() {
                app.should_quit = true;
                vec![UiEffect::Quit]
            } else {
                app.input.delete();
                Vec::new()
            }
        }
        KeyCode::Char('u') => {
            app.input.clear();
            Vec::new()
        }
        KeyCode::Char('a') => {
            app.input.move_home();
            Vec::new()
        }
        KeyCode::Char('e') => {
            app.input.move_end();
            Vec::new()
        }
        KeyCode::Home => {
            app.scroll.scroll_to_top(transcript_viewport(app));
            Vec::new()
        }
        KeyCode::End => {
            app.scroll.scroll_to_bottom();
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_mouse(app: &mut AppState, mouse: MouseEvent) -> Vec<UiEffect> {
    let viewport = transcript_viewport(app);
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll.scroll_up(WHEEL_SCROLL_LINES, viewport),
        MouseEventKind::ScrollDown => app.scroll.scroll_down(WHEEL_SCROLL_LINES, viewport),
        _ => {}
    }
    Vec::new()
}

fn submit_input(app: &mut AppState) -> Vec<UiEffect> {
    let Some((entry, command)) = app.session.submit(app.input.text()) else {
        // Blank input is ignored entirely.
        app.input.clear();
        return Vec::new();
    };
    app.input.clear();
    // Scroll state is left alone: while Following the new entry shows up at
    // the bottom anyway, and while Detached the viewport must not move.
    vec![UiEffect::Dispatch { entry, command }]
}

fn handle_stream_event(app: &mut AppState, event: StreamUiEvent) -> Vec<UiEffect> {
    let engine = Arc::clone(&app.engine);
    match event {
        StreamUiEvent::Chunk { entry, text } => {
            app.session.apply_chunk(entry, &text);
        }
        StreamUiEvent::Completed { entry } => {
            app.session.complete(entry, &app.delimiters, engine.as_ref());
            app.streams.remove(entry);
        }
        StreamUiEvent::Failed { entry, error } => {
            app.session
                .fail(entry, &error, &app.delimiters, engine.as_ref());
            app.streams.remove(entry);
        }
        StreamUiEvent::Aborted { entry } => {
            app.session.abort(entry, &app.delimiters, engine.as_ref());
            app.streams.remove(entry);
        }
    }
    Vec::new()
}
