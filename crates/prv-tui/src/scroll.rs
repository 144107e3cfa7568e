//! Transcript scroll state.
//!
//! Two modes: `Following` keeps the viewport pinned to the newest content as
//! the transcript grows; `Detached` leaves the viewport alone so the user
//! can read scroll-back while streams keep appending elsewhere. User scroll
//! away from the bottom detaches; scrolling back to the bottom re-follows.

/// Whether the viewport tracks the transcript's growing end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    #[default]
    Following,
    Detached,
}

/// Scroll position over the flattened transcript lines.
#[derive(Debug, Default)]
pub struct ScrollState {
    pub mode: ScrollMode,
    /// Lines hidden above the viewport; only meaningful while `Detached`.
    offset: usize,
    /// Total transcript lines at the current width.
    line_count: usize,
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        self.mode == ScrollMode::Following
    }

    /// Records the current total line count (recomputed per frame).
    pub fn update_line_count(&mut self, total: usize) {
        self.line_count = total;
    }

    fn max_offset(&self, viewport: usize) -> usize {
        self.line_count.saturating_sub(viewport)
    }

    /// Effective offset for rendering. `Following` always resolves to the
    /// bottom, which is what re-pins the view on every transcript mutation.
    pub fn offset(&self, viewport: usize) -> usize {
        match self.mode {
            ScrollMode::Following => self.max_offset(viewport),
            ScrollMode::Detached => self.offset.min(self.max_offset(viewport)),
        }
    }

    /// User scroll toward older content; detaches unless everything fits.
    pub fn scroll_up(&mut self, lines: usize, viewport: usize) {
        if self.line_count <= viewport {
            return;
        }
        self.offset = self.offset(viewport).saturating_sub(lines);
        self.mode = ScrollMode::Detached;
    }

    /// User scroll toward newer content; reaching the bottom re-follows.
    pub fn scroll_down(&mut self, lines: usize, viewport: usize) {
        let target = self.offset(viewport) + lines;
        if target >= self.max_offset(viewport) {
            self.mode = ScrollMode::Following;
        } else {
            self.offset = target;
            self.mode = ScrollMode::Detached;
        }
    }

    pub fn scroll_to_top(&mut self, viewport: usize) {
        if self.line_count > viewport {
            self.offset = 0;
            self.mode = ScrollMode::Detached;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::Following;
    }
}
