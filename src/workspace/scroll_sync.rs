//! Mirrors the scroll position between the editor and the preview.

use std::time::{Duration, Instant};

/// How long direct input on a pane keeps it in charge.
pub const INPUT_DECAY: Duration = Duration::from_millis(140);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Editor,
    Preview,
}

impl Pane {
    pub fn other(self) -> Pane {
        match self {
            Pane::Editor => Pane::Preview,
            Pane::Preview => Pane::Editor,
        }
    }
}

/// Scroll geometry of one pane, in any consistent unit (rows here).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    /// Total content height
    pub scroll_height: f64,
    /// Visible height
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        ScrollMetrics {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Fraction of the scrollable distance covered; 0 when not scrollable.
    pub fn ratio(&self) -> f64 {
        let max = self.max_scroll();
        if max <= 0.0 {
            return 0.0;
        }
        (self.scroll_top / max).clamp(0.0, 1.0)
    }
}

/// Where `dst` should scroll to follow `src`.
///
/// Blends a height-scaled position (dominant near the top) with a
/// ratio-matched position (dominant near the bottom).
pub fn sync_position(src: ScrollMetrics, dst: ScrollMetrics) -> f64 {
    let r = src.ratio();
    let top_scaled = if src.scroll_height > 0.0 {
        src.scroll_top * (dst.scroll_height / src.scroll_height)
    } else {
        0.0
    };
    let bottom_scaled = r * dst.max_scroll();
    let position = top_scaled * (1.0 - r) + bottom_scaled * r;
    position.clamp(0.0, dst.max_scroll())
}

#[derive(Debug, Clone)]
pub struct ScrollSync {
    decay: Duration,
    last_input: Option<(Pane, Instant)>,
    /// Pane whose next scroll event is our own echo
    guard: Option<Pane>,
}

impl Default for ScrollSync {
    fn default() -> Self {
        ScrollSync {
            decay: INPUT_DECAY,
            last_input: None,
            guard: None,
        }
    }
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record direct user input (wheel, touch) on a pane.
    pub fn note_input(&mut self, pane: Pane, now: Instant) {
        self.last_input = Some((pane, now));
    }

    /// The pane currently allowed to drive the other, if any.
    pub fn driver(&self, now: Instant) -> Option<Pane> {
        self.last_input
            .filter(|(_, at)| now.saturating_duration_since(*at) < self.decay)
            .map(|(pane, _)| pane)
    }

    /// Handle a scroll of `pane`. Returns the position to apply to the
    /// other pane, or `None` if this event must not propagate.
    pub fn on_scroll(
        &mut self,
        pane: Pane,
        src: ScrollMetrics,
        dst: ScrollMetrics,
        now: Instant,
    ) -> Option<f64> {
        if self.guard == Some(pane) {
            self.guard = None;
            return None;
        }
        if let Some(driver) = self.driver(now)
            && driver != pane
        {
            return None;
        }
        self.guard = Some(pane.other());
        Some(sync_position(src, dst))
    }

    /// Drop the echo guard. Called once per event-loop tick.
    pub fn end_tick(&mut self) {
        self.guard = None;
    }

    pub fn reset(&mut self) {
        self.last_input = None;
        self.guard = None;
    }
}
