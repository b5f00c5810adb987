// src/trim/mod.rs

//! Trim window: the `[start, end]` slice of a track that survives playback
//! and export, plus the time/fraction/pixel mapping shared with renderers.

pub mod editor;

pub use editor::{EditorState, TrimCommit, TrimEditor};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudioError};

/// Start/end offsets in seconds within a track of length `duration`.
///
/// Every mutation returns a new window clamped so that
/// `0 <= start <= end - min_gap` and `end <= duration` hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredTrimWindow")]
pub struct TrimWindow {
    start: f64,
    end: f64,
    duration: f64,
    min_gap: f64,
}

impl TrimWindow {
    /// Untrimmed window with no minimum gap.
    pub fn create(duration: f64) -> Result<Self> {
        Self::create_with_gap(duration, 0.0)
    }

    /// Untrimmed window whose handles never get closer than `min_gap` seconds.
    pub fn create_with_gap(duration: f64, min_gap: f64) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(StudioError::InvalidInput(format!(
                "duration must be positive, got {duration}"
            )));
        }
        if !min_gap.is_finite() || min_gap < 0.0 {
            return Err(StudioError::InvalidInput(format!(
                "min_gap must be a non-negative number, got {min_gap}"
            )));
        }
        if min_gap > duration {
            return Err(StudioError::InvalidInput(format!(
                "min_gap {min_gap}s exceeds track duration {duration}s"
            )));
        }
        Ok(Self {
            start: 0.0,
            end: duration,
            duration,
            min_gap,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    /// Length of the kept region.
    pub fn kept_duration(&self) -> f64 {
        self.end - self.start
    }

    /// True when the window covers the whole track.
    pub fn is_full(&self) -> bool {
        self.start == 0.0 && self.end == self.duration
    }

    /// Move the start handle; clamps to `[0, end - min_gap]`.
    pub fn set_start(&self, candidate: f64) -> Self {
        let candidate = if candidate.is_nan() { 0.0 } else { candidate };
        let upper = (self.end - self.min_gap).max(0.0);
        Self {
            start: candidate.clamp(0.0, upper),
            ..*self
        }
    }

    /// Move the end handle; clamps to `[start + min_gap, duration]`.
    pub fn set_end(&self, candidate: f64) -> Self {
        let candidate = if candidate.is_nan() { self.duration } else { candidate };
        let lower = (self.start + self.min_gap).min(self.duration);
        Self {
            end: candidate.clamp(lower, self.duration),
            ..*self
        }
    }

    pub fn reset(&self) -> Self {
        Self {
            start: 0.0,
            end: self.duration,
            ..*self
        }
    }

    /// Pre-commit check: the window is only usable when `start < end`.
    pub fn apply(&self) -> Result<Self> {
        if self.start < self.end {
            Ok(*self)
        } else {
            Err(StudioError::InvalidTrimRange {
                start: self.start,
                end: self.end,
            })
        }
    }

    pub fn start_fraction(&self) -> f64 {
        time_to_fraction(self.duration, self.start)
    }

    pub fn end_fraction(&self) -> f64 {
        time_to_fraction(self.duration, self.end)
    }

    /// Drag the start handle to pixel `x` on a canvas `width` pixels wide.
    pub fn set_start_at_pixel(&self, x: f64, width: f64) -> Self {
        self.set_start(fraction_to_time(self.duration, pixel_to_fraction(x, width)))
    }

    /// Drag the end handle to pixel `x` on a canvas `width` pixels wide.
    pub fn set_end_at_pixel(&self, x: f64, width: f64) -> Self {
        self.set_end(fraction_to_time(self.duration, pixel_to_fraction(x, width)))
    }
}

// Wire shape of a window; checked before it becomes a `TrimWindow`.
#[derive(Deserialize)]
struct StoredTrimWindow {
    start: f64,
    end: f64,
    duration: f64,
    min_gap: f64,
}

impl TryFrom<StoredTrimWindow> for TrimWindow {
    type Error = StudioError;

    fn try_from(raw: StoredTrimWindow) -> Result<Self> {
        let full = TrimWindow::create_with_gap(raw.duration, raw.min_gap)?;
        let StoredTrimWindow { start, end, min_gap, .. } = raw;
        // Either form of the gap check, since set_end computes `start + min_gap`
        // and set_start computes `end - min_gap`.
        let gap_ok = start <= end - min_gap || start + min_gap <= end;
        if !(start.is_finite() && end.is_finite() && start >= 0.0 && end <= full.end && gap_ok) {
            return Err(StudioError::InvalidInput(format!(
                "stored trim {start}s..{end}s does not fit a {}s track with a {min_gap}s gap",
                full.duration
            )));
        }
        Ok(Self { start, end, ..full })
    }
}

/// `t / duration`, or 0 when the duration is unusable.
pub fn time_to_fraction(duration: f64, t: f64) -> f64 {
    if duration > 0.0 && duration.is_finite() {
        t / duration
    } else {
        0.0
    }
}

pub fn fraction_to_time(duration: f64, fraction: f64) -> f64 {
    fraction * duration
}

pub fn fraction_to_pixel(fraction: f64, width: f64) -> f64 {
    fraction * width
}

/// `x / width`, or 0 for a zero-width canvas.
pub fn pixel_to_fraction(x: f64, width: f64) -> f64 {
    if width > 0.0 && width.is_finite() {
        x / width
    } else {
        0.0
    }
}

/// `m:ss` readout used next to the sliders.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{mins}:{secs:02}")
}
