//! Scroll-driven fade timing for page text blocks.
//!
//! These helpers are stateless: they map a scroll progress value to presentation values and never
//! touch the frame store or the canvas.

use crate::foundation::{
    error::{PlayerError, PlayerResult},
    math::interpolate_clamped,
};

/// Fraction of a block's range spent fading in (and, symmetrically, fading out).
pub const FADE_FRACTION: f64 = 0.1;

/// Vertical travel in pixels while fading in (from below) and out (upwards).
pub const FADE_TRAVEL_PX: f64 = 20.0;

/// Scroll progress by which the "scroll to continue" hint has fully disappeared.
pub const HINT_FADE_END: f64 = 0.1;

/// Presentation values for a text block at one scroll position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeSample {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Vertical offset in pixels; positive moves the block down.
    pub y_offset: f64,
}

/// Fade window of one text block over a `[start, end]` scroll range.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextFade {
    start: f64,
    end: f64,
}

impl TextFade {
    pub fn new(start: f64, end: f64) -> PlayerResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(PlayerError::validation("fade range must be finite"));
        }
        if start > end {
            return Err(PlayerError::validation("fade range start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    fn stops(&self) -> [f64; 4] {
        let fade = (self.end - self.start) * FADE_FRACTION;
        [self.start, self.start + fade, self.end - fade, self.end]
    }

    /// Ramp 0→1 over the first 10% of the range, hold, then 1→0 over the last 10%.
    pub fn sample(&self, progress: f64) -> FadeSample {
        let stops = self.stops();
        FadeSample {
            opacity: interpolate_clamped(progress, &stops, &[0.0, 1.0, 1.0, 0.0]),
            y_offset: interpolate_clamped(
                progress,
                &stops,
                &[FADE_TRAVEL_PX, 0.0, 0.0, -FADE_TRAVEL_PX],
            ),
        }
    }

    pub fn is_visible(&self, progress: f64) -> bool {
        self.sample(progress).opacity > 0.0
    }
}

/// Opacity of the scroll hint shown once frames are ready.
pub fn hint_opacity(progress: f64) -> f64 {
    interpolate_clamped(progress, &[0.0, HINT_FADE_END], &[1.0, 0.0])
}

#[cfg(test)]
#[path = "../tests/unit/fade.rs"]
mod tests;
