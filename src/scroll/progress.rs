use crate::scroll::{
    signal::{Signal, Subscription},
    spring::{Spring, SpringConfig},
};

/// Normalized document scroll position, raw and spring-smoothed.
///
/// The host feeds scroll geometry with [`ScrollProgress::set_scroll`] and advances time with
/// [`ScrollProgress::tick`]; consumers subscribe to either variant.
#[derive(Debug)]
pub struct ScrollProgress {
    raw: Signal<f64>,
    smoothed: Signal<f64>,
    spring: Spring,
}

impl ScrollProgress {
    pub fn new(spring: SpringConfig) -> Self {
        Self {
            raw: Signal::new(0.0),
            smoothed: Signal::new(0.0),
            spring: Spring::new(spring, 0.0),
        }
    }

    /// Raw progress in `[0, 1]`.
    pub fn raw(&self) -> f64 {
        self.raw.get()
    }

    /// Smoothed progress; may briefly leave `[0, 1]` with an under-damped spring.
    pub fn smoothed(&self) -> f64 {
        self.smoothed.get()
    }

    pub fn is_settled(&self) -> bool {
        self.spring.is_at_rest()
    }

    /// Map a vertical scroll offset to progress: `offset / (scroll_height - viewport_height)`.
    pub fn set_scroll(&mut self, offset_px: f64, scroll_height_px: f64, viewport_height_px: f64) {
        let max_offset = scroll_height_px - viewport_height_px;
        let p = if max_offset > 0.0 {
            offset_px / max_offset
        } else {
            0.0
        };
        self.set_raw(p);
    }

    pub fn set_raw(&mut self, progress: f64) {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.raw.set(p);
        self.spring.set_target(p);
    }

    /// Advance the spring by `dt_s` seconds and publish the smoothed value.
    pub fn tick(&mut self, dt_s: f64) -> f64 {
        let v = self.spring.step(dt_s);
        self.smoothed.set(v);
        v
    }

    /// Set both variants to `progress` immediately, bypassing the spring.
    pub fn jump_to(&mut self, progress: f64) {
        self.set_raw(progress);
        let p = self.raw.get();
        self.spring.jump(p);
        self.smoothed.set(p);
    }

    pub fn subscribe_raw(&mut self) -> Subscription<f64> {
        self.raw.subscribe()
    }

    pub fn subscribe_smoothed(&mut self) -> Subscription<f64> {
        self.smoothed.subscribe()
    }

    pub fn unsubscribe_smoothed(&mut self, sub: Subscription<f64>) -> bool {
        self.smoothed.unsubscribe(sub)
    }

    pub fn smoothed_subscriber_count(&self) -> usize {
        self.smoothed.subscriber_count()
    }
}

impl Default for ScrollProgress {
    fn default() -> Self {
        Self::new(SpringConfig::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/progress.rs"]
mod tests;
