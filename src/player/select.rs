use crate::foundation::core::FrameIndex;

/// Map scroll progress to a frame: `floor(progress * (frame_count - 1))`, clamped to the
/// sequence.
///
/// Progress outside `[0, 1]` (spring overshoot) clamps to the first/last frame; NaN selects the
/// first frame. A `frame_count` of zero is treated as one.
pub fn select_frame(progress: f64, frame_count: u32) -> FrameIndex {
    let last = frame_count.max(1) - 1;
    let raw = (progress * f64::from(last)).floor();
    if raw.is_nan() {
        return FrameIndex(0);
    }
    FrameIndex(raw.clamp(0.0, f64::from(last)) as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/player/select.rs"]
mod tests;
