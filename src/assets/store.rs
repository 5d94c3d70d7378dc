use std::sync::Arc;

use crate::{
    assets::loader::FrameLoader,
    assets::source::FrameSource,
    config::SequenceConfig,
    foundation::core::FrameIndex,
    foundation::error::{PlayerError, PlayerResult},
};

/// One decoded still of the sequence, held as a premultiplied RGBA8 pixmap ready to be painted.
///
/// Pixels are shared, so cloning a frame is cheap.
#[derive(Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    pixmap: Option<Arc<vello_cpu::Pixmap>>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("placeholder", &self.is_placeholder())
            .finish()
    }
}

impl Frame {
    /// Stand-in for a frame that failed to load: zero-sized, no pixels.
    pub fn placeholder() -> Self {
        Self {
            width: 0,
            height: 0,
            pixmap: None,
        }
    }

    /// Build a frame from row-major premultiplied RGBA8 bytes.
    ///
    /// Both dimensions must be non-zero and fit the rasterizer's `u16` range, and `rgba8_premul`
    /// must hold exactly `width * height` pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: &[u8]) -> PlayerResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlayerError::asset("frame has no pixels"));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| PlayerError::asset("frame width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PlayerError::asset("frame height exceeds u16"))?;
        let expected = width as usize * height as usize * 4;
        if rgba8_premul.len() != expected {
            return Err(PlayerError::asset(format!(
                "frame payload is {} bytes, expected {expected}",
                rgba8_premul.len()
            )));
        }

        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for px in rgba8_premul.chunks_exact(4) {
            let a = px[3];
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a,
            });
        }

        Ok(Self {
            width,
            height,
            pixmap: Some(Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                pixels,
                w,
                h,
                may_have_opacities,
            ))),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_placeholder(&self) -> bool {
        self.pixmap.is_none()
    }

    /// Whether the frame carries pixels that can be drawn.
    pub fn is_drawable(&self) -> bool {
        !self.is_placeholder()
    }

    /// Premultiplied RGBA8 bytes, row-major; empty for a placeholder.
    pub fn pixels(&self) -> &[u8] {
        match &self.pixmap {
            Some(pixmap) => pixmap.data_as_u8_slice(),
            None => &[],
        }
    }

    pub(crate) fn pixmap(&self) -> Option<&Arc<vello_cpu::Pixmap>> {
        self.pixmap.as_ref()
    }
}

/// Snapshot of preload progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    /// Requests that reached a terminal state.
    pub settled: u32,
    /// Requests that produced a decoded frame.
    pub loaded: u32,
    /// Requests that failed and hold a placeholder.
    pub failed: u32,
    /// Total number of requests.
    pub total: u32,
}

impl LoadProgress {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Settled share as a rounded integer percentage in `0..=100`.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (f64::from(self.settled) / f64::from(self.total) * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.settled >= self.total
    }
}

/// Fully settled, immutable set of frames addressed by [`FrameIndex`].
///
/// Every index in `0..len` holds a frame; failed loads hold [`Frame::placeholder`].
#[derive(Clone, Debug)]
pub struct FrameStore {
    frames: Vec<Frame>,
    progress: LoadProgress,
}

impl FrameStore {
    pub(crate) fn from_parts(frames: Vec<Frame>, progress: LoadProgress) -> Self {
        Self { frames, progress }
    }

    /// Fetch and decode every frame of `config` in parallel and wait until all have settled.
    ///
    /// Individual failures never fail the load; they are logged and replaced by placeholders.
    /// `on_progress` runs on the calling thread after every settlement.
    #[tracing::instrument(skip(config, source, on_progress), fields(frames = config.frame_count))]
    pub fn load(
        config: &SequenceConfig,
        source: Arc<dyn FrameSource>,
        threads: Option<usize>,
        on_progress: impl FnMut(LoadProgress),
    ) -> PlayerResult<Self> {
        let loader = FrameLoader::start(config, source, threads)?;
        Ok(loader.wait(on_progress))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: FrameIndex) -> Option<&Frame> {
        self.frames.get(index.as_usize())
    }

    pub fn progress(&self) -> LoadProgress {
        self.progress
    }

    pub fn loaded_count(&self) -> u32 {
        self.progress.loaded
    }

    pub fn failed_count(&self) -> u32 {
        self.progress.failed
    }

    /// Indices that hold placeholders.
    pub fn failed_indices(&self) -> Vec<FrameIndex> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_placeholder())
            .map(|(i, _)| FrameIndex(i as u32))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
