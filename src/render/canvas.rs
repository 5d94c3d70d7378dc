use std::sync::Arc;

use crate::{
    assets::store::Frame,
    foundation::core::{FrameIndex, Rgba8Premul, Viewport},
    foundation::error::PlayerResult,
    render::cover::{CoverFit, cover_fit},
};

/// Read-back copy of the canvas pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Premultiplied RGBA8 of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Viewport-sized drawing surface.
pub struct Canvas {
    viewport: Viewport,
    clear: Rgba8Premul,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("viewport", &self.viewport)
            .field("clear", &self.clear)
            .finish()
    }
}

impl Canvas {
    pub fn new(viewport: Viewport, clear: Rgba8Premul) -> PlayerResult<Self> {
        let (w, h) = viewport.to_u16()?;
        let mut canvas = Self {
            viewport,
            clear,
            pixmap: vello_cpu::Pixmap::new(w, h),
        };
        canvas.clear();
        Ok(canvas)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the backing store with one matching `viewport` exactly. Contents are cleared.
    pub fn resize(&mut self, viewport: Viewport) -> PlayerResult<()> {
        let (w, h) = viewport.to_u16()?;
        self.viewport = viewport;
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.clear();
        Ok(())
    }

    /// Fill the whole surface with the clear color.
    pub fn clear(&mut self) {
        let rgba = self.clear.to_array();
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn to_rgba(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.viewport.width,
            height: self.viewport.height,
            data: self.pixels().to_vec(),
        }
    }
}

/// Result of a [`CanvasRenderer::render`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderOutcome {
    /// The frame was drawn with this placement.
    Drawn(CoverFit),
    /// Nothing was drawn; the previous canvas contents are untouched.
    Skipped,
}

/// Draws frames onto a [`Canvas`] with cover-fit scaling.
///
/// Frames already hold their pixels as a shared pixmap, so drawing never copies them.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasRenderer;

impl CanvasRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Clear the canvas and draw `frame` cover-fitted into it.
    ///
    /// Frames without pixels are skipped without touching the canvas; this never fails.
    #[tracing::instrument(level = "trace", skip(self, canvas, frame))]
    pub fn render(&self, canvas: &mut Canvas, index: FrameIndex, frame: &Frame) -> RenderOutcome {
        let Some(pixmap) = frame.pixmap() else {
            tracing::trace!(index = index.0, "skip frame without pixels");
            return RenderOutcome::Skipped;
        };
        let Some(fit) = cover_fit(canvas.viewport, frame.width(), frame.height()) else {
            return RenderOutcome::Skipped;
        };

        canvas.clear();

        let mut ctx = vello_cpu::RenderContext::new(canvas.pixmap.width(), canvas.pixmap.height());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(fit.to_affine()));
        ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(frame.width()),
            f64::from(frame.height()),
        ));
        ctx.flush();
        ctx.render_to_pixmap(&mut canvas.pixmap);

        RenderOutcome::Drawn(fit)
    }
}

fn affine_to_cpu(a: crate::foundation::core::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
