use crate::foundation::core::{Affine, Rect, Vec2, Viewport};

/// Placement of an image scaled to cover a viewport.
///
/// The image keeps its aspect ratio, fills the viewport completely and is centered, so any
/// overflow is cropped evenly on both sides of the overflowing axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// Uniform scale applied to the image.
    pub scale: f64,
    /// Offset of the scaled image's top-left corner; negative along the overflowing axis.
    pub shift: Vec2,
    /// Scaled image size.
    pub size: Vec2,
}

impl CoverFit {
    /// Image-space to canvas-space transform.
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.shift) * Affine::scale(self.scale)
    }

    /// Destination rectangle in canvas space.
    pub fn dest_rect(self) -> Rect {
        Rect::new(
            self.shift.x,
            self.shift.y,
            self.shift.x + self.size.x,
            self.shift.y + self.size.y,
        )
    }
}

/// Cover-fit `image_width × image_height` into `viewport`; `None` when either is empty.
pub fn cover_fit(viewport: Viewport, image_width: u32, image_height: u32) -> Option<CoverFit> {
    if viewport.is_empty() || image_width == 0 || image_height == 0 {
        return None;
    }

    let (cw, ch) = (f64::from(viewport.width), f64::from(viewport.height));
    let (iw, ih) = (f64::from(image_width), f64::from(image_height));

    let scale = (cw / iw).max(ch / ih);
    let size = Vec2::new(iw * scale, ih * scale);
    let shift = Vec2::new((cw - size.x) / 2.0, (ch - size.y) / 2.0);

    Some(CoverFit { scale, shift, size })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cover.rs"]
mod tests;
