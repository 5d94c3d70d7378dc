use crate::foundation::error::{PlayerError, PlayerResult};

pub use kurbo::{Affine, Rect, Vec2};

/// Zero-based position of a frame inside the image sequence.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// Index as a `usize`, for slice addressing.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Size of the rendering surface in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Dimensions narrowed to the `u16` range accepted by the CPU rasterizer.
    pub fn to_u16(self) -> PlayerResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| PlayerError::render("viewport width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| PlayerError::render("viewport height exceeds u16"))?;
        Ok((w, h))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
