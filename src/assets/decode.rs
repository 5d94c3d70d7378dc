use anyhow::Context;

use crate::{assets::store::Frame, foundation::error::PlayerResult, foundation::math::mul_div255_u8};

/// Decode encoded image bytes (JPEG, PNG, ...) into a premultiplied RGBA8 [`Frame`].
pub fn decode_frame(bytes: &[u8]) -> PlayerResult<Frame> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Frame::from_premul_rgba8(width, height, &rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        match a {
            255 => {}
            0 => {
                px[0] = 0;
                px[1] = 0;
                px[2] = 0;
            }
            _ => {
                px[0] = mul_div255_u8(px[0], a);
                px[1] = mul_div255_u8(px[1], a);
                px[2] = mul_div255_u8(px[2], a);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
