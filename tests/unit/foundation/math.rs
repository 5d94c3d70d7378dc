use super::*;

#[test]
fn mul_div255_edges() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(100, 128), ((100u16 * 128 + 127) / 255) as u8);
}

#[test]
fn interpolate_clamps_outside_stops() {
    let input = [0.2, 0.4];
    let output = [1.0, 0.0];
    assert_eq!(interpolate_clamped(-1.0, &input, &output), 1.0);
    assert_eq!(interpolate_clamped(0.2, &input, &output), 1.0);
    assert_eq!(interpolate_clamped(0.9, &input, &output), 0.0);
    assert!((interpolate_clamped(0.3, &input, &output) - 0.5).abs() < 1e-12);
}

#[test]
fn interpolate_handles_zero_width_segment() {
    let input = [0.0, 0.5, 0.5, 1.0];
    let output = [0.0, 1.0, 1.0, 0.0];
    assert_eq!(interpolate_clamped(0.5, &input, &output), 1.0);
    assert!((interpolate_clamped(0.75, &input, &output) - 0.5).abs() < 1e-12);
}
