pub(crate) fn mul_div255_u8(x: u8, y: u8) -> u8 {
    (((u16::from(x) * u16::from(y)) + 127) / 255) as u8
}

/// Piecewise-linear mapping of `x` through matching `input`/`output` stops.
///
/// Values outside the first/last stop clamp to the first/last output. `input` must be sorted
/// ascending and the same length as `output`; degenerate (zero-width) segments resolve to the
/// segment's end value.
pub(crate) fn interpolate_clamped(x: f64, input: &[f64], output: &[f64]) -> f64 {
    debug_assert_eq!(input.len(), output.len());
    let n = input.len().min(output.len());
    if n == 0 {
        return 0.0;
    }
    if x.is_nan() || x <= input[0] {
        return output[0];
    }
    if x >= input[n - 1] {
        return output[n - 1];
    }

    for i in 1..n {
        let (x0, x1) = (input[i - 1], input[i]);
        if x <= x1 {
            let span = x1 - x0;
            if span <= 0.0 {
                return output[i];
            }
            let t = (x - x0) / span;
            return output[i - 1] + (output[i] - output[i - 1]) * t;
        }
    }
    output[n - 1]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
