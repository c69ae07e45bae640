//! Statistical helpers: median, mean and population standard deviation.

/// Calculate the median of f32 values in-place.
///
/// Mutates the input buffer (partial sort via quickselect). Even lengths
/// average the two middle values.
#[inline]
pub fn median_f32_mut(data: &mut [f32]) -> f32 {
    debug_assert!(!data.is_empty());

    let len = data.len();
    let mid = len / 2;

    let (left_part, median, _) = data.select_nth_unstable_by(mid, f32::total_cmp);
    let upper = *median;
    if len & 1 == 1 {
        upper
    } else {
        let lower = left_part.iter().copied().fold(f32::MIN, f32::max);
        (lower + upper) * 0.5
    }
}

/// Mean and population standard deviation (divides by N, not N - 1).
///
/// The mean is never below the smallest value, even for equal inputs whose
/// plain `sum / N` would round one ulp low.
///
/// Returns `(0.0, 0.0)` for an empty slice.
#[inline]
pub fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let len = values.len() as f64;
    // Summed relative to the minimum so the mean never rounds below it.
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = min + values.iter().map(|&v| v - min).sum::<f64>() / len;
    let variance = values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / len;

    (mean, variance.sqrt())
}

/// Round half to even and narrow to `u8`, saturating outside 0..=255.
#[inline]
pub fn round_to_u8(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}
