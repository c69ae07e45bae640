//! Adaptive per-pixel noise classification.
//!
//! The threshold is derived from the pixel's own distance samples:
//! `threshold = mean + k * std_dev` (population sigma). With the default `k = 0`
//! the threshold is the mean distance, so the closest layer always survives and
//! roughly the upper half of a smooth distribution is rejected.

use crate::math;

/// Mean and population standard deviation of one pixel's distance samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelStatistics {
    pub mean: f64,
    pub std_dev: f64,
}

/// Marks each layer's sample valid (`true`) or noise (`false`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseClassifier {
    threshold_sigma: f64,
}

impl Default for NoiseClassifier {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl NoiseClassifier {
    pub fn new(threshold_sigma: f32) -> Self {
        Self {
            threshold_sigma: threshold_sigma as f64,
        }
    }

    /// Cutoff distance for a pixel with the given statistics.
    #[inline]
    pub fn threshold(&self, stats: PixelStatistics) -> f64 {
        stats.mean + self.threshold_sigma * stats.std_dev
    }

    /// Classify `distances`, writing one flag per layer into `valid`.
    ///
    /// A sample is valid iff its distance is at most the threshold.
    pub fn classify(&self, distances: &[f64], valid: &mut [bool]) -> PixelStatistics {
        debug_assert_eq!(distances.len(), valid.len());

        let (mean, std_dev) = math::mean_and_std_dev(distances);
        let stats = PixelStatistics { mean, std_dev };
        let threshold = self.threshold(stats);

        for (flag, &d) in valid.iter_mut().zip(distances) {
            *flag = d <= threshold;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(k: f32, distances: &[f64]) -> (Vec<bool>, PixelStatistics) {
        let mut valid = vec![false; distances.len()];
        let stats = NoiseClassifier::new(k).classify(distances, &mut valid);
        (valid, stats)
    }

    #[test]
    fn test_all_zero_distances_all_valid() {
        let (valid, stats) = classify(0.0, &[0.0; 5]);
        assert!(valid.iter().all(|&v| v));
        assert_eq!(stats, PixelStatistics::default());
    }

    #[test]
    fn test_threshold_is_mean_for_zero_sigma() {
        let (valid, stats) = classify(0.0, &[1.0, 2.0, 3.0, 10.0]);
        assert!((stats.mean - 4.0).abs() < 1e-12);
        assert_eq!(valid, vec![true, true, true, false]);
    }

    #[test]
    fn test_value_equal_to_threshold_is_valid() {
        let (valid, _) = classify(0.0, &[2.0, 4.0, 6.0]);
        assert_eq!(valid, vec![true, true, false]);
    }

    #[test]
    fn test_population_std_dev_drives_positive_sigma() {
        // mean = 5, population sigma = 2.
        let distances = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let (valid, stats) = classify(1.0, &distances);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(valid, vec![true, true, true, true, true, true, true, false]);
    }

    #[test]
    fn test_negative_sigma_can_reject_everything() {
        let (valid, _) = classify(-5.0, &[0.0, 10.0]);
        assert!(valid.iter().all(|&v| !v));
    }

    #[test]
    fn test_equal_distances_all_valid() {
        for len in 2..=32 {
            for squared in 1..200u32 {
                let distances = vec![(squared as f64).sqrt(); len];
                let (valid, _) = classify(0.0, &distances);
                assert!(valid.iter().all(|&v| v), "len {len}, d^2 {squared}");
            }
        }
    }

    #[test]
    fn test_minimum_retained_for_generated_distances() {
        // Fixed-seed LCG over integral squared distances, as produced by 8-bit layers.
        let mut state = 0x2545_f491_4f6c_dd1du64;
        let mut next = move || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) as u32
        };

        for sigma in [0.0f32, 0.5, 1.0, 3.0] {
            for _ in 0..2_000 {
                let len = 2 + (next() % 31) as usize;
                let spread = 1 + next() % 400;
                let base = next() % 195_075;
                let distances: Vec<f64> = (0..len)
                    .map(|_| ((base + next() % spread).min(195_075) as f64).sqrt())
                    .collect();
                let (valid, _) = classify(sigma, &distances);
                assert!(valid.iter().any(|&v| v), "no valid sample in {distances:?}");
            }
        }
    }

    #[test]
    fn test_minimum_distance_always_retained() {
        let cases: [&[f64]; 6] = [
            &[0.0, 441.67],
            &[5.0, 5.1, 5.2, 300.0],
            &[100.0, 3.0, 250.0, 99.0, 17.3],
            &[441.0, 440.0, 439.0],
            &[1e-3, 2e-3, 7.0, 7.0, 7.0, 7.0, 7.0],
            &[12.5, 12.5, 12.5, 12.5, 0.25],
        ];
        for distances in cases {
            let (valid, _) = classify(0.0, distances);
            let min_idx = distances
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap();
            assert!(valid[min_idx], "minimum rejected for {distances:?}");
        }
    }
}
