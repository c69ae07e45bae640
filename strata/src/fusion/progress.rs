//! Progress reporting for loading and fusion.

use common::SharedFn;
use strum_macros::Display;

/// Progress information for a long-running stage.
#[derive(Debug, Clone)]
pub struct FusionProgress {
    /// Completed steps so far.
    pub current: usize,
    /// Total number of steps in this stage.
    pub total: usize,
    /// Stage being reported.
    pub stage: FusionStage,
}

/// Stage of the fusion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FusionStage {
    /// Decoding layer images.
    Loading,
    /// Building the median reference image.
    Reference,
    /// Per-pixel classification and averaging.
    Fusing,
}

/// Callback type for progress reporting.
pub type ProgressCallback = SharedFn<dyn Fn(FusionProgress) + Send + Sync>;

/// Report progress using the callback if set.
pub fn report_progress(
    callback: &ProgressCallback,
    current: usize,
    total: usize,
    stage: FusionStage,
) {
    if let Some(f) = callback.as_ref() {
        f(FusionProgress {
            current,
            total,
            stage,
        });
    }
}
