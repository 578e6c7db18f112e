//! Execution trace exposed alongside detection results.
//!
//! The trace carries per-stage timings and counters for every run, and the
//! intermediate image buffers when requested. The debug-image generator
//! consumes those buffers directly so diagnostics never re-run the
//! pipeline.

use serde::{Deserialize, Serialize};

use crate::image::{ImageF32, Mask, RgbBuffer};
use crate::pipeline::Contour;

/// Timing entry for a single pipeline stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for a detection run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }
}

/// Input image dimensions as seen by the detector.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}

/// Intermediate buffers of one pipeline run, in stage order.
#[derive(Clone, Debug, Default)]
pub struct StageBuffers {
    pub resized: RgbBuffer,
    pub gray: ImageF32,
    pub blurred: ImageF32,
    pub edges: Mask,
    pub dilated: Mask,
    pub closed: Mask,
}

/// End-to-end trace describing one detection run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    /// Downscale factor applied by the pipeline (≤1.0).
    pub scale_factor: f32,
    pub timings: TimingBreakdown,
    pub contours_found: usize,
    /// Contours that passed the vertex gate and were scored.
    pub candidates_scored: usize,
    pub best_score: f32,
    #[serde(skip)]
    pub stages: Option<StageBuffers>,
    #[serde(skip)]
    pub contours: Vec<Contour>,
}
