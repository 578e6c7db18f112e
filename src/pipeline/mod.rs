//! The deterministic image pipeline feeding the detector.
//!
//! Fixed stage order: keep-aspect resize, grayscale, Gaussian blur, Canny
//! edge extraction, morphological close (one dilate, one erode), external
//! contour tracing. The pipeline is a pure transform over a private copy of
//! the input; it never touches the caller's buffer or the file system.

pub mod blur;
pub mod canny;
pub mod contours;
pub mod morphology;
pub mod resize;

pub use contours::{find_external_contours, Contour};

use crate::config::DetectorConfig;
use crate::diagnostics::{StageBuffers, StageTiming};
use crate::image::RgbU8;
use log::debug;
use std::time::Instant;

/// Everything the detector needs from one pipeline pass.
pub struct PipelineOutput {
    pub contours: Vec<Contour>,
    /// Downscale factor applied before processing (≤1.0).
    pub scale_factor: f32,
    pub resized_width: usize,
    pub resized_height: usize,
    pub timings: Vec<StageTiming>,
    /// Intermediate buffers, retained only when requested.
    pub stages: Option<StageBuffers>,
}

/// Run the full pipeline over `image`.
///
/// With `capture_stages` the intermediate buffers are kept for diagnostics;
/// otherwise they are dropped as soon as the next stage has consumed them.
pub fn run(image: &RgbU8<'_>, config: &DetectorConfig, capture_stages: bool) -> PipelineOutput {
    let mut timings = Vec::with_capacity(6);
    let mut timed = |label: &str, start: Instant| {
        timings.push(StageTiming::new(label, start.elapsed().as_secs_f64() * 1000.0));
    };

    let start = Instant::now();
    let (resized, scale_factor) = resize::resize_keep_aspect(image, config.max_side);
    timed("resize", start);

    let start = Instant::now();
    let gray = resize::to_grayscale(&resized);
    timed("grayscale", start);

    let start = Instant::now();
    let blurred = blur::gaussian_blur(&gray, config.blur_kernel);
    timed("blur", start);

    let start = Instant::now();
    let edges = canny::detect_edges(&blurred, config.canny_low, config.canny_high);
    timed("edges", start);
    debug!(
        "edge map {}x{}: {} pixels set",
        edges.w,
        edges.h,
        edges.count_on()
    );

    let start = Instant::now();
    let dilated = morphology::dilate(&edges);
    let closed = morphology::erode(&dilated);
    timed("close", start);

    let start = Instant::now();
    let contours = find_external_contours(&closed);
    timed("contours", start);
    debug!("{} external contours traced", contours.len());

    let (resized_width, resized_height) = (resized.w, resized.h);
    let stages = capture_stages.then(|| StageBuffers {
        resized,
        gray,
        blurred,
        edges,
        dilated,
        closed,
    });

    PipelineOutput {
        contours,
        scale_factor,
        resized_width,
        resized_height,
        timings,
        stages,
    }
}
