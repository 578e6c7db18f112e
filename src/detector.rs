//! Detector orchestration: pipeline, candidate scoring, and result
//! assembly.
//!
//! One call is one pure, self-contained computation: the pipeline runs over
//! a private working copy, every surviving contour is scored, and the
//! single best candidate (strict improvement only, so the earliest-traced
//! contour wins ties) is rescaled into original-image coordinates.
//! "No card" is a normal outcome, reported as `None`.

use log::debug;
use rayon::prelude::*;
use std::time::Instant;

use crate::config::DetectorConfig;
use crate::diagnostics::{InputDescriptor, PipelineTrace, TimingBreakdown};
use crate::geometry::{approx_polygon, distance, min_area_rect, order_clockwise, polygon_perimeter};
use crate::image::RgbU8;
use crate::pipeline;
use crate::scoring::score_candidate;
use crate::types::{
    CardDetection, DetectionMeta, ImageSize, ScaleEstimate, CARD_LONG_MM, CARD_SHORT_MM,
};

/// Detects a single ID-1 card in a decoded RGB image.
///
/// The detector holds only its configuration; calls share no state, so one
/// instance may serve concurrent detections on distinct images.
pub struct CardDetector {
    config: DetectorConfig,
}

impl CardDetector {
    /// Create a detector with the supplied configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run detection, discarding intermediate buffers.
    pub fn detect(&self, image: &RgbU8<'_>) -> Option<CardDetection> {
        self.run(image, false).0
    }

    /// Run detection and keep the full pipeline trace, including the
    /// intermediate stage buffers for diagnostics rendering.
    pub fn detect_with_trace(&self, image: &RgbU8<'_>) -> (Option<CardDetection>, PipelineTrace) {
        self.run(image, true)
    }

    fn run(&self, image: &RgbU8<'_>, capture: bool) -> (Option<CardDetection>, PipelineTrace) {
        let total_start = Instant::now();
        let output = pipeline::run(image, &self.config, capture);
        let image_area = (output.resized_width * output.resized_height) as f32;

        let scoring_start = Instant::now();
        let epsilon_ratio = self.config.approx_epsilon_ratio;
        let scored: Vec<(usize, f32, [[f32; 2]; 4])> = output
            .contours
            .par_iter()
            .enumerate()
            .filter_map(|(index, contour)| {
                let perimeter = polygon_perimeter(&contour.points);
                let approx = approx_polygon(&contour.points, epsilon_ratio * perimeter);
                if approx.len() < 4 {
                    return None;
                }
                let bbox = min_area_rect(&contour.points);
                let score = score_candidate(&bbox, &contour.points, image_area, &self.config);
                Some((index, score, bbox))
            })
            .collect();
        let scoring_ms = scoring_start.elapsed().as_secs_f64() * 1000.0;

        // Strict improvement only; equal scores keep the earliest-traced
        // contour, so the parallel scan reproduces the serial scan exactly.
        let mut best: Option<(usize, f32, [[f32; 2]; 4])> = None;
        for &(index, score, bbox) in &scored {
            let better = match best {
                None => score > 0.0,
                Some((best_index, best_score, _)) => {
                    score > best_score || (score == best_score && index < best_index)
                }
            };
            if better {
                best = Some((index, score, bbox));
            }
        }
        debug!(
            "{} contours, {} candidates, best score {:.3}",
            output.contours.len(),
            scored.len(),
            best.map_or(0.0, |(_, s, _)| s)
        );

        let mut timings = TimingBreakdown {
            total_ms: 0.0,
            stages: output.timings,
        };
        timings.push("scoring", scoring_ms);

        let mut trace = PipelineTrace {
            input: InputDescriptor {
                width: image.w,
                height: image.h,
            },
            scale_factor: output.scale_factor,
            timings,
            contours_found: output.contours.len(),
            candidates_scored: scored.len(),
            best_score: best.map_or(0.0, |(_, s, _)| s),
            stages: output.stages,
            contours: output.contours,
        };

        let Some((_, best_score, best_bbox)) = best else {
            trace.timings.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
            return (None, trace);
        };

        // Back to original-image coordinates.
        let mut bbox = order_clockwise(best_bbox);
        for corner in &mut bbox {
            corner[0] /= output.scale_factor;
            corner[1] /= output.scale_factor;
        }

        let scale = scale_from_bbox(&bbox);
        let elapsed = total_start.elapsed();
        trace.timings.total_ms = elapsed.as_secs_f64() * 1000.0;

        let detection = CardDetection {
            bbox,
            confidence: best_score.min(1.0),
            scale,
            meta: DetectionMeta {
                image_size: ImageSize {
                    width: image.w as u32,
                    height: image.h as u32,
                },
                processing_time_sec: elapsed.as_secs_f64(),
                scale_factor: output.scale_factor,
                params: self.config.echo(),
            },
        };
        (Some(detection), trace)
    }
}

/// Convenience wrapper for one-off detections.
pub fn detect_card(image: &RgbU8<'_>, config: &DetectorConfig) -> Option<CardDetection> {
    CardDetector::new(config.clone()).detect(image)
}

/// Project the box sides onto the physical card dimensions and average the
/// two independent px/mm estimates.
fn scale_from_bbox(bbox: &[[f32; 2]; 4]) -> ScaleEstimate {
    let width = distance(bbox[0], bbox[1]);
    let height = distance(bbox[1], bbox[2]);
    let long_px = width.max(height);
    let short_px = width.min(height);

    let px_per_mm = (long_px / CARD_LONG_MM + short_px / CARD_SHORT_MM) / 2.0;
    let mm_per_px = if px_per_mm > 0.0 { 1.0 / px_per_mm } else { 0.0 };
    ScaleEstimate {
        px_per_mm,
        mm_per_px,
    }
}
