//! Candidate scoring against the ID-1 card geometry.
//!
//! A candidate is a contour paired with its minimum-area bounding
//! rectangle. The score in [0, 1] combines how completely the contour
//! fills the rectangle (rectangularity) with how close the rectangle's
//! side ratio is to the physical card aspect. The area-ratio gate
//! disqualifies implausibly small or near-full-frame boxes outright, and
//! degenerate geometry always scores 0.

use crate::config::DetectorConfig;
use crate::geometry::{distance, polygon_area};
use crate::types::CARD_ASPECT;

/// Score one candidate; 0.0 means disqualified.
pub fn score_candidate(
    bbox: &[[f32; 2]; 4],
    contour: &[[f32; 2]],
    image_area: f32,
    config: &DetectorConfig,
) -> f32 {
    let rect_area = polygon_area(bbox);
    let contour_area = polygon_area(contour);
    if rect_area <= 0.0 || contour_area <= 0.0 {
        return 0.0;
    }

    let rectangularity = (contour_area / rect_area).clamp(0.0, 1.0);
    let width = distance(bbox[0], bbox[1]);
    let height = distance(bbox[1], bbox[2]);
    if width <= 0.0 || height <= 0.0 {
        return 0.0;
    }

    let aspect = width.max(height) / width.min(height);
    let aspect_score = 1.0 - ((aspect - CARD_ASPECT).abs() / CARD_ASPECT).min(1.0);

    let area_ratio = rect_area / image_area;
    if !(config.min_area_ratio..=config.max_area_ratio).contains(&area_ratio) {
        return 0.0;
    }

    rectangularity * config.rectangularity_weight + aspect_score * config.aspect_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Axis-aligned box with the exact card aspect, 160 px wide.
    fn card_box(width: f32) -> [[f32; 2]; 4] {
        let height = width / CARD_ASPECT;
        [
            [0.0, 0.0],
            [width, 0.0],
            [width, height],
            [0.0, height],
        ]
    }

    fn box_area(b: &[[f32; 2]; 4]) -> f32 {
        polygon_area(b)
    }

    #[test]
    fn perfect_card_scores_the_weight_sum() {
        let config = DetectorConfig::default();
        let bbox = card_box(160.0);
        let contour: Vec<[f32; 2]> = bbox.to_vec();
        let image_area = box_area(&bbox) / 0.3;
        let score = score_candidate(&bbox, &contour, image_area, &config);
        let expected = config.rectangularity_weight + config.aspect_weight;
        assert!((score - expected).abs() < 1e-4, "score {score}");
    }

    #[test]
    fn score_decreases_as_aspect_deviates() {
        let config = DetectorConfig::default();
        let mut last = f32::MAX;
        for stretch in [1.0, 1.2, 1.5, 1.9] {
            let width = 160.0;
            let height = width / CARD_ASPECT * stretch;
            let bbox = [
                [0.0, 0.0],
                [width, 0.0],
                [width, height],
                [0.0, height],
            ];
            let contour: Vec<[f32; 2]> = bbox.to_vec();
            let image_area = polygon_area(&bbox) / 0.3;
            let score = score_candidate(&bbox, &contour, image_area, &config);
            assert!(score < last, "stretch {stretch}: {score} !< {last}");
            last = score;
        }
    }

    #[test]
    fn area_ratio_gate_is_inclusive_at_both_bounds() {
        let config = DetectorConfig::default();
        let bbox = card_box(160.0);
        let contour: Vec<[f32; 2]> = bbox.to_vec();
        let rect_area = box_area(&bbox);

        // Exactly at the bounds: accepted.
        let at_min = score_candidate(&bbox, &contour, rect_area / config.min_area_ratio, &config);
        let at_max = score_candidate(&bbox, &contour, rect_area / config.max_area_ratio, &config);
        assert!(at_min > 0.0);
        assert!(at_max > 0.0);

        // Just outside: rejected.
        let below_min = score_candidate(
            &bbox,
            &contour,
            rect_area / (config.min_area_ratio * 0.999),
            &config,
        );
        let above_max = score_candidate(
            &bbox,
            &contour,
            rect_area / (config.max_area_ratio * 1.001),
            &config,
        );
        assert_eq!(below_min, 0.0);
        assert_eq!(above_max, 0.0);
    }

    #[test]
    fn degenerate_geometry_scores_zero() {
        let config = DetectorConfig::default();
        let flat = [[0.0, 0.0], [10.0, 0.0], [20.0, 0.0], [30.0, 0.0]];
        let contour = vec![[0.0, 0.0], [10.0, 0.0]];
        assert_eq!(score_candidate(&flat, &contour, 1000.0, &config), 0.0);
    }

    #[test]
    fn ragged_contours_score_below_clean_ones() {
        let config = DetectorConfig::default();
        let bbox = card_box(160.0);
        let image_area = box_area(&bbox) / 0.3;
        let clean: Vec<[f32; 2]> = bbox.to_vec();
        // A triangle filling half the box.
        let ragged = vec![bbox[0], bbox[1], bbox[2]];
        let clean_score = score_candidate(&bbox, &clean, image_area, &config);
        let ragged_score = score_candidate(&bbox, &ragged, image_area, &config);
        assert!(ragged_score > 0.0);
        assert!(ragged_score < clean_score);
    }
}
