mod common;

use common::synthetic_image::{card_rect_size, card_scene, flat_rgb};
use card_detector::image::RgbU8;
use card_detector::{CardDetector, DetectorConfig, CARD_LONG_MM, CARD_SHORT_MM};

fn view(data: &[u8], w: usize, h: usize) -> RgbU8<'_> {
    RgbU8 {
        w,
        h,
        stride: 3 * w,
        data,
    }
}

/// Expected rectangle corners in TL, TR, BR, BL order.
fn rect_corners(x0: usize, y0: usize, w: usize, h: usize) -> [[f32; 2]; 4] {
    let (x0, y0, x1, y1) = (
        x0 as f32,
        y0 as f32,
        (x0 + w - 1) as f32,
        (y0 + h - 1) as f32,
    );
    [[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
}

fn assert_bbox_close(bbox: &[[f32; 2]; 4], expected: &[[f32; 2]; 4], tolerance: f32) {
    for corner in expected {
        let nearest = bbox
            .iter()
            .map(|p| ((p[0] - corner[0]).powi(2) + (p[1] - corner[1]).powi(2)).sqrt())
            .fold(f32::INFINITY, f32::min);
        assert!(
            nearest <= tolerance,
            "corner {corner:?} is {nearest:.1}px from the detected box {bbox:?}"
        );
    }
}

#[test]
fn uniform_image_yields_absence() {
    let data = flat_rgb(320, 240, 128);
    let detector = CardDetector::new(DetectorConfig::default());
    assert!(detector.detect(&view(&data, 320, 240)).is_none());
}

#[test]
fn synthetic_card_is_detected_with_high_confidence() {
    let (rect_w, rect_h) = card_rect_size(314);
    let data = card_scene(640, 480, 160, 140, rect_w, rect_h);
    let detector = CardDetector::new(DetectorConfig::default());
    let result = detector
        .detect(&view(&data, 640, 480))
        .expect("card should be found");

    assert!(
        result.confidence > 0.9,
        "confidence {:.3} below expectation for a clean rectangle",
        result.confidence
    );
    assert!(result.confidence <= 1.0);
    assert_eq!(result.meta.scale_factor, 1.0);
    assert_eq!(result.meta.image_size.width, 640);
    assert_eq!(result.meta.image_size.height, 480);

    let expected = rect_corners(160, 140, rect_w, rect_h);
    assert_bbox_close(&result.bbox, &expected, 5.0);
}

#[test]
fn bbox_points_are_ordered_clockwise() {
    let (rect_w, rect_h) = card_rect_size(314);
    let data = card_scene(640, 480, 160, 140, rect_w, rect_h);
    let detector = CardDetector::new(DetectorConfig::default());
    let result = detector
        .detect(&view(&data, 640, 480))
        .expect("card should be found");

    let mut signed = 0.0;
    for i in 0..4 {
        let a = result.bbox[i];
        let b = result.bbox[(i + 1) % 4];
        signed += a[0] * b[1] - b[0] * a[1];
    }
    assert!(signed >= 0.0, "signed area {signed} indicates flipped order");
}

#[test]
fn oversized_input_reports_coordinates_in_original_space() {
    let (rect_w, rect_h) = card_rect_size(900);
    let data = card_scene(2400, 1800, 600, 500, rect_w, rect_h);
    let detector = CardDetector::new(DetectorConfig::default());
    let result = detector
        .detect(&view(&data, 2400, 1800))
        .expect("card should be found");

    assert_eq!(result.meta.scale_factor, 0.5);
    let expected = rect_corners(600, 500, rect_w, rect_h);
    assert_bbox_close(&result.bbox, &expected, 8.0);
}

#[test]
fn scale_estimate_follows_the_side_projections() {
    let (rect_w, rect_h) = card_rect_size(314);
    let data = card_scene(640, 480, 160, 140, rect_w, rect_h);
    let detector = CardDetector::new(DetectorConfig::default());
    let result = detector
        .detect(&view(&data, 640, 480))
        .expect("card should be found");

    let side_a = side_length(result.bbox[0], result.bbox[1]);
    let side_b = side_length(result.bbox[1], result.bbox[2]);
    let long = side_a.max(side_b);
    let short = side_a.min(side_b);
    let expected = (long / CARD_LONG_MM + short / CARD_SHORT_MM) / 2.0;
    assert!((result.scale.px_per_mm - expected).abs() < 1e-4);
    assert!((result.scale.mm_per_px - 1.0 / expected).abs() < 1e-4);
}

#[test]
fn detection_is_idempotent() {
    let (rect_w, rect_h) = card_rect_size(314);
    let data = card_scene(640, 480, 160, 140, rect_w, rect_h);
    let detector = CardDetector::new(DetectorConfig::default());
    let img = view(&data, 640, 480);

    let first = detector.detect(&img).expect("card should be found");
    let second = detector.detect(&img).expect("card should be found");

    assert_eq!(first.bbox, second.bbox);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.scale, second.scale);
}

#[test]
fn trace_reports_stage_buffers_and_counters() {
    let (rect_w, rect_h) = card_rect_size(314);
    let buffer = card_detector::image::RgbBuffer {
        w: 640,
        h: 480,
        data: card_scene(640, 480, 160, 140, rect_w, rect_h),
    };
    let detector = CardDetector::new(DetectorConfig::default());
    let (result, trace) = detector.detect_with_trace(&buffer.as_view());

    assert!(result.is_some());
    assert!(trace.contours_found >= 1);
    assert!(trace.candidates_scored >= 1);
    assert!(trace.best_score > 0.0);
    let stages = trace.stages.expect("stage buffers requested");
    assert_eq!((stages.resized.w, stages.resized.h), (640, 480));
    assert_eq!((stages.closed.w, stages.closed.h), (640, 480));
    assert!(stages.edges.count_on() > 0);
    assert!(trace.timings.total_ms >= 0.0);
    assert_eq!(
        trace
            .timings
            .stages
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>(),
        ["resize", "grayscale", "blur", "edges", "close", "contours", "scoring"]
    );
}

#[test]
fn inverted_area_gates_degrade_to_absence() {
    let (rect_w, rect_h) = card_rect_size(314);
    let data = card_scene(640, 480, 160, 140, rect_w, rect_h);
    let config = DetectorConfig {
        min_area_ratio: 0.9,
        max_area_ratio: 0.1,
        ..Default::default()
    };
    let detector = CardDetector::new(config);
    assert!(detector.detect(&view(&data, 640, 480)).is_none());
}

fn side_length(a: [f32; 2], b: [f32; 2]) -> f32 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}
