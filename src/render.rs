//! Annotation overlay and debug-stage rendering.
//!
//! Pure buffer-to-buffer drawing; persisting the results is the caller's
//! job. Text rendering needs a font: [`load_system_font`] probes common
//! locations, and when none is available the label is simply skipped.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};

use crate::config::DetectorConfig;
use crate::detector::CardDetector;
use crate::image::io::{gray_to_image, mask_to_image, rgb_buffer_to_image, view_rgb};
use crate::pipeline::Contour;
use crate::types::CardDetection;

/// Annotation color for detections.
const DETECTION_COLOR: Rgb<u8> = Rgb([0, 200, 0]);
/// Annotation color for raw contours in debug output.
const CONTOUR_COLOR: Rgb<u8> = Rgb([255, 128, 0]);
const LABEL_POSITION: (i32, i32) = (10, 30);
const LABEL_SCALE: f32 = 24.0;

/// Try to load a usable TrueType font from common system locations.
pub fn load_system_font() -> Option<FontVec> {
    let font_paths = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    font_paths.iter().find_map(|path| {
        let data = std::fs::read(path).ok()?;
        FontVec::try_from_vec(data).ok()
    })
}

/// Draw the detection quadrilateral and summary label onto a copy of
/// `image`.
pub fn draw_detection(
    image: &RgbImage,
    result: &CardDetection,
    font: Option<&FontVec>,
) -> RgbImage {
    let mut output = image.clone();
    draw_closed_polyline(&mut output, &result.bbox, DETECTION_COLOR, 2);
    if let Some(font) = font {
        let label = format!(
            "conf={:.2}, px/mm={:.2}",
            result.confidence, result.scale.px_per_mm
        );
        draw_text_mut(
            &mut output,
            DETECTION_COLOR,
            LABEL_POSITION.0,
            LABEL_POSITION.1,
            PxScale::from(LABEL_SCALE),
            font,
            &label,
        );
    }
    output
}

/// Ordered debug renderings of one pipeline run.
pub struct DebugArtifacts {
    /// `(name, image)` per stage; names are numbered so an alphabetical
    /// directory listing follows processing order.
    pub stages: Vec<(String, RgbImage)>,
    pub result: Option<CardDetection>,
    /// Downscale factor the pipeline applied, for the manifest.
    pub scale_factor: f32,
}

/// Render every pipeline stage for inspection, from a single pipeline run.
pub fn debug_artifacts(
    image: &RgbImage,
    config: &DetectorConfig,
    font: Option<&FontVec>,
) -> DebugArtifacts {
    let detector = CardDetector::new(config.clone());
    let (result, trace) = detector.detect_with_trace(&view_rgb(image));

    let mut outputs: Vec<(String, RgbImage)> = Vec::new();
    let stages = trace.stages.as_ref().expect("trace requested with stages");

    let resized = rgb_buffer_to_image(&stages.resized);
    outputs.push(("01_resized".into(), resized.clone()));
    outputs.push((
        "02_gray".into(),
        gray_image_to_rgb(gray_to_image(&stages.gray)),
    ));
    outputs.push((
        "03_blur".into(),
        gray_image_to_rgb(gray_to_image(&stages.blurred)),
    ));
    outputs.push((
        "04_edges_canny".into(),
        gray_image_to_rgb(mask_to_image(&stages.edges)),
    ));
    outputs.push((
        "05_edges_dilate".into(),
        gray_image_to_rgb(mask_to_image(&stages.dilated)),
    ));
    outputs.push((
        "06_edges_erode".into(),
        gray_image_to_rgb(mask_to_image(&stages.closed)),
    ));

    let mut contour_vis = resized.clone();
    for contour in &trace.contours {
        draw_contour(&mut contour_vis, contour);
    }
    outputs.push(("07_contours".into(), contour_vis));

    if let Some(result) = &result {
        outputs.push(("08_detection".into(), draw_detection(image, result, font)));

        // The winning box in resized-image coordinates.
        let mut best_vis = resized;
        let mut bbox = result.bbox;
        for corner in &mut bbox {
            corner[0] *= trace.scale_factor;
            corner[1] *= trace.scale_factor;
        }
        draw_closed_polyline(&mut best_vis, &bbox, DETECTION_COLOR, 2);
        outputs.push(("09_best_contour".into(), best_vis));
    }

    DebugArtifacts {
        stages: outputs,
        result,
        scale_factor: trace.scale_factor,
    }
}

/// Text manifest of the parameters a debug run used.
pub fn debug_manifest(config: &DetectorConfig, scale_factor: f32) -> String {
    format!(
        "scale_factor={}\nmax_side={}\nblur_kernel={}\ncanny_low={}\ncanny_high={}\n",
        scale_factor, config.max_side, config.blur_kernel, config.canny_low, config.canny_high
    )
}

fn gray_image_to_rgb(gray: image::GrayImage) -> RgbImage {
    image::DynamicImage::ImageLuma8(gray).into_rgb8()
}

fn draw_contour(canvas: &mut RgbImage, contour: &Contour) {
    let n = contour.points.len();
    if n == 1 {
        let [x, y] = contour.points[0];
        if x >= 0.0 && y >= 0.0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
            canvas.put_pixel(x as u32, y as u32, CONTOUR_COLOR);
        }
        return;
    }
    for i in 0..n {
        let a = contour.points[i];
        let b = contour.points[(i + 1) % n];
        draw_line_segment_mut(canvas, (a[0], a[1]), (b[0], b[1]), CONTOUR_COLOR);
    }
}

/// Closed polyline with a crude thickness achieved by offsetting 1px
/// towards each axis.
fn draw_closed_polyline(canvas: &mut RgbImage, corners: &[[f32; 2]; 4], color: Rgb<u8>, thickness: u32) {
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        for t in 0..thickness.max(1) {
            let o = t as f32;
            draw_line_segment_mut(canvas, (a[0] + o, a[1]), (b[0] + o, b[1]), color);
            draw_line_segment_mut(canvas, (a[0], a[1] + o), (b[0], b[1] + o), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DetectionMeta, ImageSize, ScaleEstimate};

    fn dummy_detection() -> CardDetection {
        CardDetection {
            bbox: [[10.0, 10.0], [50.0, 10.0], [50.0, 35.0], [10.0, 35.0]],
            confidence: 0.8,
            scale: ScaleEstimate {
                px_per_mm: 0.5,
                mm_per_px: 2.0,
            },
            meta: DetectionMeta {
                image_size: ImageSize {
                    width: 64,
                    height: 48,
                },
                processing_time_sec: 0.0,
                scale_factor: 1.0,
                params: DetectorConfig::default().echo(),
            },
        }
    }

    #[test]
    fn overlay_marks_the_box_and_leaves_the_input_untouched() {
        let image = RgbImage::from_pixel(64, 48, Rgb([20, 20, 20]));
        let annotated = draw_detection(&image, &dummy_detection(), None);
        assert_eq!(annotated.get_pixel(30, 10), &DETECTION_COLOR);
        assert_eq!(image.get_pixel(30, 10), &Rgb([20, 20, 20]));
    }

    #[test]
    fn manifest_lists_the_pipeline_parameters() {
        let manifest = debug_manifest(&DetectorConfig::default(), 0.5);
        assert!(manifest.contains("scale_factor=0.5"));
        assert!(manifest.contains("max_side=1200"));
        assert!(manifest.contains("canny_high=150"));
    }
}
