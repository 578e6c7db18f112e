//! Result records shared across the crate, plus the physical card constants.

use serde::{Deserialize, Serialize};

use crate::config::ParamsEcho;

/// Long side of an ISO/IEC 7810 ID-1 card in millimetres.
pub const CARD_LONG_MM: f32 = 85.60;
/// Short side of an ISO/IEC 7810 ID-1 card in millimetres.
pub const CARD_SHORT_MM: f32 = 53.98;
/// Aspect ratio of an ID-1 card (≈1.586).
pub const CARD_ASPECT: f32 = CARD_LONG_MM / CARD_SHORT_MM;

/// Pixel-to-millimetre scale derived from the detected card size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleEstimate {
    pub px_per_mm: f32,
    /// Reciprocal of `px_per_mm`, or 0.0 when the estimate is non-positive.
    pub mm_per_px: f32,
}

/// Input image dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Run metadata attached to every detection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionMeta {
    pub image_size: ImageSize,
    pub processing_time_sec: f64,
    /// Downscale factor applied before processing (≤1.0; 1.0 = no resize).
    pub scale_factor: f32,
    pub params: ParamsEcho,
}

/// A successful card detection.
///
/// `bbox` holds the four corners of the minimum-area rectangle around the
/// winning contour, ordered clockwise by angle around their centroid and
/// expressed in original-image pixel coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardDetection {
    pub bbox: [[f32; 2]; 4],
    /// Best candidate score, clamped to [0, 1].
    pub confidence: f32,
    pub scale: ScaleEstimate,
    pub meta: DetectionMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;

    #[test]
    fn card_aspect_matches_id1_dimensions() {
        assert!((CARD_ASPECT - 1.5858).abs() < 1e-3);
    }

    #[test]
    fn detection_serializes_with_wire_field_names() {
        let detection = CardDetection {
            bbox: [[0.0, 0.0], [10.0, 0.0], [10.0, 6.0], [0.0, 6.0]],
            confidence: 0.9,
            scale: ScaleEstimate {
                px_per_mm: 2.0,
                mm_per_px: 0.5,
            },
            meta: DetectionMeta {
                image_size: ImageSize {
                    width: 640,
                    height: 480,
                },
                processing_time_sec: 0.01,
                scale_factor: 1.0,
                params: DetectorConfig::default().echo(),
            },
        };

        let value = serde_json::to_value(&detection).expect("serializable");
        assert!(value["scale"]["px_per_mm"].is_number());
        assert!(value["meta"]["processing_time_sec"].is_number());
        assert!(value["meta"]["params"]["approx_epsilon_ratio"].is_number());
        assert_eq!(value["bbox"].as_array().map(Vec::len), Some(4));
    }
}
