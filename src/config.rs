//! Detector configuration.
//!
//! One flat struct of numeric knobs controls the whole pipeline and the
//! candidate scoring. Defaults are tuned for handheld photos at common
//! resolutions; for a new camera setup, start with the Canny thresholds and
//! the area-ratio gates (the `--debug-dir` CLI workflow visualizes every
//! stage).
//!
//! Values are not range-checked. Out-of-range settings (a zero blur kernel,
//! inverted area bounds) degrade to "no detection" through the scoring
//! gates rather than erroring, which keeps deliberate out-of-range
//! exploration possible during tuning.

use serde::{Deserialize, Serialize};

/// Parameters controlling the image pipeline and candidate scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum processing side length in pixels. Larger inputs are
    /// downscaled uniformly so the longer side equals this value.
    pub max_side: u32,
    /// Side length of the square Gaussian blur kernel (odd, ≥1).
    pub blur_kernel: u32,
    /// Canny hysteresis low threshold on gradient magnitude.
    pub canny_low: f32,
    /// Canny hysteresis high threshold on gradient magnitude.
    pub canny_high: f32,
    /// Minimum fraction of the (resized) image area a candidate box may
    /// occupy.
    pub min_area_ratio: f32,
    /// Maximum fraction of the (resized) image area a candidate box may
    /// occupy.
    pub max_area_ratio: f32,
    /// Polygon approximation epsilon as a fraction of contour perimeter.
    pub approx_epsilon_ratio: f32,
    /// Weight of the rectangularity term in the candidate score.
    pub rectangularity_weight: f32,
    /// Weight of the aspect-ratio term in the candidate score.
    pub aspect_weight: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_side: 1200,
            blur_kernel: 5,
            canny_low: 50.0,
            canny_high: 150.0,
            min_area_ratio: 0.05,
            max_area_ratio: 0.95,
            approx_epsilon_ratio: 0.02,
            rectangularity_weight: 0.55,
            aspect_weight: 0.45,
        }
    }
}

impl DetectorConfig {
    /// Snapshot of the pipeline parameters echoed into result metadata.
    ///
    /// The scoring weights are configuration-only and deliberately absent
    /// from the wire format.
    pub fn echo(&self) -> ParamsEcho {
        ParamsEcho {
            max_side: self.max_side,
            blur_kernel: self.blur_kernel,
            canny_low: self.canny_low,
            canny_high: self.canny_high,
            min_area_ratio: self.min_area_ratio,
            max_area_ratio: self.max_area_ratio,
            approx_epsilon_ratio: self.approx_epsilon_ratio,
        }
    }
}

/// Pipeline parameters as echoed in [`DetectionMeta`](crate::types::DetectionMeta).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamsEcho {
    pub max_side: u32,
    pub blur_kernel: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub min_area_ratio: f32,
    pub max_area_ratio: f32,
    pub approx_epsilon_ratio: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_values() {
        let config = DetectorConfig::default();
        assert_eq!(config.max_side, 1200);
        assert_eq!(config.blur_kernel, 5);
        assert_eq!(config.canny_low, 50.0);
        assert_eq!(config.canny_high, 150.0);
        assert!(config.min_area_ratio < config.max_area_ratio);
        assert!((config.rectangularity_weight + config.aspect_weight - 1.0).abs() < 1e-6);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: DetectorConfig =
            serde_json::from_str(r#"{"max_side": 800, "canny_low": 30.0}"#).expect("parse");
        assert_eq!(config.max_side, 800);
        assert_eq!(config.canny_low, 30.0);
        assert_eq!(config.blur_kernel, DetectorConfig::default().blur_kernel);
    }
}
