#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod image;
pub mod render;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
pub mod geometry;
pub mod pipeline;
pub mod scoring;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::config::DetectorConfig;
pub use crate::detector::{detect_card, CardDetector};
pub use crate::types::{CardDetection, ScaleEstimate, CARD_ASPECT, CARD_LONG_MM, CARD_SHORT_MM};

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::{PipelineTrace, TimingBreakdown};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use card_detector::prelude::*;
///
/// # fn main() {
/// let (w, h) = (640usize, 480usize);
/// let pixels = vec![0u8; w * h * 3];
/// let img = RgbU8 { w, h, stride: 3 * w, data: &pixels };
///
/// let detector = CardDetector::new(DetectorConfig::default());
/// match detector.detect(&img) {
///     Some(card) => println!("confidence {:.2}", card.confidence),
///     None => println!("no card"),
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::image::RgbU8;
    pub use crate::{detect_card, CardDetection, CardDetector, DetectorConfig};
}
