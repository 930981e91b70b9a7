//! Structural feature extraction from raw page markup.
//!
//! Extraction sits behind the `FeatureExtractor` trait so a real document
//! parser can replace the pattern matcher without touching rules or scoring.

pub mod features;
pub mod patterns;

pub use features::{PageFeatures, StructuralFeatures};
pub use patterns::PatternExtractor;

/// Reduce markup to a fixed-shape feature record.
///
/// Implementations must never fail: anomalous markup degrades to zero or
/// neutral values.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, markup: &str, url: &str) -> StructuralFeatures;
}
