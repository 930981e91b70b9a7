//! Scoring: apply a taxonomy, aggregate, grade and emit issues.

pub mod calibration;
pub mod report;
pub mod scorer;
pub mod taxonomy;

pub use calibration::CalibrationTable;
pub use report::{CategorySummary, Issue, Report, ScoreItem, Severity};
pub use scorer::Scorer;
pub use taxonomy::{Taxonomy, TaxonomyKind};
