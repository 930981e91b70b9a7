//! Similarity-based score prediction from previously evaluated sites.

pub mod corpus;
pub mod predictor;
pub mod similarity;

pub use corpus::{ReferenceCorpus, ReferenceSite};
pub use predictor::{NoVariance, PredictError, Prediction, Predictor, SeededJitter, Variance};
pub use similarity::{similarity, Similarity};
