//! Nearest-neighbour score prediction from a reference corpus.

use crate::extraction::StructuralFeatures;
use crate::prediction::corpus::ReferenceCorpus;
use crate::prediction::similarity::similarity;
use crate::rules::{MAX_SCORE, MIN_SCORE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Neighbours kept for the weighted average.
pub const NEIGHBOR_COUNT: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictError {
    #[error("no reference data: the reference corpus is empty")]
    NoReferenceData,
}

/// Source of per-principle variance.
pub trait Variance {
    fn sample(&mut self, principle: &str) -> f64;
}

/// Deterministic: no variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVariance;

impl Variance for NoVariance {
    fn sample(&mut self, _principle: &str) -> f64 {
        0.0
    }
}

/// Bounded uniform jitter from a seeded generator; same seed, same output.
pub struct SeededJitter {
    rng: StdRng,
    amplitude: f64,
}

impl SeededJitter {
    pub const DEFAULT_AMPLITUDE: f64 = 0.3;

    pub fn new(seed: u64) -> Self {
        Self::with_amplitude(seed, Self::DEFAULT_AMPLITUDE)
    }

    pub fn with_amplitude(seed: u64, amplitude: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            amplitude: amplitude.abs(),
        }
    }
}

impl Variance for SeededJitter {
    fn sample(&mut self, _principle: &str) -> f64 {
        if self.amplitude == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-self.amplitude..=self.amplitude)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Neighbor {
    pub name: String,
    pub similarity: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipleScore {
    pub id: &'static str,
    pub name: &'static str,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub score: f64,
    /// Similarity-weighted standard deviation of the neighbours' scores.
    pub spread: f64,
    pub neighbors: Vec<Neighbor>,
    pub principles: Vec<PrincipleScore>,
}

struct Principle {
    id: &'static str,
    name: &'static str,
    bonus: fn(&StructuralFeatures) -> f64,
}

const PRINCIPLES: [Principle; 10] = [
    Principle {
        id: "N1",
        name: "Visibility of system status",
        bonus: |f: &StructuralFeatures| if f.navigation.breadcrumb_exists { 0.3 } else { 0.0 },
    },
    Principle {
        id: "N2",
        name: "Match between system and the real world",
        bonus: |f: &StructuralFeatures| if f.accessibility.lang_attribute { 0.2 } else { 0.0 },
    },
    Principle {
        id: "N3",
        name: "User control and freedom",
        bonus: |f: &StructuralFeatures| if f.navigation.link_count >= 20 { 0.2 } else { 0.0 },
    },
    Principle {
        id: "N4",
        name: "Consistency and standards",
        bonus: |f: &StructuralFeatures| if f.accessibility.alt_text_ratio >= 0.9 { 0.2 } else { 0.0 },
    },
    Principle {
        id: "N5",
        name: "Error prevention",
        bonus: |f: &StructuralFeatures| if f.forms.validation_exists { 0.3 } else { 0.0 },
    },
    Principle {
        id: "N6",
        name: "Recognition rather than recall",
        bonus: |f: &StructuralFeatures| if f.visuals.icon_count > 3 { 0.2 } else { 0.0 },
    },
    Principle {
        id: "N7",
        name: "Flexibility and efficiency of use",
        bonus: |f: &StructuralFeatures| if f.navigation.search_exists { 0.3 } else { 0.0 },
    },
    Principle {
        id: "N8",
        name: "Aesthetic and minimalist design",
        bonus: |f: &StructuralFeatures| if f.visuals.image_count <= 30 { 0.2 } else { 0.0 },
    },
    Principle {
        id: "N9",
        name: "Help users recover from errors",
        bonus: |f: &StructuralFeatures| {
            if f.forms.form_count > 0 && f.forms.label_ratio >= 0.8 {
                0.2
            } else {
                0.0
            }
        },
    },
    Principle {
        id: "N10",
        name: "Help and documentation",
        bonus: |f: &StructuralFeatures| if f.markup.has_help_link { 0.2 } else { 0.0 },
    },
];

/// Predicts scores for a new site from its most similar reference sites.
pub struct Predictor<'c> {
    corpus: &'c ReferenceCorpus,
}

impl<'c> Predictor<'c> {
    pub fn new(corpus: &'c ReferenceCorpus) -> Self {
        Self { corpus }
    }

    /// Top neighbours by similarity; ties keep corpus order.
    pub fn neighbors(&self, features: &StructuralFeatures) -> Vec<Neighbor> {
        let mut scored: Vec<Neighbor> = self
            .corpus
            .sites()
            .iter()
            .map(|site| Neighbor {
                name: site.name.clone(),
                similarity: similarity(features, &site.features).total,
                score: site.score,
            })
            .collect();
        // sort_by is stable
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(NEIGHBOR_COUNT);
        scored
    }

    pub fn predict(&self, features: &StructuralFeatures) -> Result<Prediction, PredictError> {
        self.predict_with(features, &mut NoVariance)
    }

    pub fn predict_with(
        &self,
        features: &StructuralFeatures,
        variance: &mut dyn Variance,
    ) -> Result<Prediction, PredictError> {
        if self.corpus.is_empty() {
            return Err(PredictError::NoReferenceData);
        }

        let neighbors = self.neighbors(features);
        let total_similarity: f64 = neighbors.iter().map(|n| n.similarity).sum();
        let weights: Vec<f64> = if total_similarity > 0.0 {
            neighbors.iter().map(|n| n.similarity / total_similarity).collect()
        } else {
            // Nothing in common with any neighbour: plain mean
            vec![1.0 / neighbors.len() as f64; neighbors.len()]
        };

        let score: f64 = neighbors.iter().zip(&weights).map(|(n, w)| w * n.score).sum();
        let spread = neighbors
            .iter()
            .zip(&weights)
            .map(|(n, w)| w * (n.score - score).powi(2))
            .sum::<f64>()
            .sqrt();

        let principles = PRINCIPLES
            .iter()
            .map(|p| {
                let raw = score + (p.bonus)(features) + variance.sample(p.id);
                PrincipleScore {
                    id: p.id,
                    name: p.name,
                    score: raw.clamp(MIN_SCORE, MAX_SCORE),
                }
            })
            .collect();

        debug!(
            neighbors = neighbors.len(),
            score,
            spread,
            "predicted score from reference corpus"
        );

        Ok(Prediction {
            score,
            spread,
            neighbors,
            principles,
        })
    }
}
