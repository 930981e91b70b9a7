//! Rule engine: turns a feature record into a calibrated item score.
//!
//! Every taxonomy item is an `ItemSpec` whose `ItemRule` is one of:
//! a fixed heuristic (base + adjustment function), a pass/fail check,
//! a data-driven condition chain, or "not applicable". Scores live on a
//! 7-level scale from 2.0 to 5.0 in steps of 0.5; `NOT_APPLICABLE` (-1)
//! marks items that cannot be judged from markup.

pub mod chain;
pub mod config;

use crate::extraction::StructuralFeatures;
pub use chain::{ChainRule, Condition, Operator};
pub use config::{RuleConfig, RuleStore};

/// Sentinel score for items that cannot be judged automatically.
pub const NOT_APPLICABLE: f64 = -1.0;
pub const MIN_SCORE: f64 = 2.0;
pub const MAX_SCORE: f64 = 5.0;
/// Scores at or above this are compliant in every taxonomy.
pub const COMPLIANT_THRESHOLD: f64 = 4.5;

/// Clamp to [2, 5] and round to the nearest 0.5.
pub fn calibrate(raw: f64) -> f64 {
    if !raw.is_finite() {
        return MIN_SCORE;
    }
    (raw.clamp(MIN_SCORE, MAX_SCORE) * 2.0).round() / 2.0
}

pub type Predicate = fn(&StructuralFeatures) -> bool;
pub type Adjustment = fn(&StructuralFeatures) -> f64;

/// A feature record plus its JSON view for dotted-path lookups.
pub struct FeatureView<'a> {
    pub features: &'a StructuralFeatures,
    pub value: serde_json::Value,
}

impl<'a> FeatureView<'a> {
    pub fn new(features: &'a StructuralFeatures) -> Self {
        Self {
            features,
            value: features.to_value(),
        }
    }
}

/// How an item turns features into a score.
#[derive(Debug, Clone)]
pub enum ItemRule {
    /// Hardcoded base score plus a signed adjustment over a few fields.
    Heuristic { base: f64, adjust: Adjustment },
    /// Binary compliance check: 5.0 on pass, 2.0 on fail.
    Check(Predicate),
    /// Ordered first-match condition list loaded from data.
    Chain(ChainRule),
    /// Needs rendering or interaction the pipeline cannot perform.
    NotApplicable,
}

impl ItemRule {
    pub fn evaluate(&self, view: &FeatureView<'_>) -> f64 {
        match self {
            ItemRule::Heuristic { base, adjust } => calibrate(base + adjust(view.features)),
            ItemRule::Check(pred) => {
                if pred(view.features) {
                    MAX_SCORE
                } else {
                    MIN_SCORE
                }
            }
            ItemRule::Chain(chain) => chain.evaluate(&view.value),
            ItemRule::NotApplicable => NOT_APPLICABLE,
        }
    }

    pub fn is_applicable(&self) -> bool {
        !matches!(self, ItemRule::NotApplicable)
    }
}

/// Which pages an issue for this item is attributed to.
#[derive(Debug, Clone, Copy)]
pub enum Attribution {
    /// The item describes the whole site; issues list no pages.
    SiteWide,
    /// Re-check each page; pages failing the predicate are affected.
    PerPage(Predicate),
}

/// One item of a taxonomy.
#[derive(Debug, Clone)]
pub struct ItemSpec {
    pub id: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    pub recommendation: &'static str,
    pub rule: ItemRule,
    pub attribution: Attribution,
}

impl ItemSpec {
    /// Pass/fail item attributed per page with its own predicate.
    pub fn check(
        id: &'static str,
        category: &'static str,
        title: &'static str,
        recommendation: &'static str,
        predicate: Predicate,
    ) -> Self {
        Self {
            id,
            category,
            title,
            recommendation,
            rule: ItemRule::Check(predicate),
            attribution: Attribution::PerPage(predicate),
        }
    }

    /// Base-plus-adjustment item, site-wide unless `per_page` is applied.
    pub fn heuristic(
        id: &'static str,
        category: &'static str,
        title: &'static str,
        recommendation: &'static str,
        base: f64,
        adjust: Adjustment,
    ) -> Self {
        Self {
            id,
            category,
            title,
            recommendation,
            rule: ItemRule::Heuristic { base, adjust },
            attribution: Attribution::SiteWide,
        }
    }

    pub fn not_applicable(
        id: &'static str,
        category: &'static str,
        title: &'static str,
        recommendation: &'static str,
    ) -> Self {
        Self {
            id,
            category,
            title,
            recommendation,
            rule: ItemRule::NotApplicable,
            attribution: Attribution::SiteWide,
        }
    }

    pub fn per_page(mut self, predicate: Predicate) -> Self {
        self.attribution = Attribution::PerPage(predicate);
        self
    }

    /// Score this item, preferring a configured chain over the declared rule.
    pub fn score(&self, view: &FeatureView<'_>, config: Option<&RuleConfig>) -> f64 {
        if self.rule.is_applicable() {
            if let Some(chain) = config.and_then(|c| c.get(self.id)) {
                return chain.evaluate(&view.value);
            }
        }
        self.rule.evaluate(view)
    }
}
