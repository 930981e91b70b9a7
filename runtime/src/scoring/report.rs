//! Report shape shared by every taxonomy.

use crate::rules::{COMPLIANT_THRESHOLD, MAX_SCORE, MIN_SCORE, NOT_APPLICABLE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Issue severity bands, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Serious,
    Moderate,
    Minor,
    NotApplicable,
}

impl Severity {
    pub fn from_score(score: f64) -> Self {
        if score < 0.0 {
            Severity::NotApplicable
        } else if score < 2.5 {
            Severity::Critical
        } else if score < 3.5 {
            Severity::Serious
        } else if score < 4.5 {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Serious => "serious",
            Severity::Moderate => "moderate",
            Severity::Minor => "minor",
            Severity::NotApplicable => "not_applicable",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a grade threshold is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBasis {
    /// `(overall - 2) / 3 * 100`.
    NormalizedScore,
    /// Share of scored items at or above the compliant threshold.
    ComplianceRate,
}

/// Fixed score-to-grade thresholds, highest first.
#[derive(Debug, Clone, Copy)]
pub struct GradeScale {
    pub basis: GradeBasis,
    pub thresholds: &'static [(f64, &'static str)],
    pub floor: &'static str,
}

impl GradeScale {
    /// Grade a 0..100 value after rounding it to a whole number.
    pub fn grade(&self, value: f64) -> &'static str {
        let value = value.round();
        self.thresholds
            .iter()
            .find(|(min, _)| value >= *min)
            .map(|(_, g)| *g)
            .unwrap_or(self.floor)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreItem {
    pub id: String,
    pub category: String,
    pub title: String,
    /// -1 when not applicable, otherwise 2.0..=5.0 in 0.5 steps.
    pub score: f64,
    pub severity: Severity,
    pub compliant: bool,
    #[serde(skip)]
    pub recommendation: String,
    /// Pages failing the item's per-page check; empty means site-wide.
    #[serde(skip)]
    pub affected_pages: Vec<String>,
}

impl ScoreItem {
    pub fn is_applicable(&self) -> bool {
        self.score >= 0.0
    }

    /// Replace the score and refresh the derived fields.
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
        self.severity = Severity::from_score(score);
        self.compliant = score >= COMPLIANT_THRESHOLD;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    /// Mean over applicable items; 0 when every item is not applicable.
    pub mean: f64,
    pub item_count: usize,
    pub scored_count: usize,
    pub compliant_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub item_id: String,
    pub category: String,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
    pub affected_pages: Vec<String>,
}

/// A calibration override that changed this report.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedCalibration {
    pub table_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub delta: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: Uuid,
    pub taxonomy: String,
    pub site_url: String,
    pub generated_at: DateTime<Utc>,
    pub page_count: usize,
    pub items: Vec<ScoreItem>,
    pub categories: Vec<CategorySummary>,
    pub overall: f64,
    pub normalized_score: f64,
    pub compliance_rate: f64,
    pub grade: String,
    pub scored_items: usize,
    pub not_applicable_items: usize,
    pub issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub calibrations: Vec<AppliedCalibration>,
    /// Report-level calibration shift applied on top of the category mean.
    #[serde(skip)]
    pub overall_adjustment: f64,
    #[serde(skip)]
    pub grading: GradeScale,
}

impl Report {
    pub fn item(&self, id: &str) -> Option<&ScoreItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut ScoreItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Recompute aggregates, grade and issues from the item scores.
    ///
    /// The overall score is the mean of the category means, taken over
    /// categories with at least one scored item; a category of only
    /// not-applicable items is left out rather than counted as zero.
    pub fn recompute(&mut self) {
        for cat in &mut self.categories {
            let members: Vec<&ScoreItem> =
                self.items.iter().filter(|i| i.category == cat.id).collect();
            let scored: Vec<f64> = members
                .iter()
                .filter(|i| i.is_applicable())
                .map(|i| i.score)
                .collect();
            cat.item_count = members.len();
            cat.scored_count = scored.len();
            cat.compliant_count = members.iter().filter(|i| i.is_applicable() && i.compliant).count();
            cat.mean = mean(&scored);
        }

        // Categories weigh equally; fully unjudgeable categories carry no signal.
        let means: Vec<f64> = self
            .categories
            .iter()
            .filter(|c| c.scored_count > 0)
            .map(|c| c.mean)
            .collect();
        self.overall = if means.is_empty() {
            0.0
        } else {
            (mean(&means) + self.overall_adjustment).clamp(MIN_SCORE, MAX_SCORE)
        };
        self.normalized_score = normalize(self.overall);

        self.scored_items = self.items.iter().filter(|i| i.is_applicable()).count();
        self.not_applicable_items = self.items.len() - self.scored_items;
        let compliant = self
            .items
            .iter()
            .filter(|i| i.is_applicable() && i.compliant)
            .count();
        self.compliance_rate = if self.scored_items == 0 {
            0.0
        } else {
            compliant as f64 / self.scored_items as f64 * 100.0
        };

        let basis = match self.grading.basis {
            GradeBasis::NormalizedScore => self.normalized_score,
            GradeBasis::ComplianceRate => self.compliance_rate,
        };
        self.grade = self.grading.grade(basis).to_string();
        self.issues = build_issues(&self.items);
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Map a 2..5 score onto 0..100; 0 stays 0.
pub fn normalize(overall: f64) -> f64 {
    if overall <= 0.0 {
        return 0.0;
    }
    ((overall - MIN_SCORE) / (MAX_SCORE - MIN_SCORE) * 100.0).clamp(0.0, 100.0)
}

fn build_issues(items: &[ScoreItem]) -> Vec<Issue> {
    let mut issues: Vec<Issue> = items
        .iter()
        .filter(|i| !i.compliant)
        .map(|i| {
            let description = if i.is_applicable() {
                format!("{} (score {:.1})", i.title, i.score)
            } else {
                format!("{}: automated judgment was not possible; review manually", i.title)
            };
            Issue {
                item_id: i.id.clone(),
                category: i.category.clone(),
                severity: i.severity,
                description,
                recommendation: i.recommendation.clone(),
                affected_pages: i.affected_pages.clone(),
            }
        })
        .collect();
    // Stable: declaration order is kept within a severity.
    issues.sort_by_key(|i| i.severity);
    issues
}

/// Placeholder score for a not-yet-evaluated item.
pub(crate) fn blank_item(id: &str, category: &str, title: &str, recommendation: &str) -> ScoreItem {
    let mut item = ScoreItem {
        id: id.to_string(),
        category: category.to_string(),
        title: title.to_string(),
        score: NOT_APPLICABLE,
        severity: Severity::NotApplicable,
        compliant: false,
        recommendation: recommendation.to_string(),
        affected_pages: Vec::new(),
    };
    item.set_score(NOT_APPLICABLE);
    item
}
