//! Structural similarity between two feature records.
//!
//! Five sub-scores, each a weighted rubric of threshold checks. A check
//! contributes its weight when both records land on the same side of the
//! threshold. The total is a fixed weighted sum scaled to 0..100.

use crate::extraction::StructuralFeatures;
use serde::Serialize;

pub const NAVIGATION_WEIGHT: f64 = 0.20;
pub const ACCESSIBILITY_WEIGHT: f64 = 0.30;
pub const CONTENT_WEIGHT: f64 = 0.20;
pub const FORMS_WEIGHT: f64 = 0.15;
pub const VISUALS_WEIGHT: f64 = 0.15;

type Check = (f64, fn(&StructuralFeatures) -> bool);

const NAVIGATION_CHECKS: &[Check] = &[
    (8.0, |f: &StructuralFeatures| f.navigation.search_exists),
    (7.0, |f: &StructuralFeatures| f.navigation.breadcrumb_exists),
    (5.0, |f: &StructuralFeatures| (20..=100).contains(&f.navigation.link_count)),
    (5.0, |f: &StructuralFeatures| f.navigation.menu_depth >= 2),
];

const ACCESSIBILITY_CHECKS: &[Check] = &[
    (10.0, |f: &StructuralFeatures| f.accessibility.alt_text_ratio >= 0.9),
    (7.0, |f: &StructuralFeatures| f.accessibility.lang_attribute),
    (5.0, |f: &StructuralFeatures| f.accessibility.skip_link_exists),
    (5.0, |f: &StructuralFeatures| f.accessibility.heading_structure),
    (3.0, |f: &StructuralFeatures| f.accessibility.aria_label_count > 5),
];

const CONTENT_CHECKS: &[Check] = &[
    (6.0, |f: &StructuralFeatures| (5..=20).contains(&f.content.heading_count)),
    (4.0, |f: &StructuralFeatures| f.content.paragraph_count >= 10),
    (3.0, |f: &StructuralFeatures| f.content.list_count > 3),
    (2.0, |f: &StructuralFeatures| f.content.table_count > 0),
];

const FORMS_CHECKS: &[Check] = &[
    (4.0, |f: &StructuralFeatures| f.forms.form_count > 0),
    (4.0, |f: &StructuralFeatures| f.forms.validation_exists),
    (2.0, |f: &StructuralFeatures| f.forms.label_ratio >= 0.8),
];

const VISUALS_CHECKS: &[Check] = &[
    (4.0, |f: &StructuralFeatures| (1..=30).contains(&f.visuals.image_count)),
    (3.0, |f: &StructuralFeatures| f.visuals.icon_count > 3),
    (3.0, |f: &StructuralFeatures| f.visuals.video_count > 0),
];

/// Share of rubric weight on which both records agree, in `[0, 1]`.
fn rubric(checks: &[Check], a: &StructuralFeatures, b: &StructuralFeatures) -> f64 {
    let total: f64 = checks.iter().map(|(w, _)| w).sum();
    if total == 0.0 {
        return 1.0;
    }
    let agreed: f64 = checks
        .iter()
        .filter(|(_, check)| check(a) == check(b))
        .map(|(w, _)| w)
        .sum();
    agreed / total
}

/// Per-dimension agreement plus the weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Similarity {
    pub navigation: f64,
    pub accessibility: f64,
    pub content: f64,
    pub forms: f64,
    pub visuals: f64,
    /// Weighted sum scaled to 0..100.
    pub total: f64,
}

pub fn similarity(candidate: &StructuralFeatures, reference: &StructuralFeatures) -> Similarity {
    let navigation = rubric(NAVIGATION_CHECKS, candidate, reference);
    let accessibility = rubric(ACCESSIBILITY_CHECKS, candidate, reference);
    let content = rubric(CONTENT_CHECKS, candidate, reference);
    let forms = rubric(FORMS_CHECKS, candidate, reference);
    let visuals = rubric(VISUALS_CHECKS, candidate, reference);

    let total = (navigation * NAVIGATION_WEIGHT
        + accessibility * ACCESSIBILITY_WEIGHT
        + content * CONTENT_WEIGHT
        + forms * FORMS_WEIGHT
        + visuals * VISUALS_WEIGHT)
        * 100.0;

    Similarity {
        navigation,
        accessibility,
        content,
        forms,
        visuals,
        total: total.clamp(0.0, 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let sum = NAVIGATION_WEIGHT + ACCESSIBILITY_WEIGHT + CONTENT_WEIGHT + FORMS_WEIGHT + VISUALS_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_records_are_fully_similar() {
        let f = StructuralFeatures::default();
        let s = similarity(&f, &f);
        assert!((s.total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_accessibility_dominates() {
        let base = StructuralFeatures::default();

        let mut a11y = base.clone();
        a11y.accessibility.alt_text_ratio = 0.0;
        a11y.accessibility.lang_attribute = true;
        a11y.accessibility.skip_link_exists = true;
        a11y.accessibility.heading_structure = true;
        a11y.accessibility.aria_label_count = 10;

        let mut nav = base.clone();
        nav.navigation.search_exists = true;
        nav.navigation.breadcrumb_exists = true;
        nav.navigation.link_count = 50;
        nav.navigation.menu_depth = 2;

        // Disagreeing on every accessibility check costs 30 points, navigation only 20
        assert!((similarity(&base, &a11y).total - 70.0).abs() < 1e-9);
        assert!((similarity(&base, &nav).total - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let a = StructuralFeatures::default();
        let mut b = a.clone();
        b.forms.form_count = 2;
        b.visuals.image_count = 12;
        assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }
}
