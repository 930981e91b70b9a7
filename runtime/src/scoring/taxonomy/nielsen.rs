//! Nielsen's ten usability heuristics, split into sub-items.
//!
//! Every item is a fixed heuristic: a base score plus an adjustment ladder
//! over one to three feature fields. `rules/nielsen.json` expresses the same
//! ladders as condition chains so policy can be tuned without a rebuild.

use super::{Category, Taxonomy};
use crate::rules::ItemSpec;
use crate::scoring::report::{GradeBasis, GradeScale};
use std::sync::LazyLock;

pub const NAME: &str = "nielsen";

const GRADING: GradeScale = GradeScale {
    basis: GradeBasis::NormalizedScore,
    thresholds: &[(90.0, "A"), (80.0, "B"), (70.0, "C")],
    floor: "D",
};

static TAXONOMY: LazyLock<Taxonomy> = LazyLock::new(build);

pub fn taxonomy() -> &'static Taxonomy {
    &TAXONOMY
}

fn build() -> Taxonomy {
    let categories = vec![
        Category { id: "N1", name: "Visibility of system status" },
        Category { id: "N2", name: "Match between system and the real world" },
        Category { id: "N3", name: "User control and freedom" },
        Category { id: "N4", name: "Consistency and standards" },
        Category { id: "N5", name: "Error prevention" },
        Category { id: "N6", name: "Recognition rather than recall" },
        Category { id: "N7", name: "Flexibility and efficiency of use" },
        Category { id: "N8", name: "Aesthetic and minimalist design" },
        Category { id: "N9", name: "Help users recover from errors" },
        Category { id: "N10", name: "Help and documentation" },
    ];

    let items = vec![
        // ── N1 ──
        ItemSpec::heuristic(
            "N1_1_current_location",
            "N1",
            "Current location is shown",
            "Add a breadcrumb trail so users can see where they are.",
            3.0,
            |f| if f.navigation.breadcrumb_exists { 2.0 } else { -1.0 },
        )
        .per_page(|f| f.navigation.breadcrumb_exists),
        ItemSpec::heuristic(
            "N1_2_loading_status",
            "N1",
            "Loading and progress are announced",
            "Expose progress with aria-live regions or status roles.",
            3.0,
            |f| {
                if f.markup.has_aria_live {
                    1.0
                } else if f.accessibility.aria_label_count >= 5 {
                    0.5
                } else {
                    -0.5
                }
            },
        ),
        ItemSpec::heuristic(
            "N1_3_action_feedback",
            "N1",
            "Actions give feedback",
            "Validate inputs and report the result of each action in place.",
            3.0,
            |f| {
                if f.forms.validation_exists {
                    1.0
                } else if f.markup.has_error_region {
                    0.5
                } else if f.accessibility.aria_label_count >= 10 {
                    0.5
                } else {
                    -0.5
                }
            },
        ),
        // ── N2 ──
        ItemSpec::heuristic(
            "N2_1_familiar_terms",
            "N2",
            "Language is declared and familiar",
            "Declare the document language with the lang attribute.",
            3.5,
            |f| if f.accessibility.lang_attribute { 1.0 } else { -1.0 },
        )
        .per_page(|f| f.accessibility.lang_attribute),
        ItemSpec::heuristic(
            "N2_2_natural_flow",
            "N2",
            "Content follows a natural order",
            "Structure pages with a handful of meaningful headings.",
            3.0,
            |f| {
                let h = f.content.heading_count;
                if (5..=30).contains(&h) {
                    1.5
                } else if h > 0 {
                    0.5
                } else {
                    -1.0
                }
            },
        ),
        ItemSpec::heuristic(
            "N2_3_real_world_metaphor",
            "N2",
            "Icons use real-world metaphors",
            "Pair key actions with recognizable icons.",
            3.0,
            |f| {
                let icons = f.visuals.icon_count;
                if icons >= 10 {
                    1.5
                } else if icons >= 5 {
                    1.0
                } else if icons > 0 {
                    0.5
                } else {
                    -1.0
                }
            },
        ),
        // ── N3 ──
        ItemSpec::heuristic(
            "N3_1_undo_redo",
            "N3",
            "Users can cancel or undo",
            "Offer cancel or reset controls on forms.",
            3.0,
            |f| {
                if f.markup.has_reset_control {
                    1.5
                } else if f.forms.form_count == 0 {
                    0.0
                } else {
                    -1.0
                }
            },
        ),
        ItemSpec::heuristic(
            "N3_3_flexible_navigation",
            "N3",
            "Navigation offers several routes",
            "Link related sections so users are never stuck on a page.",
            3.0,
            |f| {
                let links = f.navigation.link_count;
                if links >= 100 {
                    2.0
                } else if links >= 50 {
                    1.0
                } else if links >= 20 {
                    0.5
                } else {
                    -0.5
                }
            },
        ),
        // ── N4 ──
        ItemSpec::heuristic(
            "N4_1_visual_consistency",
            "N4",
            "Imagery is consistent and moderate",
            "Use a consistent, limited set of images.",
            3.0,
            |f| {
                let images = f.visuals.image_count;
                if (1..=30).contains(&images) {
                    1.0
                } else if images == 0 {
                    0.0
                } else {
                    -0.5
                }
            },
        ),
        ItemSpec::heuristic(
            "N4_2_terminology_consistency",
            "N4",
            "Sections are labelled consistently",
            "Label sections with consistent headings.",
            3.0,
            |f| {
                let h = f.content.heading_count;
                if h >= 10 {
                    1.5
                } else if h >= 5 {
                    1.0
                } else if h >= 3 {
                    0.5
                } else {
                    -0.5
                }
            },
        ),
        ItemSpec::heuristic(
            "N4_3_standard_compliance",
            "N4",
            "Markup follows web standards",
            "Serve standards-mode markup and give every image alt text.",
            3.0,
            |f| {
                let alt = f.accessibility.alt_text_ratio;
                if !f.markup.has_doctype {
                    -1.0
                } else if alt >= 0.9 {
                    1.5
                } else if alt >= 0.7 {
                    0.5
                } else {
                    -0.5
                }
            },
        )
        .per_page(|f| f.markup.has_doctype && f.accessibility.alt_text_ratio >= 0.9),
        // ── N5 ──
        ItemSpec::heuristic(
            "N5_1_input_validation",
            "N5",
            "Inputs are validated",
            "Add required, pattern or length constraints to form fields.",
            3.0,
            |f| {
                if f.forms.validation_exists {
                    2.0
                } else if f.forms.form_count == 0 {
                    0.0
                } else {
                    -1.0
                }
            },
        )
        .per_page(|f| f.forms.validation_exists || f.forms.form_count == 0),
        ItemSpec::heuristic(
            "N5_2_confirmation_dialog",
            "N5",
            "Risky actions are confirmed",
            "Ask for confirmation before destructive or irreversible actions.",
            3.0,
            |f| {
                if f.markup.has_confirm_dialog {
                    1.5
                } else if f.forms.form_count == 0 {
                    0.0
                } else {
                    -0.5
                }
            },
        ),
        ItemSpec::heuristic(
            "N5_3_constraints",
            "N5",
            "Input constraints are labelled",
            "Give every input a label describing what it accepts.",
            3.0,
            |f| {
                let ratio = f.forms.label_ratio;
                if ratio >= 0.9 {
                    1.5
                } else if ratio >= 0.7 {
                    1.0
                } else if ratio >= 0.5 {
                    0.0
                } else {
                    -1.0
                }
            },
        )
        .per_page(|f| f.forms.label_ratio >= 0.9),
        // ── N6 ──
        ItemSpec::heuristic(
            "N6_2_recognition_cues",
            "N6",
            "Visual cues aid recognition",
            "Support text labels with icons for common actions.",
            3.0,
            |f| {
                let icons = f.visuals.icon_count;
                if icons >= 10 {
                    1.5
                } else if icons >= 3 {
                    0.5
                } else {
                    -0.5
                }
            },
        ),
        ItemSpec::heuristic(
            "N6_3_memory_load",
            "N6",
            "Context is visible rather than remembered",
            "Keep location and menu context on screen.",
            3.0,
            |f| {
                if f.navigation.breadcrumb_exists {
                    1.5
                } else if f.navigation.menu_depth >= 2 {
                    0.5
                } else {
                    -0.5
                }
            },
        ),
        // ── N7 ──
        ItemSpec::heuristic(
            "N7_1_quick_access",
            "N7",
            "Frequent destinations are quick to reach",
            "Provide primary navigation and skip links.",
            3.0,
            |f| {
                let menus = f.navigation.menu_count;
                if menus >= 2 {
                    1.5
                } else if menus == 1 {
                    1.0
                } else if f.accessibility.skip_link_exists {
                    0.5
                } else {
                    -1.0
                }
            },
        ),
        ItemSpec::heuristic(
            "N7_2_customization",
            "N7",
            "Layout adapts to the device",
            "Declare a viewport so the layout adapts to screen size.",
            3.0,
            |f| if f.markup.has_viewport_meta { 1.0 } else { -0.5 },
        ),
        ItemSpec::heuristic(
            "N7_3_search_filter",
            "N7",
            "Search is available",
            "Offer site search on every page.",
            3.0,
            |f| if f.navigation.search_exists { 2.0 } else { -1.0 },
        )
        .per_page(|f| f.navigation.search_exists),
        // ── N8 ──
        ItemSpec::heuristic(
            "N8_1_essential_info",
            "N8",
            "Only essential information is shown",
            "Trim long pages to the content users need.",
            3.5,
            |f| {
                let p = f.content.paragraph_count;
                if (5..=30).contains(&p) {
                    1.5
                } else if p <= 50 {
                    0.5
                } else {
                    -1.0
                }
            },
        ),
        ItemSpec::heuristic(
            "N8_2_clean_interface",
            "N8",
            "Interface is uncluttered",
            "Reduce decorative imagery.",
            3.5,
            |f| {
                let images = f.visuals.image_count;
                if images <= 10 {
                    1.5
                } else if images <= 30 {
                    0.5
                } else {
                    -1.0
                }
            },
        ),
        ItemSpec::heuristic(
            "N8_3_visual_hierarchy",
            "N8",
            "Visual hierarchy is clear",
            "Use heading levels to build a clear hierarchy.",
            3.0,
            |f| {
                let h = f.content.heading_count;
                if h >= 10 {
                    2.0
                } else if h >= 5 {
                    1.0
                } else if h >= 3 {
                    0.5
                } else {
                    -0.5
                }
            },
        ),
        // ── N9 ──
        ItemSpec::heuristic(
            "N9_2_recovery_support",
            "N9",
            "Errors are announced where they occur",
            "Show form errors next to the field with role=\"alert\".",
            3.0,
            |f| {
                if f.markup.has_error_region {
                    1.5
                } else if f.forms.form_count == 0 {
                    0.0
                } else {
                    -0.5
                }
            },
        ),
        ItemSpec::heuristic(
            "N9_4_error_guidance",
            "N9",
            "Error messages explain the fix",
            "Describe the expected input when validation fails.",
            3.0,
            |f| {
                if f.forms.validation_exists {
                    1.0
                } else if f.forms.form_count == 0 {
                    0.0
                } else {
                    -0.5
                }
            },
        ),
        // ── N10 ──
        ItemSpec::heuristic(
            "N10_1_help_visibility",
            "N10",
            "Help is easy to find",
            "Link help or FAQ pages from the header or footer.",
            3.0,
            |f| if f.markup.has_help_link { 1.5 } else { -1.0 },
        )
        .per_page(|f| f.markup.has_help_link),
        ItemSpec::heuristic(
            "N10_2_documentation",
            "N10",
            "Guidance is structured",
            "Present instructions as short lists of steps.",
            3.0,
            |f| {
                let lists = f.content.list_count;
                if lists >= 10 {
                    1.5
                } else if lists >= 5 {
                    1.0
                } else if lists >= 3 {
                    0.5
                } else {
                    -0.5
                }
            },
        ),
    ];

    Taxonomy {
        name: NAME,
        title: "Nielsen usability heuristics",
        categories,
        items,
        grading: GRADING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::StructuralFeatures;
    use crate::rules::{FeatureView, RuleConfig};

    fn score(id: &str, f: &StructuralFeatures) -> f64 {
        taxonomy().item(id).unwrap().score(&FeatureView::new(f), None)
    }

    #[test]
    fn test_input_validation_ladder() {
        let mut f = StructuralFeatures::default();
        assert_eq!(score("N5_1_input_validation", &f), 3.0);
        f.forms.form_count = 1;
        f.forms.input_count = 3;
        assert_eq!(score("N5_1_input_validation", &f), 2.0);
        f.forms.validation_exists = true;
        assert_eq!(score("N5_1_input_validation", &f), 5.0);
    }

    #[test]
    fn test_standard_compliance_requires_doctype() {
        let mut f = StructuralFeatures::default();
        assert_eq!(score("N4_3_standard_compliance", &f), 2.0);
        f.markup.has_doctype = true;
        assert_eq!(score("N4_3_standard_compliance", &f), 4.5);
    }

    fn samples() -> Vec<StructuralFeatures> {
        let mut out = vec![StructuralFeatures::default()];
        for i in 0..40u32 {
            let mut f = StructuralFeatures::default();
            f.navigation.menu_count = i % 3;
            f.navigation.link_count = i * 4;
            f.navigation.breadcrumb_exists = i % 2 == 0;
            f.navigation.search_exists = i % 3 == 0;
            f.navigation.menu_depth = if i % 4 == 0 { 2 } else { 1 };
            f.accessibility.alt_text_ratio = (i % 11) as f64 / 10.0;
            f.accessibility.aria_label_count = i % 13;
            f.accessibility.lang_attribute = i % 5 != 0;
            f.accessibility.skip_link_exists = i % 7 == 0;
            f.content.heading_count = i;
            f.content.paragraph_count = i * 2;
            f.content.list_count = i % 12;
            f.forms.form_count = i % 2;
            f.forms.label_ratio = (i % 6) as f64 / 5.0;
            f.forms.validation_exists = i % 4 == 1;
            f.visuals.image_count = i;
            f.visuals.icon_count = i % 15;
            f.markup.has_doctype = i % 9 != 0;
            f.markup.has_aria_live = i % 8 == 0;
            f.markup.has_error_region = i % 6 == 0;
            f.markup.has_reset_control = i % 10 == 0;
            f.markup.has_confirm_dialog = i % 3 == 1;
            f.markup.has_viewport_meta = i % 2 == 1;
            f.markup.has_help_link = i % 5 == 2;
            out.push(f);
        }
        out
    }

    #[test]
    fn test_builtin_chains_match_heuristics() {
        let chains = RuleConfig::builtin_nielsen().unwrap();
        for f in samples() {
            let view = FeatureView::new(&f);
            for item in &taxonomy().items {
                let fixed = item.score(&view, None);
                let chained = item.score(&view, Some(&chains));
                assert_eq!(fixed, chained, "{} diverges for {:?}", item.id, f);
            }
        }
    }
}
