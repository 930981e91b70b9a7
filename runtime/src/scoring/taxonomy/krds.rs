//! KRDS web accessibility checklist (33 items, 4 principles).
//!
//! Items are pass/fail checks over markup signals. Items that need real
//! rendering (colour contrast, pointer gestures, motion sensors) cannot be
//! judged from markup and are reported as not applicable.

use super::{Category, Taxonomy};
use crate::rules::ItemSpec;
use crate::scoring::report::{GradeBasis, GradeScale};
use std::sync::LazyLock;

pub const NAME: &str = "krds-accessibility";

const GRADING: GradeScale = GradeScale {
    basis: GradeBasis::NormalizedScore,
    thresholds: &[(95.0, "AAA"), (85.0, "AA"), (70.0, "A")],
    floor: "Fail",
};

static TAXONOMY: LazyLock<Taxonomy> = LazyLock::new(build);

pub fn taxonomy() -> &'static Taxonomy {
    &TAXONOMY
}

fn build() -> Taxonomy {
    let categories = vec![
        Category { id: "perceivable", name: "Perceivable" },
        Category { id: "operable", name: "Operable" },
        Category { id: "understandable", name: "Understandable" },
        Category { id: "robust", name: "Robust" },
    ];

    let items = vec![
        // ── Perceivable ──
        ItemSpec::check(
            "P1_1_1_alt_text",
            "perceivable",
            "Text alternatives for images",
            "Give every meaningful image an alt attribute.",
            |f| f.accessibility.alt_text_ratio >= 0.9,
        ),
        ItemSpec::check(
            "P1_2_1_multimedia_caption",
            "perceivable",
            "Captions for multimedia",
            "Provide caption tracks for video content.",
            |f| f.visuals.video_count == 0 || f.markup.has_track,
        ),
        ItemSpec::check(
            "P1_3_1_table_structure",
            "perceivable",
            "Data tables declare headers",
            "Mark header cells with <th> and a caption.",
            |f| f.content.table_count == 0 || f.markup.has_table_headers,
        ),
        ItemSpec::check(
            "P1_3_2_linear_structure",
            "perceivable",
            "Content has a linear heading structure",
            "Organise content with heading elements.",
            |f| f.accessibility.heading_structure,
        ),
        ItemSpec::check(
            "P1_3_3_clear_instructions",
            "perceivable",
            "Instructions do not rely on shape or position",
            "Label controls with text or aria-label.",
            |f| f.accessibility.aria_label_count > 0 || f.markup.has_label,
        ),
        ItemSpec::check(
            "P1_4_1_color_independent",
            "perceivable",
            "Information is not conveyed by colour alone",
            "Back up colour cues with text.",
            |f| f.content.paragraph_count > 10,
        ),
        ItemSpec::check(
            "P1_4_2_no_auto_play",
            "perceivable",
            "No automatic sound playback",
            "Remove autoplay from audio and video.",
            |f| !f.markup.has_autoplay,
        ),
        ItemSpec::not_applicable(
            "P1_4_3_contrast_ratio",
            "perceivable",
            "Text contrast is at least 4.5:1",
            "Check text and background colours with a contrast analyser.",
        ),
        ItemSpec::check(
            "P1_4_4_content_distinction",
            "perceivable",
            "Content areas are distinguishable",
            "Separate content blocks with headings and lists.",
            |f| f.content.heading_count > 3 && f.content.list_count > 0,
        ),
        // ── Operable ──
        ItemSpec::check(
            "O2_1_1_keyboard_access",
            "operable",
            "All functions work from the keyboard",
            "Use links and buttons instead of onclick on plain elements.",
            |f| f.markup.onclick_count == 0 || f.navigation.link_count > f.markup.onclick_count,
        ),
        ItemSpec::check(
            "O2_1_2_focus_visible",
            "operable",
            "Keyboard focus is visible",
            "Keep focus outlines and a logical tab order.",
            |f| f.markup.has_tabindex || f.navigation.link_count > 5,
        ),
        ItemSpec::check(
            "O2_1_3_input_control",
            "operable",
            "Controls are operable by any input device",
            "Expose actions as focusable links or buttons.",
            |f| f.navigation.link_count >= 5,
        ),
        ItemSpec::check(
            "O2_1_4_shortcut_key",
            "operable",
            "Shortcut keys can be discovered",
            "Describe access keys with aria-label text.",
            |f| !f.markup.has_accesskey || f.accessibility.aria_label_count > 0,
        ),
        ItemSpec::check(
            "O2_2_1_time_control",
            "operable",
            "Time limits can be adjusted",
            "Avoid automatic refresh or let users extend time limits.",
            |f| !f.markup.has_set_timeout,
        ),
        ItemSpec::check(
            "O2_2_2_pause_control",
            "operable",
            "Moving content can be paused",
            "Add pause and stop controls to carousels.",
            |f| !f.markup.has_carousel || f.markup.has_pause_control,
        ),
        ItemSpec::check(
            "O2_3_1_flash_limit",
            "operable",
            "No flashing content",
            "Remove blinking or flashing animations.",
            |f| !f.markup.has_flashing,
        ),
        ItemSpec::check(
            "O2_4_1_skip_navigation",
            "operable",
            "Repeated blocks can be skipped",
            "Add a skip-to-content link at the top of each page.",
            |f| f.accessibility.skip_link_exists,
        ),
        ItemSpec::check(
            "O2_4_2_page_title",
            "operable",
            "Pages have descriptive titles",
            "Give every page a non-empty <title>.",
            |f| f.markup.has_title,
        ),
        ItemSpec::check(
            "O2_4_3_link_purpose",
            "operable",
            "Link purpose is clear",
            "Describe ambiguous links with aria-label.",
            |f| {
                let links = f.navigation.link_count;
                links > 0 && f64::from(f.accessibility.aria_label_count) >= f64::from(links) * 0.3
            },
        ),
        ItemSpec::not_applicable(
            "O2_4_4_page_reference",
            "operable",
            "Page numbers match the printed reference",
            "Provide page break locators for digital publications.",
        ),
        ItemSpec::not_applicable(
            "O2_5_1_single_pointer",
            "operable",
            "Gestures have single-pointer alternatives",
            "Offer buttons for multi-touch or path gestures.",
        ),
        ItemSpec::not_applicable(
            "O2_5_2_pointer_cancel",
            "operable",
            "Pointer actions can be cancelled",
            "Trigger actions on pointer up, not down.",
        ),
        ItemSpec::check(
            "O2_5_3_label_name",
            "operable",
            "Visible labels match accessible names",
            "Associate a <label> with every input.",
            |f| f.forms.input_count == 0 || f.markup.has_label,
        ),
        ItemSpec::not_applicable(
            "O2_5_4_motion_operation",
            "operable",
            "Motion input has alternatives",
            "Provide controls for functions triggered by device motion.",
        ),
        // ── Understandable ──
        ItemSpec::check(
            "U3_1_1_language_attr",
            "understandable",
            "Default language is declared",
            "Set the lang attribute on the html element.",
            |f| f.accessibility.lang_attribute,
        ),
        ItemSpec::check(
            "U3_2_1_user_control",
            "understandable",
            "No unexpected context changes",
            "Warn before opening new windows.",
            |f| f64::from(f.markup.target_blank_count) <= f64::from(f.navigation.link_count) * 0.1,
        ),
        ItemSpec::check(
            "U3_2_2_help_consistency",
            "understandable",
            "Help is in a consistent place",
            "Link help or FAQ from the same place on every page.",
            |f| f.markup.has_help_link,
        ),
        ItemSpec::check(
            "U3_3_1_error_correction",
            "understandable",
            "Input errors are identified",
            "Validate inputs and explain how to correct them.",
            |f| f.forms.input_count == 0 || f.forms.validation_exists,
        ),
        ItemSpec::check(
            "U3_3_2_label_provision",
            "understandable",
            "Inputs have labels or instructions",
            "Provide a label or placeholder for every input.",
            |f| f.forms.input_count == 0 || f.markup.has_label || f.markup.has_placeholder,
        ),
        ItemSpec::check(
            "U3_3_3_accessible_auth",
            "understandable",
            "Authentication needs no cognitive test",
            "Offer an alternative to CAPTCHA puzzles.",
            |f| !f.markup.has_captcha,
        ),
        ItemSpec::check(
            "U3_3_4_auto_fill",
            "understandable",
            "Repeated input can be auto-filled",
            "Set autocomplete tokens on personal-data fields.",
            |f| f.forms.input_count == 0 || f.markup.has_autocomplete,
        ),
        // ── Robust ──
        ItemSpec::check(
            "R4_1_1_markup_validity",
            "robust",
            "Markup is well-formed",
            "Start documents with <!DOCTYPE html> and an html root.",
            |f| f.markup.has_doctype && f.markup.has_html_tag,
        ),
        ItemSpec::check(
            "R4_2_1_web_app_access",
            "robust",
            "Custom widgets expose roles and names",
            "Add ARIA roles and labels to custom components.",
            |f| f.accessibility.aria_label_count > 0 || f.markup.has_role_attribute,
        ),
    ];

    Taxonomy {
        name: NAME,
        title: "KRDS web accessibility",
        categories,
        items,
        grading: GRADING,
    }
}
