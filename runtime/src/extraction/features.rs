//! Structural feature records derived from page markup.
//!
//! A `StructuralFeatures` value is computed once per fetched page and never
//! mutated afterwards. Ratios are always in `[0, 1]`; a missing denominator
//! (no images, no inputs) yields the neutral ratio `1.0`.

use serde::{Deserialize, Serialize};

/// Navigation-related signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationFeatures {
    pub menu_count: u32,
    pub link_count: u32,
    pub breadcrumb_exists: bool,
    pub search_exists: bool,
    /// 1 for flat menus, 2 when a list nests another list.
    pub menu_depth: u8,
}

impl Default for NavigationFeatures {
    fn default() -> Self {
        Self {
            menu_count: 0,
            link_count: 0,
            breadcrumb_exists: false,
            search_exists: false,
            menu_depth: 1,
        }
    }
}

/// Accessibility-related signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityFeatures {
    /// Images with an `alt` attribute divided by all images.
    pub alt_text_ratio: f64,
    pub aria_label_count: u32,
    pub heading_structure: bool,
    pub lang_attribute: bool,
    pub skip_link_exists: bool,
}

impl Default for AccessibilityFeatures {
    fn default() -> Self {
        Self {
            alt_text_ratio: 1.0,
            aria_label_count: 0,
            heading_structure: false,
            lang_attribute: false,
            skip_link_exists: false,
        }
    }
}

/// Content volume counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFeatures {
    pub heading_count: u32,
    pub paragraph_count: u32,
    pub list_count: u32,
    pub table_count: u32,
}

/// Form-related signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormFeatures {
    pub form_count: u32,
    pub input_count: u32,
    /// Labels divided by inputs, capped at 1.0.
    pub label_ratio: f64,
    pub validation_exists: bool,
}

impl Default for FormFeatures {
    fn default() -> Self {
        Self {
            form_count: 0,
            input_count: 0,
            label_ratio: 1.0,
            validation_exists: false,
        }
    }
}

/// Visual element counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualFeatures {
    pub image_count: u32,
    pub video_count: u32,
    pub icon_count: u32,
}

/// Occurrence flags used by the compliance checklists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupSignals {
    // Document
    pub has_doctype: bool,
    pub has_html_tag: bool,
    pub has_title: bool,
    pub has_viewport_meta: bool,

    // Media
    pub has_track: bool,
    pub has_autoplay: bool,
    pub has_table_headers: bool,

    // Interaction
    pub onclick_count: u32,
    pub has_tabindex: bool,
    pub has_accesskey: bool,
    pub has_set_timeout: bool,
    pub has_carousel: bool,
    pub has_pause_control: bool,
    pub has_flashing: bool,
    pub target_blank_count: u32,

    // Forms
    pub has_label: bool,
    pub has_placeholder: bool,
    pub has_autocomplete: bool,
    pub has_captcha: bool,
    pub has_required_fields: bool,
    pub has_reset_control: bool,
    pub has_confirm_dialog: bool,
    pub has_password_input: bool,
    pub has_file_upload: bool,
    pub checkbox_count: u32,
    pub select_count: u32,
    pub button_count: u32,

    // Feedback
    pub has_aria_live: bool,
    pub has_error_region: bool,

    // Identity
    pub has_help_link: bool,
    pub has_official_banner: bool,
    pub has_logo: bool,
    pub has_home_link: bool,
    pub has_footer: bool,
    pub has_side_nav: bool,
    pub has_login_form: bool,
    pub has_contact: bool,
    pub has_role_attribute: bool,
}

/// Fixed-shape summary of a page's structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralFeatures {
    pub navigation: NavigationFeatures,
    pub accessibility: AccessibilityFeatures,
    pub content: ContentFeatures,
    pub forms: FormFeatures,
    pub visuals: VisualFeatures,
    pub markup: MarkupSignals,
}

impl StructuralFeatures {
    /// JSON view used for dotted field-path lookups.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Ratio of `part` to `whole`, neutral when there is nothing to measure.
pub fn neutral_ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 1.0;
    }
    (part as f64 / whole as f64).clamp(0.0, 1.0)
}

/// Features of one page of a crawl, as handed to the scorers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFeatures {
    pub url: String,
    pub is_main: bool,
    pub features: StructuralFeatures,
}
