//! KRDS UI/UX convenience checklist (43 items, 6 categories).
//!
//! Graded on compliance rate rather than mean score. Items that depend on
//! interaction (search results, logout, application content) cannot be
//! decided from a static page and are not applicable.

use super::{Category, Taxonomy};
use crate::rules::ItemSpec;
use crate::scoring::report::{GradeBasis, GradeScale};
use std::sync::LazyLock;

pub const NAME: &str = "krds-uiux";

const GRADING: GradeScale = GradeScale {
    basis: GradeBasis::ComplianceRate,
    thresholds: &[(95.0, "S"), (90.0, "A"), (85.0, "B"), (80.0, "C")],
    floor: "F",
};

static TAXONOMY: LazyLock<Taxonomy> = LazyLock::new(build);

pub fn taxonomy() -> &'static Taxonomy {
    &TAXONOMY
}

fn dynamic(id: &'static str, category: &'static str, title: &'static str) -> ItemSpec {
    ItemSpec::not_applicable(
        id,
        category,
        title,
        "Verify manually; this depends on interaction or content the crawler cannot see.",
    )
}

fn build() -> Taxonomy {
    let categories = vec![
        Category { id: "identity", name: "Identity" },
        Category { id: "navigation", name: "Navigation" },
        Category { id: "visit", name: "Visit" },
        Category { id: "search", name: "Search" },
        Category { id: "login", name: "Login" },
        Category { id: "application", name: "Application" },
    ];

    let items = vec![
        // ── Identity ──
        ItemSpec::check(
            "identity_1_1_1_official_banner",
            "identity",
            "Official government site banner",
            "Show the official e-government banner at the top of every page.",
            |f| f.markup.has_official_banner,
        ),
        ItemSpec::check(
            "identity_1_2_1_logo",
            "identity",
            "Institution logo",
            "Place the institution logo in the header.",
            |f| f.markup.has_logo,
        ),
        ItemSpec::check(
            "identity_1_2_2_home_button",
            "identity",
            "Home link",
            "Link the logo or a home button to the main page.",
            |f| f.markup.has_home_link,
        ),
        ItemSpec::check(
            "identity_1_2_3_search_function",
            "identity",
            "Search in the header",
            "Keep a search box in the common header.",
            |f| f.navigation.search_exists,
        ),
        ItemSpec::check(
            "identity_1_3_1_footer",
            "identity",
            "Footer with institution information",
            "Add a footer with address, contact and policy links.",
            |f| f.markup.has_footer,
        ),
        // ── Navigation ──
        ItemSpec::check(
            "navigation_2_1_1_main_menu",
            "navigation",
            "Main menu",
            "Provide a primary navigation menu.",
            |f| f.navigation.menu_count > 0 || f.navigation.link_count >= 10,
        ),
        ItemSpec::check(
            "navigation_2_1_2_menu_structure",
            "navigation",
            "Hierarchical menu structure",
            "Group menu entries into second-level submenus.",
            |f| f.navigation.menu_depth >= 2,
        ),
        ItemSpec::check(
            "navigation_2_2_1_breadcrumb",
            "navigation",
            "Breadcrumb",
            "Show a breadcrumb trail on sub-pages.",
            |f| f.navigation.breadcrumb_exists,
        ),
        ItemSpec::check(
            "navigation_2_2_2_breadcrumb_home",
            "navigation",
            "Breadcrumb starts at home",
            "Start the breadcrumb with a link to the main page.",
            |f| f.navigation.breadcrumb_exists && f.markup.has_home_link,
        ),
        ItemSpec::check(
            "navigation_2_3_1_side_menu",
            "navigation",
            "Side menu",
            "Show the section's sub-menu beside the content.",
            |f| f.markup.has_side_nav,
        ),
        // ── Visit ──
        ItemSpec::check(
            "visit_3_1_1_main_screen",
            "visit",
            "Main screen presents content",
            "Make the main page lead to the key services.",
            |f| f.content.heading_count > 0 || f.navigation.link_count > 0,
        ),
        // ── Search ──
        ItemSpec::check(
            "search_4_1_1_search_function",
            "search",
            "Search function",
            "Offer site-wide search.",
            |f| f.navigation.search_exists,
        ),
        ItemSpec::check(
            "search_4_1_2_search_target",
            "search",
            "Search scope selection",
            "Let users choose what to search.",
            |f| f.forms.form_count > 0 && f.markup.select_count > 0,
        ),
        ItemSpec::check(
            "search_4_1_3_advanced_search",
            "search",
            "Advanced search",
            "Offer filters such as period or category.",
            |f| f.navigation.search_exists && f.markup.select_count > 1,
        ),
        ItemSpec::check(
            "search_4_2_1_search_input",
            "search",
            "Search input field",
            "Provide a text field for search terms.",
            |f| f.forms.input_count > 0,
        ),
        ItemSpec::check(
            "search_4_2_2_input_placeholder",
            "search",
            "Input hint",
            "Show an example query as placeholder text.",
            |f| f.markup.has_placeholder,
        ),
        dynamic("search_4_2_3_search_history", "search", "Recent searches"),
        dynamic("search_4_2_4_auto_complete", "search", "Search suggestions"),
        ItemSpec::check(
            "search_4_3_1_search_button",
            "search",
            "Search button",
            "Pair the search field with an explicit button.",
            |f| f.markup.button_count >= 2,
        ),
        dynamic("search_4_3_2_result_count", "search", "Result count"),
        dynamic("search_4_3_3_result_sort", "search", "Result sorting"),
        dynamic("search_4_3_4_result_filter", "search", "Result filtering"),
        dynamic("search_4_3_5_no_result", "search", "No-result guidance"),
        // ── Login ──
        ItemSpec::check(
            "login_5_1_1_login_function",
            "login",
            "Login entry point",
            "Link the login page from the header.",
            |f| f.markup.has_login_form,
        ),
        ItemSpec::check(
            "login_5_1_2_login_methods",
            "login",
            "Several login methods",
            "Offer certificate, simple and ID-based login.",
            |f| f.markup.has_login_form && f.markup.button_count >= 2,
        ),
        dynamic("login_5_1_3_logout", "login", "Logout"),
        ItemSpec::check(
            "login_5_2_1_id_input",
            "login",
            "ID input",
            "Provide a labelled ID field.",
            |f| f.forms.input_count >= 1,
        ),
        ItemSpec::check(
            "login_5_2_2_password_input",
            "login",
            "Password input",
            "Use a masked password field.",
            |f| f.markup.has_password_input,
        ),
        ItemSpec::check(
            "login_5_2_3_auto_login",
            "login",
            "Remember-me option",
            "Offer a keep-me-signed-in checkbox.",
            |f| f.markup.checkbox_count > 0,
        ),
        ItemSpec::check(
            "login_5_2_4_find_account",
            "login",
            "Account recovery",
            "Link ID and password recovery next to the login form.",
            |f| f.markup.has_login_form && f.navigation.link_count > 5,
        ),
        // ── Application ──
        dynamic("application_6_1_1_service_info", "application", "Service description"),
        dynamic("application_6_1_2_eligibility", "application", "Eligibility"),
        dynamic("application_6_1_3_required_docs", "application", "Required documents"),
        dynamic("application_6_1_4_process_steps", "application", "Process steps"),
        dynamic("application_6_2_1_progress_indicator", "application", "Progress indicator"),
        dynamic("application_6_2_2_save_draft", "application", "Save draft"),
        ItemSpec::check(
            "application_6_2_3_inquiry_contact",
            "application",
            "Inquiry contact",
            "Show a phone number or contact link for questions.",
            |f| f.markup.has_contact,
        ),
        dynamic("application_6_2_4_status_check", "application", "Status check"),
        dynamic("application_6_2_5_result_notice", "application", "Result notification"),
        ItemSpec::check(
            "application_6_3_1_form_provision",
            "application",
            "Online form",
            "Provide the application as an online form.",
            |f| f.forms.form_count > 0,
        ),
        ItemSpec::check(
            "application_6_3_2_required_fields",
            "application",
            "Required fields are marked",
            "Mark required fields with required or aria-required.",
            |f| f.markup.has_required_fields,
        ),
        ItemSpec::check(
            "application_6_3_3_file_upload",
            "application",
            "File attachment",
            "Let users attach supporting documents.",
            |f| f.markup.has_file_upload,
        ),
        ItemSpec::check(
            "application_6_3_4_submit_button",
            "application",
            "Submit button",
            "End forms with a clearly labelled submit button.",
            |f| f.markup.button_count > 0,
        ),
    ];

    Taxonomy {
        name: NAME,
        title: "KRDS UI/UX convenience",
        categories,
        items,
        grading: GRADING,
    }
}
