//! Pattern-matching feature extractor.
//!
//! Counts tag and attribute occurrences in raw markup instead of building a
//! document tree. Boolean signals are disjunctions over several independent
//! patterns: any single match sets the flag. Results are directionally
//! correct, not exact, and malformed markup simply yields fewer matches.

use crate::extraction::features::*;
use crate::extraction::FeatureExtractor;
use regex::{Regex, RegexSet};
use std::sync::LazyLock;
use tracing::debug;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static feature pattern is valid")
}

fn set(patterns: &[&str]) -> RegexSet {
    RegexSet::new(patterns).expect("static feature pattern set is valid")
}

// ── Navigation ──

static NAV_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<nav\b[^>]*>"));
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<a\s+[^>]*href"));
static NESTED_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?is)<ul[^>]*>.*?<li[^>]*>.*?<ul"));

static BREADCRUMB_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    set(&[
        r"(?i)breadcrumb",
        r"(?i)location[_-]?wrap",
        r"현재\s*위치",
        r"(?i)navi[_-]?home",
        r#"(?i)(?:class|id)\s*=\s*["'][^"']*path[^"']*["']"#,
        r#"(?i)(?:class|id)\s*=\s*["'][^"']*location[^"']*["']"#,
        r"(?i)>\s*(?:home|홈)\s*(?:</a>\s*)?(?:&gt;|[>›»▶])",
    ])
});

static SEARCH_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    set(&[
        r#"(?i)type\s*=\s*["']?search"#,
        r#"(?i)role\s*=\s*["']?search"#,
        r#"(?i)name\s*=\s*["']?(?:search|query|keyword|searchword|q|kwd)["'\s>/]"#,
        r#"(?i)(?:class|id)\s*=\s*["'][^"']*search[^"']*["']"#,
        r#"(?i)placeholder\s*=\s*["'][^"']*(?:검색|search)"#,
        r"(?i)<button[^>]*>[^<]*(?:검색|search)",
        r"(?i)<input[^>]*>[\s\S]{0,100}?검색",
    ])
});

// ── Accessibility ──

static IMG_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<img\b[^>]*>"));
static ALT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\balt\s*="));
static ARIA_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)aria-label\s*="));
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<h[1-6][\s>]"));
static LANG_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<html[^>]*\blang\s*="));
static SKIP_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)skip[\s_-]*(?:to[\s_-]*)?(?:main[\s_-]*)?content|skip[\s_-]*nav(?:igation)?|본문\s*바로\s*가기")
});

// ── Content ──

static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<p[\s>]"));
static LIST_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<(?:ul|ol)[\s>]"));
static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<table[\s>]"));

// ── Forms ──

static FORM_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<form[\s>]"));
static INPUT_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<input\b"));
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<label[\s>]"));
static VALIDATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)<(?:input|textarea|select)[^>]*\b(?:required|pattern\s*=|minlength\s*=|maxlength\s*=)")
});

// ── Visuals ──

static VIDEO_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)<video[\s>]|<iframe[^>]*(?:youtube|vimeo)"));

static ICON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bfa-[a-z]",
        r#"(?i)<i\s[^>]*class\s*=\s*["'][^"']*icon"#,
        r"(?i)<svg[\s>]",
        r"(?i)<img[^>]*(?:icon|ico_)[^>]*>",
        r"(?i)\bmaterial-icons\b|\bmdi?-[a-z]",
        r"(?i)\bglyphicon-[a-z]",
        r#"(?i)class\s*=\s*["'][^"']*\b(?:bi|ti|ri|xi|hero|feather)-[a-z]"#,
    ]
    .iter()
    .map(|p| re(p))
    .collect()
});

// ── Markup signals ──

static DOCTYPE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<!doctype\s+html"));
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<html[\s>]"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?is)<title[^>]*>\s*[^<\s][^<]*</title>"));
static VIEWPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?i)<meta[^>]*name\s*=\s*["']?viewport"#));
static TRACK_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<track[\s>]"));
static AUTOPLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)<(?:video|audio|iframe)[^>]*\bautoplay"));
static TH_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<th[\s>]"));
static ONCLICK_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\bonclick\s*="));
static TABINDEX_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\btabindex\s*="));
static ACCESSKEY_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\baccesskey\s*="));
static TIMER_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)\bsetTimeout\s*\(|<meta[^>]*http-equiv\s*=\s*["']?refresh"#)
});
static CAROUSEL_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)carousel|slider|swiper|\bslick\b"));
static PAUSE_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    set(&[
        r#"(?i)(?:class|id|aria-label|title)\s*=\s*["'][^"']*(?:pause|stop|정지)"#,
        r"(?i)>\s*(?:pause|stop|정지|일시\s*정지)\s*<",
    ])
});
static FLASHING_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)<blink[\s>]|@keyframes\s+[\w-]*(?:blink|flash)"));
static TARGET_BLANK_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?i)target\s*=\s*["']?_blank"#));
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\bplaceholder\s*="));
static AUTOCOMPLETE_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)\bautocomplete\s*=\s*["']?(?:on|name|email|tel|username|[a-z-]*password|given-name|family-name|street-address|postal-code|country|bday)"#)
});
static CAPTCHA_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)captcha|자동\s*입력\s*방지"));
static REQUIRED_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)<(?:input|select|textarea)[^>]*\brequired\b|aria-required\s*=\s*["']?true"#)
});
static RESET_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)type\s*=\s*["']?reset|>\s*(?:취소|cancel|초기화|reset|되돌리기|undo)\s*<"#)
});
static CONFIRM_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)\bconfirm\s*\(|<dialog[\s>]|role\s*=\s*["']?(?:alert)?dialog"#)
});
static PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?i)<input[^>]*type\s*=\s*["']?password"#));
static FILE_INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?i)<input[^>]*type\s*=\s*["']?file"#));
static CHECKBOX_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?i)<input[^>]*type\s*=\s*["']?checkbox"#));
static SELECT_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<select[\s>]"));
static BUTTON_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)<button[\s>]|<input[^>]*type\s*=\s*["']?(?:submit|button)"#)
});
static ARIA_LIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)aria-live\s*=|role\s*=\s*["']?(?:status|progressbar)"#)
});
static ERROR_REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)role\s*=\s*["']?alert\b|aria-invalid\s*=|(?:class|id)\s*=\s*["'][^"']*(?:error|invalid)[^"']*["']"#)
});
static HELP_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    set(&[
        r"(?i)<a[^>]*>[^<]*(?:help|faq|도움말|자주\s*묻는\s*질문)",
        r#"(?i)href\s*=\s*["'][^"']*(?:help|faq)"#,
    ])
});
static OFFICIAL_BANNER_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    set(&[
        r"이\s*누리집은\s*대한민국\s*공식\s*전자정부\s*누리집",
        r"(?i)official\s+(?:government\s+)?website",
        r#"(?i)(?:class|id)\s*=\s*["'][^"']*(?:official|gov-?banner|masthead)"#,
    ])
});
static LOGO_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?i)(?:class|id|alt|src)\s*=\s*["'][^"']*logo"#));
static HOME_LINK_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    set(&[
        r#"(?i)<a[^>]*href\s*=\s*["'](?:/|\./|/?index\.\w+)["']"#,
        r"(?i)>\s*(?:home|홈|처음으로)\s*<",
    ])
});
static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)<footer[\s>]|(?:class|id)\s*=\s*["'][^"']*footer"#)
});
static SIDE_NAV_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)(?:class|id)\s*=\s*["'][^"']*(?:lnb|snb|side-?(?:nav|menu|bar)|sub-?menu)"#)
});
static LOGIN_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    set(&[
        r#"(?i)href\s*=\s*["'][^"']*(?:login|signin|sign-in)"#,
        r"(?i)>\s*(?:로그인|log\s*in|sign\s*in)\s*<",
    ])
});
static CONTACT_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    set(&[
        r#"(?i)href\s*=\s*["'](?:tel|mailto):"#,
        r"(?i)문의|contact\s*us|고객\s*센터|민원",
    ])
});
static ROLE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\brole\s*="));

fn count(pattern: &Regex, text: &str) -> u32 {
    u32::try_from(pattern.find_iter(text).count()).unwrap_or(u32::MAX)
}

/// Default extractor: regex occurrence counting over raw markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }

    fn navigation(html: &str) -> NavigationFeatures {
        NavigationFeatures {
            menu_count: count(&NAV_RE, html),
            link_count: count(&LINK_RE, html),
            breadcrumb_exists: BREADCRUMB_SET.is_match(html),
            search_exists: SEARCH_SET.is_match(html),
            menu_depth: if NESTED_LIST_RE.is_match(html) { 2 } else { 1 },
        }
    }

    fn accessibility(html: &str) -> AccessibilityFeatures {
        let mut images = 0usize;
        let mut with_alt = 0usize;
        for tag in IMG_RE.find_iter(html) {
            images += 1;
            if ALT_ATTR_RE.is_match(tag.as_str()) {
                with_alt += 1;
            }
        }

        AccessibilityFeatures {
            alt_text_ratio: neutral_ratio(with_alt, images),
            aria_label_count: count(&ARIA_LABEL_RE, html),
            heading_structure: HEADING_RE.is_match(html),
            lang_attribute: LANG_RE.is_match(html),
            skip_link_exists: SKIP_LINK_RE.is_match(html),
        }
    }

    fn content(html: &str) -> ContentFeatures {
        ContentFeatures {
            heading_count: count(&HEADING_RE, html),
            paragraph_count: count(&PARAGRAPH_RE, html),
            list_count: count(&LIST_RE, html),
            table_count: count(&TABLE_RE, html),
        }
    }

    fn forms(html: &str) -> FormFeatures {
        let inputs = INPUT_RE.find_iter(html).count();
        let labels = LABEL_RE.find_iter(html).count();
        FormFeatures {
            form_count: count(&FORM_RE, html),
            input_count: u32::try_from(inputs).unwrap_or(u32::MAX),
            label_ratio: neutral_ratio(labels, inputs),
            validation_exists: VALIDATION_RE.is_match(html),
        }
    }

    fn visuals(html: &str) -> VisualFeatures {
        let icons: u32 = ICON_PATTERNS
            .iter()
            .map(|p| count(p, html))
            .fold(0u32, u32::saturating_add);
        VisualFeatures {
            image_count: count(&IMG_RE, html),
            video_count: count(&VIDEO_RE, html),
            icon_count: icons,
        }
    }

    fn markup(html: &str) -> MarkupSignals {
        MarkupSignals {
            has_doctype: DOCTYPE_RE.is_match(html),
            has_html_tag: HTML_TAG_RE.is_match(html),
            has_title: TITLE_RE.is_match(html),
            has_viewport_meta: VIEWPORT_RE.is_match(html),

            has_track: TRACK_RE.is_match(html),
            has_autoplay: AUTOPLAY_RE.is_match(html),
            has_table_headers: TH_RE.is_match(html),

            onclick_count: count(&ONCLICK_RE, html),
            has_tabindex: TABINDEX_RE.is_match(html),
            has_accesskey: ACCESSKEY_RE.is_match(html),
            has_set_timeout: TIMER_RE.is_match(html),
            has_carousel: CAROUSEL_RE.is_match(html),
            has_pause_control: PAUSE_SET.is_match(html),
            has_flashing: FLASHING_RE.is_match(html),
            target_blank_count: count(&TARGET_BLANK_RE, html),

            has_label: LABEL_RE.is_match(html),
            has_placeholder: PLACEHOLDER_RE.is_match(html),
            has_autocomplete: AUTOCOMPLETE_RE.is_match(html),
            has_captcha: CAPTCHA_RE.is_match(html),
            has_required_fields: REQUIRED_RE.is_match(html),
            has_reset_control: RESET_RE.is_match(html),
            has_confirm_dialog: CONFIRM_RE.is_match(html),
            has_password_input: PASSWORD_RE.is_match(html),
            has_file_upload: FILE_INPUT_RE.is_match(html),
            checkbox_count: count(&CHECKBOX_RE, html),
            select_count: count(&SELECT_RE, html),
            button_count: count(&BUTTON_RE, html),

            has_aria_live: ARIA_LIVE_RE.is_match(html),
            has_error_region: ERROR_REGION_RE.is_match(html),

            has_help_link: HELP_SET.is_match(html),
            has_official_banner: OFFICIAL_BANNER_SET.is_match(html),
            has_logo: LOGO_RE.is_match(html),
            has_home_link: HOME_LINK_SET.is_match(html),
            has_footer: FOOTER_RE.is_match(html),
            has_side_nav: SIDE_NAV_RE.is_match(html),
            has_login_form: LOGIN_SET.is_match(html) || PASSWORD_RE.is_match(html),
            has_contact: CONTACT_SET.is_match(html),
            has_role_attribute: ROLE_RE.is_match(html),
        }
    }
}

impl FeatureExtractor for PatternExtractor {
    fn extract(&self, markup: &str, url: &str) -> StructuralFeatures {
        let features = StructuralFeatures {
            navigation: Self::navigation(markup),
            accessibility: Self::accessibility(markup),
            content: Self::content(markup),
            forms: Self::forms(markup),
            visuals: Self::visuals(markup),
            markup: Self::markup(markup),
        };
        debug!(
            url,
            links = features.navigation.link_count,
            images = features.visuals.image_count,
            forms = features.forms.form_count,
            "extracted structural features"
        );
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> StructuralFeatures {
        PatternExtractor::new().extract(html, "https://a.gov/")
    }

    #[test]
    fn test_empty_markup_is_neutral() {
        let f = extract("");
        assert_eq!(f.accessibility.alt_text_ratio, 1.0);
        assert_eq!(f.forms.label_ratio, 1.0);
        assert_eq!(f.navigation.link_count, 0);
        assert_eq!(f.navigation.menu_depth, 1);
    }

    #[test]
    fn test_malformed_markup_degrades() {
        let f = extract("<div <img src=x <<< </p <a href");
        assert!(f.accessibility.alt_text_ratio >= 0.0 && f.accessibility.alt_text_ratio <= 1.0);
        assert!(!f.navigation.breadcrumb_exists);
    }

    #[test]
    fn test_alt_ratio() {
        let f = extract(r#"<img src="a.png" alt="a"><img src="b.png"><img alt="" src="c.png"><IMG SRC="d.png">"#);
        assert_eq!(f.visuals.image_count, 4);
        assert_eq!(f.accessibility.alt_text_ratio, 0.5);
    }

    #[test]
    fn test_nav_and_links() {
        let links: String = (0..20)
            .map(|i| format!(r#"<a href="/p{i}">p{i}</a>"#))
            .collect();
        let f = extract(&format!("<nav class=\"gnb\">{links}</nav>"));
        assert_eq!(f.navigation.menu_count, 1);
        assert_eq!(f.navigation.link_count, 20);
    }

    #[test]
    fn test_breadcrumb_disjunction() {
        assert!(extract(r#"<div class="breadcrumb">x</div>"#).navigation.breadcrumb_exists);
        assert!(extract(r#"<div class="location_wrap">x</div>"#).navigation.breadcrumb_exists);
        assert!(extract("<p>현재 위치: 홈</p>").navigation.breadcrumb_exists);
        assert!(extract(r#"<div id="sub-path">x</div>"#).navigation.breadcrumb_exists);
        assert!(extract(r#"<a href="/">Home</a> &gt; <span>About</span>"#).navigation.breadcrumb_exists);
        assert!(!extract("<div class=\"content\">Welcome home</div>").navigation.breadcrumb_exists);
    }

    #[test]
    fn test_search_disjunction() {
        assert!(extract(r#"<input type="search">"#).navigation.search_exists);
        assert!(extract(r#"<form role="search"></form>"#).navigation.search_exists);
        assert!(extract(r#"<input name="kwd">"#).navigation.search_exists);
        assert!(extract(r#"<input type="text" placeholder="검색어를 입력하세요">"#).navigation.search_exists);
        assert!(extract(r#"<input type="text"><button>검색</button>"#).navigation.search_exists);
        assert!(!extract(r#"<input type="text" name="email">"#).navigation.search_exists);
    }

    #[test]
    fn test_menu_depth() {
        assert_eq!(extract("<ul><li>a</li></ul>").navigation.menu_depth, 1);
        assert_eq!(
            extract("<ul><li>a<ul><li>b</li></ul></li></ul>").navigation.menu_depth,
            2
        );
    }

    #[test]
    fn test_accessibility_signals() {
        let f = extract(
            r##"<!DOCTYPE html><html lang="ko"><head><title>Site</title></head>
            <body><a href="#content">Skip to content</a><h1>T</h1><h2>S</h2>
            <button aria-label="menu"></button></body></html>"##,
        );
        assert!(f.accessibility.lang_attribute);
        assert!(f.accessibility.skip_link_exists);
        assert!(f.accessibility.heading_structure);
        assert_eq!(f.accessibility.aria_label_count, 1);
        assert_eq!(f.content.heading_count, 2);
        assert!(f.markup.has_doctype);
        assert!(f.markup.has_title);
    }

    #[test]
    fn test_form_features() {
        let f = extract(
            r#"<form><label for="a">A</label><input id="a" required>
            <label for="b">B</label><input id="b" maxlength="10">
            <label for="c">C</label><input id="c"></form>"#,
        );
        assert_eq!(f.forms.form_count, 1);
        assert_eq!(f.forms.input_count, 3);
        assert_eq!(f.forms.label_ratio, 1.0);
        assert!(f.forms.validation_exists);
        assert!(f.markup.has_required_fields);
    }

    #[test]
    fn test_label_ratio_without_labels() {
        let f = extract("<form><input><input></form>");
        assert_eq!(f.forms.label_ratio, 0.0);
        assert!(!f.forms.validation_exists);
    }

    #[test]
    fn test_icon_markers() {
        let f = extract(
            r#"<i class="fa fa-home"></i><svg></svg><span class="material-icons">x</span>
            <img src="ico_search.png" alt="s">"#,
        );
        assert!(f.visuals.icon_count >= 4);
    }

    #[test]
    fn test_content_counts() {
        let f = extract("<p>a</p><p>b</p><ul></ul><ol></ol><table></table><pre>x</pre>");
        assert_eq!(f.content.paragraph_count, 2);
        assert_eq!(f.content.list_count, 2);
        assert_eq!(f.content.table_count, 1);
    }
}
