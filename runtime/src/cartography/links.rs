//! Sub-page link discovery and URL normalization.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#)
        .expect("valid regex")
});

/// A same-site link found on the main page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Absolute URL to fetch, fragment removed.
    pub url: String,
    /// Dedup key, see [`normalize_url`].
    pub normalized: String,
}

/// Strip query, fragment and trailing slashes from a URL.
///
/// Idempotent. Input that does not parse as a URL gets the same treatment
/// textually.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) => normalize_parsed(url),
        Err(_) => {
            let head = raw.trim().split(['?', '#']).next().unwrap_or_default();
            head.trim_end_matches('/').to_string()
        }
    }
}

fn normalize_parsed(mut url: Url) -> String {
    url.set_query(None);
    url.set_fragment(None);
    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&path);
    let mut out = url.to_string();
    // Root path serializes as "/"
    if url.path() == "/" && out.ends_with('/') {
        out.pop();
    }
    out
}

fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(str::to_ascii_lowercase)
}

/// Anchor targets on `base`'s host, in document order, deduplicated by
/// normalized URL and capped at `max`. The base page itself is never returned.
pub fn discover_links(markup: &str, base: &Url, max: usize) -> Vec<DiscoveredLink> {
    let mut out = Vec::new();
    if max == 0 {
        return out;
    }

    let host = host_of(base);
    let mut seen = HashSet::from([normalize_parsed(base.clone())]);

    for cap in ANCHOR_HREF.captures_iter(markup) {
        let Some(raw) = cap.get(1).or_else(|| cap.get(2)).or_else(|| cap.get(3)) else {
            continue;
        };
        let href = raw.as_str().trim().replace("&amp;", "&");
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        let Ok(mut absolute) = base.join(&href) else {
            continue;
        };
        if !matches!(absolute.scheme(), "http" | "https") || host_of(&absolute) != host {
            continue;
        }
        absolute.set_fragment(None);

        let normalized = normalize_parsed(absolute.clone());
        if !seen.insert(normalized.clone()) {
            continue;
        }

        out.push(DiscoveredLink {
            url: absolute.to_string(),
            normalized,
        });
        if out.len() >= max {
            break;
        }
    }

    out
}
