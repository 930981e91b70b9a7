//! Reference corpus of previously evaluated sites.

use crate::extraction::StructuralFeatures;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One previously evaluated site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSite {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Features recorded when the site was evaluated; missing fields are neutral.
    #[serde(default)]
    pub features: StructuralFeatures,
    /// Known overall score on the 2..5 scale.
    pub score: f64,
}

/// Read-only list of reference sites, in file order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    sites: Vec<ReferenceSite>,
}

impl ReferenceCorpus {
    pub fn new(sites: Vec<ReferenceSite>) -> Self {
        Self { sites }
    }

    /// Parse a JSON array of reference sites.
    pub fn from_json(text: &str) -> Result<Self> {
        let sites: Vec<ReferenceSite> =
            serde_json::from_str(text).context("parsing reference corpus")?;
        Ok(Self { sites })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading reference corpus {}", path.display()))?;
        let corpus = Self::from_json(&text)?;
        info!(path = %path.display(), sites = corpus.len(), "loaded reference corpus");
        Ok(corpus)
    }

    pub fn sites(&self) -> &[ReferenceSite] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_features_default_to_neutral() {
        let corpus = ReferenceCorpus::from_json(
            r#"[
                { "name": "a", "score": 4.1, "features": { "navigation": { "search_exists": true } } },
                { "name": "b", "score": 3.2 }
            ]"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 2);
        let a = &corpus.sites()[0];
        assert!(a.features.navigation.search_exists);
        assert_eq!(a.features.navigation.menu_depth, 1);
        assert_eq!(corpus.sites()[1].features.accessibility.alt_text_ratio, 1.0);
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(ReferenceCorpus::from_json(r#"{"name":"a"}"#).is_err());
    }
}
