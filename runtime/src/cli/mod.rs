//! CLI subcommand implementations for the sitegrade binary.

pub mod audit_cmd;
pub mod output;
pub mod predict_cmd;
pub mod rules_cmd;
pub mod score_cmd;

use crate::config;
use crate::prediction::ReferenceCorpus;
use crate::rules::{RuleConfig, RuleStore};
use crate::scoring::{CalibrationTable, TaxonomyKind};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Expand a `--taxonomy` value; "all" selects every built-in taxonomy.
pub fn parse_taxonomies(value: &str) -> Result<Vec<TaxonomyKind>> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(TaxonomyKind::ALL.to_vec());
    }
    value
        .split(',')
        .map(|name| name.trim().parse::<TaxonomyKind>().map_err(anyhow::Error::msg))
        .collect()
}

/// Rule config from `--rules` or `~/.sitegrade/rules.json`, if either exists.
pub fn load_rules(explicit: Option<PathBuf>) -> Result<Option<Arc<RuleConfig>>> {
    let Some(path) = config::resolve_optional(explicit, config::default_rules_path()) else {
        return Ok(None);
    };
    let store = RuleStore::open(&path).with_context(|| format!("loading rules {}", path.display()))?;
    Ok(Some(store.snapshot()))
}

pub fn load_calibration(explicit: Option<PathBuf>) -> Result<Option<CalibrationTable>> {
    config::resolve_optional(explicit, config::default_calibration_path())
        .map(|path| CalibrationTable::load(&path))
        .transpose()
}

pub fn load_corpus(explicit: Option<PathBuf>) -> Result<Option<Arc<ReferenceCorpus>>> {
    config::resolve_optional(explicit, config::default_corpus_path())
        .map(|path| ReferenceCorpus::load(&path).map(Arc::new))
        .transpose()
}
