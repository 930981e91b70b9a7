//! `sitegrade rules check <PATH>`: validate a condition-chain rule file.

use crate::cli::output;
use crate::extraction::StructuralFeatures;
use crate::rules::chain::resolve_path;
use crate::rules::RuleConfig;
use crate::scoring::TaxonomyKind;
use anyhow::{bail, Result};
use std::path::Path;

/// Problems found in an otherwise parseable rule file.
#[derive(Debug, Default, PartialEq)]
pub struct RuleCheck {
    pub unknown_items: Vec<String>,
    /// `(item id, field path)` pairs that address no feature.
    pub unresolved_fields: Vec<(String, String)>,
    pub rejected: Vec<String>,
}

impl RuleCheck {
    pub fn is_clean(&self) -> bool {
        self.unknown_items.is_empty() && self.unresolved_fields.is_empty() && self.rejected.is_empty()
    }
}

pub fn check(config: &RuleConfig) -> RuleCheck {
    let shape = StructuralFeatures::default().to_value();
    let mut result = RuleCheck {
        rejected: config.rejected.clone(),
        ..Default::default()
    };

    for id in config.item_ids() {
        let known = TaxonomyKind::ALL.iter().any(|k| k.taxonomy().item(id).is_some());
        if !known {
            result.unknown_items.push(id.to_string());
        }
        if let Some(rule) = config.get(id) {
            for c in &rule.conditions {
                if resolve_path(&shape, &c.field).is_none() {
                    result.unresolved_fields.push((id.to_string(), c.field.clone()));
                }
            }
        }
    }
    result
}

pub fn run(path: &Path) -> Result<()> {
    let config = RuleConfig::load(path)?;
    let report = check(&config);

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "version": config.version,
            "items": config.item_ids(),
            "unknown_items": report.unknown_items,
            "unresolved_fields": report.unresolved_fields,
            "rejected": report.rejected,
        }));
    } else if !output::is_quiet() {
        let s = output::Styled::new();
        output::print_section(&s, &format!("{} (version {})", path.display(), config.version));
        for id in config.item_ids() {
            let conditions = config.get(id).map_or(0, |r| r.conditions.len());
            let sym = if report.unknown_items.iter().any(|u| u == id) {
                s.warn_sym()
            } else {
                s.ok_sym()
            };
            output::print_check(sym, id, &format!("{conditions} condition(s)"));
        }
        for id in &report.rejected {
            output::print_check(s.fail_sym(), id, "malformed entry, built-in rule used");
        }
        for (id, field) in &report.unresolved_fields {
            output::print_check(s.warn_sym(), id, &format!("field {field:?} never resolves"));
        }
    }

    if !report.rejected.is_empty() {
        bail!("{} malformed rule entr(ies)", report.rejected.len());
    }
    Ok(())
}
