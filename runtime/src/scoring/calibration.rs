//! Versioned per-site calibration overrides.
//!
//! Historical score corrections for specific domains live in a data table,
//! applied after scoring as a separate step. Every applied override is
//! recorded on the report so adjusted scores stay auditable.

use crate::rules::calibrate;
use crate::scoring::report::{AppliedCalibration, Report};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOverride {
    /// Host the override applies to; subdomains and `www.` match too.
    pub domain: String,
    pub taxonomy: String,
    /// Item to shift; `None` shifts the overall score.
    #[serde(default)]
    pub item_id: Option<String>,
    pub delta: f64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTable {
    pub version: String,
    #[serde(default)]
    pub overrides: Vec<CalibrationOverride>,
}

impl CalibrationTable {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing calibration table")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading calibration table {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Overrides matching the report's host and taxonomy, in table order.
    pub fn matching<'a>(&'a self, report: &'a Report) -> impl Iterator<Item = &'a CalibrationOverride> + 'a {
        let host = site_host(&report.site_url);
        self.overrides.iter().filter(move |o| {
            o.taxonomy == report.taxonomy && host.as_deref().is_some_and(|h| host_matches(h, &o.domain))
        })
    }

    /// Apply matching overrides and recompute the report. Returns how many applied.
    pub fn apply(&self, report: &mut Report) -> usize {
        let matched: Vec<CalibrationOverride> = self.matching(report).cloned().collect();
        let mut applied = 0;

        for o in matched {
            match &o.item_id {
                Some(id) => {
                    let Some(item) = report.item_mut(id) else {
                        debug!(item = %id, "calibration target not in report");
                        continue;
                    };
                    if !item.is_applicable() {
                        continue;
                    }
                    let score = calibrate(item.score + o.delta);
                    item.set_score(score);
                }
                None => report.overall_adjustment += o.delta,
            }
            report.calibrations.push(AppliedCalibration {
                table_version: self.version.clone(),
                item_id: o.item_id.clone(),
                delta: o.delta,
                reason: o.reason.clone(),
            });
            applied += 1;
        }

        if applied > 0 {
            report.recompute();
            info!(
                site = %report.site_url,
                taxonomy = %report.taxonomy,
                applied,
                version = %self.version,
                "applied calibration overrides"
            );
        }
        applied
    }
}

fn site_host(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim().trim_start_matches("www.").to_ascii_lowercase();
    let host = host.trim_start_matches("www.");
    host == domain || host.ends_with(&format!(".{domain}"))
}
