//! `sitegrade score <file.html>`: grade saved markup without fetching anything.

use crate::audit::{evaluate, AuditOptions};
use crate::cli::{self, output};
use crate::extraction::{FeatureExtractor, PageFeatures, PatternExtractor};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub fn run(
    file: &Path,
    url: &str,
    taxonomy: &str,
    rules: Option<PathBuf>,
    calibration: Option<PathBuf>,
) -> Result<()> {
    let markup = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;

    let options = AuditOptions {
        taxonomies: cli::parse_taxonomies(taxonomy)?,
        rules: cli::load_rules(rules)?,
        calibration: cli::load_calibration(calibration)?,
        ..Default::default()
    };

    let page = PageFeatures {
        url: url.to_string(),
        is_main: true,
        features: PatternExtractor::new().extract(&markup, url),
    };
    let evaluation = evaluate(url, std::slice::from_ref(&page), &options)?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "url": url,
            "features": page.features,
            "reports": evaluation.reports,
        }));
        return Ok(());
    }

    let s = output::Styled::new();
    if output::is_quiet() {
        for report in &evaluation.reports {
            println!("{}\t{}\t{:.2}", report.taxonomy, report.grade, report.overall);
        }
        return Ok(());
    }

    output::print_header(&s);
    if output::is_verbose() {
        output::print_section(&s, "Features");
        output::print_detail(&serde_json::to_string(&page.features)?);
        eprintln!();
    }
    for report in &evaluation.reports {
        output::print_report(&s, report);
    }
    Ok(())
}
