//! `sitegrade audit <url>`: crawl a live site and grade it.

use crate::audit::{AuditOptions, Auditor};
use crate::cli::{self, output};
use crate::config::CrawlConfig;
use crate::renderer::{ChromiumRenderer, HttpRenderer, Renderer};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Flags for one audit run.
#[derive(Debug, Clone, Default)]
pub struct AuditArgs {
    pub url: String,
    pub taxonomy: String,
    pub config: CrawlConfig,
    pub http: bool,
    pub rules: Option<PathBuf>,
    pub corpus: Option<PathBuf>,
    pub calibration: Option<PathBuf>,
    pub seed: Option<u64>,
}

pub async fn run(args: AuditArgs) -> Result<()> {
    let options = AuditOptions {
        taxonomies: cli::parse_taxonomies(&args.taxonomy)?,
        rules: cli::load_rules(args.rules)?,
        calibration: cli::load_calibration(args.calibration)?,
        corpus: cli::load_corpus(args.corpus)?,
        seed: args.seed,
    };

    let s = output::Styled::new();
    if !output::is_quiet() && !output::is_json() {
        output::print_header(&s);
        eprintln!("  Auditing {}...", s.cyan(&args.url));
        eprintln!();
    }

    let renderer: Arc<dyn Renderer> = if args.http {
        Arc::new(HttpRenderer::new(args.config.user_agent.as_deref())?)
    } else {
        Arc::new(ChromiumRenderer::launch().await?)
    };

    let auditor = Auditor::new(Arc::clone(&renderer), args.config);
    let result = auditor.audit(&args.url, &options).await;
    if let Err(e) = renderer.shutdown().await {
        warn!("renderer shutdown failed: {e:#}");
    }
    let outcome = result.with_context(|| format!("auditing {}", args.url))?;

    if output::is_json() {
        output::print_json(&serde_json::to_value(&outcome)?);
        return Ok(());
    }
    if output::is_quiet() {
        for report in &outcome.reports {
            println!("{}\t{}\t{:.2}", report.taxonomy, report.grade, report.overall);
        }
        return Ok(());
    }

    output::print_section(&s, "Crawl");
    for page in &outcome.pages {
        let sym = if page.error.is_some() { s.warn_sym() } else { s.ok_sym() };
        output::print_check(sym, &page.url, &output::format_ms(page.fetch_ms));
    }
    for error in &outcome.errors {
        output::print_check(s.fail_sym(), "", error);
    }
    output::print_detail(&s.dim(&format!(
        "{} page(s) in {}",
        outcome.pages.len(),
        output::format_ms(outcome.crawl_ms)
    )));
    eprintln!();

    for report in &outcome.reports {
        output::print_report(&s, report);
    }
    if let Some(prediction) = &outcome.prediction {
        output::print_prediction(&s, prediction);
    }
    Ok(())
}
