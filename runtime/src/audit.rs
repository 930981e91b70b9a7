//! End-to-end audit: crawl, extract, score, calibrate, predict.

use crate::cartography::{CrawlError, CrawledPage, Crawler};
use crate::config::CrawlConfig;
use crate::extraction::{FeatureExtractor, PageFeatures, PatternExtractor, StructuralFeatures};
use crate::prediction::{NoVariance, PredictError, Prediction, Predictor, ReferenceCorpus, SeededJitter};
use crate::renderer::Renderer;
use crate::rules::RuleConfig;
use crate::scoring::{CalibrationTable, Report, Scorer, TaxonomyKind};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// What to run over the crawled pages.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub taxonomies: Vec<TaxonomyKind>,
    /// Condition chains overriding built-in item rules.
    pub rules: Option<Arc<RuleConfig>>,
    pub calibration: Option<CalibrationTable>,
    /// When set, a similarity prediction is added.
    pub corpus: Option<Arc<ReferenceCorpus>>,
    /// Seed for principle jitter; `None` means no jitter.
    pub seed: Option<u64>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            taxonomies: TaxonomyKind::ALL.to_vec(),
            rules: None,
            calibration: None,
            corpus: None,
            seed: None,
        }
    }
}

/// Reports and prediction for one page set.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub reports: Vec<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    pub site_url: String,
    pub pages: Vec<CrawledPage>,
    pub errors: Vec<String>,
    pub crawl_ms: u64,
    pub elapsed_ms: u64,
    pub reports: Vec<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

/// Score an already extracted page set. Pure: no I/O.
///
/// The main page drives item scores; the remaining pages feed per-page
/// attribution.
pub fn evaluate(
    site_url: &str,
    pages: &[PageFeatures],
    options: &AuditOptions,
) -> Result<Evaluation, PredictError> {
    let fallback = StructuralFeatures::default();
    let main = pages
        .iter()
        .find(|p| p.is_main)
        .or_else(|| pages.first())
        .map(|p| &p.features)
        .unwrap_or(&fallback);

    let reports = options
        .taxonomies
        .iter()
        .map(|kind| {
            let mut scorer = Scorer::new(kind.taxonomy());
            if let Some(rules) = &options.rules {
                scorer = scorer.with_rules(Arc::clone(rules));
            }
            let mut report = scorer.score(site_url, main, Some(pages));
            if let Some(table) = &options.calibration {
                table.apply(&mut report);
            }
            debug!(taxonomy = %kind, overall = report.overall, grade = %report.grade, "scored");
            report
        })
        .collect();

    let prediction = match &options.corpus {
        Some(corpus) => {
            let predictor = Predictor::new(corpus);
            Some(match options.seed {
                Some(seed) => predictor.predict_with(main, &mut SeededJitter::new(seed))?,
                None => predictor.predict_with(main, &mut NoVariance)?,
            })
        }
        None => None,
    };

    Ok(Evaluation { reports, prediction })
}

/// Runs audits over a caller-owned renderer.
pub struct Auditor {
    crawler: Crawler,
    extractor: Box<dyn FeatureExtractor>,
}

impl Auditor {
    pub fn new(renderer: Arc<dyn Renderer>, config: CrawlConfig) -> Self {
        Self {
            crawler: Crawler::new(renderer, config),
            extractor: Box::new(PatternExtractor::new()),
        }
    }

    /// Swap in a different feature extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn FeatureExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn crawler(&self) -> &Crawler {
        &self.crawler
    }

    pub async fn audit(&self, url: &str, options: &AuditOptions) -> Result<AuditOutcome, AuditError> {
        let started = Instant::now();
        let crawl = self.crawler.crawl(url).await?;

        let features: Vec<PageFeatures> = crawl
            .pages()
            .map(|page| PageFeatures {
                url: page.url.clone(),
                is_main: page.is_main,
                features: self.extractor.extract(&page.markup, &page.url),
            })
            .collect();

        let evaluation = evaluate(&crawl.main.url, &features, options)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            url = %crawl.main.url,
            pages = crawl.page_count,
            reports = evaluation.reports.len(),
            elapsed_ms,
            "audit complete"
        );

        let pages = crawl.pages().cloned().collect();
        Ok(AuditOutcome {
            site_url: crawl.main.url,
            pages,
            errors: crawl.errors,
            crawl_ms: crawl.elapsed_ms,
            elapsed_ms,
            reports: evaluation.reports,
            prediction: evaluation.prediction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::ReferenceSite;
    use crate::renderer::scripted::ScriptedRenderer;

    const MAIN: &str = r##"<!DOCTYPE html><html lang="ko"><head><title>Portal</title></head><body>
        <a href="#content" class="skip">Skip to content</a>
        <nav><ul><li><a href="/a">A</a></li><li><a href="/b">B</a></li></ul></nav>
        <form><label for="q">Search</label><input type="search" id="q" name="q" required></form>
        <img src="logo.png" alt="logo"><h1>Welcome</h1><p>Hello</p></body></html>"##;

    fn renderer() -> Arc<ScriptedRenderer> {
        Arc::new(
            ScriptedRenderer::new()
                .page("https://a.gov/", MAIN)
                .page("https://a.gov/a", "<html><body><img src=x.png><p>a</p></body></html>")
                .failing_page("https://a.gov/b", "HTTP 404"),
        )
    }

    fn config() -> CrawlConfig {
        CrawlConfig {
            settle_delay_ms: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_audit_produces_one_report_per_taxonomy() {
        let auditor = Auditor::new(renderer(), config());
        let outcome = auditor.audit("https://a.gov/", &AuditOptions::default()).await.unwrap();
        assert_eq!(outcome.pages.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        let names: Vec<&str> = outcome.reports.iter().map(|r| r.taxonomy.as_str()).collect();
        assert_eq!(names, vec!["nielsen", "krds-accessibility", "krds-uiux"]);
        for report in &outcome.reports {
            assert_eq!(report.page_count, 2);
        }
        assert!(outcome.prediction.is_none());
    }

    #[tokio::test]
    async fn test_alt_text_issue_names_failing_page() {
        let auditor = Auditor::new(renderer(), config());
        let options = AuditOptions {
            taxonomies: vec![TaxonomyKind::KrdsAccessibility],
            ..Default::default()
        };
        let outcome = auditor.audit("https://a.gov/", &options).await.unwrap();
        let report = &outcome.reports[0];
        let affected: Vec<&String> = report
            .items
            .iter()
            .flat_map(|i| i.affected_pages.iter())
            .collect();
        assert!(affected.iter().any(|u| u.as_str() == "https://a.gov/a"));
    }

    #[tokio::test]
    async fn test_empty_corpus_propagates() {
        let auditor = Auditor::new(renderer(), config());
        let options = AuditOptions {
            corpus: Some(Arc::new(ReferenceCorpus::default())),
            ..Default::default()
        };
        let err = auditor.audit("https://a.gov/", &options).await.unwrap_err();
        assert!(matches!(err, AuditError::Predict(PredictError::NoReferenceData)));
    }

    #[test]
    fn test_evaluate_with_corpus() {
        let corpus = ReferenceCorpus::new(vec![ReferenceSite {
            name: "ref".into(),
            url: None,
            features: StructuralFeatures::default(),
            score: 4.0,
        }]);
        let options = AuditOptions {
            taxonomies: vec![TaxonomyKind::Nielsen],
            corpus: Some(Arc::new(corpus)),
            seed: Some(1),
            ..Default::default()
        };
        let eval = evaluate("https://a.gov", &[], &options).unwrap();
        assert_eq!(eval.reports.len(), 1);
        assert_eq!(eval.prediction.unwrap().score, 4.0);
    }
}
