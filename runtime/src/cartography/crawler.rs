//! Batched site crawler: main page, link discovery, then sub-pages in
//! fixed-size concurrent batches.

use crate::cartography::links::{discover_links, normalize_url};
use crate::config::CrawlConfig;
use crate::pool::PagePool;
use crate::renderer::{RenderContext, Renderer};
use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported URL scheme {scheme:?} (expected http or https)")]
    UnsupportedScheme { scheme: String },
    #[error("main page {url} could not be fetched: {source}")]
    MainPage {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// One fetched page.
#[derive(Debug, Clone, Serialize)]
pub struct CrawledPage {
    /// Normalized URL.
    pub url: String,
    /// URL after redirects.
    pub final_url: String,
    #[serde(skip)]
    pub markup: String,
    pub is_main: bool,
    pub fetch_ms: u64,
    /// Non-fatal problem noticed while loading, such as a selector that never appeared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a crawl produced.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub main: CrawledPage,
    pub sub_pages: Vec<CrawledPage>,
    /// Main page plus successfully fetched sub-pages.
    pub page_count: usize,
    pub batches: usize,
    pub elapsed_ms: u64,
    pub errors: Vec<String>,
    pub success: bool,
}

impl CrawlOutcome {
    /// Main page first, then sub-pages in discovery order.
    pub fn pages(&self) -> impl Iterator<Item = &CrawledPage> {
        std::iter::once(&self.main).chain(self.sub_pages.iter())
    }
}

/// Drives one crawl over a shared renderer.
///
/// The renderer (browser session) belongs to the caller and outlives the crawl.
pub struct Crawler {
    pool: PagePool,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(renderer: Arc<dyn Renderer>, config: CrawlConfig) -> Self {
        let pool = PagePool::new(renderer, config.effective_batch_size());
        Self { pool, config }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn pool(&self) -> &PagePool {
        &self.pool
    }

    pub async fn crawl(&self, base_url: &str) -> Result<CrawlOutcome, CrawlError> {
        let started = Instant::now();
        let base = Url::parse(base_url.trim()).map_err(|source| CrawlError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CrawlError::UnsupportedScheme {
                scheme: base.scheme().to_string(),
            });
        }

        let main = self
            .fetch_page(base.as_str(), true, self.config.timeout_ms)
            .await
            .map_err(|e| CrawlError::MainPage {
                url: base.to_string(),
                source: e.into(),
            })?;
        info!(url = %main.url, fetch_ms = main.fetch_ms, "fetched main page");

        let mut errors = Vec::new();
        if let Some(problem) = &main.error {
            errors.push(format!("Main page ({}): {problem}", main.url));
        }

        let links = discover_links(&main.markup, &base, self.config.max_sub_pages);
        info!(count = links.len(), "discovered sub-pages");

        let budget = self.config.sub_page_timeout_ms();
        let batch_size = self.config.effective_batch_size();
        let mut sub_pages = Vec::with_capacity(links.len());
        let mut batches = 0;

        for batch in links.chunks(batch_size) {
            batches += 1;
            debug!(batch = batches, size = batch.len(), "fetching sub-page batch");
            let results =
                join_all(batch.iter().map(|link| self.fetch_page(&link.url, false, budget))).await;

            for (link, result) in batch.iter().zip(results) {
                let cause = match result {
                    Ok(page) if page.error.is_none() => {
                        sub_pages.push(page);
                        continue;
                    }
                    Ok(page) => page.error.unwrap_or_default(),
                    Err(e) => format!("{e:#}"),
                };
                warn!(url = %link.url, "sub-page failed: {cause}");
                errors.push(format!("Sub-page crawl failed ({}): {cause}", link.url));
            }
            debug!(batch = batches, fetched = sub_pages.len(), "batch finished");
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            pages = 1 + sub_pages.len(),
            failed = errors.len(),
            elapsed_ms,
            "crawl complete"
        );

        Ok(CrawlOutcome {
            page_count: 1 + sub_pages.len(),
            main,
            sub_pages,
            batches,
            elapsed_ms,
            errors,
            success: true,
        })
    }

    /// Fetch one page. `budget_ms` bounds waiting for a page slot and the
    /// navigation itself; the selector wait and settle delay run outside it.
    /// The page context is closed on every path.
    async fn fetch_page(&self, url: &str, is_main: bool, budget_ms: u64) -> Result<CrawledPage> {
        let started = Instant::now();
        let budget = Duration::from_millis(budget_ms);
        let mut handle = tokio::time::timeout(budget, self.pool.acquire())
            .await
            .with_context(|| format!("no free page slot after {budget_ms}ms"))?
            .context("opening page context")?;

        let loaded = self.load(handle.context_mut(), url, budget_ms).await;

        if let Err(e) = self.pool.release(handle).await {
            debug!(url, "closing page context: {e:#}");
        }

        let (final_url, markup, selector_problem) = loaded?;

        let error = match selector_problem {
            Some(problem) if is_main => {
                warn!(url, "continuing without selector: {problem}");
                Some(problem)
            }
            other => other,
        };

        Ok(CrawledPage {
            url: normalize_url(url),
            final_url,
            markup,
            is_main,
            fetch_ms: started.elapsed().as_millis() as u64,
            error,
        })
    }

    async fn load(
        &self,
        context: &mut dyn RenderContext,
        url: &str,
        budget_ms: u64,
    ) -> Result<(String, String, Option<String>)> {
        if let Some(ua) = &self.config.user_agent {
            context.set_user_agent(ua).await?;
        }
        let nav = tokio::time::timeout(
            Duration::from_millis(budget_ms),
            context.navigate(url, budget_ms),
        )
        .await
        .with_context(|| format!("timed out after {budget_ms}ms"))??;

        let mut selector_problem = None;
        if let Some(selector) = &self.config.wait_selector {
            let wait_ms = self.config.selector_timeout_ms;
            let waited = tokio::time::timeout(
                Duration::from_millis(wait_ms),
                context.wait_for_selector(selector, wait_ms),
            )
            .await
            .with_context(|| format!("selector {selector:?} not found after {wait_ms}ms"));
            if let Err(e) = waited.and_then(|r| r) {
                selector_problem = Some(format!("{e:#}"));
            }
        }

        if self.config.settle_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
        }

        let markup = context.content().await.context("reading markup")?;
        Ok((nav.final_url, markup, selector_problem))
    }
}
