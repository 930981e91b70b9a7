//! Headless Chromium renderer over the DevTools protocol.

use crate::renderer::{NavigationResult, RenderContext, Renderer};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const SELECTOR_POLL_MS: u64 = 100;

/// Locate a Chromium or Chrome binary.
///
/// `SITEGRADE_CHROMIUM_PATH` wins, then `CHROME_PATH`, then the usual names on `PATH`.
pub fn find_chromium() -> Option<PathBuf> {
    for var in ["SITEGRADE_CHROMIUM_PATH", "CHROME_PATH"] {
        if let Ok(p) = std::env::var(var) {
            let path = PathBuf::from(p);
            if path.exists() {
                return Some(path);
            }
        }
    }

    ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"]
        .iter()
        .find_map(|name| which::which(name).ok())
        .or_else(|| {
            let mac = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
            (cfg!(target_os = "macos") && mac.exists()).then_some(mac)
        })
}

/// One headless browser shared by every page context.
pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    active: Arc<AtomicUsize>,
}

impl ChromiumRenderer {
    pub async fn launch() -> Result<Self> {
        let executable = find_chromium()
            .context("no Chromium binary found; set CHROME_PATH or use --http")?;

        let config = BrowserConfig::builder()
            .chrome_executable(&executable)
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(|e| anyhow!("invalid browser config: {e}"))?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .with_context(|| format!("launching {}", executable.display()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!("browser event error: {e}");
                }
            }
        });

        info!(path = %executable.display(), "launched headless browser");

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            active: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .context("opening browser tab")?
        };
        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ChromiumContext {
            page,
            active: Arc::clone(&self.active),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.context("closing browser")?;
        match browser.wait().await {
            Ok(status) => debug!(?status, "browser exited"),
            Err(e) => warn!("waiting for browser exit: {e}"),
        }
        self.handler.abort();
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

struct ChromiumContext {
    page: Page,
    active: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let start = Instant::now();
        tokio::time::timeout(Duration::from_millis(timeout_ms), self.page.goto(url))
            .await
            .with_context(|| format!("navigation timed out after {timeout_ms}ms"))?
            .with_context(|| format!("navigating to {url}"))?;

        let final_url = self.page.url().await?.unwrap_or_else(|| url.to_string());
        let redirect_chain = if final_url != url {
            vec![url.to_string()]
        } else {
            Vec::new()
        };

        Ok(NavigationResult {
            final_url,
            // goto fails on network errors; the DevTools response status is not tracked
            status: 200,
            redirect_chain,
            load_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn set_user_agent(&mut self, user_agent: &str) -> Result<()> {
        self.page
            .set_user_agent(SetUserAgentOverrideParams::new(user_agent))
            .await
            .context("setting user agent")?;
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout_ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("selector {selector:?} not found within {timeout_ms}ms");
            }
            tokio::time::sleep(Duration::from_millis(SELECTOR_POLL_MS)).await;
        }
    }

    async fn content(&self) -> Result<String> {
        self.page.content().await.context("reading page content")
    }

    async fn get_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.page.close().await.context("closing tab")?;
        Ok(())
    }
}
