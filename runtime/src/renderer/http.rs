//! Plain HTTP renderer: fetches markup without running scripts.

use crate::renderer::{NavigationResult, RenderContext, Renderer};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_USER_AGENT: &str = concat!("sitegrade/", env!("CARGO_PKG_VERSION"));

/// Renderer backed by a shared `reqwest` client.
pub struct HttpRenderer {
    client: reqwest::Client,
    active: Arc<AtomicUsize>,
}

impl HttpRenderer {
    pub fn new(user_agent: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            active: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(HttpContext {
            client: self.client.clone(),
            user_agent: None,
            url: None,
            body: None,
            active: Arc::clone(&self.active),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

struct HttpContext {
    client: reqwest::Client,
    user_agent: Option<String>,
    url: Option<String>,
    body: Option<String>,
    active: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderContext for HttpContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let start = Instant::now();
        let mut request = self.client.get(url);
        if let Some(ua) = &self.user_agent {
            request = request.header(USER_AGENT, ua);
        }

        let fetch = async {
            let response = request.send().await.context("sending request")?;
            let status = response.status();
            let final_url = response.url().to_string();
            if status.is_client_error() || status.is_server_error() {
                bail!("HTTP {} for {url}", status.as_u16());
            }
            let body = response.text().await.context("reading response body")?;
            Ok::<_, anyhow::Error>((status.as_u16(), final_url, body))
        };

        let (status, final_url, body) = tokio::time::timeout(Duration::from_millis(timeout_ms), fetch)
            .await
            .with_context(|| format!("navigation timed out after {timeout_ms}ms"))??;

        let redirect_chain = if final_url != url {
            vec![url.to_string()]
        } else {
            Vec::new()
        };
        self.url = Some(final_url.clone());
        self.body = Some(body);

        Ok(NavigationResult {
            final_url,
            status,
            redirect_chain,
            load_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn set_user_agent(&mut self, user_agent: &str) -> Result<()> {
        self.user_agent = Some(user_agent.to_string());
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        self.body.clone().context("no page loaded")
    }

    async fn get_url(&self) -> Result<String> {
        Ok(self.url.clone().unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
