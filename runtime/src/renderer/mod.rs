//! Page rendering backends.
//!
//! A `Renderer` owns the shared browser or HTTP session; each page fetch
//! opens its own `RenderContext` and closes it when done.

pub mod chromium;
pub mod http;
#[cfg(test)]
pub mod scripted;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use chromium::ChromiumRenderer;
pub use http::HttpRenderer;

/// Outcome of navigating a context to a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationResult {
    pub final_url: String,
    pub status: u16,
    pub redirect_chain: Vec<String>,
    pub load_time_ms: u64,
}

/// A single page context (browser tab or HTTP fetch slot).
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Load `url`, failing if it takes longer than `timeout_ms`.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;

    /// Override the user agent for subsequent navigations.
    async fn set_user_agent(&mut self, _user_agent: &str) -> Result<()> {
        Ok(())
    }

    /// Wait until `selector` matches. Backends without a DOM return immediately.
    async fn wait_for_selector(&mut self, _selector: &str, _timeout_ms: u64) -> Result<()> {
        Ok(())
    }

    /// Markup of the currently loaded page.
    async fn content(&self) -> Result<String>;

    async fn get_url(&self) -> Result<String>;

    /// Release the context.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Shared rendering session.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;

    async fn shutdown(&self) -> Result<()>;

    /// Contexts opened and not yet closed.
    fn active_contexts(&self) -> usize;
}
