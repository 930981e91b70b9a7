//! In-memory renderer for tests: serves canned markup with optional delays
//! and failures, and records concurrency.

use crate::renderer::{NavigationResult, RenderContext, Renderer};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct ScriptedPage {
    markup: String,
    delay_ms: u64,
    failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start(String),
    End(String),
}

#[derive(Default)]
struct Shared {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    events: Mutex<Vec<Event>>,
}

#[derive(Default)]
pub struct ScriptedRenderer {
    pages: HashMap<String, ScriptedPage>,
    missing_selector: bool,
    shared: Arc<Shared>,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, markup: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            ScriptedPage {
                markup: markup.to_string(),
                ..Default::default()
            },
        );
        self
    }

    pub fn slow_page(mut self, url: &str, markup: &str, delay_ms: u64) -> Self {
        self.pages.insert(
            url.to_string(),
            ScriptedPage {
                markup: markup.to_string(),
                delay_ms,
                failure: None,
            },
        );
        self
    }

    pub fn failing_page(mut self, url: &str, reason: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            ScriptedPage {
                failure: Some(reason.to_string()),
                ..Default::default()
            },
        );
        self
    }

    /// Every selector wait fails.
    pub fn without_selectors(mut self) -> Self {
        self.missing_selector = true;
        self
    }

    /// Highest number of simultaneous navigations seen.
    pub fn peak(&self) -> usize {
        self.shared.peak.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.shared.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<Event> {
        self.shared.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        self.shared.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedContext {
            pages: self.pages.clone(),
            missing_selector: self.missing_selector,
            shared: Arc::clone(&self.shared),
            loaded: None,
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.opened() - self.closed()
    }
}

struct ScriptedContext {
    pages: HashMap<String, ScriptedPage>,
    missing_selector: bool,
    shared: Arc<Shared>,
    loaded: Option<(String, String)>,
}

impl ScriptedContext {
    fn record(&self, event: Event) {
        if let Ok(mut events) = self.shared.events.lock() {
            events.push(event);
        }
    }
}

/// Decrements the in-flight counter even when the navigation future is dropped.
struct InFlight<'a>(&'a Shared);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RenderContext for ScriptedContext {
    async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> Result<NavigationResult> {
        let now = self.shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.shared);
        self.record(Event::Start(url.to_string()));

        let page = self.pages.get(url).cloned();
        if let Some(p) = &page {
            if p.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(p.delay_ms)).await;
            }
        }
        self.record(Event::End(url.to_string()));

        let page = page.with_context(|| format!("connection refused: {url}"))?;
        if let Some(reason) = page.failure {
            bail!("{reason}");
        }
        self.loaded = Some((url.to_string(), page.markup));
        Ok(NavigationResult {
            final_url: url.to_string(),
            status: 200,
            redirect_chain: Vec::new(),
            load_time_ms: page.delay_ms,
        })
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout_ms: u64) -> Result<()> {
        if self.missing_selector {
            bail!("selector {selector:?} not found");
        }
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        self.loaded
            .as_ref()
            .map(|(_, markup)| markup.clone())
            .context("no page loaded")
    }

    async fn get_url(&self) -> Result<String> {
        Ok(self.loaded.as_ref().map(|(u, _)| u.clone()).unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.shared.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
