//! Bounded pool of page contexts.
//!
//! Caps how many pages are open at once and counts live handles.

use crate::renderer::{RenderContext, Renderer};
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Holds a permit and the active count for as long as a page is out.
struct Slot {
    _permit: OwnedSemaphorePermit,
    active: Arc<AtomicUsize>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A page context borrowed from the pool.
pub struct PageHandle {
    context: Box<dyn RenderContext>,
    slot: Slot,
}

impl PageHandle {
    pub fn context(&self) -> &dyn RenderContext {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> &mut dyn RenderContext {
        self.context.as_mut()
    }
}

/// Hands out page contexts, at most `max_pages` at a time.
pub struct PagePool {
    renderer: Arc<dyn Renderer>,
    semaphore: Arc<Semaphore>,
    max_pages: usize,
    active: Arc<AtomicUsize>,
    peak: AtomicUsize,
}

impl PagePool {
    pub fn new(renderer: Arc<dyn Renderer>, max_pages: usize) -> Self {
        let max_pages = max_pages.max(1);
        Self {
            renderer,
            semaphore: Arc::new(Semaphore::new(max_pages)),
            max_pages,
            active: Arc::new(AtomicUsize::new(0)),
            peak: AtomicUsize::new(0),
        }
    }

    /// Open a page context, waiting while the pool is full.
    pub async fn acquire(&self) -> Result<PageHandle> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| anyhow::anyhow!("page pool closed: {e}"))?;

        let context = self.renderer.new_context().await?;
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        Ok(PageHandle {
            context,
            slot: Slot {
                _permit: permit,
                active: Arc::clone(&self.active),
            },
        })
    }

    /// Close the page and free its slot.
    pub async fn release(&self, handle: PageHandle) -> Result<()> {
        let PageHandle { context, slot } = handle;
        let closed = context.close().await;
        drop(slot);
        closed
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Most pages ever open at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::scripted::ScriptedRenderer;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_and_release_track_counts() {
        let renderer = Arc::new(ScriptedRenderer::new());
        let pool = PagePool::new(renderer.clone(), 2);
        let a = pool.acquire().await.unwrap();
        let b = pool.acquire().await.unwrap();
        assert_eq!(pool.active(), 2);
        assert_eq!(pool.available(), 0);
        pool.release(a).await.unwrap();
        pool.release(b).await.unwrap();
        assert_eq!(pool.active(), 0);
        assert_eq!(pool.peak(), 2);
        assert_eq!(renderer.closed(), 2);
    }

    #[tokio::test]
    async fn test_full_pool_waits() {
        let pool = Arc::new(PagePool::new(Arc::new(ScriptedRenderer::new()), 1));
        let held = pool.acquire().await.unwrap();
        let waiter = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.acquire().await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        pool.release(held).await.unwrap();
        waiter.await.unwrap().unwrap();
        assert_eq!(pool.peak(), 1);
    }

    #[test]
    fn test_zero_capacity_rounds_up() {
        let pool = PagePool::new(Arc::new(ScriptedRenderer::new()), 0);
        assert_eq!(pool.max_pages(), 1);
    }
}
