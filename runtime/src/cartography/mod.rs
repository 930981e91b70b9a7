//! Site crawling: link discovery and batched page fetching.

pub mod crawler;
pub mod links;

pub use crawler::{CrawlError, CrawlOutcome, CrawledPage, Crawler};
pub use links::{discover_links, normalize_url, DiscoveredLink};
