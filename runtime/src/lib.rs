//! Sitegrade: crawl a website and grade it against accessibility and
//! usability rule taxonomies.
//!
//! The pipeline is crawl ([`cartography`]), reduce each page to a feature
//! record ([`extraction`]), score it per taxonomy ([`scoring`], driven by
//! [`rules`]), and optionally predict a score from similar reference sites
//! ([`prediction`]). [`audit`] wires the stages together.

pub mod audit;
pub mod cartography;
pub mod cli;
pub mod config;
pub mod extraction;
pub mod pool;
pub mod prediction;
pub mod renderer;
pub mod rules;
pub mod scoring;
