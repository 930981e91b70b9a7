//! `sitegrade predict <file.html>`: estimate a score from similar reference sites.

use crate::cli::{self, output};
use crate::extraction::{FeatureExtractor, PatternExtractor};
use crate::prediction::{NoVariance, Predictor, SeededJitter};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub fn run(file: &Path, url: Option<&str>, corpus: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let markup = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let corpus = cli::load_corpus(corpus)?
        .context("no reference corpus; pass --corpus or create ~/.sitegrade/corpus.json")?;

    let url = url.unwrap_or_default();
    let features = PatternExtractor::new().extract(&markup, url);
    let predictor = Predictor::new(&corpus);
    let prediction = match seed {
        Some(seed) => predictor.predict_with(&features, &mut SeededJitter::new(seed))?,
        None => predictor.predict_with(&features, &mut NoVariance)?,
    };

    if output::is_json() {
        output::print_json(&serde_json::to_value(&prediction)?);
    } else if output::is_quiet() {
        println!("{:.2}", prediction.score);
    } else {
        let s = output::Styled::new();
        output::print_header(&s);
        output::print_prediction(&s, &prediction);
    }
    Ok(())
}
