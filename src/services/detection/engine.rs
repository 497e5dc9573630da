// Analysis Engine
// Single entry point: features -> scores -> spans -> categories -> aggregation
//
// Synchronous and self-contained; the only state is the caller's random source.

use crate::error::{AnalysisError, EngineResult};
use crate::models::{AnalysisResult, Strategy};
use crate::services::text_processor::extract_features;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{info, warn};

use super::aggregation::{aggregate_segments, degenerate_result};
use super::classifier::classify_spans;
use super::random_source::RandomSource;
use super::scoring::score_features;
use super::segment_builder::build_spans;

#[derive(Default)]
pub struct AnalyzeOptions<'a> {
    pub strategy: Strategy,
    /// Deterministic source for tests and reproducible runs; `None` uses a
    /// thread-local generator.
    pub rng: Option<&'a mut dyn RandomSource>,
}

impl<'a> AnalyzeOptions<'a> {
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self { strategy, rng: None }
    }

    pub fn rng(mut self, rng: &'a mut dyn RandomSource) -> Self {
        self.rng = Some(rng);
        self
    }
}

/// Analyze `text` for provenance.
///
/// Fails with `InvalidInput` on blank text and with `RandomSourceExhausted` when a
/// scripted source runs dry. Empty segmentation yields the degenerate result.
pub fn analyze(text: &str, options: AnalyzeOptions<'_>) -> EngineResult<AnalysisResult> {
    let AnalyzeOptions { strategy, rng } = options;
    match rng {
        Some(rng) => run(text, strategy, rng),
        None => run(text, strategy, &mut rand::thread_rng()),
    }
}

/// Defaults: sentence strategy, unseeded.
pub fn analyze_text(text: &str) -> EngineResult<AnalysisResult> {
    analyze(text, AnalyzeOptions::default())
}

pub fn analyze_seeded(text: &str, strategy: Strategy, seed: u64) -> EngineResult<AnalysisResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    analyze(text, AnalyzeOptions::with_strategy(strategy).rng(&mut rng))
}

fn run(text: &str, strategy: Strategy, rng: &mut dyn RandomSource) -> EngineResult<AnalysisResult> {
    let t0 = Instant::now();
    let trimmed = text.trim();
    let features = extract_features(trimmed)?;
    let scores = score_features(&features, rng)?;

    let classified = build_spans(trimmed, strategy, rng)
        .and_then(|spans| classify_spans(spans, strategy, &scores, rng))
        .and_then(aggregate_segments);

    let result = match classified {
        Ok(result) => result,
        Err(AnalysisError::EmptyAnalysis) => {
            warn!(strategy = %strategy, chars = features.length, "analysis.degenerate");
            degenerate_result(trimmed)
        }
        Err(e) => return Err(e),
    };

    info!(
        strategy = %strategy,
        words = features.word_count,
        sentences = features.sentence_count,
        segments = result.segments.len(),
        original = result.overall.original_score,
        ai = result.overall.ai_score,
        plagiarism = result.overall.plagiarism_score,
        elapsed_us = t0.elapsed().as_micros() as u64,
        "analysis.completed"
    );
    Ok(result)
}
