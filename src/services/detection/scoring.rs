// Heuristic Scoring
// Combines lexical features with bounded randomness into raw category scores.
// Raw scores only bias segment classification; reported percentages come from
// aggregation.

use crate::error::EngineResult;
use crate::services::text_processor::{IndicatorPhrase, TextFeatures};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::random_source::RandomSource;

const AI_MIN: f64 = 15.0;
const AI_MAX: f64 = 85.0;
const AI_JITTER: f64 = 30.0;
const PLAGIARISM_MIN: f64 = 5.0;
const PLAGIARISM_MAX: f64 = 75.0;
const PLAGIARISM_JITTER: f64 = 40.0;
const ORIGINAL_FLOOR: i32 = 20;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicScores {
    pub ai_score_raw: i32,
    pub plagiarism_score_raw: i32,
    pub original_score_raw: i32,
}

fn ai_indicator_weight(phrase: IndicatorPhrase) -> f64 {
    match phrase {
        IndicatorPhrase::Furthermore => 20.0,
        IndicatorPhrase::Moreover => 15.0,
        IndicatorPhrase::Additionally => 10.0,
        IndicatorPhrase::AccordingTo | IndicatorPhrase::ResearchShows => 0.0,
    }
}

fn plagiarism_indicator_weight(phrase: IndicatorPhrase) -> f64 {
    match phrase {
        IndicatorPhrase::AccordingTo | IndicatorPhrase::ResearchShows => 15.0,
        IndicatorPhrase::Furthermore | IndicatorPhrase::Moreover | IndicatorPhrase::Additionally => 0.0,
    }
}

fn length_bucket_weight(word_count: usize) -> f64 {
    match word_count {
        n if n > 300 => 15.0,
        n if n > 150 => 10.0,
        n if n > 50 => 5.0,
        _ => 0.0,
    }
}

fn sentence_bucket_weight(sentence_count: usize) -> f64 {
    match sentence_count {
        n if n > 15 => 10.0,
        n if n > 5 => 5.0,
        _ => 0.0,
    }
}

fn char_length_weight(length: usize) -> f64 {
    match length {
        n if n > 1000 => 20.0,
        n if n > 500 => 15.0,
        n if n > 200 => 5.0,
        _ => 0.0,
    }
}

/// Score features. Draws exactly twice: AI jitter, then plagiarism jitter.
pub fn score_features(features: &TextFeatures, rng: &mut dyn RandomSource) -> EngineResult<HeuristicScores> {
    let indicator_weight: f64 = features.indicator_hits.iter().map(|p| ai_indicator_weight(*p)).sum();
    let ai = (indicator_weight
        + length_bucket_weight(features.word_count)
        + sentence_bucket_weight(features.sentence_count)
        + rng.uniform(0.0, AI_JITTER)?)
    .clamp(AI_MIN, AI_MAX);

    let phrase_weight: f64 = features
        .indicator_hits
        .iter()
        .map(|p| plagiarism_indicator_weight(*p))
        .sum();
    let plagiarism = (char_length_weight(features.length) + phrase_weight + rng.uniform(0.0, PLAGIARISM_JITTER)?)
        .clamp(PLAGIARISM_MIN, PLAGIARISM_MAX);

    let original = (100.0 - ai - plagiarism).round() as i32;

    let scores = HeuristicScores {
        ai_score_raw: ai.round() as i32,
        plagiarism_score_raw: plagiarism.round() as i32,
        original_score_raw: original.max(ORIGINAL_FLOOR),
    };
    debug!(
        ai = scores.ai_score_raw,
        plagiarism = scores.plagiarism_score_raw,
        original = scores.original_score_raw,
        "scoring.raw"
    );
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detection::random_source::ScriptedSource;
    use crate::services::text_processor::extract_features;

    #[test]
    fn test_short_plain_text_stays_low() {
        let features = extract_features("Hello world. This is a test.").unwrap();
        let mut rng = ScriptedSource::new(vec![0.0, 0.0]);
        let scores = score_features(&features, &mut rng).unwrap();
        assert_eq!(scores.ai_score_raw, 15);
        assert_eq!(scores.plagiarism_score_raw, 5);
        assert_eq!(scores.original_score_raw, 80);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_ai_indicators_add_weight() {
        let features =
            extract_features("Furthermore, this holds. Moreover, that holds. Additionally, all is well.").unwrap();
        let mut rng = ScriptedSource::new(vec![0.5, 0.0]);
        let scores = score_features(&features, &mut rng).unwrap();
        // 20 + 15 + 10 + 15 jitter
        assert_eq!(scores.ai_score_raw, 60);
    }

    #[test]
    fn test_scores_are_clipped() {
        let long = "Furthermore moreover additionally according to research shows. ".repeat(60);
        let features = extract_features(&long).unwrap();
        let mut rng = ScriptedSource::constant(0.99);
        let scores = score_features(&features, &mut rng).unwrap();
        assert_eq!(scores.ai_score_raw, 85);
        assert_eq!(scores.plagiarism_score_raw, 75);
        assert_eq!(scores.original_score_raw, ORIGINAL_FLOOR);
    }

    #[test]
    fn test_plagiarism_phrases_and_length() {
        let text = format!(
            "Research shows the effect is real. According to the survey it was large. {}",
            "Plain filler words keep going here. ".repeat(14)
        );
        let features = extract_features(&text).unwrap();
        assert!(features.length > 500);
        let mut rng = ScriptedSource::constant(0.5);
        let scores = score_features(&features, &mut rng).unwrap();
        // 15 (length) + 30 (phrases) + 20 jitter
        assert_eq!(scores.plagiarism_score_raw, 65);
    }
}
