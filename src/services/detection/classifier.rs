// Segment Classifier
// Assigns a category and a confidence fraction to each span.
// Confidence is always a fraction in [0, 1], for both strategies.

use crate::error::EngineResult;
use crate::models::{Category, Segment, Strategy};
use super::random_source::RandomSource;
use super::scoring::HeuristicScores;
use super::segment_builder::SegmentSpan;

const CONFIDENCE_LOW: f64 = 0.6;
const CONFIDENCE_HIGH: f64 = 1.0;
const OVERRIDE_JITTER: f64 = 5.0;
const AI_OVERRIDE_THRESHOLD: i32 = 50;
const PLAGIARISM_OVERRIDE_THRESHOLD: i32 = 30;
const AI_STRIDE: usize = 3;
const PLAGIARISM_STRIDE: usize = 4;

/// Placeholder attributions until a real similarity backend exists.
const PLACEHOLDER_SOURCES: [&str; 2] = ["example.com", "wikipedia.org"];

fn placeholder_sources(count: usize) -> Vec<String> {
    PLACEHOLDER_SOURCES
        .iter()
        .take(count.clamp(1, PLACEHOLDER_SOURCES.len()))
        .map(|s| s.to_string())
        .collect()
}

fn make_segment(span: SegmentSpan, category: Category, confidence: f64, source_count: usize) -> Segment {
    let sources = (category == Category::Plagiarized).then(|| placeholder_sources(source_count));
    Segment {
        text: span.text,
        category,
        confidence: confidence.clamp(0.0, 1.0),
        sources,
        offsets: span.offsets,
    }
}

pub fn classify_spans(
    spans: Vec<SegmentSpan>,
    strategy: Strategy,
    scores: &HeuristicScores,
    rng: &mut dyn RandomSource,
) -> EngineResult<Vec<Segment>> {
    match strategy {
        Strategy::Sentence => classify_sentences(spans, scores, rng),
        Strategy::WordRun => classify_word_runs(spans, rng),
    }
}

/// Percent score plus jitter, clipped, as a fraction.
fn jittered_confidence(raw: i32, rng: &mut dyn RandomSource) -> EngineResult<f64> {
    let jitter = rng.uniform(-OVERRIDE_JITTER, OVERRIDE_JITTER)?;
    Ok((raw as f64 + jitter).clamp(0.0, 100.0) / 100.0)
}

/// Sentence strategy: `original` by default, with AI and plagiarism overrides
/// on strided indices. The AI check runs first; one draw per segment.
fn classify_sentences(
    spans: Vec<SegmentSpan>,
    scores: &HeuristicScores,
    rng: &mut dyn RandomSource,
) -> EngineResult<Vec<Segment>> {
    let mut segments = Vec::with_capacity(spans.len());
    for (k, span) in spans.into_iter().enumerate() {
        let segment = if k % AI_STRIDE == 0 && scores.ai_score_raw > AI_OVERRIDE_THRESHOLD {
            let confidence = jittered_confidence(scores.ai_score_raw, rng)?;
            make_segment(span, Category::AiGenerated, confidence, 0)
        } else if k % PLAGIARISM_STRIDE == 0 && scores.plagiarism_score_raw > PLAGIARISM_OVERRIDE_THRESHOLD {
            let confidence = jittered_confidence(scores.plagiarism_score_raw, rng)?;
            make_segment(span, Category::Plagiarized, confidence, PLACEHOLDER_SOURCES.len())
        } else {
            let confidence = rng.uniform(CONFIDENCE_LOW, CONFIDENCE_HIGH)?;
            make_segment(span, Category::Original, confidence, 0)
        };
        segments.push(segment);
    }
    Ok(segments)
}

/// Word-run strategy: a category pointer starting at `original` is redrawn
/// after every closed run. A plagiarized trailing run gets a single source.
fn classify_word_runs(spans: Vec<SegmentSpan>, rng: &mut dyn RandomSource) -> EngineResult<Vec<Segment>> {
    let mut pointer = 0usize;
    let mut segments = Vec::with_capacity(spans.len());
    for span in spans {
        let category = Category::ALL[pointer % Category::ALL.len()];
        let confidence = rng.uniform(CONFIDENCE_LOW, CONFIDENCE_HIGH)?;
        let flushed = span.flushed;
        let source_count = if flushed { 1 } else { PLACEHOLDER_SOURCES.len() };
        segments.push(make_segment(span, category, confidence, source_count));
        if !flushed {
            pointer = rng.index(Category::ALL.len())?;
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::models::SegmentOffsets;
    use crate::services::detection::random_source::ScriptedSource;

    fn span(text: &str, flushed: bool) -> SegmentSpan {
        SegmentSpan {
            text: text.to_string(),
            offsets: SegmentOffsets { start: 0, end: text.len() },
            flushed,
        }
    }

    fn scores(ai: i32, plagiarism: i32) -> HeuristicScores {
        HeuristicScores {
            ai_score_raw: ai,
            plagiarism_score_raw: plagiarism,
            original_score_raw: (100 - ai - plagiarism).max(20),
        }
    }

    #[test]
    fn test_sentences_default_to_original() {
        let spans = vec![span("One.", false), span("Two.", false)];
        let mut rng = ScriptedSource::new(vec![0.0, 0.5]);
        let segments = classify_sentences(spans, &scores(40, 20), &mut rng).unwrap();
        assert!(segments.iter().all(|s| s.category == Category::Original));
        assert_eq!(segments[0].confidence, 0.6);
        assert!((segments[1].confidence - 0.8).abs() < 1e-12);
        assert!(segments.iter().all(|s| s.sources.is_none()));
    }

    #[test]
    fn test_ai_override_wins_over_plagiarism() {
        let spans: Vec<SegmentSpan> = (0..5).map(|i| span(&format!("S{}.", i), false)).collect();
        let mut rng = ScriptedSource::constant(0.5);
        let segments = classify_sentences(spans, &scores(70, 40), &mut rng).unwrap();
        let cats: Vec<Category> = segments.iter().map(|s| s.category).collect();
        assert_eq!(
            cats,
            vec![
                Category::AiGenerated,
                Category::Original,
                Category::Original,
                Category::AiGenerated,
                Category::Plagiarized,
            ]
        );
        assert!((segments[0].confidence - 0.70).abs() < 1e-12);
        assert!((segments[4].confidence - 0.40).abs() < 1e-12);
        assert_eq!(
            segments[4].sources.as_deref(),
            Some(&["example.com".to_string(), "wikipedia.org".to_string()][..])
        );
    }

    #[test]
    fn test_word_runs_cycle_pointer_after_closed_runs() {
        let spans = vec![span("a b", false), span("c d", false), span("e", true)];
        // confidence, pointer -> plagiarized, confidence, pointer -> uncertain, confidence
        let mut rng = ScriptedSource::new(vec![0.0, 0.5, 0.25, 0.99, 1.0]);
        let segments = classify_word_runs(spans, &mut rng).unwrap();
        assert_eq!(segments[0].category, Category::Original);
        assert_eq!(segments[1].category, Category::Plagiarized);
        assert_eq!(segments[1].sources.as_ref().map(Vec::len), Some(2));
        assert_eq!(segments[2].category, Category::Uncertain);
        assert!(segments.iter().all(|s| (0.0..=1.0).contains(&s.confidence)));
        assert_eq!(rng.draws(), 5);
    }

    #[test]
    fn test_plagiarized_tail_gets_single_source() {
        let spans = vec![span("a b", false), span("tail", true)];
        let mut rng = ScriptedSource::new(vec![0.1, 0.5, 0.1]);
        let segments = classify_word_runs(spans, &mut rng).unwrap();
        assert_eq!(segments[1].category, Category::Plagiarized);
        assert_eq!(segments[1].sources, Some(vec!["example.com".to_string()]));
    }

    #[test]
    fn test_exhausted_source_propagates() {
        let spans = vec![span("a", false), span("b", true)];
        let mut rng = ScriptedSource::new(vec![0.1]);
        assert_eq!(
            classify_word_runs(spans, &mut rng),
            Err(AnalysisError::RandomSourceExhausted { draws: 1 })
        );
    }
}
