// Segment Builder
// Partitions analyzed text into ordered, non-overlapping spans
//
// Two boundary strategies:
// - sentence: one span per terminator-delimited fragment; bare terminator runs
//   stay attached to a neighbouring sentence
// - word-run: runs of whitespace tokens closed at randomly drawn run lengths

use crate::error::{AnalysisError, EngineResult};
use crate::models::{SegmentOffsets, Strategy};
use crate::services::text_processor::{split_sentences, word_spans};
use tracing::debug;

use super::random_source::RandomSource;

const RUN_LENGTH_BASE: usize = 15;
const RUN_LENGTH_SPREAD: usize = 10;

/// An unclassified segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSpan {
    pub text: String,
    pub offsets: SegmentOffsets,
    /// True when the span ended because input ran out rather than at a boundary.
    /// Only the word-run classifier reads it; sentence spans carry it for logging.
    pub flushed: bool,
}

/// Build spans with the selected strategy.
///
/// Fails with `EmptyAnalysis` when nothing segmentable remains.
pub fn build_spans(text: &str, strategy: Strategy, rng: &mut dyn RandomSource) -> EngineResult<Vec<SegmentSpan>> {
    let spans = match strategy {
        Strategy::Sentence => sentence_spans(text),
        Strategy::WordRun => word_run_spans(text, rng)?,
    };
    if spans.is_empty() {
        return Err(AnalysisError::EmptyAnalysis);
    }
    let flushed = spans.iter().filter(|s| s.flushed).count();
    debug!(strategy = %strategy, spans = spans.len(), flushed, "segments.built");
    Ok(spans)
}

pub fn sentence_spans(text: &str) -> Vec<SegmentSpan> {
    let sentences = split_sentences(text);
    let last = sentences.len().saturating_sub(1);
    sentences
        .into_iter()
        .enumerate()
        .map(|(idx, s)| {
            let flushed = idx == last && !s.text.ends_with(|c: char| matches!(c, '.' | '!' | '?'));
            SegmentSpan {
                text: s.text,
                offsets: SegmentOffsets { start: s.start, end: s.end },
                flushed,
            }
        })
        .collect()
}

fn draw_run_length(rng: &mut dyn RandomSource) -> EngineResult<usize> {
    Ok(rng.index(RUN_LENGTH_SPREAD)? + RUN_LENGTH_BASE)
}

/// Word runs. The close test uses the global word index: after placing word
/// `i > 0` the run closes when `i % run_length == 0`. A fresh run length is
/// drawn whenever a run opens.
pub fn word_run_spans(text: &str, rng: &mut dyn RandomSource) -> EngineResult<Vec<SegmentSpan>> {
    let words = word_spans(text);
    let mut spans = Vec::new();
    if words.is_empty() {
        return Ok(spans);
    }

    let mut run_length = draw_run_length(rng)?;
    let mut run_start: Option<usize> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for (idx, (offset, word)) in words.iter().enumerate() {
        run_start.get_or_insert(*offset);
        buffer.push(*word);

        if idx > 0 && idx % run_length == 0 {
            let start = run_start.take().unwrap_or(*offset);
            spans.push(SegmentSpan {
                text: buffer.join(" "),
                offsets: SegmentOffsets {
                    start,
                    end: offset + word.len(),
                },
                flushed: false,
            });
            buffer.clear();
            if idx + 1 < words.len() {
                run_length = draw_run_length(rng)?;
            }
        }
    }

    if !buffer.is_empty() {
        let start = run_start.unwrap_or(0);
        let end = words.last().map_or(text.len(), |(offset, word)| offset + word.len());
        spans.push(SegmentSpan {
            text: buffer.join(" "),
            offsets: SegmentOffsets { start, end },
            flushed: true,
        });
    }

    Ok(spans)
}
