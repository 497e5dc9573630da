// Aggregation Logic
// Overall percentages are the character-length share of each category.
// This is the only source of reported scores.

use crate::error::{AnalysisError, EngineResult};
use crate::models::{AnalysisResult, Category, OverallScores, Segment, SegmentOffsets};
use std::collections::HashMap;

fn share_percent(part: usize, total: usize) -> u8 {
    let pct = (100.0 * part as f64 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Aggregate classified segments. `Uncertain` length counts toward the total
/// only, so the three scores may sum to less than 100.
pub fn aggregate_segments(segments: Vec<Segment>) -> EngineResult<AnalysisResult> {
    let mut category_length: HashMap<Category, usize> = HashMap::new();
    for seg in &segments {
        *category_length.entry(seg.category).or_insert(0) += seg.char_len();
    }
    let total_length: usize = category_length.values().sum();
    if total_length == 0 {
        return Err(AnalysisError::EmptyAnalysis);
    }

    let share = |category: Category| share_percent(category_length.get(&category).copied().unwrap_or(0), total_length);
    let overall = OverallScores {
        original_score: share(Category::Original),
        ai_score: share(Category::AiGenerated),
        plagiarism_score: share(Category::Plagiarized),
    };

    Ok(AnalysisResult { overall, segments })
}

/// Fallback when nothing measurable was segmented: zero scores and one
/// uncertain segment spanning the whole text.
pub fn degenerate_result(text: &str) -> AnalysisResult {
    AnalysisResult {
        overall: OverallScores::default(),
        segments: vec![Segment {
            text: text.to_string(),
            category: Category::Uncertain,
            confidence: 0.0,
            sources: None,
            offsets: SegmentOffsets {
                start: 0,
                end: text.len(),
            },
        }],
    }
}
