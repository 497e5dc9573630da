// OriginCheck Data Models
// Value objects produced by one analysis call

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============ Category ============

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Original,
    AiGenerated,
    Plagiarized,
    Uncertain,
}

impl Category {
    /// Cycle order used by the word-run classifier.
    pub const ALL: [Category; 4] = [
        Category::Original,
        Category::AiGenerated,
        Category::Plagiarized,
        Category::Uncertain,
    ];

    /// Badge label shown by renderers
    pub fn label(self) -> &'static str {
        match self {
            Category::Original => "Original",
            Category::AiGenerated => "AI Generated",
            Category::Plagiarized => "Plagiarized",
            Category::Uncertain => "Uncertain",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Original => "original",
            Category::AiGenerated => "ai-generated",
            Category::Plagiarized => "plagiarized",
            Category::Uncertain => "uncertain",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Strategy ============

/// Segmentation strategy. `Sentence` is the default.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    WordRun,
    #[default]
    Sentence,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::WordRun => "word-run",
            Strategy::Sentence => "sentence",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val.trim().to_lowercase().as_str() {
            "word-run" | "word_run" | "words" => Ok(Self::WordRun),
            "sentence" | "sentences" => Ok(Self::Sentence),
            other => Err(format!("unknown strategy '{}' (expected word-run or sentence)", other)),
        }
    }
}

// ============ Segment ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentOffsets {
    /// UTF-8 byte offset (0-based) into the trimmed analyzed text.
    pub start: usize,
    /// UTF-8 byte offset (0-based, end-exclusive) into the trimmed analyzed text.
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    #[serde(alias = "type")]
    pub category: Category,
    /// Fraction in [0, 1].
    pub confidence: f64,
    /// Present (and non-empty) only for plagiarized segments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    pub offsets: SegmentOffsets,
}

impl Segment {
    /// Character length, the unit used for aggregation.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Truncated text for compact displays
    pub fn preview(&self, max_chars: usize) -> String {
        let mut out: String = self.text.chars().take(max_chars).collect();
        if self.text.chars().count() > max_chars {
            out.push_str("...");
        }
        out.replace('\n', " ")
    }
}

// ============ Analysis Result ============

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallScores {
    pub original_score: u8,
    pub ai_score: u8,
    pub plagiarism_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall: OverallScores,
    pub segments: Vec<Segment>,
}

impl AnalysisResult {
    /// Segments carrying source attributions, in document order.
    pub fn sourced_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.sources.is_some())
    }
}

// ============ Report Envelope ============

/// Wraps a result with request identity for export; the result itself stays
/// identity-free so seeded runs compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub version: String,
    pub request_id: String,
    pub generated_at: String,
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub result: AnalysisResult,
}

impl AnalysisReport {
    pub fn new(result: AnalysisResult, strategy: Strategy, seed: Option<u64>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            strategy,
            seed,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_kebab_case() {
        let json = serde_json::to_string(&Category::AiGenerated).unwrap();
        assert_eq!(json, "\"ai-generated\"");
        let parsed: Category = serde_json::from_str("\"plagiarized\"").unwrap();
        assert_eq!(parsed, Category::Plagiarized);
    }

    #[test]
    fn test_strategy_parse_and_default() {
        assert_eq!(Strategy::default(), Strategy::Sentence);
        assert_eq!("word-run".parse::<Strategy>().unwrap(), Strategy::WordRun);
        assert_eq!(" Sentence ".parse::<Strategy>().unwrap(), Strategy::Sentence);
        assert!("paragraph".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_segment_serialization_omits_absent_sources() {
        let seg = Segment {
            text: "Hello world.".to_string(),
            category: Category::Original,
            confidence: 0.75,
            sources: None,
            offsets: SegmentOffsets { start: 0, end: 12 },
        };
        let json = serde_json::to_value(&seg).unwrap();
        assert!(json.get("sources").is_none());
        assert_eq!(json["category"], "original");
    }

    #[test]
    fn test_overall_scores_camel_case() {
        let scores = OverallScores {
            original_score: 60,
            ai_score: 25,
            plagiarism_score: 10,
        };
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["originalScore"], 60);
        assert_eq!(json["aiScore"], 25);
        assert_eq!(json["plagiarismScore"], 10);
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        let seg = Segment {
            text: "\u{4e00}".repeat(10),
            category: Category::Uncertain,
            confidence: 0.0,
            sources: None,
            offsets: SegmentOffsets { start: 0, end: 30 },
        };
        assert_eq!(seg.preview(4), format!("{}...", "\u{4e00}".repeat(4)));
        assert_eq!(seg.char_len(), 10);
    }
}
