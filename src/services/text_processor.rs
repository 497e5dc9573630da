// Text Processing Service
// Lexical feature extraction shared by the scorer and the segmenter

use crate::error::{AnalysisError, EngineResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Lexical cues that nudge the heuristic category scores.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndicatorPhrase {
    Furthermore,
    Moreover,
    Additionally,
    AccordingTo,
    ResearchShows,
}

impl IndicatorPhrase {
    pub const ALL: [IndicatorPhrase; 5] = [
        IndicatorPhrase::Furthermore,
        IndicatorPhrase::Moreover,
        IndicatorPhrase::Additionally,
        IndicatorPhrase::AccordingTo,
        IndicatorPhrase::ResearchShows,
    ];

    pub fn phrase(self) -> &'static str {
        match self {
            IndicatorPhrase::Furthermore => "furthermore",
            IndicatorPhrase::Moreover => "moreover",
            IndicatorPhrase::Additionally => "additionally",
            IndicatorPhrase::AccordingTo => "according to",
            IndicatorPhrase::ResearchShows => "research shows",
        }
    }

    /// Map a regex match back to its phrase; inner whitespace may be any run.
    fn from_match(matched: &str) -> Option<Self> {
        let normalized = normalize_whitespace(matched).to_lowercase();
        Self::ALL.into_iter().find(|p| p.phrase() == normalized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFeatures {
    pub word_count: usize,
    pub sentence_count: usize,
    /// Character count of the trimmed text.
    pub length: usize,
    pub indicator_hits: BTreeSet<IndicatorPhrase>,
}

impl TextFeatures {
    pub fn has(&self, phrase: IndicatorPhrase) -> bool {
        self.indicator_hits.contains(&phrase)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceOffset {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

fn indicator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(furthermore|moreover|additionally|according\s+to|research\s+shows)\b")
            .expect("indicator regex")
    })
}

fn terminator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("terminator regex"))
}

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-delimited tokens with their byte offsets
pub fn word_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push((s, &text[s..idx]));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        spans.push((s, &text[s..]));
    }
    spans
}

/// Split on runs of `.`, `!`, `?`, keeping the terminators with their sentence.
///
/// Each fragment is trimmed. A fragment made only of terminators and whitespace
/// joins the previous sentence, or the next one when nothing precedes it, so every
/// character is covered. Offsets are byte positions in `text`.
pub fn split_sentences(text: &str) -> Vec<SentenceOffset> {
    let mut bounds = Vec::new();
    let mut cursor = 0;
    for m in terminator_re().find_iter(text) {
        bounds.push((cursor, m.end()));
        cursor = m.end();
    }
    if cursor < text.len() {
        bounds.push((cursor, text.len()));
    }

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut pending_start: Option<usize> = None;
    for (from, to) in bounds {
        let raw = &text[from..to];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let start = from + (raw.len() - raw.trim_start().len());
        let end = start + trimmed.len();
        let has_content = trimmed.chars().any(|c| !c.is_whitespace() && !is_terminator(c));

        if has_content {
            ranges.push((pending_start.take().unwrap_or(start), end));
        } else if let Some(prev) = ranges.last_mut() {
            prev.1 = end;
        } else {
            pending_start.get_or_insert(start);
        }
    }

    ranges
        .into_iter()
        .map(|(start, end)| SentenceOffset {
            text: text[start..end].to_string(),
            start,
            end,
        })
        .collect()
}

/// Extract coarse lexical features.
///
/// Indicator matching is case-insensitive and whole-word: `Furthermore,` hits,
/// `furthermoreish` does not.
pub fn extract_features(text: &str) -> EngineResult<TextFeatures> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidInput);
    }

    let indicator_hits = indicator_re()
        .find_iter(trimmed)
        .filter_map(|m| IndicatorPhrase::from_match(m.as_str()))
        .collect();

    Ok(TextFeatures {
        word_count: trimmed.split_whitespace().count(),
        sentence_count: split_sentences(trimmed).len(),
        length: trimmed.chars().count(),
        indicator_hits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_input() {
        assert_eq!(extract_features("   \n\t "), Err(AnalysisError::InvalidInput));
        assert_eq!(extract_features(""), Err(AnalysisError::InvalidInput));
    }

    #[test]
    fn test_counts_words_sentences_and_length() {
        let features = extract_features("  Hello world. This is a test!  Done ").unwrap();
        assert_eq!(features.word_count, 7);
        assert_eq!(features.sentence_count, 3);
        assert_eq!(features.length, "Hello world. This is a test!  Done".len());
        assert!(features.indicator_hits.is_empty());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let features = extract_features("日本語のテキスト。").unwrap();
        assert_eq!(features.length, 9);
    }

    #[test]
    fn test_indicator_matching_is_case_insensitive_whole_word() {
        let features = extract_features(
            "Furthermore, the data holds. According  to experts it is fine. Moreoverish is not a word.",
        )
        .unwrap();
        assert!(features.has(IndicatorPhrase::Furthermore));
        assert!(features.has(IndicatorPhrase::AccordingTo));
        assert!(!features.has(IndicatorPhrase::Moreover));
        assert_eq!(features.indicator_hits.len(), 2);
    }

    #[test]
    fn test_split_sentences_keeps_terminator_runs() {
        let text = "Wait!? Really... yes. tail without stop";
        let sentences = split_sentences(text);
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Wait!?", "Really...", "yes.", "tail without stop"]);
        for s in &sentences {
            assert_eq!(&text[s.start..s.end], s.text);
        }
    }

    #[test]
    fn test_split_sentences_folds_terminator_only_fragments() {
        assert!(split_sentences("... !! ?").is_empty());

        let text = "One. . Two.";
        let sentences = split_sentences(text);
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["One. .", "Two."]);
        for s in &sentences {
            assert_eq!(&text[s.start..s.end], s.text);
        }
    }

    #[test]
    fn test_split_sentences_leading_terminators_join_next() {
        let text = "... ! then it began. End";
        let sentences = split_sentences(text);
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["... ! then it began.", "End"]);
        assert_eq!(sentences[0].start, 0);
    }

    #[test]
    fn test_word_spans_offsets() {
        let text = "a  bb\tccc";
        let spans = word_spans(text);
        assert_eq!(spans, vec![(0, "a"), (3, "bb"), (6, "ccc")]);
    }
}
