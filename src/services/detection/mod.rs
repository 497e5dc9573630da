// Detection Module
// Provenance analysis core organized into specialized submodules:
// - random_source: injectable randomness (seeded, thread-local, scripted)
// - scoring: heuristic raw category scores from lexical features
// - segment_builder: sentence and word-run segmentation
// - classifier: per-segment category and confidence
// - aggregation: length-weighted overall scores
// - engine: the `analyze` entry point

pub mod random_source;
pub mod scoring;
pub mod segment_builder;
pub mod classifier;
pub mod aggregation;
pub mod engine;

// Re-export commonly used functions
pub use random_source::{RandomSource, ScriptedSource};
pub use scoring::{score_features, HeuristicScores};
pub use segment_builder::{build_spans, sentence_spans, word_run_spans, SegmentSpan};
pub use classifier::classify_spans;
pub use aggregation::{aggregate_segments, degenerate_result};
pub use engine::{analyze, analyze_seeded, analyze_text, AnalyzeOptions};
