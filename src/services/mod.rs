// OriginCheck Core Services

pub mod text_processor;
pub mod config_store;
pub mod detection;

pub use text_processor::*;
pub use config_store::*;

// Re-export detection module functions
pub use detection::{
    analyze,
    analyze_seeded,
    analyze_text,
    AnalyzeOptions,
    HeuristicScores,
    RandomSource,
    ScriptedSource,
};
