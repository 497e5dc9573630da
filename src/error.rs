// Analysis Errors
// Failure kinds surfaced by the provenance engine

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Input was empty or whitespace-only after trimming.
    #[error("no text to analyze: input is empty after trimming")]
    InvalidInput,
    /// Segmentation produced nothing measurable. `analyze` absorbs this into a
    /// degenerate all-uncertain result; it only escapes the individual stages.
    #[error("segmentation produced zero total length")]
    EmptyAnalysis,
    #[error("random source exhausted after {draws} draws")]
    RandomSourceExhausted { draws: usize },
}

pub type EngineResult<T> = Result<T, AnalysisError>;
