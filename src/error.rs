use thiserror::Error;

/// Errors raised by the analysis core.
///
/// Provider and I/O glue report through `anyhow`; only the conditions the
/// core itself recognises live here.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An empty series reached the indicator calculator.
    #[error("insufficient data: price series is empty")]
    InsufficientData,

    /// The market-data provider returned nothing or failed.
    #[error("failed to fetch data: {0}")]
    FetchFailure(String),

    /// A period token outside `1mo | 3mo | 6mo | 1y | 2y`.
    #[error("unknown period '{0}' (expected one of 1mo, 3mo, 6mo, 1y, 2y)")]
    UnknownPeriod(String),
}
