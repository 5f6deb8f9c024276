//! Structured error types for timegrid.
//!
//! Only value construction is fallible in this crate. Contract violations
//! (driving the edit engine with no active session, requesting a cell for an
//! unregistered reuse id) are programmer errors and abort instead of
//! returning an error; absent or degenerate data sources degrade to no-ops.

/// All errors that can occur constructing timegrid values.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A time span whose end does not come after its start.
    #[error("empty or inverted time span: {0}")]
    EmptySpan(String),

    /// A layout unit with a non-positive granularity, pixel scale, or
    /// default creation duration.
    #[error("invalid layout unit: {0}")]
    InvalidUnit(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
