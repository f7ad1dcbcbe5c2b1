use thiserror::Error;

/// Errors raised at the platform-service seams of this crate.
///
/// None of these are ever surfaced through a component; the components
/// log them and fall back to their degraded rendering instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The visibility observer could not watch the given region.
    #[error("visibility observation is unavailable for region `{0}`")]
    ObserverUnavailable(String),
    /// The timer service refused to schedule the callback.
    #[error("timer could not be scheduled: {0}")]
    Timer(String),
    /// A timer was requested outside of an async runtime.
    #[error("no async runtime is available to drive the timer")]
    NoRuntime,
    /// A timeout mode string was neither `after` nor `before`.
    #[error("unknown timeout mode `{0}`, expected `after` or `before`")]
    UnknownTimeoutMode(String),
    /// A split separator pattern failed to compile.
    #[error("invalid separator pattern: {0}")]
    Pattern(#[from] regex::Error),
}
