use thiserror::Error;

/// Failures raised by the reminder engine and its inputs.
/// There is no partial-result mode: any error fails the whole computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    /// A snapshot record has a missing or malformed date field.
    #[error("Invalid reminder input: {0}")]
    Validation(String),

    /// Threshold, window or offset out of range.
    #[error("Invalid reminder configuration: {0}")]
    Configuration(String),
}
