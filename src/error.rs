//! Error types.
//!
//! - `ScorecardError` is the library error returned by validation, the numeric
//!   core and the scorecard lifecycle.
//! - `AppError` is what the `scorecard` binary reports: a message plus a process
//!   exit code.
//!
//! Exit codes:
//! - 2: configuration or IO problem
//! - 3: unusable input data
//! - 4: numeric failure

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScorecardError {
    /// Invalid scaling method, parameter set or option. Raised before any numeric work.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The model input or observations cannot be used as given.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("The estimator does not expose coefficients.")]
    MissingCoefficients,

    /// Min/max scaling over a zero-width score range.
    #[error(
        "Degenerate score range: smin={smin} equals smax={smax}; min/max scaling is undefined."
    )]
    NumericDegeneracy { smin: f64, smax: f64 },

    #[error("This scorecard is not fitted yet. Call 'fit' with a model input first.")]
    NotFitted,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScorecardError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Exit code used when this error ends the `scorecard` process.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScorecardError::InvalidConfig(_)
            | ScorecardError::MissingCoefficients
            | ScorecardError::Io { .. } => 2,
            ScorecardError::InvalidInput(_) | ScorecardError::NotFitted => 3,
            ScorecardError::NumericDegeneracy { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ScorecardError> for AppError {
    fn from(err: ScorecardError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(ScorecardError::config("x").exit_code(), 2);
        assert_eq!(ScorecardError::input("x").exit_code(), 3);
        assert_eq!(ScorecardError::NotFitted.exit_code(), 3);
        assert_eq!(
            ScorecardError::NumericDegeneracy { smin: 1.0, smax: 1.0 }.exit_code(),
            4
        );
    }

    #[test]
    fn app_error_keeps_message_and_code() {
        let err: AppError = ScorecardError::MissingCoefficients.into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "The estimator does not expose coefficients.");
    }
}
