// Analysis Errors
// Failure taxonomy shared by parser, analyzer and configuration loading

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("reasoning chain is empty: no non-blank lines in input")]
    EmptyChain,
    #[error("reasoning chain has {steps} steps, maximum allowed is {max}")]
    OversizedChain { steps: usize, max: usize },
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("signal provider failed on step {step}: {message}")]
    SignalProvider { step: usize, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Raised by a signal provider when it cannot score a piece of text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("signal provider unavailable: {0}")]
    Unavailable(String),
}

pub type AnalysisOutcome<T> = Result<T, AnalysisError>;
