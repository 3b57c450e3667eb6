use thiserror::Error;

use crate::core::validation::ValidationReport;
use crate::core::wizard::WizardStep;

/// Error type covering every failure the booking wizard can surface.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Validation(ValidationReport),
    #[error("Invalid value for {field}: {message}")]
    InvalidInput { field: &'static str, message: String },
    #[error("Terms must be accepted before submitting")]
    TermsNotAccepted,
    #[error("Submission is only available from the confirmation step (currently on {0})")]
    NotOnFinalStep(WizardStep),
    #[error("Cannot jump from {from} to {to}")]
    InvalidJump { from: WizardStep, to: WizardStep },
    #[error("Failed to open link: {0}")]
    LinkOpen(String),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl From<ValidationReport> for BookingError {
    fn from(report: ValidationReport) -> Self {
        BookingError::Validation(report)
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
