// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("No EDGAR company found matching '{0}'")]
    CompanyNotFound(String),

    #[error("No complete submission text file linked from {0}")]
    SubmissionTextNotFound(String),

    #[error("No 10-K filings on record for CIK {0}")]
    NoAnnualFilings(String),

    #[error("Could not find specified filing: {0}")]
    FilingNotFound(String),

    #[error("Failed to parse EDGAR response: {0}")]
    Parse(String),
}

impl EdgarError {
    /// Status code of a non-success HTTP response, if that is what failed.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            EdgarError::Http(status) => Some(status.as_u16()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Summarizer request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Summarizer returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Summarizer returned no text")]
    EmptyResponse,

    #[error("Summarizer misconfigured: {0}")]
    Config(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError), // Automatically convert Edgar errors

    #[error("AI processing failed: {0}")]
    Summary(#[from] SummaryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_only_for_http_errors() {
        let err = EdgarError::Http(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(EdgarError::CompanyNotFound("Acme".into()).status_code(), None);
    }

    #[test]
    fn test_app_error_messages_wrap_stage_errors() {
        let err: AppError = EdgarError::CompanyNotFound("Nowhere Corp".into()).into();
        assert_eq!(
            err.to_string(),
            "EDGAR interaction failed: No EDGAR company found matching 'Nowhere Corp'"
        );

        let err: AppError = SummaryError::EmptyResponse.into();
        assert_eq!(err.to_string(), "AI processing failed: Summarizer returned no text");
    }
}
