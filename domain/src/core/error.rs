//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("Document set is empty")]
    EmptyDocumentSet,

    #[error("Invalid document id: {0:?}")]
    InvalidDocumentId(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

/// Validate a user prompt: it must contain at least one non-whitespace character.
pub fn validate_prompt(prompt: &str) -> Result<&str, DomainError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidPrompt(
            "prompt must not be empty".to_string(),
        ));
    }
    Ok(prompt)
}
