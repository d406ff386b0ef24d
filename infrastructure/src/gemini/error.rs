//! Error types for the Gemini adapter

use genai_application::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when talking to the Gemini REST API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad response from server (status {code}): {}", description.as_deref().unwrap_or("<none>"))]
    BadResponse {
        code: u16,
        description: Option<String>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid API key header value")]
    InvalidApiKey,

    #[error("No API key configured (set gemini.api_key or the {0} environment variable)")]
    MissingApiKey(String),

    #[error("Response has no candidates{}", reason.as_deref().map(|r| format!(" (blocked: {})", r)).unwrap_or_default())]
    NoCandidates { reason: Option<String> },
}

impl From<GeminiError> for GatewayError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            GeminiError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            GeminiError::BadResponse {
                code: 404,
                description,
            } => GatewayError::ModelNotAvailable(
                description.unwrap_or_else(|| "not found".to_string()),
            ),
            e @ (GeminiError::Decode(_) | GeminiError::NoCandidates { .. }) => {
                GatewayError::InvalidResponse(e.to_string())
            }
            other => GatewayError::RequestFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_response_display() {
        let err = GeminiError::BadResponse {
            code: 400,
            description: Some("invalid argument".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Bad response from server (status 400): invalid argument"
        );
    }

    #[test]
    fn test_not_found_maps_to_model_not_available() {
        let err = GeminiError::BadResponse {
            code: 404,
            description: None,
        };
        assert!(matches!(
            GatewayError::from(err),
            GatewayError::ModelNotAvailable(_)
        ));
    }

    #[test]
    fn test_no_candidates_maps_to_invalid_response() {
        let err = GeminiError::NoCandidates {
            reason: Some("SAFETY".to_string()),
        };
        match GatewayError::from(err) {
            GatewayError::InvalidResponse(msg) => assert!(msg.contains("SAFETY")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
