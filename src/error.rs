use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error body the backend sends alongside non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl AppError {
    /// Session errors send the user back to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, AppError::Unauthenticated | AppError::InvalidToken(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthenticated => {
                "Authentication failed. Redirecting to login...".to_string()
            }
            AppError::InvalidToken(_) => {
                "Invalid or expired token. Redirecting to login...".to_string()
            }
            AppError::Http(e) if e.is_timeout() => "The request timed out.".to_string(),
            AppError::Http(_) => "Network error. Please try again.".to_string(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Decode(_) => "Unexpected response from server.".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Storage(_) => "Could not access local storage.".to_string(),
            AppError::Config(msg) => msg.clone(),
        }
    }
}
