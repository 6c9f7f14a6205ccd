//! Error types and handling for the Tripsmith application

use thiserror::Error;

/// Main error type for the Tripsmith application
#[derive(Error, Debug)]
pub enum TripsmithError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Generative backend communication errors
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Errors parsing backend output or reference documents
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Durable store operation errors
    #[error("Store error: {message}")]
    Store { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl TripsmithError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new backend error
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripsmithError::Config { .. } => {
                "Configuration error. Please check your config file and backend settings."
                    .to_string()
            }
            TripsmithError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TripsmithError::Backend { .. } => {
                "The itinerary service is temporarily unavailable. Please try again.".to_string()
            }
            TripsmithError::Parse { .. } => {
                "Received malformed data from an upstream service.".to_string()
            }
            TripsmithError::Store { .. } => {
                "Saving your itinerary failed. Please try again.".to_string()
            }
            TripsmithError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TripsmithError::General { message } => message.clone(),
        }
    }
}
