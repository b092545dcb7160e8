// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for easyhttp
//!
//! Every failure is raised synchronously from `execute`/`send`. Nothing is
//! retried or suppressed, and a failed call never produces a partial response.

use thiserror::Error;

/// Result type alias for easyhttp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for easyhttp
#[derive(Error, Debug)]
pub enum Error {
    /// URL missing or not a well-formed absolute URL
    #[error("Invalid or missing URL: {0}")]
    Validation(String),

    /// Request body rejected before sending
    #[error("Invalid request data: {0}")]
    RequestData(String),

    /// Network, TLS or timeout failure reported by the transport
    #[error("Transport error (code {code}): {message}")]
    Transport { code: i32, message: String },

    /// Unusable request configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a request data error
    pub fn request_data<S: Into<String>>(msg: S) -> Self {
        Error::RequestData(msg.into())
    }

    /// Create a transport error with its numeric code
    pub fn transport(code: i32, message: impl Into<String>) -> Self {
        Error::Transport {
            code,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Check if the request was rejected before reaching the network
    pub fn is_rejected_locally(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::RequestData(_) | Error::Configuration(_)
        )
    }

    /// Check if this is a timeout reported by the transport
    pub fn is_timeout(&self) -> bool {
        self.transport_code() == Some(crate::transport::codes::OPERATION_TIMEDOUT)
    }

    /// Get the transport error code if available
    pub fn transport_code(&self) -> Option<i32> {
        match self {
            Error::Transport { code, .. } => Some(*code),
            _ => None,
        }
    }
}
