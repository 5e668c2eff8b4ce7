// src/error.rs

//! Unified error handling for the notification service.

use std::fmt;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML users file could not be parsed or written
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML settings file could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// LeetCode user does not exist upstream
    #[error("LeetCode user not found: {username}")]
    NotFound { username: String },

    /// Upstream API answered with a non-success status
    #[error("Upstream error from {endpoint} ({status}): {body}")]
    Upstream {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Email provider rejected or failed a send
    #[error("Email to {recipient} failed: {message}")]
    Email { recipient: String, message: String },

    /// Basic credentials missing or wrong
    #[error("Incorrect username or password")]
    Unauthorized,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error for a LeetCode username.
    pub fn not_found(username: impl Into<String>) -> Self {
        Self::NotFound {
            username: username.into(),
        }
    }

    /// Create an upstream status error.
    pub fn upstream(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    /// Create an email delivery error.
    pub fn email(recipient: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Email {
            recipient: recipient.into(),
            message: message.to_string(),
        }
    }

    /// HTTP status this error surfaces as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Upstream { .. } | AppError::Http(_) | AppError::Email { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Io(_)
            | AppError::Json(_)
            | AppError::Yaml(_)
            | AppError::Toml(_)
            | AppError::Url(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        }

        let mut response = (status, Json(json!({ "detail": self.to_string() }))).into_response();
        if matches!(self, AppError::Unauthorized) {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
        }
        response
    }
}
