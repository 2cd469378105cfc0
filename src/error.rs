// src/error.rs

//! Unified error handling for the notifier application.

use std::fmt;

use thiserror::Error;

/// Result type alias for reviewbell operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Review API could not be reached; no response was received
    #[error("Review API transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Review API endpoint answered "not found"
    #[error("Review API endpoint not found: {url}")]
    NotFound { url: String },

    /// Review API answered with a logical failure payload
    #[error("Review API reported a failure: {detail}")]
    ServerLogic { detail: String },

    /// Cursor timestamp is not representable as a point in time
    #[error("Invalid cursor timestamp: {value}")]
    InvalidCursor { value: i64 },

    /// A required field is absent or empty in a homework record
    #[error("Missing field '{field}' in homework record {record}")]
    MissingField { field: String, record: String },

    /// A homework record field holds a non-string value
    #[error("Field '{field}' has unexpected type in homework record: {value}")]
    FieldType { field: String, value: String },

    /// Homework status is absent or outside the known verdict set
    #[error("Unknown homework status: {status}")]
    UnknownStatus { status: String },

    /// Messaging transport failed; the message was not delivered
    #[error("Messaging transport error: {0}")]
    MessagingTransport(#[source] reqwest::Error),

    /// Messaging API rejected the delivery
    #[error("Messaging API error: {description}")]
    MessagingApi { description: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a not-found error for the given endpoint.
    pub fn not_found(url: impl Into<String>) -> Self {
        Self::NotFound { url: url.into() }
    }

    /// Create a server-logic error from the failure payload.
    pub fn server_logic(detail: impl fmt::Display) -> Self {
        Self::ServerLogic {
            detail: detail.to_string(),
        }
    }

    /// Create a missing-field error for a homework record.
    pub fn missing_field(field: impl Into<String>, record: impl fmt::Debug) -> Self {
        Self::MissingField {
            field: field.into(),
            record: format!("{record:?}"),
        }
    }

    /// Create a field-type error for a homework record.
    pub fn field_type(field: impl Into<String>, value: impl fmt::Display) -> Self {
        Self::FieldType {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Create an unknown-status error.
    pub fn unknown_status(status: impl Into<String>) -> Self {
        Self::UnknownStatus {
            status: status.into(),
        }
    }

    /// Create a messaging API error.
    pub fn messaging_api(description: impl Into<String>) -> Self {
        Self::MessagingApi {
            description: description.into(),
        }
    }

    /// Whether this error belongs to the messaging layer.
    ///
    /// The poll loop must never notify the chat about its own delivery
    /// failures, so it branches on this.
    pub fn is_messaging(&self) -> bool {
        matches!(
            self,
            Self::MessagingTransport(_) | Self::MessagingApi { .. }
        )
    }
}
