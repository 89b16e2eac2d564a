//! Error taxonomy shared by the generators, the configuration store and the
//! HTTP layer.
//!
//! Every failure a request can observe is either a lookup miss (`404`) or a
//! rejected configuration payload (`400`). The conversion into an HTTP
//! response lives here so handlers can simply return `Result<_, ApiError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

// ---

/// A single rejected field in a configuration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    // ---
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        // ---
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    // ---
    /// Lookup of an asset or stored configuration failed.
    #[error("{0}")]
    NotFound(String),

    /// A configuration payload was malformed, out of range, or referenced
    /// an unknown asset.
    #[error("{detail}")]
    Validation {
        detail: String,
        errors: Vec<FieldError>,
    },
}

impl ApiError {
    pub fn asset_not_found() -> Self {
        ApiError::NotFound("Asset not found".to_string())
    }

    pub fn configuration_not_found() -> Self {
        ApiError::NotFound("Configuration not found for this asset".to_string())
    }

    /// Build a validation error from collected field errors.
    ///
    /// The detail message names the first offending field; the full list is
    /// carried alongside for clients that want every violation.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        // ---
        let detail = match errors.first() {
            Some(first) if errors.len() == 1 => format!("{}: {}", first.field, first.message),
            Some(first) => format!(
                "{}: {} (and {} more)",
                first.field,
                first.message,
                errors.len() - 1
            ),
            None => "invalid configuration".to_string(),
        };
        ApiError::Validation { detail, errors }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Field names reported by a validation error, empty for lookups.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ApiError::NotFound(_) => Vec::new(),
            ApiError::Validation { errors, .. } => {
                errors.iter().map(|e| e.field.as_str()).collect()
            }
        }
    }
}

/// JSON body returned for every error response.
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let status = self.status();
        let (detail, errors) = match self {
            ApiError::NotFound(detail) => (detail, Vec::new()),
            ApiError::Validation { detail, errors } => (detail, errors),
        };
        tracing::debug!(%status, %detail, "request rejected");
        (status, Json(ErrorBody { detail, errors })).into_response()
    }
}
