//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bf_site::SiteError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Requested resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// An upstream store cannot be reached.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SiteError> for ServerError {
    fn from(e: SiteError) -> Self {
        match e {
            SiteError::NotFound { resource, id } => Self::NotFound { resource, id },
            SiteError::Unavailable(message) => Self::Unavailable(message),
            SiteError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({"error": "not_found", "resource": resource, "id": id}),
            ),
            Self::Unavailable(message) => {
                tracing::warn!(error = %message, "Upstream unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({"error": "unavailable", "message": message}),
                )
            }
            Self::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "internal", "message": message}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use bf_store::{StoreError, StoreErrorKind};

    use super::*;

    #[test]
    fn test_site_errors_map_to_status() {
        let cases = [
            (
                SiteError::NotFound {
                    resource: "page",
                    id: "1".to_owned(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                SiteError::Unavailable("down".to_owned()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                SiteError::Store(StoreError::new(StoreErrorKind::InvalidData)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = ServerError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
