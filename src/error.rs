use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required request field was absent or empty.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field was present but unusable.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body could not be decoded.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The checkout token is unknown or its session has expired.
    #[error("Checkout session expired or unknown")]
    SessionExpiredOrUnknown,

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

const EXPIRED_PAGE: &str = r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>Link expired</title></head>
  <body style="font-family: sans-serif">
    <p>This payment link has expired or is invalid. Please start the checkout again.</p>
  </body>
</html>"#;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingField(ref fields) => {
                tracing::debug!("Missing field: {}", fields);
                (
                    StatusCode::BAD_REQUEST,
                    format!("{} is required", fields),
                )
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::MalformedPayload(ref msg) => {
                tracing::warn!("Malformed payload: {}", msg);
                (StatusCode::BAD_REQUEST, "Malformed request body".to_string())
            }

            AppError::SessionExpiredOrUnknown => {
                tracing::debug!("Checkout session expired or unknown");
                return (StatusCode::GONE, Html(EXPIRED_PAGE)).into_response();
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "ok": false,
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"ok":false,"error":"Internal server error"}"#.to_string());

        (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_maps_to_bad_request() {
        let response = AppError::MissingField("reference".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn expired_session_maps_to_gone() {
        let response = AppError::SessionExpiredOrUnknown.into_response();
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[test]
    fn internal_maps_to_server_error() {
        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
