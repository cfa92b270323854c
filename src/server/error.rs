//! HTTP error shape

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::utils::error::VidgateError;

/// Error reply in the `{"detail": ...}` shape API clients already parse.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Report an extraction failure the way this API always has: 400 with
    /// a prefixed detail string. A missing yt-dlp binary is the one case
    /// that is the operator's fault rather than the request's, so it maps
    /// to 500.
    pub fn from_extraction(context: &str, err: anyhow::Error) -> Self {
        match err.downcast_ref::<VidgateError>() {
            Some(VidgateError::YtDlpNotFound) => Self::internal(format!("{context}: {err}")),
            _ => Self::bad_request(format!("{context}: {err}")),
        }
    }
}

/// Library errors raised before extraction starts carry their display
/// text straight into the detail field.
impl From<VidgateError> for ApiError {
    fn from(err: VidgateError) -> Self {
        match err {
            VidgateError::YtDlpNotFound => Self::internal(err.to_string()),
            _ => Self::bad_request(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_errors_are_bad_requests() {
        let err: anyhow::Error = VidgateError::ExtractionError("nope".to_string()).into();
        let api = ApiError::from_extraction("Failed to get video info", err);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.message.starts_with("Failed to get video info:"));
    }

    #[test]
    fn test_missing_binary_is_a_server_error() {
        let err: anyhow::Error = VidgateError::YtDlpNotFound.into();
        let api = ApiError::from_extraction("Failed to get video info", err);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_gate_rejection_keeps_the_plain_detail_text() {
        let api = ApiError::from(VidgateError::UnsupportedPlatform);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Unsupported platform");
    }
}
