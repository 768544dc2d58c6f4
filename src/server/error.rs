//! Mapping from gateway errors to HTTP responses.

use crate::error::GatewayError;
use crate::submit::Submission;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error body returned by every route: `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Venue { message, .. } => Self::bad_request(message),
            GatewayError::Validation(message) => Self::bad_request(message),
            GatewayError::NotFound(message) => Self::not_found(message),
            other => {
                tracing::error!(error = %other, "Request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Unwrap a submission, turning a venue rejection into a 400.
pub fn accepted<T>(submission: Submission<T>) -> ApiResult<T> {
    submission.into_result().map_err(|e| {
        tracing::warn!(error = %e, "Venue rejected request");
        ApiError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GatewayError::venue("51008", "Insufficient balance"), 400),
            (GatewayError::Validation("sz must be positive".into()), 400),
            (GatewayError::NotFound("Position 9 not found".into()), 404),
            (GatewayError::NotConnected("OKX"), 500),
            (GatewayError::Http(HttpError::Timeout), 500),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status.as_u16(), status);
        }
    }

    #[test]
    fn test_rejection_keeps_venue_message() {
        let submission: Submission<()> = Submission::Rejected {
            ack: (),
            code: "51008".to_string(),
            message: "Insufficient balance".to_string(),
        };
        let err = accepted(submission).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "Insufficient balance");
    }
}
