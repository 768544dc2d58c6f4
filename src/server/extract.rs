//! Request extractors.

use axum::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;

const BODY_LIMIT: usize = 1 << 20;

/// JSON body that may be omitted.
///
/// An empty body yields `T::default()`. Anything else goes through [`Json`],
/// so a malformed body keeps axum's own rejection status.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|e| {
                ApiError::bad_request(format!("Failed to read body: {e}")).into_response()
            })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Params {
        limit: Option<u32>,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Params, StatusCode> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        OptionalJson::<Params>::from_request(req, &())
            .await
            .map(|OptionalJson(v)| v)
            .map_err(|r| r.status())
    }

    #[tokio::test]
    async fn test_empty_body_defaults() {
        assert_eq!(extract(None, "").await, Ok(Params::default()));
        assert_eq!(extract(Some("application/json"), "  ").await, Ok(Params::default()));
    }

    #[tokio::test]
    async fn test_present_body_is_parsed() {
        let parsed = extract(Some("application/json"), r#"{"limit": 5}"#).await;
        assert_eq!(parsed, Ok(Params { limit: Some(5) }));
    }

    #[tokio::test]
    async fn test_malformed_body_keeps_axum_status() {
        let truncated = extract(Some("application/json"), r#"{"limit": 5"#).await;
        assert_eq!(truncated, Err(StatusCode::BAD_REQUEST));

        let mistyped = extract(Some("application/json"), r#"{"limit": "lots"}"#).await;
        assert_eq!(mistyped, Err(StatusCode::UNPROCESSABLE_ENTITY));

        let untyped = extract(None, r#"{"limit": 5}"#).await;
        assert_eq!(untyped, Err(StatusCode::UNSUPPORTED_MEDIA_TYPE));
    }
}
