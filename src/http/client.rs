//! `OkxHttp`, the low-level HTTP client.
//!
//! Speaks the OKX v5 envelope (`{"code","msg","data"}`) and signs every request
//! when credentials are present. Domain sub-clients build paths and bodies;
//! this layer owns signing, transport retries and status mapping.

use crate::auth::{OkxCredentials, HEADER_SIMULATED};
use crate::error::{GatewayError, HttpError};
use crate::http::retry::{RetryConfig, RetryPolicy};

use async_lock::RwLock;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// The response wrapper every OKX v5 endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub struct OkxEnvelope<T> {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> OkxEnvelope<T> {
    pub fn is_ok(&self) -> bool {
        self.code == "0"
    }

    /// Unwrap `data`, turning a non-zero code into [`GatewayError::Venue`].
    pub fn into_data(self) -> Result<Vec<T>, GatewayError> {
        if self.is_ok() {
            Ok(self.data)
        } else {
            Err(GatewayError::venue(self.code, self.msg))
        }
    }
}

// ── Query builder ────────────────────────────────────────────────────────────

/// Query-string builder that skips unset parameters.
#[derive(Debug, Default, Clone)]
pub struct Query(Vec<(&'static str, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn push_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    /// Append the encoded query to `path`.
    pub fn to_path(&self, path: &str) -> String {
        if self.0.is_empty() {
            return path.to_string();
        }
        let params: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        format!("{}?{}", path, params.join("&"))
    }
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Low-level HTTP client for the OKX REST API.
#[derive(Clone)]
pub struct OkxHttp {
    base_url: String,
    client: Client,
    /// API credentials. NEVER exposed publicly.
    credentials: Arc<RwLock<Option<OkxCredentials>>>,
    simulated: bool,
    read_retry: RetryPolicy,
}

impl OkxHttp {
    pub fn new(
        base_url: &str,
        credentials: Option<OkxCredentials>,
        simulated: bool,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(HttpError::from)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials: Arc::new(RwLock::new(credentials)),
            simulated,
            read_retry: RetryPolicy::Idempotent,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Override the retry policy used for GET requests.
    pub fn with_read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    pub(crate) async fn has_credentials(&self) -> bool {
        self.credentials.read().await.is_some()
    }

    // ── Public request API ───────────────────────────────────────────────

    /// GET and unwrap `data`; a non-zero code becomes an error.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<Vec<T>, GatewayError> {
        self.get_envelope(path, query).await?.into_data()
    }

    /// GET and return the raw envelope.
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<OkxEnvelope<T>, GatewayError> {
        let request_path = query.to_path(path);
        self.request_with_retry(Method::GET, &request_path, None, self.read_retry.clone())
            .await
    }

    /// POST and unwrap `data`; a non-zero code becomes an error.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<T>, GatewayError> {
        self.post_envelope(path, body).await?.into_data()
    }

    /// POST and return the raw envelope, whatever its code.
    ///
    /// Order placement uses this so the submission layer can read per-item
    /// `sCode`/`sMsg` even when the top-level code is non-zero.
    pub async fn post_envelope<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<OkxEnvelope<T>, GatewayError> {
        let text = serde_json::to_string(body)?;
        self.request_with_retry(Method::POST, path, Some(&text), RetryPolicy::None)
            .await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn request_with_retry<T: DeserializeOwned>(
        &self,
        method: Method,
        request_path: &str,
        body: Option<&str>,
        retry: RetryPolicy,
    ) -> Result<OkxEnvelope<T>, GatewayError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_request(&method, request_path, body).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T>(&method, request_path, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        GatewayError::Http(HttpError::ServerError { status, .. }) => {
                            config.retryable_statuses.contains(status)
                        }
                        GatewayError::Http(HttpError::RateLimited { retry_after_ms }) => {
                            if let Some(ms) = retry_after_ms {
                                futures_timer::Delay::new(Duration::from_millis(*ms)).await;
                            }
                            true
                        }
                        GatewayError::Http(HttpError::Timeout) => true,
                        GatewayError::Http(HttpError::Reqwest(re)) => {
                            re.is_connect() || re.is_timeout() || re.is_request()
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying {} {}",
                            method,
                            request_path
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.attempts(),
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
        .into())
    }

    async fn do_request<T: DeserializeOwned>(
        &self,
        method: &Method,
        request_path: &str,
        body: Option<&str>,
    ) -> Result<OkxEnvelope<T>, GatewayError> {
        let url = format!("{}{}", self.base_url, request_path);
        let mut req = self
            .client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json");

        if let Some(creds) = self.credentials.read().await.as_ref() {
            for (name, value) in creds.headers(method.as_str(), request_path, body.unwrap_or(""))? {
                req = req.header(name, value);
            }
        }
        if self.simulated {
            req = req.header(HEADER_SIMULATED, "1");
        }
        if let Some(b) = body {
            req = req.body(b.to_string());
        }

        let resp = req.send().await.map_err(HttpError::from)?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp
                .json::<OkxEnvelope<T>>()
                .await
                .map_err(HttpError::from)?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        // OKX reports most client-side failures as a non-2xx status with the
        // usual envelope; surface its code and message as-is.
        if status_code != 429 && status_code < 500 {
            if let Ok(env) = serde_json::from_str::<OkxEnvelope<serde_json::Value>>(&body_text) {
                if !env.code.is_empty() && !env.is_ok() {
                    return Err(GatewayError::venue(env.code, env.msg));
                }
            }
        }

        Err(status_error(status_code, body_text).into())
    }
}

/// Map a non-2xx status onto the transport error taxonomy.
pub(crate) fn status_error(status: u16, body: String) -> HttpError {
    match status {
        401 => HttpError::Unauthorized,
        404 => HttpError::NotFound(body),
        429 => HttpError::RateLimited {
            retry_after_ms: None,
        },
        400..=499 => HttpError::BadRequest(body),
        _ => HttpError::ServerError { status, body },
    }
}
