//! OKX request authentication.
//!
//! ## Signing
//!
//! Every private request carries four headers:
//!
//! - `OK-ACCESS-KEY`: the API key
//! - `OK-ACCESS-TIMESTAMP`: ISO-8601 UTC with millisecond precision
//! - `OK-ACCESS-PASSPHRASE`: the passphrase chosen when the key was created
//! - `OK-ACCESS-SIGN`: `base64(HMAC-SHA256(secret, timestamp + METHOD + path + body))`
//!
//! `path` includes the query string; `body` is the exact JSON text sent, or
//! empty for GET. Demo-trading keys additionally need `x-simulated-trading: 1`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::GatewayError;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_KEY: &str = "OK-ACCESS-KEY";
pub const HEADER_SIGN: &str = "OK-ACCESS-SIGN";
pub const HEADER_TIMESTAMP: &str = "OK-ACCESS-TIMESTAMP";
pub const HEADER_PASSPHRASE: &str = "OK-ACCESS-PASSPHRASE";
pub const HEADER_SIMULATED: &str = "x-simulated-trading";

// ============================================================================
// Credentials
// ============================================================================

/// API key triple issued by OKX. Secrets never appear in `Debug` output.
#[derive(Clone)]
pub struct OkxCredentials {
    pub api_key: String,
    pub secret_key: String,
    pub passphrase: String,
}

impl OkxCredentials {
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Build the full header set for one request.
    pub fn headers(
        &self,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> Result<Vec<(&'static str, String)>, GatewayError> {
        let ts = timestamp(Utc::now());
        let signature = sign(&self.secret_key, &ts, method, request_path, body)?;
        Ok(vec![
            (HEADER_KEY, self.api_key.clone()),
            (HEADER_SIGN, signature),
            (HEADER_TIMESTAMP, ts),
            (HEADER_PASSPHRASE, self.passphrase.clone()),
        ])
    }
}

impl std::fmt::Debug for OkxCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OkxCredentials")
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Signing primitives
// ============================================================================

/// Format a timestamp the way OKX expects it, e.g. `2020-12-08T09:08:57.715Z`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Compute `OK-ACCESS-SIGN` for a request.
pub fn sign(
    secret: &str,
    timestamp: &str,
    method: &str,
    request_path: &str,
    body: &str,
) -> Result<String, GatewayError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| GatewayError::Validation(format!("invalid OKX secret: {e}")))?;
    mac.update(timestamp.as_bytes());
    mac.update(method.to_ascii_uppercase().as_bytes());
    mac.update(request_path.as_bytes());
    mac.update(body.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_has_millis_and_z_suffix() {
        let at = Utc
            .with_ymd_and_hms(2020, 12, 8, 9, 8, 57)
            .unwrap()
            + chrono::Duration::milliseconds(715);
        assert_eq!(timestamp(at), "2020-12-08T09:08:57.715Z");
    }

    #[test]
    fn test_sign_get_includes_query() {
        let sig = sign(
            "secret",
            "2020-12-08T09:08:57.715Z",
            "GET",
            "/api/v5/account/balance?ccy=BTC",
            "",
        )
        .unwrap();
        assert_eq!(sig, "wpDvCwYCprcMQsQkxWJiWy+YADoQE4ep+OEKKLimMoY=");
    }

    #[test]
    fn test_sign_post_includes_body() {
        let sig = sign(
            "secret",
            "2020-12-08T09:08:57.715Z",
            "post",
            "/api/v5/trade/order",
            r#"{"instId":"BTC-USDT"}"#,
        )
        .unwrap();
        assert_eq!(sig, "I64FCA5BpQbPVAu81/jgcqwMMz/badKJDsMDOMpXB0Y=");
    }

    #[test]
    fn test_headers_carry_key_and_passphrase() {
        let creds = OkxCredentials::new("key-1", "secret", "pass-1");
        let headers = creds.headers("GET", "/api/v5/account/config", "").unwrap();
        let names: Vec<_> = headers.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            vec![HEADER_KEY, HEADER_SIGN, HEADER_TIMESTAMP, HEADER_PASSPHRASE]
        );
        assert_eq!(headers[0].1, "key-1");
        assert_eq!(headers[3].1, "pass-1");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = OkxCredentials::new("key-1", "top-secret", "pass-1");
        let shown = format!("{creds:?}");
        assert!(!shown.contains("top-secret"));
        assert!(!shown.contains("pass-1"));
    }
}
