//! OKX domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Request models accepted by the gateway and typed venue records
//! - `wire.rs`: Outbound bodies in the venue's camelCase shape
//! - `convert.rs`: Request → body conversions and validation
//! - `client.rs`: Sub-client with one method per venue endpoint

pub mod account;
pub mod algo;
pub mod market;
pub mod trade;

use crate::error::{GatewayError, OKX_TRANSIENT_CODES};
use crate::http::OkxEnvelope;
use crate::shared::serde_util::parse_decimal_opt;
use crate::submit::Disposition;
use rust_decimal::Decimal;

/// An OKX per-item acknowledgement carrying `sCode`/`sMsg`.
pub trait OkxAck: Default {
    fn status(&self) -> (&str, &str);
    fn set_status(&mut self, code: String, message: String);
}

// ─── Request validation ──────────────────────────────────────────────────────

/// `value` must parse as a decimal (prices may be `-1`, meaning "market").
pub(crate) fn require_decimal(field: &str, value: &str) -> Result<(), GatewayError> {
    parse_decimal_opt(value)
        .map(|_| ())
        .ok_or_else(|| GatewayError::Validation(format!("{field} must be a number, got {value:?}")))
}

/// `value` must parse as a strictly positive decimal.
pub(crate) fn require_positive(field: &str, value: &str) -> Result<(), GatewayError> {
    match parse_decimal_opt(value) {
        Some(d) if d > Decimal::ZERO => Ok(()),
        _ => Err(GatewayError::Validation(format!(
            "{field} must be a positive number, got {value:?}"
        ))),
    }
}

/// At least one of two identifiers must be present.
pub(crate) fn require_id(
    a_name: &str,
    b_name: &str,
    a: &Option<String>,
    b: &Option<String>,
) -> Result<(), GatewayError> {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
    if present(a) || present(b) {
        Ok(())
    } else {
        Err(GatewayError::Validation(format!(
            "Either {a_name} or {b_name} must be provided"
        )))
    }
}

// ─── Acknowledgements ────────────────────────────────────────────────────────

/// Map an OKX status pair onto the submission verdict.
pub(crate) fn classify_okx(code: &str, message: &str) -> Disposition {
    if code == "0" {
        Disposition::Accepted
    } else if OKX_TRANSIENT_CODES.contains(&code) {
        Disposition::Transient {
            code: code.to_string(),
            message: message.to_string(),
        }
    } else {
        Disposition::Rejected {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Collapse a submission envelope into its first acknowledgement.
///
/// Items without their own `sCode` inherit the envelope's code. An empty
/// `data` array becomes a failed ack whose message says so.
pub(crate) fn first_ack<T: OkxAck>(envelope: OkxEnvelope<T>) -> T {
    let OkxEnvelope { code, msg, data } = envelope;
    match data.into_iter().next() {
        Some(mut ack) => {
            if ack.status().0.is_empty() {
                ack.set_status(code, msg);
            }
            ack
        }
        None => {
            let mut ack = T::default();
            let code = if code.is_empty() || code == "0" {
                "1".to_string()
            } else {
                code
            };
            ack.set_status(code, format!("Order failed: {msg}"));
            ack
        }
    }
}
