//! HTTP client layer: `OkxHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::{OkxEnvelope, OkxHttp, Query};
pub use retry::{RetryConfig, RetryPolicy};
