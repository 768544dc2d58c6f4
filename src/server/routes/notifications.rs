use crate::notify::NotifyReport;
use crate::server::error::ApiResult;
use crate::server::state::TradingState;
use crate::server::Envelope;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

pub(super) fn routes() -> Router<TradingState> {
    Router::new().route("/test", post(send_test))
}

#[derive(Debug, Deserialize)]
struct TestNotification {
    #[serde(default = "default_title")]
    title: String,
    message: String,
}

fn default_title() -> String {
    "Test notification".to_string()
}

/// Delivered synchronously so the caller sees the per-channel report.
async fn send_test(
    State(state): State<TradingState>,
    Json(body): Json<TestNotification>,
) -> ApiResult<Json<Envelope<NotifyReport>>> {
    let report = state.notifier.send(&body.title, &body.message).await;
    Ok(Json(Envelope::data(report)))
}
