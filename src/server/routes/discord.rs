use crate::discord::{DiscordData, FetchRequest, StoredGroup, EXPORT_LIMIT};
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::DiscordState;
use crate::server::{Envelope, OptionalJson};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const NOTHING_FETCHED: &str = "No messages found or failed to fetch from Discord";

pub(super) fn routes() -> Router<DiscordState> {
    Router::new()
        .route("/messages/fetch", post(fetch))
        .route("/messages/latest", get(latest))
        .route("/messages/fetch-and-save", post(fetch_and_save))
        .route("/messages/count/:user_id", get(count))
}

/// Fetch and return; saving is attempted but never fails the request.
async fn fetch(
    State(state): State<DiscordState>,
    OptionalJson(request): OptionalJson<FetchRequest>,
) -> ApiResult<Json<Envelope<DiscordData>>> {
    let data = state
        .harvester
        .fetch(&request)
        .await?
        .ok_or_else(|| ApiError::not_found(NOTHING_FETCHED))?;
    if let Err(e) = state.harvester.save(&data).await {
        tracing::warn!(error = %e, "Failed to save fetched messages, returning them anyway");
    }
    Ok(Json(Envelope::data(data)))
}

#[derive(Debug, Deserialize)]
struct LatestQuery {
    limit: Option<u32>,
}

async fn latest(
    State(state): State<DiscordState>,
    Query(q): Query<LatestQuery>,
) -> ApiResult<Json<Envelope<Vec<StoredGroup>>>> {
    let limit = q.limit.unwrap_or(EXPORT_LIMIT as u32);
    Ok(Json(Envelope::list(state.harvester.latest(limit).await?)))
}

#[derive(Debug, Serialize)]
struct FetchAndSaveResponse {
    success: bool,
    message: String,
    username: String,
    message_count: usize,
    total_groups: usize,
    inserted_groups: usize,
    new_messages: usize,
}

async fn fetch_and_save(
    State(state): State<DiscordState>,
    OptionalJson(request): OptionalJson<FetchRequest>,
) -> ApiResult<Json<FetchAndSaveResponse>> {
    let harvest = state
        .harvester
        .fetch_and_save(&request)
        .await?
        .ok_or_else(|| ApiError::not_found(NOTHING_FETCHED))?;
    let data = &harvest.data;
    Ok(Json(FetchAndSaveResponse {
        success: true,
        message: format!(
            "Fetched {} messages from {}",
            data.exported_count, data.username
        ),
        username: data.username.clone(),
        message_count: data.exported_count,
        total_groups: data.message_groups.len(),
        inserted_groups: harvest.summary.inserted_groups,
        new_messages: harvest.summary.new_messages,
    }))
}

async fn count(
    State(state): State<DiscordState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Envelope<Value>>> {
    let count = state.harvester.count_by_user(&user_id).await?;
    Ok(Json(Envelope::data(json!({ "user_id": user_id, "count": count }))))
}
