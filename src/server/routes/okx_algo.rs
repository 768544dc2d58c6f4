use crate::domain::algo::{
    AlgoAck, AlgoOrderBase, AlgoOrderRecord, AlgoOrdersQuery, AmendAlgoAck, AmendAlgoRequest,
    CancelAlgoRequest, IcebergRequest, TpSlRequest, TrailingStopRequest, TriggerRequest,
    TwapRequest,
};
use crate::server::error::{accepted, ApiError, ApiResult};
use crate::server::state::TradingState;
use crate::server::Envelope;
use crate::submit::Submission;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

pub(super) fn routes() -> Router<TradingState> {
    Router::new()
        .route("/place-tp-sl", post(place_tp_sl))
        .route("/place-trigger", post(place_trigger))
        .route("/place-trailing-stop", post(place_trailing_stop))
        .route("/place-iceberg", post(place_iceberg))
        .route("/place-twap", post(place_twap))
        .route("/cancel-order", post(cancel))
        .route("/amend-order", post(amend))
        .route("/orders", get(list))
        .route("/order/details", get(details))
}

/// Unwrap a placement and announce it.
fn placed(
    state: &TradingState,
    kind: &str,
    base: &AlgoOrderBase,
    submission: Submission<AlgoAck>,
) -> ApiResult<Json<AlgoAck>> {
    let ack = accepted(submission)?;
    state.notify(
        format!("OKX {kind} order placed"),
        format!(
            "{} {} {}\nAlgo ID: {}",
            base.side.as_str().to_uppercase(),
            base.sz,
            base.inst_id,
            ack.algo_id
        ),
    );
    Ok(Json(ack))
}

async fn place_tp_sl(
    State(state): State<TradingState>,
    Json(request): Json<TpSlRequest>,
) -> ApiResult<Json<AlgoAck>> {
    let submission = state.okx.algo().place_tp_sl(&request).await?;
    placed(&state, "TP/SL", &request.base, submission)
}

async fn place_trigger(
    State(state): State<TradingState>,
    Json(request): Json<TriggerRequest>,
) -> ApiResult<Json<AlgoAck>> {
    let submission = state.okx.algo().place_trigger(&request).await?;
    placed(&state, "trigger", &request.base, submission)
}

async fn place_trailing_stop(
    State(state): State<TradingState>,
    Json(request): Json<TrailingStopRequest>,
) -> ApiResult<Json<AlgoAck>> {
    let submission = state.okx.algo().place_trailing_stop(&request).await?;
    placed(&state, "trailing stop", &request.base, submission)
}

async fn place_iceberg(
    State(state): State<TradingState>,
    Json(request): Json<IcebergRequest>,
) -> ApiResult<Json<AlgoAck>> {
    let submission = state.okx.algo().place_iceberg(&request).await?;
    placed(&state, "iceberg", &request.base, submission)
}

async fn place_twap(
    State(state): State<TradingState>,
    Json(request): Json<TwapRequest>,
) -> ApiResult<Json<AlgoAck>> {
    let submission = state.okx.algo().place_twap(&request).await?;
    placed(&state, "TWAP", &request.base, submission)
}

async fn cancel(
    State(state): State<TradingState>,
    Json(request): Json<CancelAlgoRequest>,
) -> ApiResult<Json<AlgoAck>> {
    Ok(Json(accepted(state.okx.algo().cancel(&request).await?)?))
}

async fn amend(
    State(state): State<TradingState>,
    Json(request): Json<AmendAlgoRequest>,
) -> ApiResult<Json<AmendAlgoAck>> {
    Ok(Json(accepted(state.okx.algo().amend(&request).await?)?))
}

async fn list(
    State(state): State<TradingState>,
    Query(query): Query<AlgoOrdersQuery>,
) -> ApiResult<Json<Envelope<Vec<AlgoOrderRecord>>>> {
    Ok(Json(Envelope::list(state.okx.algo().list(&query).await?)))
}

#[derive(Debug, Deserialize)]
struct AlgoIdQuery {
    algo_id: Option<String>,
    algo_cl_ord_id: Option<String>,
}

async fn details(
    State(state): State<TradingState>,
    Query(ids): Query<AlgoIdQuery>,
) -> ApiResult<Json<Envelope<AlgoOrderRecord>>> {
    state
        .okx
        .algo()
        .details(ids.algo_id, ids.algo_cl_ord_id)
        .await?
        .map(|order| Json(Envelope::data(order)))
        .ok_or_else(|| ApiError::not_found("Algo order not found"))
}
