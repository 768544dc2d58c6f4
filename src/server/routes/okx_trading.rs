use crate::domain::trade::{
    AmendAck, AmendOrderRequest, CancelAck, CancelOrderRequest, CloseAck, ClosePositionRequest,
    OrderAck, OrderHistoryQuery, OrderRecord, PlaceOrderRequest,
};
use crate::server::error::{accepted, ApiError, ApiResult};
use crate::server::state::TradingState;
use crate::server::Envelope;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

pub(super) fn routes() -> Router<TradingState> {
    Router::new()
        .route("/place-order", post(place_order))
        .route("/cancel-order", post(cancel_order))
        .route("/modify-order", post(amend_order))
        .route("/orders", get(list_orders))
        .route("/order/:inst_id", get(order_details))
        .route("/close-position", post(close_position))
}

async fn place_order(
    State(state): State<TradingState>,
    Json(request): Json<PlaceOrderRequest>,
) -> ApiResult<Json<OrderAck>> {
    let ack = accepted(state.okx.trading().place_order(&request).await?)?;
    state.notify(
        "OKX order placed",
        format!(
            "{} {} {}\nOrder ID: {}",
            request.side.as_str().to_uppercase(),
            request.sz,
            request.inst_id,
            ack.ord_id
        ),
    );
    Ok(Json(ack))
}

async fn cancel_order(
    State(state): State<TradingState>,
    Json(request): Json<CancelOrderRequest>,
) -> ApiResult<Json<CancelAck>> {
    Ok(Json(accepted(state.okx.trading().cancel_order(&request).await?)?))
}

async fn amend_order(
    State(state): State<TradingState>,
    Json(request): Json<AmendOrderRequest>,
) -> ApiResult<Json<AmendAck>> {
    Ok(Json(accepted(state.okx.trading().amend_order(&request).await?)?))
}

async fn list_orders(
    State(state): State<TradingState>,
    Query(query): Query<OrderHistoryQuery>,
) -> ApiResult<Json<Envelope<Vec<OrderRecord>>>> {
    let orders = state.okx.trading().list_orders(&query).await?;
    Ok(Json(Envelope::list(orders)))
}

#[derive(Debug, Deserialize)]
struct OrderIdQuery {
    ord_id: Option<String>,
    cl_ord_id: Option<String>,
}

async fn order_details(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
    Query(ids): Query<OrderIdQuery>,
) -> ApiResult<Json<Envelope<OrderRecord>>> {
    state
        .okx
        .trading()
        .order_details(&inst_id, ids.ord_id, ids.cl_ord_id)
        .await?
        .map(|order| Json(Envelope::data(order)))
        .ok_or_else(|| ApiError::not_found("Order not found"))
}

async fn close_position(
    State(state): State<TradingState>,
    Json(request): Json<ClosePositionRequest>,
) -> ApiResult<Json<CloseAck>> {
    let ack = accepted(state.okx.trading().close_position(&request).await?)?;
    state.notify(
        "OKX position closed",
        format!("{} ({})", request.inst_id, request.mgn_mode.as_str()),
    );
    Ok(Json(ack))
}
