use crate::mt5::{AccountInfo, ClosePositionRequest, PlaceOrderRequest, Position, TradeResult};
use crate::server::error::{accepted, ApiError, ApiResult};
use crate::server::state::TradingState;
use crate::server::Envelope;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

pub(super) fn routes() -> Router<TradingState> {
    Router::new()
        .route("/account/info", get(account_info))
        .route("/position/list", get(positions))
        .route("/trading/place-order", post(place_order))
        .route("/position/close", post(close_position))
}

async fn account_info(State(state): State<TradingState>) -> ApiResult<Json<AccountInfo>> {
    state
        .mt5
        .account_info()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Account information not found"))
}

#[derive(Debug, Deserialize)]
struct SymbolQuery {
    symbol: Option<String>,
}

async fn positions(
    State(state): State<TradingState>,
    Query(q): Query<SymbolQuery>,
) -> ApiResult<Json<Envelope<Vec<Position>>>> {
    let positions = state.mt5.positions(q.symbol.as_deref()).await?;
    Ok(Json(Envelope::list(positions)))
}

async fn place_order(
    State(state): State<TradingState>,
    Json(request): Json<PlaceOrderRequest>,
) -> ApiResult<Json<TradeResult>> {
    let result = accepted(state.mt5.place_order(&request).await?)?;
    state.notify(
        "MT5 order placed",
        format!(
            "{} {} {} @ {}\nTicket: {}",
            request.side.as_str().to_uppercase(),
            request.volume,
            request.symbol,
            result.price,
            result.order
        ),
    );
    Ok(Json(result))
}

async fn close_position(
    State(state): State<TradingState>,
    Json(request): Json<ClosePositionRequest>,
) -> ApiResult<Json<TradeResult>> {
    let result = accepted(state.mt5.close_position(&request).await?)?;
    state.notify(
        "MT5 position closed",
        format!("Ticket {} closed @ {}", request.ticket, result.price),
    );
    Ok(Json(result))
}
