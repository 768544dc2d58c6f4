use crate::domain::market::{
    Candle, CandleQuery, FundingRate, Instrument, MarkPrice, OrderBook, PublicTrade, Stats24h,
    Ticker,
};
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::TradingState;
use crate::server::Envelope;
use crate::shared::InstType;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

pub(super) fn routes() -> Router<TradingState> {
    Router::new()
        .route("/ticker/:inst_id", get(ticker))
        .route("/tickers", get(tickers))
        .route("/orderbook/:inst_id", get(orderbook))
        .route("/trades/:inst_id", get(recent_trades))
        .route("/klines/:inst_id", get(klines))
        .route("/24hr-stats/:inst_id", get(stats_24h))
        .route("/instruments", get(instruments))
        .route("/funding-rate/:inst_id", get(funding_rate))
        .route("/mark-price/:inst_id", get(mark_price))
}

fn found<T>(value: Option<T>, what: &str, inst_id: &str) -> ApiResult<Json<Envelope<T>>> {
    value
        .map(|v| Json(Envelope::data(v)))
        .ok_or_else(|| ApiError::not_found(format!("{what} not found for {inst_id}")))
}

async fn ticker(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
) -> ApiResult<Json<Envelope<Ticker>>> {
    found(state.okx.market().ticker(&inst_id).await?, "Ticker data", &inst_id)
}

#[derive(Debug, Deserialize)]
struct FamilyQuery {
    #[serde(default)]
    inst_type: InstType,
    uly: Option<String>,
    inst_id: Option<String>,
}

async fn tickers(
    State(state): State<TradingState>,
    Query(q): Query<FamilyQuery>,
) -> ApiResult<Json<Envelope<Vec<Ticker>>>> {
    let tickers = state
        .okx
        .market()
        .tickers(q.inst_type, q.uly.as_deref())
        .await?;
    Ok(Json(Envelope::list(tickers)))
}

#[derive(Debug, Deserialize)]
struct DepthQuery {
    sz: Option<u32>,
}

async fn orderbook(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
    Query(q): Query<DepthQuery>,
) -> ApiResult<Json<Envelope<OrderBook>>> {
    let book = state.okx.market().orderbook(&inst_id, q.sz).await?;
    found(book, "Order book", &inst_id)
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<u32>,
}

async fn recent_trades(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
    Query(q): Query<LimitQuery>,
) -> ApiResult<Json<Envelope<Vec<PublicTrade>>>> {
    let trades = state.okx.market().recent_trades(&inst_id, q.limit).await?;
    Ok(Json(Envelope::list(trades)))
}

async fn klines(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
    Query(q): Query<CandleQuery>,
) -> ApiResult<Json<Envelope<Vec<Candle>>>> {
    Ok(Json(Envelope::list(state.okx.market().klines(&inst_id, &q).await?)))
}

async fn stats_24h(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
) -> ApiResult<Json<Envelope<Stats24h>>> {
    found(state.okx.market().stats_24h(&inst_id).await?, "24hr stats", &inst_id)
}

async fn instruments(
    State(state): State<TradingState>,
    Query(q): Query<FamilyQuery>,
) -> ApiResult<Json<Envelope<Vec<Instrument>>>> {
    let instruments = state
        .okx
        .market()
        .instruments(q.inst_type, q.uly.as_deref(), q.inst_id.as_deref())
        .await?;
    Ok(Json(Envelope::list(instruments)))
}

async fn funding_rate(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
) -> ApiResult<Json<Envelope<FundingRate>>> {
    let rate = state.okx.market().funding_rate(&inst_id).await?;
    found(rate, "Funding rate", &inst_id)
}

async fn mark_price(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
) -> ApiResult<Json<Envelope<MarkPrice>>> {
    let price = state.okx.market().mark_price(&inst_id).await?;
    found(price, "Mark price", &inst_id)
}
