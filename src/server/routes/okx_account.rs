use crate::domain::account::{
    AccountBalance, AccountConfig, FeeRate, FeeRateQuery, LeverageInfo, MaxAvailSize, MaxSize,
    Position, PositionMode,
};
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::TradingState;
use crate::server::Envelope;
use crate::shared::{InstType, MarginMode, PositionSide, TradeMode};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

pub(super) fn routes() -> Router<TradingState> {
    Router::new()
        .route("/info", get(info))
        .route("/balances", get(balances))
        .route("/positions", get(positions))
        .route("/leverage/:inst_id", get(leverage).post(set_leverage))
        .route("/max-size/:inst_id", get(max_size))
        .route("/max-avail-size/:inst_id", get(max_avail_size))
        .route("/fee-rates", get(fee_rates))
        .route("/position-mode", get(position_mode).post(set_position_mode))
}

async fn info(State(state): State<TradingState>) -> ApiResult<Json<Envelope<AccountConfig>>> {
    state
        .okx
        .account()
        .info()
        .await?
        .map(|config| Json(Envelope::data(config)))
        .ok_or_else(|| ApiError::not_found("Account information not found"))
}

#[derive(Debug, Deserialize)]
struct BalanceQuery {
    ccy: Option<String>,
}

async fn balances(
    State(state): State<TradingState>,
    Query(q): Query<BalanceQuery>,
) -> ApiResult<Json<Envelope<AccountBalance>>> {
    let balance = state
        .okx
        .account()
        .balances(q.ccy.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Account balance not found"))?;
    let count = balance.details.len();
    Ok(Json(Envelope {
        count: Some(count),
        ..Envelope::data(balance)
    }))
}

#[derive(Debug, Deserialize)]
struct PositionsQuery {
    inst_type: Option<InstType>,
    inst_id: Option<String>,
}

async fn positions(
    State(state): State<TradingState>,
    Query(q): Query<PositionsQuery>,
) -> ApiResult<Json<Envelope<Vec<Position>>>> {
    let positions = state
        .okx
        .account()
        .positions(q.inst_type, q.inst_id.as_deref())
        .await?;
    Ok(Json(Envelope::list(positions)))
}

#[derive(Debug, Deserialize)]
struct MarginQuery {
    #[serde(default)]
    mgn_mode: MarginMode,
}

async fn leverage(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
    Query(q): Query<MarginQuery>,
) -> ApiResult<Json<Envelope<Vec<LeverageInfo>>>> {
    let info = state.okx.account().leverage(&inst_id, q.mgn_mode).await?;
    if info.is_empty() {
        return Err(ApiError::not_found(format!(
            "Leverage info not found for {inst_id}"
        )));
    }
    Ok(Json(Envelope::data(info)))
}

#[derive(Debug, Deserialize)]
struct SetLeverageQuery {
    lever: String,
    #[serde(default)]
    mgn_mode: MarginMode,
    pos_side: Option<PositionSide>,
}

async fn set_leverage(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
    Query(q): Query<SetLeverageQuery>,
) -> ApiResult<Json<Envelope<Vec<LeverageInfo>>>> {
    let info = state
        .okx
        .account()
        .set_leverage(&inst_id, &q.lever, q.mgn_mode, q.pos_side)
        .await?;
    Ok(Json(Envelope {
        message: Some(format!("Leverage set to {}x for {inst_id}", q.lever)),
        ..Envelope::data(info)
    }))
}

#[derive(Debug, Deserialize)]
struct MaxSizeQuery {
    #[serde(default)]
    td_mode: TradeMode,
    ccy: Option<String>,
    px: Option<String>,
}

async fn max_size(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
    Query(q): Query<MaxSizeQuery>,
) -> ApiResult<Json<Envelope<MaxSize>>> {
    state
        .okx
        .account()
        .max_size(&inst_id, q.td_mode, q.ccy.as_deref(), q.px.as_deref())
        .await?
        .map(|size| Json(Envelope::data(size)))
        .ok_or_else(|| ApiError::not_found(format!("Max size info not found for {inst_id}")))
}

#[derive(Debug, Deserialize)]
struct MaxAvailQuery {
    #[serde(default)]
    td_mode: TradeMode,
    ccy: Option<String>,
    reduce_only: Option<bool>,
}

async fn max_avail_size(
    State(state): State<TradingState>,
    Path(inst_id): Path<String>,
    Query(q): Query<MaxAvailQuery>,
) -> ApiResult<Json<Envelope<MaxAvailSize>>> {
    state
        .okx
        .account()
        .max_avail_size(&inst_id, q.td_mode, q.ccy.as_deref(), q.reduce_only)
        .await?
        .map(|size| Json(Envelope::data(size)))
        .ok_or_else(|| {
            ApiError::not_found(format!("Max available size not found for {inst_id}"))
        })
}

async fn fee_rates(
    State(state): State<TradingState>,
    Query(q): Query<FeeRateQuery>,
) -> ApiResult<Json<Envelope<Vec<FeeRate>>>> {
    Ok(Json(Envelope::list(state.okx.account().fee_rates(&q).await?)))
}

async fn position_mode(State(state): State<TradingState>) -> ApiResult<Json<Envelope<Value>>> {
    state
        .okx
        .account()
        .position_mode()
        .await?
        .map(|mode| Json(Envelope::data(json!({ "position_mode": mode }))))
        .ok_or_else(|| ApiError::not_found("Position mode not found"))
}

#[derive(Debug, Deserialize)]
struct PositionModeQuery {
    pos_mode: PositionMode,
}

async fn set_position_mode(
    State(state): State<TradingState>,
    Query(q): Query<PositionModeQuery>,
) -> ApiResult<Json<Envelope<()>>> {
    let mode = state.okx.account().set_position_mode(q.pos_mode).await?;
    Ok(Json(Envelope::message(format!("Position mode set to {mode}"))))
}
