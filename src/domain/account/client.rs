//! Account sub-client.

use super::wire::{SetLeverageBody, SetPositionModeBody};
use super::{
    AccountBalance, AccountConfig, FeeRate, FeeRateQuery, LeverageInfo, MaxAvailSize, MaxSize,
    Position, PositionMode, PositionModeAck,
};
use crate::client::OkxClient;
use crate::domain::require_positive;
use crate::error::GatewayError;
use crate::http::Query;
use crate::shared::{InstType, MarginMode, PositionSide, TradeMode};

pub struct Account<'a> {
    pub(crate) client: &'a OkxClient,
}

impl<'a> Account<'a> {
    pub async fn info(&self) -> Result<Option<AccountConfig>, GatewayError> {
        self.client.ensure_connected().await?;
        let configs: Vec<AccountConfig> = self
            .client
            .http
            .get("/api/v5/account/config", &Query::new())
            .await?;
        Ok(configs.into_iter().next())
    }

    pub async fn balances(
        &self,
        ccy: Option<&str>,
    ) -> Result<Option<AccountBalance>, GatewayError> {
        self.client.ensure_connected().await?;
        let q = Query::new().push_opt("ccy", ccy);
        let balances: Vec<AccountBalance> =
            self.client.http.get("/api/v5/account/balance", &q).await?;
        Ok(balances
            .into_iter()
            .next()
            .map(AccountBalance::inherit_update_time))
    }

    pub async fn positions(
        &self,
        inst_type: Option<InstType>,
        inst_id: Option<&str>,
    ) -> Result<Vec<Position>, GatewayError> {
        self.client.ensure_connected().await?;
        let q = Query::new()
            .push_opt("instType", inst_type)
            .push_opt("instId", inst_id);
        self.client.http.get("/api/v5/account/positions", &q).await
    }

    /// One entry per position side in long/short mode, a single one otherwise.
    pub async fn leverage(
        &self,
        inst_id: &str,
        mgn_mode: MarginMode,
    ) -> Result<Vec<LeverageInfo>, GatewayError> {
        self.client.ensure_connected().await?;
        let q = Query::new()
            .push("instId", inst_id)
            .push("mgnMode", mgn_mode);
        self.client
            .http
            .get("/api/v5/account/leverage-info", &q)
            .await
    }

    pub async fn set_leverage(
        &self,
        inst_id: &str,
        lever: &str,
        mgn_mode: MarginMode,
        pos_side: Option<PositionSide>,
    ) -> Result<Vec<LeverageInfo>, GatewayError> {
        require_positive("lever", lever)?;
        self.client.ensure_connected().await?;
        let body = SetLeverageBody {
            inst_id,
            lever,
            mgn_mode,
            pos_side,
        };
        tracing::info!(inst_id, lever, mgn_mode = %mgn_mode, "setting leverage");
        self.client
            .http
            .post("/api/v5/account/set-leverage", &body)
            .await
    }

    pub async fn max_size(
        &self,
        inst_id: &str,
        td_mode: TradeMode,
        ccy: Option<&str>,
        px: Option<&str>,
    ) -> Result<Option<MaxSize>, GatewayError> {
        self.client.ensure_connected().await?;
        let q = Query::new()
            .push("instId", inst_id)
            .push("tdMode", td_mode)
            .push_opt("ccy", ccy)
            .push_opt("px", px);
        let sizes: Vec<MaxSize> = self.client.http.get("/api/v5/account/max-size", &q).await?;
        Ok(sizes.into_iter().next())
    }

    pub async fn max_avail_size(
        &self,
        inst_id: &str,
        td_mode: TradeMode,
        ccy: Option<&str>,
        reduce_only: Option<bool>,
    ) -> Result<Option<MaxAvailSize>, GatewayError> {
        self.client.ensure_connected().await?;
        let q = Query::new()
            .push("instId", inst_id)
            .push("tdMode", td_mode)
            .push_opt("ccy", ccy)
            .push_opt("reduceOnly", reduce_only);
        let sizes: Vec<MaxAvailSize> = self
            .client
            .http
            .get("/api/v5/account/max-avail-size", &q)
            .await?;
        Ok(sizes.into_iter().next())
    }

    pub async fn fee_rates(&self, query: &FeeRateQuery) -> Result<Vec<FeeRate>, GatewayError> {
        self.client.ensure_connected().await?;
        let q = Query::new()
            .push("instType", query.inst_type)
            .push_opt("instId", query.inst_id.as_deref())
            .push_opt("uly", query.uly.as_deref())
            .push_opt("instFamily", query.inst_family.as_deref());
        self.client.http.get("/api/v5/account/trade-fee", &q).await
    }

    /// Read from the account configuration; OKX has no dedicated endpoint.
    pub async fn position_mode(&self) -> Result<Option<String>, GatewayError> {
        Ok(self
            .info()
            .await?
            .map(|config| config.pos_mode)
            .filter(|mode| !mode.is_empty()))
    }

    pub async fn set_position_mode(
        &self,
        pos_mode: PositionMode,
    ) -> Result<PositionMode, GatewayError> {
        self.client.ensure_connected().await?;
        let body = SetPositionModeBody { pos_mode };
        tracing::info!(pos_mode = %pos_mode, "setting position mode");
        let acks: Vec<PositionModeAck> = self
            .client
            .http
            .post("/api/v5/account/set-position-mode", &body)
            .await?;
        Ok(acks.into_iter().next().map_or(pos_mode, |ack| ack.pos_mode))
    }
}
