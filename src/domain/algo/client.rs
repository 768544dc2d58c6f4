//! Algo-trading sub-client.

use super::wire::{AlgoOrderBody, CancelAlgoBody};
use super::{
    AlgoAck, AlgoOrderRecord, AlgoOrdersQuery, AmendAlgoAck, AmendAlgoRequest, CancelAlgoRequest,
    IcebergRequest, TpSlRequest, TrailingStopRequest, TriggerRequest, TwapRequest,
};
use crate::client::OkxClient;
use crate::domain::{first_ack, require_id};
use crate::error::GatewayError;
use crate::http::Query;
use crate::submit::{settle, submit_with_retry, Submission};

pub struct AlgoTrading<'a> {
    pub(crate) client: &'a OkxClient,
}

impl<'a> AlgoTrading<'a> {
    // ── Placement ────────────────────────────────────────────────────────

    pub async fn place_tp_sl(
        &self,
        request: &TpSlRequest,
    ) -> Result<Submission<AlgoAck>, GatewayError> {
        self.place("okx.place_tp_sl", &request.to_body()?).await
    }

    pub async fn place_trigger(
        &self,
        request: &TriggerRequest,
    ) -> Result<Submission<AlgoAck>, GatewayError> {
        self.place("okx.place_trigger", &request.to_body()?).await
    }

    pub async fn place_trailing_stop(
        &self,
        request: &TrailingStopRequest,
    ) -> Result<Submission<AlgoAck>, GatewayError> {
        self.place("okx.place_trailing_stop", &request.to_body()?).await
    }

    pub async fn place_iceberg(
        &self,
        request: &IcebergRequest,
    ) -> Result<Submission<AlgoAck>, GatewayError> {
        self.place("okx.place_iceberg", &request.to_body()?).await
    }

    pub async fn place_twap(
        &self,
        request: &TwapRequest,
    ) -> Result<Submission<AlgoAck>, GatewayError> {
        self.place("okx.place_twap", &request.to_body()?).await
    }

    async fn place(
        &self,
        label: &str,
        body: &AlgoOrderBody<'_>,
    ) -> Result<Submission<AlgoAck>, GatewayError> {
        self.client.ensure_connected().await?;
        let http = &self.client.http;
        submit_with_retry(&self.client.submission_retry, label, || async move {
            Ok::<_, GatewayError>(first_ack(
                http.post_envelope::<AlgoAck, _>("/api/v5/trade/order-algo", body)
                    .await?,
            ))
        })
        .await
    }

    // ── Management ───────────────────────────────────────────────────────

    pub async fn cancel(
        &self,
        request: &CancelAlgoRequest,
    ) -> Result<Submission<AlgoAck>, GatewayError> {
        self.client.ensure_connected().await?;
        let body = [CancelAlgoBody::from(request)];
        let env = self
            .client
            .http
            .post_envelope::<AlgoAck, _>("/api/v5/trade/cancel-algos", &body)
            .await?;
        Ok(settle(first_ack(env)))
    }

    pub async fn amend(
        &self,
        request: &AmendAlgoRequest,
    ) -> Result<Submission<AmendAlgoAck>, GatewayError> {
        let body = request.to_body()?;
        self.client.ensure_connected().await?;
        let env = self
            .client
            .http
            .post_envelope::<AmendAlgoAck, _>("/api/v5/trade/amend-algos", &body)
            .await?;
        Ok(settle(first_ack(env)))
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// Pending orders, or history when a terminal `state` is requested.
    pub async fn list(
        &self,
        query: &AlgoOrdersQuery,
    ) -> Result<Vec<AlgoOrderRecord>, GatewayError> {
        let ord_type = query.ord_type.ok_or_else(|| {
            GatewayError::Validation("ord_type is required to list algo orders".to_string())
        })?;
        self.client.ensure_connected().await?;

        let path = match query.state {
            Some(state) if !state.is_pending() => "/api/v5/trade/orders-algo-history",
            _ => "/api/v5/trade/orders-algo-pending",
        };
        let q = Query::new()
            .push("ordType", ord_type)
            .push_opt("algoId", query.algo_id.as_deref())
            .push_opt("instId", query.inst_id.as_deref())
            .push_opt("instType", query.inst_type)
            .push_opt(
                "state",
                query
                    .state
                    .filter(|s| !s.is_pending())
                    .map(|s| s.as_str()),
            )
            .push("limit", query.limit.unwrap_or(100));
        self.client.http.get(path, &q).await
    }

    /// One algo order; `None` when OKX returns nothing.
    pub async fn details(
        &self,
        algo_id: Option<String>,
        algo_cl_ord_id: Option<String>,
    ) -> Result<Option<AlgoOrderRecord>, GatewayError> {
        require_id("algo_id", "algo_cl_ord_id", &algo_id, &algo_cl_ord_id)?;
        self.client.ensure_connected().await?;
        let q = Query::new()
            .push_opt("algoId", algo_id)
            .push_opt("algoClOrdId", algo_cl_ord_id);
        let records: Vec<AlgoOrderRecord> =
            self.client.http.get("/api/v5/trade/order-algo", &q).await?;
        Ok(records.into_iter().next())
    }
}
