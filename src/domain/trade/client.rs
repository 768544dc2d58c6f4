//! Trading sub-client.

use super::{
    AmendAck, AmendOrderRequest, CancelAck, CancelOrderRequest, CloseAck, ClosePositionRequest,
    OrderAck, OrderHistoryQuery, OrderRecord, PlaceOrderRequest,
};
use crate::client::OkxClient;
use crate::domain::trade::wire::ClosePositionBody;
use crate::domain::{first_ack, require_id};
use crate::error::GatewayError;
use crate::http::Query;
use crate::submit::{settle, submit_with_retry, Submission};

/// OKX code for "Order does not exist".
const ORDER_NOT_FOUND: &str = "51603";

pub struct Trading<'a> {
    pub(crate) client: &'a OkxClient,
}

impl<'a> Trading<'a> {
    /// Place an order, resubmitting on transient failures.
    pub async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<Submission<OrderAck>, GatewayError> {
        let body = &request.to_body()?;
        self.client.ensure_connected().await?;
        let http = &self.client.http;
        submit_with_retry(&self.client.submission_retry, "okx.place_order", || async move {
            let env = http
                .post_envelope::<OrderAck, _>("/api/v5/trade/order", body)
                .await?;
            Ok::<_, GatewayError>(first_ack(env))
        })
        .await
    }

    pub async fn cancel_order(
        &self,
        request: &CancelOrderRequest,
    ) -> Result<Submission<CancelAck>, GatewayError> {
        let body = request.to_body()?;
        self.client.ensure_connected().await?;
        let env = self
            .client
            .http
            .post_envelope::<CancelAck, _>("/api/v5/trade/cancel-order", &body)
            .await?;
        Ok(settle(first_ack(env)))
    }

    pub async fn amend_order(
        &self,
        request: &AmendOrderRequest,
    ) -> Result<Submission<AmendAck>, GatewayError> {
        let body = request.to_body()?;
        self.client.ensure_connected().await?;
        let env = self
            .client
            .http
            .post_envelope::<AmendAck, _>("/api/v5/trade/amend-order", &body)
            .await?;
        Ok(settle(first_ack(env)))
    }

    /// Completed orders from the last seven days.
    pub async fn list_orders(
        &self,
        query: &OrderHistoryQuery,
    ) -> Result<Vec<OrderRecord>, GatewayError> {
        self.client.ensure_connected().await?;
        let q = Query::new()
            .push("instType", query.inst_type)
            .push_opt("instId", query.inst_id.as_deref())
            .push_opt("state", query.state.as_deref())
            .push("limit", query.limit.unwrap_or(100));
        self.client.http.get("/api/v5/trade/orders-history", &q).await
    }

    /// One order by venue or client id; `None` when OKX does not know it.
    pub async fn order_details(
        &self,
        inst_id: &str,
        ord_id: Option<String>,
        cl_ord_id: Option<String>,
    ) -> Result<Option<OrderRecord>, GatewayError> {
        require_id("ord_id", "cl_ord_id", &ord_id, &cl_ord_id)?;
        self.client.ensure_connected().await?;
        let q = Query::new()
            .push("instId", inst_id)
            .push_opt("ordId", ord_id)
            .push_opt("clOrdId", cl_ord_id);
        match self.client.http.get("/api/v5/trade/order", &q).await {
            Ok(records) => Ok(records.into_iter().next()),
            Err(GatewayError::Venue { code, .. }) if code == ORDER_NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Market-close a whole position, resubmitting on transient failures.
    pub async fn close_position(
        &self,
        request: &ClosePositionRequest,
    ) -> Result<Submission<CloseAck>, GatewayError> {
        self.client.ensure_connected().await?;
        let body = &ClosePositionBody::from(request);
        let http = &self.client.http;
        submit_with_retry(&self.client.submission_retry, "okx.close_position", || async move {
            let env = http
                .post_envelope::<CloseAck, _>("/api/v5/trade/close-position", body)
                .await?;
            Ok::<_, GatewayError>(first_ack(env))
        })
        .await
    }
}
