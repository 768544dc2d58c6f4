//! Public market-data sub-client. None of these endpoints need credentials.

use super::wire::{BookSnapshot, CandleRow};
use super::{
    Candle, CandleQuery, FundingRate, Instrument, MarkPrice, OrderBook, PublicTrade, Stats24h,
    Ticker,
};
use crate::client::OkxClient;
use crate::error::GatewayError;
use crate::http::Query;
use crate::shared::InstType;

pub struct Market<'a> {
    pub(crate) client: &'a OkxClient,
}

impl<'a> Market<'a> {
    /// Latest ticker; `None` for an unknown instrument.
    pub async fn ticker(&self, inst_id: &str) -> Result<Option<Ticker>, GatewayError> {
        let q = Query::new().push("instId", inst_id);
        let tickers: Vec<Ticker> = self.client.http.get("/api/v5/market/ticker", &q).await?;
        Ok(tickers.into_iter().next())
    }

    pub async fn tickers(
        &self,
        inst_type: InstType,
        uly: Option<&str>,
    ) -> Result<Vec<Ticker>, GatewayError> {
        let q = Query::new()
            .push("instType", inst_type)
            .push_opt("uly", uly);
        self.client.http.get("/api/v5/market/tickers", &q).await
    }

    pub async fn orderbook(
        &self,
        inst_id: &str,
        depth: Option<u32>,
    ) -> Result<Option<OrderBook>, GatewayError> {
        let q = Query::new()
            .push("instId", inst_id)
            .push("sz", depth.unwrap_or(20));
        let books: Vec<BookSnapshot> = self.client.http.get("/api/v5/market/books", &q).await?;
        Ok(books
            .into_iter()
            .next()
            .map(|snapshot| OrderBook::from_snapshot(inst_id, snapshot)))
    }

    pub async fn recent_trades(
        &self,
        inst_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<PublicTrade>, GatewayError> {
        let q = Query::new()
            .push("instId", inst_id)
            .push("limit", limit.unwrap_or(100));
        self.client.http.get("/api/v5/market/trades", &q).await
    }

    /// Candles, newest first.
    pub async fn klines(
        &self,
        inst_id: &str,
        query: &CandleQuery,
    ) -> Result<Vec<Candle>, GatewayError> {
        let q = Query::new()
            .push("instId", inst_id)
            .push("bar", query.bar)
            .push("limit", query.limit.unwrap_or(100))
            .push_opt("after", query.after)
            .push_opt("before", query.before);
        let rows: Vec<CandleRow> = self.client.http.get("/api/v5/market/candles", &q).await?;
        rows.into_iter().map(Candle::try_from).collect()
    }

    pub async fn stats_24h(&self, inst_id: &str) -> Result<Option<Stats24h>, GatewayError> {
        Ok(self.ticker(inst_id).await?.as_ref().map(Stats24h::from))
    }

    pub async fn instruments(
        &self,
        inst_type: InstType,
        uly: Option<&str>,
        inst_id: Option<&str>,
    ) -> Result<Vec<Instrument>, GatewayError> {
        let q = Query::new()
            .push("instType", inst_type)
            .push_opt("uly", uly)
            .push_opt("instId", inst_id);
        self.client.http.get("/api/v5/public/instruments", &q).await
    }

    pub async fn funding_rate(&self, inst_id: &str) -> Result<Option<FundingRate>, GatewayError> {
        let q = Query::new().push("instId", inst_id);
        let rates: Vec<FundingRate> = self
            .client
            .http
            .get("/api/v5/public/funding-rate", &q)
            .await?;
        Ok(rates.into_iter().next())
    }

    /// Mark price; the instrument family is inferred from the id.
    pub async fn mark_price(&self, inst_id: &str) -> Result<Option<MarkPrice>, GatewayError> {
        let q = Query::new()
            .push("instType", InstType::infer(inst_id))
            .push("instId", inst_id);
        let prices: Vec<MarkPrice> = self.client.http.get("/api/v5/public/mark-price", &q).await?;
        Ok(prices.into_iter().next())
    }
}
