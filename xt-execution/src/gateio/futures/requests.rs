//! Gate.io USDT-settled perpetual futures REST request/response wire types (spec §4.6 "Public/
//! Private futures", §6 literal `/api/v4/futures/usdt/...` paths).
//!
//! Every request's [`RestRequest::path`] bakes in the `/api/v4/futures/{settle}` prefix literally
//! (spec §4.4 "Gate.io futures: url_path must carry the settle-currency prefix") rather than
//! relying on a runtime rewrite, so no separate prefix-rebuild step is needed at the signer layer.

use chrono::{DateTime, Utc};
use derive_more::Constructor;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{TimestampSeconds, serde_as, skip_serializing_none};
use std::borrow::Cow;
use xt_core::protocol::http::rest::RestRequest;

pub use crate::gateio::spot::requests::{GateioSide, GateioTimeInForce};

/// `GET /api/v4/futures/{settle}/contracts`
#[derive(Debug, Clone, Constructor)]
pub struct Contracts {
    pub settle: &'static str,
}

impl RestRequest for Contracts {
    type Response = Vec<GateioContract>;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/contracts", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateioContract {
    pub name: String,
    pub leverage_max: Decimal,
    pub order_price_round: Decimal,
    pub order_size_min: i64,
    pub maker_fee_rate: Decimal,
    pub taker_fee_rate: Decimal,
    #[serde(default)]
    pub in_delisting: bool,
}

/// `GET /api/v4/futures/{settle}/order_book`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct OrderBook {
    #[serde(skip)]
    pub settle: &'static str,
    pub contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RestRequest for OrderBook {
    type Response = OrderBookResponse;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/order_book", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateioBookLevel {
    pub p: Decimal,
    pub s: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookResponse {
    pub bids: Vec<GateioBookLevel>,
    pub asks: Vec<GateioBookLevel>,
}

/// `GET /api/v4/futures/{settle}/trades`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct Trades {
    #[serde(skip)]
    pub settle: &'static str,
    pub contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
}

impl RestRequest for Trades {
    type Response = Vec<GateioFuturesTrade>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/trades", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct GateioFuturesTrade {
    pub id: i64,
    #[serde_as(as = "TimestampSeconds<f64>")]
    pub create_time: DateTime<Utc>,
    /// Signed: positive size denotes a buy-side taker, negative a sell-side taker (spec §4.6).
    pub size: i64,
    pub price: Decimal,
}

/// `GET /api/v4/futures/{settle}/tickers`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct Tickers {
    #[serde(skip)]
    pub settle: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
}

impl RestRequest for Tickers {
    type Response = Vec<GateioFuturesTicker>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/tickers", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateioFuturesTicker {
    pub contract: String,
    pub highest_bid: Decimal,
    pub lowest_ask: Decimal,
    pub funding_rate: Decimal,
}

/// `GET /api/v4/futures/{settle}/candlesticks`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct Candlesticks {
    #[serde(skip)]
    pub settle: &'static str,
    pub contract: String,
    pub interval: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RestRequest for Candlesticks {
    type Response = Vec<GateioFuturesCandle>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/candlesticks", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateioFuturesCandle {
    pub t: i64,
    pub v: i64,
    pub c: Decimal,
    pub h: Decimal,
    pub l: Decimal,
    pub o: Decimal,
}

/// `GET /api/v4/futures/{settle}/funding_rate`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct FundingRate {
    #[serde(skip)]
    pub settle: &'static str,
    pub contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RestRequest for FundingRate {
    type Response = Vec<GateioFundingRate>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/funding_rate", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateioFundingRate {
    pub r: Decimal,
}

/// `GET /api/v4/futures/{settle}/accounts`
#[derive(Debug, Clone, Constructor)]
pub struct Accounts {
    pub settle: &'static str,
}

impl Serialize for Accounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_unit()
    }
}

impl RestRequest for Accounts {
    type Response = GateioFuturesAccount;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/accounts", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateioFuturesAccount {
    pub currency: String,
    pub total: Decimal,
    pub available: Decimal,
}

/// `GET /api/v4/futures/{settle}/positions`
#[derive(Debug, Clone, Constructor)]
pub struct Positions {
    pub settle: &'static str,
}

impl Serialize for Positions {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_unit()
    }
}

impl RestRequest for Positions {
    type Response = Vec<GateioPosition>;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/positions", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct GateioPosition {
    pub contract: String,
    /// Signed: positive = long, negative = short (spec §4.6 futures position convention).
    pub size: i64,
    pub entry_price: Decimal,
    pub mark_price: Decimal,
    pub unrealised_pnl: Decimal,
    #[serde(default)]
    pub realised_pnl: Decimal,
    pub liq_price: Decimal,
    pub margin: Decimal,
    pub leverage: Decimal,
    #[serde_as(as = "TimestampSeconds")]
    pub update_time: DateTime<Utc>,
}

/// `GET /api/v4/futures/{settle}/position/{contract}`
#[derive(Debug, Clone, Constructor)]
pub struct Position {
    pub settle: &'static str,
    pub contract: String,
}

impl Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_unit()
    }
}

impl RestRequest for Position {
    type Response = GateioPosition;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/positions/{}", self.settle, self.contract).into()
    }

    fn method() -> Method {
        Method::GET
    }
}

/// `POST /api/v4/futures/{settle}/positions/{contract}/margin`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct UpdateMargin {
    #[serde(skip)]
    pub settle: &'static str,
    #[serde(skip)]
    pub contract: String,
    pub change: Decimal,
}

impl RestRequest for UpdateMargin {
    type Response = GateioPosition;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/positions/{}/margin", self.settle, self.contract).into()
    }

    fn method() -> Method {
        Method::POST
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `POST /api/v4/futures/{settle}/positions/{contract}/leverage`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct UpdateLeverage {
    #[serde(skip)]
    pub settle: &'static str,
    #[serde(skip)]
    pub contract: String,
    pub leverage: String,
}

impl RestRequest for UpdateLeverage {
    type Response = GateioPosition;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/positions/{}/leverage", self.settle, self.contract).into()
    }

    fn method() -> Method {
        Method::POST
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `POST /api/v4/futures/{settle}/orders`. Size is signed (positive = buy/long, negative = sell/
/// short); price `"0"` denotes a market order (spec §4.6).
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct PlaceOrder {
    #[serde(skip)]
    pub settle: &'static str,
    pub contract: String,
    pub size: i64,
    pub price: Option<String>,
    pub tif: Option<GateioTimeInForce>,
    pub text: Option<String>,
    pub reduce_only: Option<bool>,
}

impl RestRequest for PlaceOrder {
    type Response = GateioFuturesOrderResponse;
    type QueryParams = ();
    type Body = Self;

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/orders", self.settle).into()
    }

    fn method() -> Method {
        Method::POST
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(self)
    }

    fn rate_limit_key(&self) -> Cow<'static, str> {
        "order".into()
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct GateioFuturesOrderResponse {
    pub id: i64,
    pub text: Option<String>,
    pub contract: String,
    pub status: GateioFuturesOrderStatus,
    pub size: i64,
    pub left: i64,
    pub price: Decimal,
    #[serde_as(as = "TimestampSeconds<f64>")]
    pub update_time: DateTime<Utc>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateioFuturesOrderStatus {
    Open,
    Finished,
}

impl From<(GateioFuturesOrderStatus, i64, i64)> for xt_model::order::OrderStatus {
    /// `left == size` (unfilled) vs `0 < left < size` (partial) distinguish `New`/`PartiallyFilled`
    /// while open; `finished` with `left == 0` is a fill, `left != 0` is a cancellation.
    fn from((status, size, left): (GateioFuturesOrderStatus, i64, i64)) -> Self {
        match status {
            GateioFuturesOrderStatus::Open if left == size => xt_model::order::OrderStatus::New,
            GateioFuturesOrderStatus::Open => xt_model::order::OrderStatus::PartiallyFilled,
            GateioFuturesOrderStatus::Finished if left == 0 => xt_model::order::OrderStatus::Filled,
            GateioFuturesOrderStatus::Finished => xt_model::order::OrderStatus::Cancelled,
        }
    }
}

/// `DELETE /api/v4/futures/{settle}/orders/{id}`
#[derive(Debug, Clone, Constructor)]
pub struct CancelOrder {
    pub settle: &'static str,
    pub order_id: String,
}

impl Serialize for CancelOrder {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_unit()
    }
}

impl RestRequest for CancelOrder {
    type Response = GateioFuturesOrderResponse;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/orders/{}", self.settle, self.order_id).into()
    }

    fn method() -> Method {
        Method::DELETE
    }
}

/// `DELETE /api/v4/futures/{settle}/orders` - cancel every open order on `contract`.
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct CancelAllOrders {
    #[serde(skip)]
    pub settle: &'static str,
    pub contract: String,
}

impl RestRequest for CancelAllOrders {
    type Response = Vec<GateioFuturesOrderResponse>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/orders", self.settle).into()
    }

    fn method() -> Method {
        Method::DELETE
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `GET /api/v4/futures/{settle}/orders/{id}`
#[derive(Debug, Clone, Constructor)]
pub struct GetOrder {
    pub settle: &'static str,
    pub order_id: String,
}

impl Serialize for GetOrder {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_unit()
    }
}

impl RestRequest for GetOrder {
    type Response = GateioFuturesOrderResponse;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/orders/{}", self.settle, self.order_id).into()
    }

    fn method() -> Method {
        Method::GET
    }
}

/// `GET /api/v4/futures/{settle}/orders?status=open`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct OpenOrders {
    #[serde(skip)]
    pub settle: &'static str,
    pub contract: String,
    pub status: &'static str,
}

impl OpenOrders {
    pub fn for_contract(settle: &'static str, contract: String) -> Self {
        Self { settle, contract, status: "open" }
    }
}

impl RestRequest for OpenOrders {
    type Response = Vec<GateioFuturesOrderResponse>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/orders", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `GET /api/v4/futures/{settle}/orders?status=finished`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct HistoryOrders {
    #[serde(skip)]
    pub settle: &'static str,
    pub contract: String,
    pub status: &'static str,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub limit: Option<u32>,
}

impl HistoryOrders {
    pub fn new(settle: &'static str, contract: String, from: Option<i64>, to: Option<i64>, limit: Option<u32>) -> Self {
        Self { settle, contract, status: "finished", from, to, limit }
    }
}

impl RestRequest for HistoryOrders {
    type Response = Vec<GateioFuturesOrderResponse>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/orders", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `GET /api/v4/futures/{settle}/my_trades`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct MyTrades {
    #[serde(skip)]
    pub settle: &'static str,
    pub contract: String,
    pub order: Option<String>,
    pub limit: Option<u32>,
}

impl RestRequest for MyTrades {
    type Response = Vec<GateioFuturesAccountTrade>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/my_trades", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct GateioFuturesAccountTrade {
    pub id: i64,
    pub order_id: String,
    /// Signed: positive size = buy-side fill, negative = sell-side fill (spec §4.6).
    pub size: i64,
    pub price: Decimal,
    pub role: String,
    #[serde_as(as = "TimestampSeconds<f64>")]
    pub create_time: DateTime<Utc>,
}

/// `GET /api/v4/futures/{settle}/fee`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct Fee {
    #[serde(skip)]
    pub settle: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
}

impl RestRequest for Fee {
    type Response = Vec<GateioFuturesFee>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        format!("/api/v4/futures/{}/fee", self.settle).into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateioFuturesFee {
    pub contract: String,
    pub maker_fee_rate: Decimal,
    pub taker_fee_rate: Decimal,
}
