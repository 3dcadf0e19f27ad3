use chrono::{DateTime, Utc};
use derive_more::Constructor;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{TimestampMilliSeconds, serde_as};
use std::borrow::Cow;
use xt_core::protocol::http::rest::RestRequest;

/// `GET /api/v3/ping`
#[derive(Debug, Clone, Copy, Default)]
pub struct Ping;

impl RestRequest for Ping {
    type Response = serde_json::Value;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/ping".into()
    }

    fn method() -> Method {
        Method::GET
    }
}

/// `GET /api/v3/time`
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerTime;

impl RestRequest for ServerTime {
    type Response = ServerTimeResponse;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/time".into()
    }

    fn method() -> Method {
        Method::GET
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTimeResponse {
    #[serde_as(as = "TimestampMilliSeconds")]
    #[serde(rename = "serverTime")]
    pub server_time: DateTime<Utc>,
}

/// `GET /api/v3/exchangeInfo` - symbol universe and precision/step-size metadata, the source for
/// the `SymbolInfo` cache (spec §4.6 `getSymbolsInfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeInfo;

impl RestRequest for ExchangeInfo {
    type Response = ExchangeInfoResponse;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/exchangeInfo".into()
    }

    fn method() -> Method {
        Method::GET
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfoResponse {
    pub symbols: Vec<ExchangeInfoSymbol>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfoSymbol {
    pub symbol: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
    #[serde(rename = "baseAssetPrecision")]
    pub base_asset_precision: u32,
    #[serde(rename = "quoteAssetPrecision")]
    pub quote_asset_precision: u32,
    pub status: String,
    #[serde(rename = "makerCommission")]
    pub maker_commission: Decimal,
    #[serde(rename = "takerCommission")]
    pub taker_commission: Decimal,
}

/// `GET /api/v3/depth`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct Depth {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RestRequest for Depth {
    type Response = DepthResponse;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/depth".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepthResponse {
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

/// `GET /api/v3/trades`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct RecentTrades {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RestRequest for RecentTrades {
    type Response = Vec<MexcTrade>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/trades".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `GET /api/v3/historicalTrades`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct HistoricalTrades {
    pub symbol: String,
    #[serde(rename = "fromId", skip_serializing_if = "Option::is_none")]
    pub from_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RestRequest for HistoricalTrades {
    type Response = Vec<MexcTrade>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/historicalTrades".into()
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
pub struct MexcTrade {
    pub id: u64,
    pub price: Decimal,
    pub qty: Decimal,
    #[serde(rename = "isBuyerMaker")]
    pub is_buyer_maker: bool,
    #[serde_as(as = "TimestampMilliSeconds")]
    pub time: DateTime<Utc>,
}

/// `GET /api/v3/ticker/24hr`
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ticker24hr {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl RestRequest for Ticker24hr {
    type Response = Vec<MexcBookTicker>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/ticker/24hr".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MexcBookTicker {
    pub symbol: String,
    #[serde(rename = "bidPrice")]
    pub bid_price: Decimal,
    #[serde(rename = "bidQty")]
    pub bid_qty: Decimal,
    #[serde(rename = "askPrice")]
    pub ask_price: Decimal,
    #[serde(rename = "askQty")]
    pub ask_qty: Decimal,
}

/// `GET /api/v3/klines`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct Klines {
    pub symbol: String,
    pub interval: String,
    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RestRequest for Klines {
    type Response = Vec<MexcKline>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/klines".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// MEXC klines are returned as loosely-typed JSON arrays:
/// `[openTime, open, high, low, close, volume, closeTime, ...]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "MexcKlineWire")]
pub struct MexcKline {
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
struct MexcKlineWire(
    i64,
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    Decimal,
    #[serde(default)] serde_json::Value,
);

impl TryFrom<MexcKlineWire> for MexcKline {
    type Error = std::convert::Infallible;

    fn try_from(wire: MexcKlineWire) -> Result<Self, Self::Error> {
        Ok(Self {
            open_time: wire.0,
            open: wire.1,
            high: wire.2,
            low: wire.3,
            close: wire.4,
            volume: wire.5,
        })
    }
}
