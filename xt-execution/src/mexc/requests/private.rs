use chrono::{DateTime, Utc};
use derive_more::Constructor;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, TimestampMilliSeconds, serde_as, skip_serializing_none};
use std::borrow::Cow;
use xt_core::protocol::http::rest::RestRequest;

/// `POST /api/v3/order`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct PlaceOrder {
    pub symbol: String,
    pub side: xt_model::Side,
    #[serde(rename = "type")]
    pub kind: MexcOrderType,
    pub quantity: Option<Decimal>,
    #[serde(rename = "quoteOrderQty")]
    pub quote_order_qty: Option<Decimal>,
    pub price: Option<Decimal>,
    #[serde(rename = "timeInForce")]
    pub time_in_force: Option<xt_model::order::TimeInForce>,
    #[serde(rename = "stopPrice")]
    pub stop_price: Option<Decimal>,
    #[serde(rename = "newClientOrderId")]
    pub new_client_order_id: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MexcOrderType {
    Limit,
    Market,
    LimitMaker,
}

impl From<xt_model::order::OrderKind> for MexcOrderType {
    fn from(kind: xt_model::order::OrderKind) -> Self {
        match kind {
            xt_model::order::OrderKind::Limit | xt_model::order::OrderKind::StopLimit => {
                MexcOrderType::Limit
            }
            xt_model::order::OrderKind::Market => MexcOrderType::Market,
            xt_model::order::OrderKind::LimitMaker => MexcOrderType::LimitMaker,
        }
    }
}

impl RestRequest for PlaceOrder {
    type Response = MexcOrderResponse;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/order".into()
    }

    fn method() -> Method {
        Method::POST
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }

    fn rate_limit_key(&self) -> Cow<'static, str> {
        "order".into()
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct MexcOrderResponse {
    pub symbol: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "clientOrderId")]
    pub client_order_id: Option<String>,
    pub price: Decimal,
    #[serde(rename = "origQty")]
    pub orig_qty: Decimal,
    #[serde(rename = "executedQty")]
    pub executed_qty: Decimal,
    pub status: MexcOrderStatus,
    pub side: xt_model::Side,
    #[serde(rename = "type")]
    pub kind: MexcOrderType,
    #[serde_as(as = "TimestampMilliSeconds")]
    #[serde(rename = "transactTime", alias = "time", alias = "updateTime")]
    pub transact_time: DateTime<Utc>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
pub enum MexcOrderStatus {
    #[serde(rename = "NEW")]
    New,
    #[serde(rename = "PARTIALLY_FILLED")]
    PartiallyFilled,
    #[serde(rename = "FILLED")]
    Filled,
    #[serde(rename = "CANCELED")]
    Canceled,
    #[serde(rename = "PARTIALLY_CANCELED")]
    PartiallyCanceled,
    #[serde(rename = "REJECTED")]
    Rejected,
    #[serde(rename = "EXPIRED")]
    Expired,
}

impl From<MexcOrderStatus> for xt_model::order::OrderStatus {
    fn from(status: MexcOrderStatus) -> Self {
        match status {
            MexcOrderStatus::New => xt_model::order::OrderStatus::New,
            MexcOrderStatus::PartiallyFilled => xt_model::order::OrderStatus::PartiallyFilled,
            MexcOrderStatus::Filled => xt_model::order::OrderStatus::Filled,
            MexcOrderStatus::Canceled | MexcOrderStatus::PartiallyCanceled => {
                xt_model::order::OrderStatus::Cancelled
            }
            MexcOrderStatus::Rejected => xt_model::order::OrderStatus::Rejected,
            MexcOrderStatus::Expired => xt_model::order::OrderStatus::Expired,
        }
    }
}

/// `DELETE /api/v3/order`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct CancelOrder {
    pub symbol: String,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    #[serde(rename = "origClientOrderId")]
    pub orig_client_order_id: Option<String>,
}

impl RestRequest for CancelOrder {
    type Response = MexcOrderResponse;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/order".into()
    }

    fn method() -> Method {
        Method::DELETE
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `DELETE /api/v3/openOrders` - cancel every open order on `symbol`.
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct CancelAllOrders {
    pub symbol: String,
}

impl RestRequest for CancelAllOrders {
    type Response = Vec<MexcOrderResponse>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/openOrders".into()
    }

    fn method() -> Method {
        Method::DELETE
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `GET /api/v3/order`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct GetOrder {
    pub symbol: String,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    #[serde(rename = "origClientOrderId")]
    pub orig_client_order_id: Option<String>,
}

impl RestRequest for GetOrder {
    type Response = MexcOrderResponse;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/order".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `GET /api/v3/openOrders`. `symbol = None` requires special handling by the caller (spec §4.6
/// edge case: MEXC mandates a symbol, so the client returns an empty list rather than calling
/// this with no `symbol`).
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct OpenOrders {
    pub symbol: String,
}

impl RestRequest for OpenOrders {
    type Response = Vec<MexcOrderResponse>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/openOrders".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `GET /api/v3/allOrders`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct AllOrders {
    pub symbol: String,
    #[serde(rename = "startTime")]
    pub start_time: Option<i64>,
    #[serde(rename = "endTime")]
    pub end_time: Option<i64>,
    pub limit: Option<u32>,
}

impl RestRequest for AllOrders {
    type Response = Vec<MexcOrderResponse>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/allOrders".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `GET /api/v3/account`
#[derive(Debug, Clone, Copy, Default)]
pub struct Account;

impl RestRequest for Account {
    type Response = AccountResponse;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/account".into()
    }

    fn method() -> Method {
        Method::GET
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub balances: Vec<MexcAssetBalance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MexcAssetBalance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

/// `GET /api/v3/myTrades`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct MyTrades {
    pub symbol: String,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: Option<i64>,
    #[serde(rename = "endTime")]
    pub end_time: Option<i64>,
    pub limit: Option<u32>,
}

impl RestRequest for MyTrades {
    type Response = Vec<MexcAccountTrade>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/myTrades".into()
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
pub struct MexcAccountTrade {
    pub id: u64,
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub symbol: String,
    pub price: Decimal,
    pub qty: Decimal,
    #[serde(rename = "isBuyer")]
    pub is_buyer: bool,
    #[serde(rename = "isMaker")]
    pub is_maker: bool,
    #[serde_as(as = "TimestampMilliSeconds")]
    pub time: DateTime<Utc>,
}

/// `POST /api/v3/userDataStream` - create a listen key.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateListenKey;

impl RestRequest for CreateListenKey {
    type Response = ListenKeyResponse;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/userDataStream".into()
    }

    fn method() -> Method {
        Method::POST
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListenKeyResponse {
    #[serde(rename = "listenKey")]
    pub listen_key: String,
}

/// `PUT /api/v3/userDataStream` - keep a listen key alive.
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct KeepAliveListenKey {
    #[serde(rename = "listenKey")]
    pub listen_key: String,
}

impl RestRequest for KeepAliveListenKey {
    type Response = serde_json::Value;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/userDataStream".into()
    }

    fn method() -> Method {
        Method::PUT
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `DELETE /api/v3/userDataStream`
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct DeleteListenKey {
    #[serde(rename = "listenKey")]
    pub listen_key: String,
}

impl RestRequest for DeleteListenKey {
    type Response = serde_json::Value;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/userDataStream".into()
    }

    fn method() -> Method {
        Method::DELETE
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

/// `GET /api/v3/capital/config/getall` - chain-aware asset/network metadata (spec §4.6
/// `getAssetsInfo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalConfigGetAll;

impl RestRequest for CapitalConfigGetAll {
    type Response = Vec<MexcCapitalConfig>;
    type QueryParams = ();
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/capital/config/getall".into()
    }

    fn method() -> Method {
        Method::GET
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct MexcCapitalConfig {
    pub coin: String,
    #[serde_as(as = "DefaultOnNull")]
    pub network_list: Vec<MexcNetwork>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MexcNetwork {
    pub network: String,
    #[serde(rename = "withdrawFee")]
    pub withdraw_fee: Decimal,
    #[serde(rename = "withdrawMin")]
    pub withdraw_min: Decimal,
    #[serde(rename = "withdrawEnable")]
    pub withdraw_enable: bool,
    #[serde(rename = "depositEnable")]
    pub deposit_enable: bool,
}

/// `POST /api/v3/capital/withdraw`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct CapitalWithdraw {
    pub coin: String,
    pub network: String,
    pub address: String,
    pub amount: Decimal,
    pub memo: Option<String>,
}

impl RestRequest for CapitalWithdraw {
    type Response = CapitalWithdrawResponse;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/capital/withdraw".into()
    }

    fn method() -> Method {
        Method::POST
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapitalWithdrawResponse {
    pub id: String,
}

/// `GET /api/v3/capital/withdraw/history`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct CapitalWithdrawHistory {
    pub coin: Option<String>,
    pub limit: Option<u32>,
}

impl RestRequest for CapitalWithdrawHistory {
    type Response = Vec<MexcWithdrawalRecord>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/capital/withdraw/history".into()
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
pub struct MexcWithdrawalRecord {
    pub id: String,
    pub coin: String,
    pub amount: Decimal,
    pub status: i64,
    #[serde_as(as = "TimestampMilliSeconds")]
    #[serde(rename = "applyTime")]
    pub apply_time: DateTime<Utc>,
}

/// `GET /api/v3/capital/deposit/hisrec`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct CapitalDepositHistory {
    pub coin: Option<String>,
    pub limit: Option<u32>,
}

impl RestRequest for CapitalDepositHistory {
    type Response = Vec<MexcDepositRecord>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/capital/deposit/hisrec".into()
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
pub struct MexcDepositRecord {
    #[serde(rename = "txId")]
    pub tx_id: String,
    pub coin: String,
    pub network: String,
    pub amount: Decimal,
    pub status: i64,
    #[serde_as(as = "TimestampMilliSeconds")]
    #[serde(rename = "insertTime")]
    pub insert_time: DateTime<Utc>,
}

/// `GET /api/v3/capital/deposit/address`
#[skip_serializing_none]
#[derive(Debug, Clone, Constructor, Serialize)]
pub struct CapitalDepositAddress {
    pub coin: String,
    pub network: Option<String>,
}

impl RestRequest for CapitalDepositAddress {
    type Response = Vec<MexcDepositAddress>;
    type QueryParams = Self;
    type Body = ();

    fn path(&self) -> Cow<'static, str> {
        "/api/v3/capital/deposit/address".into()
    }

    fn method() -> Method {
        Method::GET
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MexcDepositAddress {
    pub coin: String,
    pub network: String,
    pub address: String,
    pub memo: Option<String>,
}
