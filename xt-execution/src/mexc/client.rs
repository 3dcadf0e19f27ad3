//! Concrete MEXC spot REST client (spec C8): wires the public/private [`RestClient`]s, the shared
//! [`RateLimiter`], and the [`retry`](crate::retry) driver together behind
//! [`MarketDataClient`]/[`AccountClient`] (spec §4.6, §6 literal endpoint paths).

use crate::{
    client::{AccountClient, MarketDataClient},
    error::{ClientError, ExchangeError, ExchangeErrorKind},
    mexc::{
        parser::MexcParser,
        requests::{private as priv_req, public as pub_req},
        signer::{MexcRequestSigner, MexcSigner},
        symbol::MexcSymbolMapper,
    },
    metrics::LatencyWindow,
    order::{
        Order, OrderKey,
        id::OrderId,
        request::{OrderRequestCancel, OrderRequestOpen},
        state::{ActiveOrderState, Cancelled, Open, OrderState},
    },
    retry::{self, RetryPolicy},
};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Semaphore;
use xt_core::{
    protocol::http::{private::encoder::HexEncoder, public::PublicNoHeaders, rest::client::RestClient},
    ratelimit::{RateLimiter, RateLimiterConfig},
};
use xt_model::{
    AssetBalance, BookTicker, Kline, OrderBook, SymbolInfo, Trade,
    exchange::ExchangeId,
    market::Level,
    symbol::{Symbol, SymbolMapper},
    symbol_info::Fees,
    withdrawal::{AssetNetworkInfo, DepositAddress, DepositRecord, DepositStatus, WithdrawalRequest, WithdrawalResponse, WithdrawalStatus},
};

const BASE_URL: &str = "https://api.mexc.com";

/// Default private-request concurrency cap (spec §4.5: "semaphore-capped `maxConcurrent`, default
/// 10 private").
const DEFAULT_MAX_CONCURRENT: usize = 10;

#[derive(Debug, Clone)]
pub struct MexcSpotConfig {
    pub api_key: String,
    pub api_secret: String,
    pub max_concurrent_private: usize,
}

impl MexcSpotConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            max_concurrent_private: DEFAULT_MAX_CONCURRENT,
        }
    }
}

#[derive(Debug)]
pub struct MexcSpotClient {
    public: RestClient<'static, PublicNoHeaders, MexcParser>,
    private: RestClient<'static, MexcRequestSigner, MexcParser>,
    rate_limiter: RateLimiter,
    private_permits: Arc<Semaphore>,
    retry_policy: RetryPolicy,
    symbol_mapper: MexcSymbolMapper,
    latency: LatencyWindow,
}

impl MexcSpotClient {
    pub fn new(config: MexcSpotConfig) -> Result<Self, ClientError> {
        let hmac = hmac::Hmac::<sha2::Sha256>::new_from_slice(config.api_secret.as_bytes())
            .map_err(|_| {
                ClientError::Exchange(ExchangeError::new(
                    ExchangeErrorKind::InvalidCredentials,
                    "MEXC api_secret has an invalid HMAC key length",
                ))
            })?;

        let rate_limiter = RateLimiter::new(RateLimiterConfig {
            requests_per_second: 20,
            burst: 10,
        })
        .map_err(ClientError::from)?
        .with_endpoint(
            "order",
            RateLimiterConfig {
                requests_per_second: 5,
                burst: 5,
            },
        )
        .map_err(ClientError::from)?;

        Ok(Self {
            public: RestClient::new(BASE_URL, PublicNoHeaders, MexcParser),
            private: RestClient::new(
                BASE_URL,
                MexcRequestSigner::new(MexcSigner::new(config.api_key), hmac, HexEncoder),
                MexcParser,
            ),
            rate_limiter,
            private_permits: Arc::new(Semaphore::new(config.max_concurrent_private.max(1))),
            retry_policy: RetryPolicy::default(),
            symbol_mapper: MexcSymbolMapper,
            latency: LatencyWindow::new(),
        })
    }

    /// Rolling REST-latency window for this client (spec §4.5 item 6).
    pub fn latency_metrics(&self) -> &LatencyWindow {
        &self.latency
    }

    fn pair(&self, symbol: &Symbol) -> Result<String, ClientError> {
        self.symbol_mapper.to_pair(symbol).ok_or_else(|| {
            ClientError::Exchange(ExchangeError::new(
                ExchangeErrorKind::InvalidSymbol,
                format!("no MEXC pair mapping for {symbol}"),
            ))
        })
    }

    async fn execute_public<Request>(&self, request: Request) -> Result<Request::Response, ClientError>
    where
        Request: xt_core::protocol::http::rest::RestRequest + Clone,
    {
        retry::execute_with_retry(
            &self.public,
            &self.rate_limiter,
            || {},
            |latency| self.latency.record(latency),
            request,
            self.retry_policy,
        )
        .await
    }

    async fn execute_private<Request>(&self, request: Request) -> Result<Request::Response, ClientError>
    where
        Request: xt_core::protocol::http::rest::RestRequest + Clone,
    {
        let _permit = self
            .private_permits
            .acquire()
            .await
            .expect("private_permits semaphore is never closed");

        let signer = self.private.strategy.signer();
        retry::execute_with_retry(
            &self.private,
            &self.rate_limiter,
            || signer.refresh_timestamp(),
            |latency| self.latency.record(latency),
            request,
            self.retry_policy,
        )
        .await
    }

    fn order_key(&self, symbol: &Symbol, strategy: crate::order::id::StrategyId) -> OrderKey {
        OrderKey::new(
            ExchangeId::MexcSpot,
            symbol.clone(),
            strategy,
            crate::order::id::ClientOrderId::random(),
        )
    }

    fn to_canonical_order(&self, response: priv_req::MexcOrderResponse) -> Order<OrderState> {
        let status: xt_model::order::OrderStatus = response.status.into();
        let key = OrderKey::new(
            ExchangeId::MexcSpot,
            self.symbol_mapper.to_symbol(&response.symbol).unwrap_or(Symbol::new("", "")),
            crate::order::id::StrategyId::unknown(),
            response
                .client_order_id
                .map(crate::order::id::ClientOrderId::new)
                .unwrap_or_default(),
        );

        let id = OrderId::new(response.order_id);

        let state = if status.is_terminal() {
            if matches!(status, xt_model::order::OrderStatus::Cancelled) {
                OrderState::cancelled(Cancelled::new(id, response.transact_time))
            } else if matches!(status, xt_model::order::OrderStatus::Filled) {
                OrderState::fully_filled()
            } else {
                OrderState::failed(crate::order::state::Failed::Rejected(None))
            }
        } else {
            OrderState::open(Open::new(
                id,
                response.transact_time,
                response.price,
                response.orig_qty,
                response.executed_qty,
            ))
        };

        Order {
            key,
            side: response.side,
            price: response.price,
            quantity: response.orig_qty,
            kind: mexc_order_kind(response.kind),
            time_in_force: xt_model::order::TimeInForce::GoodTillCancel,
            state,
        }
    }
}

fn mexc_order_kind(kind: priv_req::MexcOrderType) -> xt_model::order::OrderKind {
    match kind {
        priv_req::MexcOrderType::Limit => xt_model::order::OrderKind::Limit,
        priv_req::MexcOrderType::Market => xt_model::order::OrderKind::Market,
        priv_req::MexcOrderType::LimitMaker => xt_model::order::OrderKind::LimitMaker,
    }
}

fn epoch_millis(timestamp: Option<DateTime<Utc>>) -> Option<i64> {
    timestamp.map(|t| t.timestamp_millis())
}

impl MarketDataClient for MexcSpotClient {
    const EXCHANGE: ExchangeId = ExchangeId::MexcSpot;

    async fn get_symbols_info(&self) -> Result<Vec<SymbolInfo>, ClientError> {
        let response = self.execute_public(pub_req::ExchangeInfo).await?;
        let now = Utc::now();

        Ok(response
            .symbols
            .into_iter()
            .filter_map(|symbol| {
                let (base, quote) = (symbol.base_asset, symbol.quote_asset);
                Some(SymbolInfo {
                    symbol: Symbol::new(base, quote),
                    base_precision: symbol.base_asset_precision,
                    quote_precision: symbol.quote_asset_precision,
                    min_base_qty: Decimal::ZERO,
                    min_quote_qty: Decimal::ZERO,
                    tick_size: Decimal::new(1, symbol.quote_asset_precision),
                    step_size: Decimal::new(1, symbol.base_asset_precision),
                    fees: Fees {
                        maker: symbol.maker_commission,
                        taker: symbol.taker_commission,
                    },
                    is_futures: false,
                    trading_active: symbol.status == "ENABLED",
                    refreshed_at: now,
                })
            })
            .collect())
    }

    async fn get_orderbook(&self, symbol: &Symbol, limit: u32) -> Result<OrderBook, ClientError> {
        let pair = self.pair(symbol)?;
        let response = self
            .execute_public(pub_req::Depth::new(pair, Some(limit)))
            .await?;

        Ok(OrderBook {
            symbol: symbol.clone(),
            bids: response.bids.into_iter().map(level_from_tuple).collect(),
            asks: response.asks.into_iter().map(level_from_tuple).collect(),
            timestamp: Utc::now(),
        })
    }

    async fn get_recent_trades(&self, symbol: &Symbol) -> Result<Vec<Trade>, ClientError> {
        let pair = self.pair(symbol)?;
        let trades = self
            .execute_public(pub_req::RecentTrades::new(pair, None))
            .await?;
        Ok(trades.into_iter().map(|trade| trade_from_mexc(symbol, trade)).collect())
    }

    async fn get_historical_trades(
        &self,
        symbol: &Symbol,
        _from: Option<DateTime<Utc>>,
        _to: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ClientError> {
        let pair = self.pair(symbol)?;
        let trades = self
            .execute_public(pub_req::HistoricalTrades::new(pair, None, limit))
            .await?;
        Ok(trades.into_iter().map(|trade| trade_from_mexc(symbol, trade)).collect())
    }

    async fn get_ticker(&self, symbol: Option<&Symbol>) -> Result<Vec<BookTicker>, ClientError> {
        let mut request = pub_req::Ticker24hr::default();
        if let Some(symbol) = symbol {
            request.symbol = Some(self.pair(symbol)?);
        }

        let tickers = self.execute_public(request).await?;
        let now = Utc::now();

        Ok(tickers
            .into_iter()
            .filter_map(|ticker| {
                let symbol = self.symbol_mapper.to_symbol(&ticker.symbol)?;
                Some(BookTicker {
                    symbol,
                    bid_price: ticker.bid_price,
                    bid_qty: ticker.bid_qty,
                    ask_price: ticker.ask_price,
                    ask_qty: ticker.ask_qty,
                    timestamp: now,
                })
            })
            .collect())
    }

    async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Kline>, ClientError> {
        let pair = self.pair(symbol)?;
        let klines = self
            .execute_public(pub_req::Klines::new(
                pair,
                interval.to_string(),
                epoch_millis(from),
                epoch_millis(to),
                None,
            ))
            .await?;

        Ok(klines
            .into_iter()
            .map(|kline| Kline {
                symbol: symbol.clone(),
                open_time: Utc
                    .timestamp_millis_opt(kline.open_time)
                    .single()
                    .unwrap_or_else(Utc::now),
                open: kline.open,
                high: kline.high,
                low: kline.low,
                close: kline.close,
                volume: kline.volume,
            })
            .collect())
    }

    async fn get_server_time(&self) -> Result<DateTime<Utc>, ClientError> {
        let response = self.execute_public(pub_req::ServerTime).await?;
        Ok(response.server_time)
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.execute_public(pub_req::Ping).await?;
        Ok(())
    }
}

fn level_from_tuple((price, size): (Decimal, Decimal)) -> Level {
    Level { price, size }
}

fn trade_from_mexc(symbol: &Symbol, trade: pub_req::MexcTrade) -> Trade {
    Trade {
        trade_id: trade.id.to_string(),
        symbol: symbol.clone(),
        price: trade.price,
        quantity: trade.qty,
        side: if trade.is_buyer_maker {
            xt_model::Side::Sell
        } else {
            xt_model::Side::Buy
        },
        timestamp: trade.time,
        is_maker: trade.is_buyer_maker,
    }
}

impl AccountClient for MexcSpotClient {
    async fn get_balances(&self) -> Result<Vec<AssetBalance>, ClientError> {
        let response = self.execute_private(priv_req::Account).await?;
        Ok(response
            .balances
            .into_iter()
            .map(|balance| AssetBalance {
                asset: balance.asset.into(),
                available: balance.free,
                locked: balance.locked,
            })
            .collect())
    }

    async fn get_asset_balance(&self, asset: &str) -> Result<Option<AssetBalance>, ClientError> {
        Ok(self
            .get_balances()
            .await?
            .into_iter()
            .find(|balance| balance.asset == asset))
    }

    async fn place_order(&self, request: OrderRequestOpen) -> Result<Order<ActiveOrderState>, ClientError> {
        let symbol = request.key.symbol.clone();
        let pair = self.pair(&symbol)?;
        let open = &request.state;

        let place_order = priv_req::PlaceOrder::new(
            pair,
            open.side,
            priv_req::MexcOrderType::from(open.kind),
            (open.quote_quantity.is_none()).then_some(open.quantity),
            open.quote_quantity,
            open.price,
            (open.kind != xt_model::order::OrderKind::Market).then_some(open.time_in_force),
            open.stop_price,
            Some(request.key.cid.0.to_string()),
        );

        let response = self.execute_private(place_order).await?;
        let canonical = self.to_canonical_order(response);

        canonical.to_active().ok_or_else(|| {
            ClientError::Exchange(ExchangeError::new(
                ExchangeErrorKind::OrderAlreadyDone,
                "order was already terminal immediately after placement",
            ))
        })
    }

    async fn cancel_order(&self, request: OrderRequestCancel) -> Result<Order<OrderState>, ClientError> {
        let pair = self.pair(&request.key.symbol)?;
        let known_id = request.state.id.clone();

        let cancel = priv_req::CancelOrder::new(pair, known_id.clone().map(|id| id.0.to_string()), None);

        match self.execute_private(cancel).await {
            Ok(response) => Ok(self.to_canonical_order(response)),
            // Spec §4.6 edge case: cancelling an already-done order collapses to best-effort
            // getOrder rather than propagating CancelFailed/OrderNotFound.
            Err(ClientError::Exchange(error))
                if error.kind == ExchangeErrorKind::OrderNotFound && known_id.is_some() =>
            {
                self.get_order(&request.key.symbol, &known_id.expect("checked by guard")).await
            }
            Err(other) => Err(other),
        }
    }

    async fn cancel_all_orders(&self, symbol: &Symbol) -> Result<Vec<Order<OrderState>>, ClientError> {
        let pair = self.pair(symbol)?;
        let responses = self.execute_private(priv_req::CancelAllOrders::new(pair)).await?;
        Ok(responses.into_iter().map(|response| self.to_canonical_order(response)).collect())
    }

    async fn get_order(&self, symbol: &Symbol, order_id: &OrderId) -> Result<Order<OrderState>, ClientError> {
        let pair = self.pair(symbol)?;
        let response = self
            .execute_private(priv_req::GetOrder::new(pair, Some(order_id.0.to_string()), None))
            .await?;
        Ok(self.to_canonical_order(response))
    }

    async fn get_open_orders(&self, symbol: Option<&Symbol>) -> Result<Vec<Order<ActiveOrderState>>, ClientError> {
        let Some(symbol) = symbol else {
            // MEXC mandates a symbol for this endpoint (spec §4.6 edge case).
            tracing::debug!("MEXC getOpenOrders requires a symbol; returning empty list");
            return Ok(Vec::new());
        };

        let pair = self.pair(symbol)?;
        let responses = self.execute_private(priv_req::OpenOrders::new(pair)).await?;

        Ok(responses
            .into_iter()
            .filter_map(|response| self.to_canonical_order(response).to_active())
            .collect())
    }

    async fn get_history_orders(
        &self,
        symbol: &Symbol,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> Result<Vec<Order<OrderState>>, ClientError> {
        let pair = self.pair(symbol)?;
        let responses = self
            .execute_private(priv_req::AllOrders::new(pair, epoch_millis(start), epoch_millis(end), limit))
            .await?;
        Ok(responses.into_iter().map(|response| self.to_canonical_order(response)).collect())
    }

    async fn get_account_trades(
        &self,
        symbol: &Symbol,
        order_id: Option<&OrderId>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ClientError> {
        let pair = self.pair(symbol)?;
        let trades = self
            .execute_private(priv_req::MyTrades::new(
                pair,
                order_id.map(|id| id.0.to_string()),
                epoch_millis(start),
                epoch_millis(end),
                limit,
            ))
            .await?;

        Ok(trades
            .into_iter()
            .map(|trade| Trade {
                trade_id: trade.id.to_string(),
                symbol: symbol.clone(),
                price: trade.price,
                quantity: trade.qty,
                side: if trade.is_buyer { xt_model::Side::Buy } else { xt_model::Side::Sell },
                timestamp: trade.time,
                is_maker: trade.is_maker,
            })
            .collect())
    }

    async fn get_assets_info(&self) -> Result<Vec<AssetNetworkInfo>, ClientError> {
        let configs = self.execute_private(priv_req::CapitalConfigGetAll).await?;

        Ok(configs
            .into_iter()
            .flat_map(|config| {
                let coin = config.coin.clone();
                config.network_list.into_iter().map(move |network| AssetNetworkInfo {
                    asset: coin.clone().into(),
                    network: network.network.into(),
                    withdraw_fee: network.withdraw_fee,
                    min_withdraw: network.withdraw_min,
                    withdraw_enabled: network.withdraw_enable,
                    deposit_enabled: network.deposit_enable,
                })
            })
            .collect())
    }

    async fn get_trading_fees(&self, symbol: Option<&Symbol>) -> Result<Vec<(Symbol, Fees)>, ClientError> {
        let infos = self.get_symbols_info().await?;
        Ok(infos
            .into_iter()
            .filter(|info| symbol.is_none_or(|s| *s == info.symbol))
            .map(|info| (info.symbol, info.fees))
            .collect())
    }

    async fn submit_withdrawal(&self, request: WithdrawalRequest) -> Result<WithdrawalResponse, ClientError> {
        let response = self
            .execute_private(priv_req::CapitalWithdraw::new(
                request.asset.to_string(),
                request.network.to_string(),
                request.address,
                request.amount,
                request.memo,
            ))
            .await?;

        Ok(WithdrawalResponse {
            withdrawal_id: response.id,
            asset: request.asset,
            amount: request.amount,
            status: WithdrawalStatus::Pending,
            timestamp: Utc::now(),
        })
    }

    async fn get_withdrawal_status(&self, withdrawal_id: &str) -> Result<WithdrawalResponse, ClientError> {
        self.get_withdrawal_history(None, None)
            .await?
            .into_iter()
            .find(|record| record.withdrawal_id == withdrawal_id)
            .ok_or_else(|| {
                ClientError::Exchange(ExchangeError::new(
                    ExchangeErrorKind::NotFound,
                    format!("withdrawal {withdrawal_id} not found"),
                ))
            })
    }

    async fn get_withdrawal_history(
        &self,
        asset: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<WithdrawalResponse>, ClientError> {
        let records = self
            .execute_private(priv_req::CapitalWithdrawHistory::new(asset.map(str::to_string), limit))
            .await?;

        Ok(records
            .into_iter()
            .map(|record| WithdrawalResponse {
                withdrawal_id: record.id,
                asset: record.coin.into(),
                amount: record.amount,
                status: mexc_withdrawal_status(record.status),
                timestamp: record.apply_time,
            })
            .collect())
    }

    async fn get_deposit_address(&self, asset: &str, network: Option<&str>) -> Result<DepositAddress, ClientError> {
        let addresses = self
            .execute_private(priv_req::CapitalDepositAddress::new(
                asset.to_string(),
                network.map(str::to_string),
            ))
            .await?;

        addresses
            .into_iter()
            .next()
            .map(|address| DepositAddress {
                asset: address.coin.into(),
                network: address.network.into(),
                address: address.address,
                memo: address.memo,
            })
            .ok_or_else(|| {
                ClientError::Exchange(ExchangeError::new(
                    ExchangeErrorKind::NotFound,
                    format!("no deposit address on file for {asset}"),
                ))
            })
    }

    async fn get_deposit_history(&self, asset: Option<&str>, limit: Option<u32>) -> Result<Vec<DepositRecord>, ClientError> {
        let records = self
            .execute_private(priv_req::CapitalDepositHistory::new(asset.map(str::to_string), limit))
            .await?;

        Ok(records
            .into_iter()
            .map(|record| DepositRecord {
                tx_id: record.tx_id,
                asset: record.coin.into(),
                network: record.network.into(),
                amount: record.amount,
                status: mexc_deposit_status(record.status),
                timestamp: record.insert_time,
            })
            .collect())
    }

    async fn create_listen_key(&self) -> Result<String, ClientError> {
        let response = self.execute_private(priv_req::CreateListenKey).await?;
        Ok(response.listen_key)
    }

    async fn keep_alive_listen_key(&self, listen_key: &str) -> Result<(), ClientError> {
        self.execute_private(priv_req::KeepAliveListenKey::new(listen_key.to_string())).await?;
        Ok(())
    }

    async fn delete_listen_key(&self, listen_key: &str) -> Result<(), ClientError> {
        self.execute_private(priv_req::DeleteListenKey::new(listen_key.to_string())).await?;
        Ok(())
    }
}

/// MEXC capital-history `status` is a venue-specific integer enum; only the handful of states the
/// orchestrator needs to distinguish are mapped explicitly, others fall back to `Pending`.
fn mexc_withdrawal_status(status: i64) -> WithdrawalStatus {
    match status {
        1 => WithdrawalStatus::Processing,
        2 | 6 => WithdrawalStatus::Completed,
        7 | 8 | 9 => WithdrawalStatus::Failed,
        4 => WithdrawalStatus::Cancelled,
        _ => WithdrawalStatus::Pending,
    }
}

fn mexc_deposit_status(status: i64) -> DepositStatus {
    match status {
        0 => DepositStatus::Pending,
        1 => DepositStatus::Completed,
        2 => DepositStatus::Confirming,
        _ => DepositStatus::Failed,
    }
}
