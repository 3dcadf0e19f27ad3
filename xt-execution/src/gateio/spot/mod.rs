//! Concrete Gate.io spot REST client (spec C8): mirrors [`crate::mexc::client::MexcSpotClient`]'s
//! wiring of public/private [`RestClient`]s, the shared [`RateLimiter`], and the [`retry`] driver
//! behind [`MarketDataClient`]/[`AccountClient`] (spec §4.6, §6 literal `/api/v4/spot/...` paths).

pub mod requests;

use crate::{
    client::{AccountClient, MarketDataClient},
    error::{ClientError, ExchangeError, ExchangeErrorKind},
    gateio::{
        parser::GateioParser,
        signer::{GateioRequestSigner, GateioSigner},
        symbol::GateioSymbolMapper,
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
use chrono::{DateTime, Utc};
use requests::{GateioOrderKind, GateioOrderResponse, GateioOrderStatus, GateioSide};
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

const BASE_URL: &str = "https://api.gateio.ws";

/// Default private-request concurrency cap (spec §4.5, shared across venues).
const DEFAULT_MAX_CONCURRENT: usize = 10;

#[derive(Debug, Clone)]
pub struct GateioSpotConfig {
    pub api_key: String,
    pub api_secret: String,
    pub max_concurrent_private: usize,
}

impl GateioSpotConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            max_concurrent_private: DEFAULT_MAX_CONCURRENT,
        }
    }
}

#[derive(Debug)]
pub struct GateioSpotClient {
    public: RestClient<'static, PublicNoHeaders, GateioParser>,
    private: RestClient<'static, GateioRequestSigner, GateioParser>,
    rate_limiter: RateLimiter,
    private_permits: Arc<Semaphore>,
    retry_policy: RetryPolicy,
    symbol_mapper: GateioSymbolMapper,
    latency: LatencyWindow,
}

impl GateioSpotClient {
    pub fn new(config: GateioSpotConfig) -> Result<Self, ClientError> {
        let hmac = hmac::Hmac::<sha2::Sha512>::new_from_slice(config.api_secret.as_bytes())
            .map_err(|_| {
                ClientError::Exchange(ExchangeError::new(
                    ExchangeErrorKind::InvalidCredentials,
                    "Gate.io api_secret has an invalid HMAC key length",
                ))
            })?;

        let rate_limiter = RateLimiter::new(RateLimiterConfig {
            requests_per_second: 10,
            burst: 10,
        })
        .map_err(ClientError::from)?
        .with_endpoint(
            "order",
            RateLimiterConfig {
                requests_per_second: 10,
                burst: 10,
            },
        )
        .map_err(ClientError::from)?;

        Ok(Self {
            public: RestClient::new(BASE_URL, PublicNoHeaders, GateioParser),
            private: RestClient::new(
                BASE_URL,
                GateioRequestSigner::new(GateioSigner::new(config.api_key), hmac, HexEncoder),
                GateioParser,
            ),
            rate_limiter,
            private_permits: Arc::new(Semaphore::new(config.max_concurrent_private.max(1))),
            retry_policy: RetryPolicy::default(),
            symbol_mapper: GateioSymbolMapper,
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
                format!("no Gate.io pair mapping for {symbol}"),
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

        retry::execute_with_retry(
            &self.private,
            &self.rate_limiter,
            // Gate.io carries no adjustable clock-skew offset (spec §4.4); nothing to refresh.
            || {},
            |latency| self.latency.record(latency),
            request,
            self.retry_policy,
        )
        .await
    }

    fn to_canonical_order(&self, symbol: &Symbol, response: GateioOrderResponse) -> Order<OrderState> {
        let status: xt_model::order::OrderStatus =
            (response.status, response.amount, response.filled_amount).into();

        let key = OrderKey::new(
            ExchangeId::GateioSpot,
            symbol.clone(),
            crate::order::id::StrategyId::unknown(),
            response
                .text
                .map(crate::order::id::ClientOrderId::new)
                .unwrap_or_default(),
        );

        let id = OrderId::new(response.id.clone());

        let state = if status.is_terminal() {
            if matches!(status, xt_model::order::OrderStatus::Cancelled) {
                OrderState::cancelled(Cancelled::new(id, response.update_time_ms))
            } else if matches!(status, xt_model::order::OrderStatus::Filled) {
                OrderState::fully_filled()
            } else {
                OrderState::failed(crate::order::state::Failed::Rejected(None))
            }
        } else {
            OrderState::open(Open::new(
                id,
                response.update_time_ms,
                response.price,
                response.amount,
                response.filled_amount,
            ))
        };

        Order {
            key,
            side: response.side.into(),
            price: response.price,
            quantity: response.amount,
            kind: gateio_order_kind(response.kind),
            time_in_force: xt_model::order::TimeInForce::GoodTillCancel,
            state,
        }
    }
}

fn gateio_order_kind(kind: GateioOrderKind) -> xt_model::order::OrderKind {
    match kind {
        GateioOrderKind::Limit => xt_model::order::OrderKind::Limit,
        GateioOrderKind::Market => xt_model::order::OrderKind::Market,
    }
}

fn epoch_millis(timestamp: Option<DateTime<Utc>>) -> Option<i64> {
    timestamp.map(|t| t.timestamp_millis())
}

impl MarketDataClient for GateioSpotClient {
    const EXCHANGE: ExchangeId = ExchangeId::GateioSpot;

    async fn get_symbols_info(&self) -> Result<Vec<SymbolInfo>, ClientError> {
        let pairs = self.execute_public(requests::CurrencyPairs).await?;
        let now = Utc::now();

        Ok(pairs
            .into_iter()
            .map(|pair| SymbolInfo {
                symbol: Symbol::new(pair.base, pair.quote),
                base_precision: pair.amount_precision,
                quote_precision: pair.precision,
                min_base_qty: pair.min_base_amount.unwrap_or(Decimal::ZERO),
                min_quote_qty: pair.min_quote_amount.unwrap_or(Decimal::ZERO),
                tick_size: Decimal::new(1, pair.precision),
                step_size: Decimal::new(1, pair.amount_precision),
                fees: Fees {
                    maker: pair.fee,
                    taker: pair.fee,
                },
                is_futures: false,
                trading_active: pair.trade_status == "tradable",
                refreshed_at: now,
            })
            .collect())
    }

    async fn get_orderbook(&self, symbol: &Symbol, limit: u32) -> Result<OrderBook, ClientError> {
        let pair = self.pair(symbol)?;
        let response = self
            .execute_public(requests::OrderBook::new(pair, Some(limit)))
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
            .execute_public(requests::Trades::new(pair, None, None, None))
            .await?;
        Ok(trades.into_iter().map(|trade| trade_from_gateio(symbol, trade)).collect())
    }

    async fn get_historical_trades(
        &self,
        symbol: &Symbol,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ClientError> {
        let pair = self.pair(symbol)?;
        let trades = self
            .execute_public(requests::Trades::new(
                pair,
                limit,
                from.map(|t| t.timestamp()),
                to.map(|t| t.timestamp()),
            ))
            .await?;
        Ok(trades.into_iter().map(|trade| trade_from_gateio(symbol, trade)).collect())
    }

    async fn get_ticker(&self, symbol: Option<&Symbol>) -> Result<Vec<BookTicker>, ClientError> {
        let mut request = requests::Tickers::default();
        if let Some(symbol) = symbol {
            request.currency_pair = Some(self.pair(symbol)?);
        }

        let tickers = self.execute_public(request).await?;
        let now = Utc::now();

        Ok(tickers
            .into_iter()
            .filter_map(|ticker| {
                let symbol = self.symbol_mapper.to_symbol(&ticker.currency_pair)?;
                Some(BookTicker {
                    symbol,
                    bid_price: ticker.highest_bid,
                    // Gate.io's REST ticker carries no book-level sizes; the WS book-ticker
                    // channel is the source of truth for these, REST fills zero (spec §4.6).
                    bid_qty: Decimal::ZERO,
                    ask_price: ticker.lowest_ask,
                    ask_qty: Decimal::ZERO,
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
        let candles = self
            .execute_public(requests::Candlesticks::new(
                pair,
                interval.to_string(),
                from.map(|t| t.timestamp()),
                to.map(|t| t.timestamp()),
                None,
            ))
            .await?;

        Ok(candles
            .into_iter()
            .map(|candle| Kline {
                symbol: symbol.clone(),
                open_time: chrono::DateTime::from_timestamp(candle.timestamp, 0).unwrap_or_else(Utc::now),
                open: candle.open,
                high: candle.high,
                low: candle.low,
                close: candle.close,
                volume: candle.volume,
            })
            .collect())
    }

    async fn get_server_time(&self) -> Result<DateTime<Utc>, ClientError> {
        let response = self.execute_public(requests::ServerTime).await?;
        Ok(response.server_time)
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.execute_public(requests::ServerTime).await?;
        Ok(())
    }
}

fn level_from_tuple((price, size): (Decimal, Decimal)) -> Level {
    Level { price, size }
}

fn trade_from_gateio(symbol: &Symbol, trade: requests::GateioTrade) -> Trade {
    Trade {
        trade_id: trade.id,
        symbol: symbol.clone(),
        price: trade.price,
        quantity: trade.amount,
        side: trade.side.into(),
        timestamp: trade.create_time_ms,
        is_maker: false,
    }
}

impl AccountClient for GateioSpotClient {
    async fn get_balances(&self) -> Result<Vec<AssetBalance>, ClientError> {
        let response = self.execute_private(requests::Accounts).await?;
        Ok(response
            .into_iter()
            .map(|balance| AssetBalance {
                asset: balance.currency.into(),
                available: balance.available,
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

        let place_order = requests::PlaceOrder {
            currency_pair: pair,
            side: GateioSide::from(open.side),
            kind: if open.kind == xt_model::order::OrderKind::Market {
                GateioOrderKind::Market
            } else {
                GateioOrderKind::Limit
            },
            amount: open.quote_quantity.unwrap_or(open.quantity),
            price: open.price,
            time_in_force: (open.kind != xt_model::order::OrderKind::Market)
                .then_some(open.time_in_force.into()),
            text: Some(format!("t-{}", request.key.cid.0)),
        };

        let response = self.execute_private(place_order).await?;
        let canonical = self.to_canonical_order(&symbol, response);

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

        let Some(id) = known_id.clone() else {
            return Err(ClientError::Exchange(ExchangeError::new(
                ExchangeErrorKind::CancelFailed,
                "Gate.io cancelOrder requires a known order id",
            )));
        };

        let cancel = requests::CancelOrder::new(id.0.to_string(), pair);

        match self.execute_private(cancel).await {
            Ok(response) => Ok(self.to_canonical_order(&request.key.symbol, response)),
            // Spec §4.6 edge case: cancelling an already-done order collapses to best-effort
            // getOrder rather than propagating CancelFailed/OrderNotFound.
            Err(ClientError::Exchange(error)) if error.kind == ExchangeErrorKind::OrderNotFound => {
                self.get_order(&request.key.symbol, &id).await
            }
            Err(other) => Err(other),
        }
    }

    async fn cancel_all_orders(&self, symbol: &Symbol) -> Result<Vec<Order<OrderState>>, ClientError> {
        let pair = self.pair(symbol)?;
        let responses = self.execute_private(requests::CancelAllOrders::new(pair)).await?;
        Ok(responses.into_iter().map(|response| self.to_canonical_order(symbol, response)).collect())
    }

    async fn get_order(&self, symbol: &Symbol, order_id: &OrderId) -> Result<Order<OrderState>, ClientError> {
        let pair = self.pair(symbol)?;
        let response = self
            .execute_private(requests::GetOrder::new(order_id.0.to_string(), pair))
            .await?;
        Ok(self.to_canonical_order(symbol, response))
    }

    async fn get_open_orders(&self, symbol: Option<&Symbol>) -> Result<Vec<Order<ActiveOrderState>>, ClientError> {
        let Some(symbol) = symbol else {
            // Gate.io's all-pairs open-orders response groups orders per currency_pair rather
            // than returning a flat list; like MEXC, a symbol is required here (spec §4.6
            // edge-case policy).
            tracing::debug!("Gate.io getOpenOrders requires a symbol; returning empty list");
            return Ok(Vec::new());
        };

        let pair = self.pair(symbol)?;
        let responses = self.execute_private(requests::OpenOrders::for_pair(Some(pair))).await?;

        Ok(responses
            .into_iter()
            .filter_map(|response| self.to_canonical_order(symbol, response).to_active())
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
            .execute_private(requests::HistoryOrders::new(
                pair,
                start.map(|t| t.timestamp()),
                end.map(|t| t.timestamp()),
                limit,
            ))
            .await?;
        Ok(responses.into_iter().map(|response| self.to_canonical_order(symbol, response)).collect())
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
            .execute_private(requests::MyTrades::new(
                pair,
                order_id.map(|id| id.0.to_string()),
                start.map(|t| t.timestamp()),
                end.map(|t| t.timestamp()),
                limit,
            ))
            .await?;

        Ok(trades
            .into_iter()
            .map(|trade| Trade {
                trade_id: trade.id,
                symbol: symbol.clone(),
                price: trade.price,
                quantity: trade.amount,
                side: trade.side.into(),
                timestamp: trade.create_time_ms,
                is_maker: trade.role == "maker",
            })
            .collect())
    }

    async fn get_assets_info(&self) -> Result<Vec<AssetNetworkInfo>, ClientError> {
        // Gate.io has no single "all assets" endpoint analogous to MEXC's; the orchestrator
        // resolves this venue's assets from `get_symbols_info` and queries chains per-asset.
        let symbols = self.get_symbols_info().await?;
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();

        for info in symbols {
            for asset in [info.symbol.base.clone(), info.symbol.quote.clone()] {
                if !seen.insert(asset.clone()) {
                    continue;
                }
                let chains = self
                    .execute_private(requests::CurrencyChains::new(asset.to_string()))
                    .await
                    .unwrap_or_default();

                out.extend(chains.into_iter().map(|chain| AssetNetworkInfo {
                    asset: asset.clone(),
                    network: chain.chain.into(),
                    withdraw_fee: chain.withdraw_fix_fee.unwrap_or(Decimal::ZERO),
                    min_withdraw: Decimal::ZERO,
                    withdraw_enabled: !chain.withdraw_disabled,
                    deposit_enabled: !chain.deposit_disabled,
                }));
            }
        }

        Ok(out)
    }

    async fn get_trading_fees(&self, symbol: Option<&Symbol>) -> Result<Vec<(Symbol, Fees)>, ClientError> {
        // Gate.io's `/spot/fee` is account-level regardless of `currency_pair` (spec §9 Open
        // Questions); fetch once and broadcast across the requested (or all known) symbols.
        let pair = symbol.map(|s| self.pair(s)).transpose()?;
        let response = self.execute_private(requests::Fee { currency_pair: pair }).await?;
        let fees = Fees {
            maker: response.maker_fee,
            taker: response.taker_fee,
        };

        if let Some(symbol) = symbol {
            return Ok(vec![(symbol.clone(), fees)]);
        }

        let infos = self.get_symbols_info().await?;
        Ok(infos.into_iter().map(|info| (info.symbol, fees)).collect())
    }

    async fn submit_withdrawal(&self, request: WithdrawalRequest) -> Result<WithdrawalResponse, ClientError> {
        let response = self
            .execute_private(requests::SubmitWithdrawal {
                currency: request.asset.to_string(),
                amount: request.amount,
                address: request.address,
                chain: request.network.to_string(),
                memo: request.memo,
            })
            .await?;

        Ok(WithdrawalResponse {
            withdrawal_id: response.id,
            asset: request.asset,
            amount: response.amount,
            status: gateio_withdrawal_status(&response.status),
            timestamp: response.timestamp,
        })
    }

    async fn cancel_withdrawal(&self, withdrawal_id: &str) -> Result<bool, ClientError> {
        match self
            .execute_private(requests::CancelWithdrawal::new(withdrawal_id.to_string()))
            .await
        {
            Ok(_) => Ok(true),
            Err(ClientError::Exchange(error))
                if matches!(error.kind, ExchangeErrorKind::NotFound | ExchangeErrorKind::OrderAlreadyDone) =>
            {
                Ok(false)
            }
            Err(other) => Err(other),
        }
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
            .execute_private(requests::WithdrawalHistory::new(asset.map(str::to_string), limit))
            .await?;

        Ok(records
            .into_iter()
            .map(|record| WithdrawalResponse {
                withdrawal_id: record.id,
                asset: record.currency.into(),
                amount: record.amount,
                status: gateio_withdrawal_status(&record.status),
                timestamp: record.timestamp,
            })
            .collect())
    }

    async fn get_deposit_address(&self, asset: &str, _network: Option<&str>) -> Result<DepositAddress, ClientError> {
        let response = self
            .execute_private(requests::DepositAddress::new(asset.to_string()))
            .await?;

        Ok(DepositAddress {
            asset: response.currency.into(),
            network: Default::default(),
            address: response.address,
            memo: None,
        })
    }

    async fn get_deposit_history(&self, asset: Option<&str>, limit: Option<u32>) -> Result<Vec<DepositRecord>, ClientError> {
        let records = self
            .execute_private(requests::DepositHistory::new(asset.map(str::to_string), limit))
            .await?;

        Ok(records
            .into_iter()
            .map(|record| DepositRecord {
                tx_id: record.id,
                asset: record.currency.into(),
                network: Default::default(),
                amount: record.amount,
                status: gateio_deposit_status(&record.status),
                timestamp: record.timestamp,
            })
            .collect())
    }

    // Gate.io authenticates private WS channels directly with API key/secret (spec §4.8); the
    // `AccountClient` default listen-key methods (`NotSupported`) are left unoverridden.
}

/// Gate.io withdrawal `status` is a lowercase free-text field; only the states the orchestrator
/// needs to distinguish are mapped explicitly, others fall back to `Pending`.
fn gateio_withdrawal_status(status: &str) -> WithdrawalStatus {
    match status {
        "done" | "success" => WithdrawalStatus::Completed,
        "cancel" | "cancelled" => WithdrawalStatus::Cancelled,
        "fail" | "failed" | "reject" => WithdrawalStatus::Failed,
        "request" | "manual" | "bcode" | "extpend" | "pend" => WithdrawalStatus::Pending,
        _ => WithdrawalStatus::Processing,
    }
}

fn gateio_deposit_status(status: &str) -> DepositStatus {
    match status {
        "done" => DepositStatus::Completed,
        "cancel" => DepositStatus::Cancelled,
        "request" => DepositStatus::Pending,
        _ => DepositStatus::Confirming,
    }
}
