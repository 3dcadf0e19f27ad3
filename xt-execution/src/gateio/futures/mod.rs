//! Concrete Gate.io USDT-settled perpetual futures REST client (spec C8): the
//! [`crate::gateio::spot::GateioSpotClient`] wiring pattern, generalised over [`FuturesMarketDataClient`]/
//! [`FuturesAccountClient`] (spec §4.6 "Public/Private futures", §6 literal `/api/v4/futures/usdt/...`
//! paths).
//!
//! Only the USDT-settled contract family (`ExchangeId::GateioPerpetualsUsd`) is instantiated here.
//! The BTC-settled family (`ExchangeId::GateioPerpetualsBtc`) shares identical wire shapes and
//! would reuse every request type in [`requests`] unchanged with `settle = "btc"`, but
//! [`MarketDataClient::EXCHANGE`] is a compile-time associated const, not a per-instance field, so
//! a distinct `GateioFuturesBtcClient` newtype would be needed to expose it safely - left
//! unimplemented and recorded in `DESIGN.md` rather than mislabelling orders under the wrong
//! `ExchangeId`.

pub mod requests;

use crate::{
    client::{AccountClient, FuturesAccountClient, FuturesMarketDataClient, MarketDataClient},
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
use requests::{GateioFuturesOrderResponse, GateioFuturesOrderStatus};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Semaphore;
use xt_core::{
    protocol::http::{private::encoder::HexEncoder, public::PublicNoHeaders, rest::client::RestClient},
    ratelimit::{RateLimiter, RateLimiterConfig},
};
use xt_model::{
    AssetBalance, BookTicker, Kline, OrderBook, Position, PositionSide, SymbolInfo, Trade,
    exchange::ExchangeId,
    market::Level,
    symbol::{Symbol, SymbolMapper},
    symbol_info::Fees,
    withdrawal::{AssetNetworkInfo, DepositAddress, DepositRecord, WithdrawalRequest, WithdrawalResponse},
};

const BASE_URL: &str = "https://api.gateio.ws";

const DEFAULT_MAX_CONCURRENT: usize = 10;

#[derive(Debug, Clone)]
pub struct GateioFuturesConfig {
    pub api_key: String,
    pub api_secret: String,
    pub max_concurrent_private: usize,
}

impl GateioFuturesConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            max_concurrent_private: DEFAULT_MAX_CONCURRENT,
        }
    }
}

#[derive(Debug)]
pub struct GateioFuturesClient {
    public: RestClient<'static, PublicNoHeaders, GateioParser>,
    private: RestClient<'static, GateioRequestSigner, GateioParser>,
    rate_limiter: RateLimiter,
    private_permits: Arc<Semaphore>,
    retry_policy: RetryPolicy,
    symbol_mapper: GateioSymbolMapper,
    latency: LatencyWindow,
    settle: &'static str,
}

impl GateioFuturesClient {
    pub fn new(config: GateioFuturesConfig) -> Result<Self, ClientError> {
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
            settle: "usdt",
        })
    }

    pub fn latency_metrics(&self) -> &LatencyWindow {
        &self.latency
    }

    fn contract(&self, symbol: &Symbol) -> Result<String, ClientError> {
        self.symbol_mapper.to_pair(symbol).ok_or_else(|| {
            ClientError::Exchange(ExchangeError::new(
                ExchangeErrorKind::InvalidSymbol,
                format!("no Gate.io contract mapping for {symbol}"),
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
            || {},
            |latency| self.latency.record(latency),
            request,
            self.retry_policy,
        )
        .await
    }

    fn to_canonical_order(&self, symbol: &Symbol, response: GateioFuturesOrderResponse) -> Order<OrderState> {
        let status: xt_model::order::OrderStatus = (response.status, response.size, response.left).into();

        let key = OrderKey::new(
            Self::EXCHANGE,
            symbol.clone(),
            crate::order::id::StrategyId::unknown(),
            response
                .text
                .map(crate::order::id::ClientOrderId::new)
                .unwrap_or_default(),
        );

        let id = OrderId::new(response.id.to_string());
        let filled = (response.size.unsigned_abs() as i64) - response.left.abs();
        let filled_decimal = Decimal::from(filled.max(0));
        let quantity = Decimal::from(response.size.unsigned_abs());

        let state = if status.is_terminal() {
            if matches!(status, xt_model::order::OrderStatus::Cancelled) {
                OrderState::cancelled(Cancelled::new(id, response.update_time))
            } else if matches!(status, xt_model::order::OrderStatus::Filled) {
                OrderState::fully_filled()
            } else {
                OrderState::failed(crate::order::state::Failed::Rejected(None))
            }
        } else {
            OrderState::open(Open::new(id, response.update_time, response.price, quantity, filled_decimal))
        };

        Order {
            key,
            side: if response.size >= 0 { xt_model::Side::Buy } else { xt_model::Side::Sell },
            price: response.price,
            quantity,
            kind: if response.price.is_zero() {
                xt_model::order::OrderKind::Market
            } else {
                xt_model::order::OrderKind::Limit
            },
            time_in_force: xt_model::order::TimeInForce::GoodTillCancel,
            state,
        }
    }
}

impl MarketDataClient for GateioFuturesClient {
    const EXCHANGE: ExchangeId = ExchangeId::GateioPerpetualsUsd;

    async fn get_symbols_info(&self) -> Result<Vec<SymbolInfo>, ClientError> {
        let contracts = self.execute_public(requests::Contracts::new(self.settle)).await?;
        let now = Utc::now();

        Ok(contracts
            .into_iter()
            .filter_map(|contract| {
                let symbol = self.symbol_mapper.to_symbol(&contract.name)?;
                Some(SymbolInfo {
                    symbol,
                    base_precision: 8,
                    quote_precision: contract.order_price_round.scale(),
                    min_base_qty: Decimal::from(contract.order_size_min),
                    min_quote_qty: Decimal::ZERO,
                    tick_size: contract.order_price_round,
                    step_size: Decimal::ONE,
                    fees: Fees {
                        maker: contract.maker_fee_rate,
                        taker: contract.taker_fee_rate,
                    },
                    is_futures: true,
                    trading_active: !contract.in_delisting,
                    refreshed_at: now,
                })
            })
            .collect())
    }

    async fn get_orderbook(&self, symbol: &Symbol, limit: u32) -> Result<OrderBook, ClientError> {
        let contract = self.contract(symbol)?;
        let response = self
            .execute_public(requests::OrderBook::new(self.settle, contract, Some(limit)))
            .await?;

        Ok(OrderBook {
            symbol: symbol.clone(),
            bids: response.bids.into_iter().map(|level| Level { price: level.p, size: level.s }).collect(),
            asks: response.asks.into_iter().map(|level| Level { price: level.p, size: level.s }).collect(),
            timestamp: Utc::now(),
        })
    }

    async fn get_recent_trades(&self, symbol: &Symbol) -> Result<Vec<Trade>, ClientError> {
        let contract = self.contract(symbol)?;
        let trades = self
            .execute_public(requests::Trades::new(self.settle, contract, None, None, None))
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
        let contract = self.contract(symbol)?;
        let trades = self
            .execute_public(requests::Trades::new(
                self.settle,
                contract,
                limit,
                from.map(|t| t.timestamp()),
                to.map(|t| t.timestamp()),
            ))
            .await?;
        Ok(trades.into_iter().map(|trade| trade_from_gateio(symbol, trade)).collect())
    }

    async fn get_ticker(&self, symbol: Option<&Symbol>) -> Result<Vec<BookTicker>, ClientError> {
        let contract = symbol.map(|s| self.contract(s)).transpose()?;
        let tickers = self.execute_public(requests::Tickers::new(self.settle, contract)).await?;
        let now = Utc::now();

        Ok(tickers
            .into_iter()
            .filter_map(|ticker| {
                let symbol = self.symbol_mapper.to_symbol(&ticker.contract)?;
                Some(BookTicker {
                    symbol,
                    bid_price: ticker.highest_bid,
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
        let contract = self.contract(symbol)?;
        let candles = self
            .execute_public(requests::Candlesticks::new(
                self.settle,
                contract,
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
                open_time: chrono::DateTime::from_timestamp(candle.t, 0).unwrap_or_else(Utc::now),
                open: candle.o,
                high: candle.h,
                low: candle.l,
                close: candle.c,
                volume: Decimal::from(candle.v),
            })
            .collect())
    }

    async fn get_server_time(&self) -> Result<DateTime<Utc>, ClientError> {
        Ok(Utc::now())
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.execute_public(requests::Contracts::new(self.settle)).await?;
        Ok(())
    }
}

fn trade_from_gateio(symbol: &Symbol, trade: requests::GateioFuturesTrade) -> Trade {
    Trade {
        trade_id: trade.id.to_string(),
        symbol: symbol.clone(),
        price: trade.price,
        quantity: Decimal::from(trade.size.unsigned_abs()),
        side: if trade.size >= 0 { xt_model::Side::Buy } else { xt_model::Side::Sell },
        timestamp: trade.create_time,
        is_maker: false,
    }
}

impl FuturesMarketDataClient for GateioFuturesClient {
    async fn get_funding_rate(&self, symbol: &Symbol) -> Result<Decimal, ClientError> {
        let contract = self.contract(symbol)?;
        let rates = self
            .execute_public(requests::FundingRate::new(self.settle, contract, Some(1)))
            .await?;
        Ok(rates.into_iter().next().map(|r| r.r).unwrap_or(Decimal::ZERO))
    }
}

impl AccountClient for GateioFuturesClient {
    async fn get_balances(&self) -> Result<Vec<AssetBalance>, ClientError> {
        let account = self.execute_private(requests::Accounts::new(self.settle)).await?;
        Ok(vec![AssetBalance {
            asset: account.currency.into(),
            available: account.available,
            locked: account.total - account.available,
        }])
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
        let contract = self.contract(&symbol)?;
        let open = &request.state;

        let is_market = open.kind == xt_model::order::OrderKind::Market;
        let signed_size = match open.side {
            xt_model::Side::Buy => open.quantity,
            xt_model::Side::Sell => -open.quantity,
        };
        let signed_size: i64 = signed_size
            .to_string()
            .parse::<f64>()
            .map(|value| value.round() as i64)
            .map_err(|_| {
                ClientError::Exchange(ExchangeError::new(
                    ExchangeErrorKind::InvalidParameter,
                    "futures order quantity must be a whole contract count",
                ))
            })?;

        let place_order = requests::PlaceOrder::new(
            self.settle,
            contract,
            signed_size,
            Some(if is_market { "0".to_string() } else { open.price.unwrap_or_default().to_string() }),
            (!is_market).then_some(open.time_in_force.into()),
            Some(format!("t-{}", request.key.cid.0)),
            Some(false),
        );

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
        let known_id = request.state.id.clone();
        let Some(id) = known_id else {
            return Err(ClientError::Exchange(ExchangeError::new(
                ExchangeErrorKind::CancelFailed,
                "Gate.io cancelOrder requires a known order id",
            )));
        };

        let cancel = requests::CancelOrder::new(self.settle, id.0.to_string());
        match self.execute_private(cancel).await {
            Ok(response) => Ok(self.to_canonical_order(&request.key.symbol, response)),
            Err(ClientError::Exchange(error)) if error.kind == ExchangeErrorKind::OrderNotFound => {
                self.get_order(&request.key.symbol, &id).await
            }
            Err(other) => Err(other),
        }
    }

    async fn cancel_all_orders(&self, symbol: &Symbol) -> Result<Vec<Order<OrderState>>, ClientError> {
        let contract = self.contract(symbol)?;
        let responses = self
            .execute_private(requests::CancelAllOrders::new(self.settle, contract))
            .await?;
        Ok(responses.into_iter().map(|response| self.to_canonical_order(symbol, response)).collect())
    }

    async fn get_order(&self, symbol: &Symbol, order_id: &OrderId) -> Result<Order<OrderState>, ClientError> {
        let response = self
            .execute_private(requests::GetOrder::new(self.settle, order_id.0.to_string()))
            .await?;
        Ok(self.to_canonical_order(symbol, response))
    }

    async fn get_open_orders(&self, symbol: Option<&Symbol>) -> Result<Vec<Order<ActiveOrderState>>, ClientError> {
        let Some(symbol) = symbol else {
            tracing::debug!("Gate.io futures getOpenOrders requires a symbol; returning empty list");
            return Ok(Vec::new());
        };

        let contract = self.contract(symbol)?;
        let responses = self
            .execute_private(requests::OpenOrders::for_contract(self.settle, contract))
            .await?;

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
        let contract = self.contract(symbol)?;
        let responses = self
            .execute_private(requests::HistoryOrders::new(
                self.settle,
                contract,
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
        _start: Option<DateTime<Utc>>,
        _end: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ClientError> {
        let contract = self.contract(symbol)?;
        let trades = self
            .execute_private(requests::MyTrades::new(
                self.settle,
                contract,
                order_id.map(|id| id.0.to_string()),
                limit,
            ))
            .await?;

        Ok(trades
            .into_iter()
            .map(|trade| Trade {
                trade_id: trade.id.to_string(),
                symbol: symbol.clone(),
                price: trade.price,
                quantity: Decimal::from(trade.size.unsigned_abs()),
                side: if trade.size >= 0 { xt_model::Side::Buy } else { xt_model::Side::Sell },
                timestamp: trade.create_time,
                is_maker: trade.role == "maker",
            })
            .collect())
    }

    async fn get_assets_info(&self) -> Result<Vec<AssetNetworkInfo>, ClientError> {
        // USDT-margined futures settle in a single currency with no separate withdrawal-network
        // surface of its own; asset/network info is sourced from the spot venue instead.
        Ok(Vec::new())
    }

    async fn get_trading_fees(&self, symbol: Option<&Symbol>) -> Result<Vec<(Symbol, Fees)>, ClientError> {
        let contract = symbol.map(|s| self.contract(s)).transpose()?;
        let fees = self.execute_private(requests::Fee::new(self.settle, contract)).await?;

        Ok(fees
            .into_iter()
            .filter_map(|fee| {
                let symbol = self.symbol_mapper.to_symbol(&fee.contract)?;
                Some((
                    symbol,
                    Fees {
                        maker: fee.maker_fee_rate,
                        taker: fee.taker_fee_rate,
                    },
                ))
            })
            .collect())
    }

    async fn submit_withdrawal(&self, _request: WithdrawalRequest) -> Result<WithdrawalResponse, ClientError> {
        Err(ClientError::Exchange(ExchangeError::new(
            ExchangeErrorKind::NotSupported,
            "withdrawals are submitted via the Gate.io spot wallet, not the futures account",
        )))
    }

    async fn get_withdrawal_status(&self, _withdrawal_id: &str) -> Result<WithdrawalResponse, ClientError> {
        Err(ClientError::Exchange(ExchangeError::new(
            ExchangeErrorKind::NotSupported,
            "withdrawals are tracked via the Gate.io spot wallet, not the futures account",
        )))
    }

    async fn get_withdrawal_history(
        &self,
        _asset: Option<&str>,
        _limit: Option<u32>,
    ) -> Result<Vec<WithdrawalResponse>, ClientError> {
        Ok(Vec::new())
    }

    async fn get_deposit_address(&self, _asset: &str, _network: Option<&str>) -> Result<DepositAddress, ClientError> {
        Err(ClientError::Exchange(ExchangeError::new(
            ExchangeErrorKind::NotSupported,
            "deposits are made via the Gate.io spot wallet, not the futures account",
        )))
    }

    async fn get_deposit_history(&self, _asset: Option<&str>, _limit: Option<u32>) -> Result<Vec<DepositRecord>, ClientError> {
        Ok(Vec::new())
    }
}

impl FuturesAccountClient for GateioFuturesClient {
    async fn get_positions(&self) -> Result<Vec<Position>, ClientError> {
        let positions = self.execute_private(requests::Positions::new(self.settle)).await?;
        Ok(positions
            .into_iter()
            .filter_map(|position| self.symbol_mapper.to_symbol(&position.contract).map(|symbol| to_canonical_position(symbol, position)))
            .filter(|position| !position.is_flat())
            .collect())
    }

    async fn get_position(&self, symbol: &Symbol) -> Result<Option<Position>, ClientError> {
        let contract = self.contract(symbol)?;
        match self.execute_private(requests::Position::new(self.settle, contract)).await {
            Ok(position) => {
                let canonical = to_canonical_position(symbol.clone(), position);
                Ok((!canonical.is_flat()).then_some(canonical))
            }
            Err(ClientError::Exchange(error)) if error.kind == ExchangeErrorKind::NotFound => Ok(None),
            Err(other) => Err(other),
        }
    }

    async fn update_position_margin(&self, symbol: &Symbol, delta: Decimal) -> Result<(), ClientError> {
        let contract = self.contract(symbol)?;
        self.execute_private(requests::UpdateMargin::new(self.settle, contract, delta)).await?;
        Ok(())
    }

    async fn update_position_leverage(&self, symbol: &Symbol, leverage: u32) -> Result<(), ClientError> {
        let contract = self.contract(symbol)?;
        self.execute_private(requests::UpdateLeverage::new(self.settle, contract, leverage.to_string())).await?;
        Ok(())
    }
}

fn to_canonical_position(symbol: Symbol, position: requests::GateioPosition) -> Position {
    let side = if position.size >= 0 { PositionSide::Long } else { PositionSide::Short };
    Position {
        symbol,
        side,
        size: Decimal::from(position.size.unsigned_abs()),
        entry_price: position.entry_price,
        mark_price: position.mark_price,
        unrealized_pnl: position.unrealised_pnl,
        realized_pnl: position.realised_pnl,
        liquidation_price: (!position.liq_price.is_zero()).then_some(position.liq_price),
        margin: Some(position.margin),
        timestamp: position.update_time,
    }
}
