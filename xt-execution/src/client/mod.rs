use crate::{
    error::ClientError,
    order::{
        Order,
        request::{OrderRequestCancel, OrderRequestOpen},
        state::{ActiveOrderState, OrderState},
    },
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::future::Future;
use xt_model::{
    AssetBalance, BookTicker, Kline, OrderBook, Position, SymbolInfo, Trade,
    exchange::ExchangeId,
    symbol::Symbol,
    symbol_info::Fees,
    withdrawal::{DepositAddress, DepositRecord, WithdrawalRequest, WithdrawalResponse},
};

/// Public market data, shared by spot and futures venues (spec §4.6 "Public spot").
pub trait MarketDataClient
where
    Self: Send + Sync,
{
    const EXCHANGE: ExchangeId;

    fn get_symbols_info(&self) -> impl Future<Output = Result<Vec<SymbolInfo>, ClientError>> + Send;

    fn get_orderbook(
        &self,
        symbol: &Symbol,
        limit: u32,
    ) -> impl Future<Output = Result<OrderBook, ClientError>> + Send;

    fn get_recent_trades(
        &self,
        symbol: &Symbol,
    ) -> impl Future<Output = Result<Vec<Trade>, ClientError>> + Send;

    fn get_historical_trades(
        &self,
        symbol: &Symbol,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<Trade>, ClientError>> + Send;

    fn get_ticker(
        &self,
        symbol: Option<&Symbol>,
    ) -> impl Future<Output = Result<Vec<BookTicker>, ClientError>> + Send;

    fn get_klines(
        &self,
        symbol: &Symbol,
        interval: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<Kline>, ClientError>> + Send;

    /// Chunked `getKlines` honouring the venue's maximum history window per request; the default
    /// delegates to a single [`MarketDataClient::get_klines`] call, sufficient for any range within
    /// one page. Venues with a narrow per-request window override this to page with an inter-page
    /// sleep (spec §4.6 `getKlinesBatch`).
    fn get_klines_batch(
        &self,
        symbol: &Symbol,
        interval: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<Kline>, ClientError>> + Send {
        self.get_klines(symbol, interval, from, to)
    }

    fn get_server_time(&self) -> impl Future<Output = Result<DateTime<Utc>, ClientError>> + Send;

    fn ping(&self) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Public futures market data: spot superset plus funding rate (spec §4.6 "Public futures").
pub trait FuturesMarketDataClient: MarketDataClient {
    fn get_funding_rate(
        &self,
        symbol: &Symbol,
    ) -> impl Future<Output = Result<Decimal, ClientError>> + Send;
}

/// Private (authenticated) spot trading operations (spec §4.6 "Private spot").
pub trait AccountClient: MarketDataClient {
    fn get_balances(&self) -> impl Future<Output = Result<Vec<AssetBalance>, ClientError>> + Send;

    fn get_asset_balance(
        &self,
        asset: &str,
    ) -> impl Future<Output = Result<Option<AssetBalance>, ClientError>> + Send;

    fn place_order(
        &self,
        request: OrderRequestOpen,
    ) -> impl Future<Output = Result<Order<ActiveOrderState>, ClientError>> + Send;

    /// Collapses to a best-effort [`AccountClient::get_order`] when the target is already done
    /// rather than raising (spec §4.6 edge-case policy, §8 testable property 3: idempotency).
    fn cancel_order(
        &self,
        request: OrderRequestCancel,
    ) -> impl Future<Output = Result<Order<OrderState>, ClientError>> + Send;

    fn cancel_all_orders(
        &self,
        symbol: &Symbol,
    ) -> impl Future<Output = Result<Vec<Order<OrderState>>, ClientError>> + Send;

    fn get_order(
        &self,
        symbol: &Symbol,
        order_id: &crate::order::id::OrderId,
    ) -> impl Future<Output = Result<Order<OrderState>, ClientError>> + Send;

    /// `symbol = None` on a venue that mandates one returns an empty list with a debug log rather
    /// than erroring (spec §4.6 edge-case policy).
    fn get_open_orders(
        &self,
        symbol: Option<&Symbol>,
    ) -> impl Future<Output = Result<Vec<Order<ActiveOrderState>>, ClientError>> + Send;

    fn get_history_orders(
        &self,
        symbol: &Symbol,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<Order<OrderState>>, ClientError>> + Send;

    fn get_account_trades(
        &self,
        symbol: &Symbol,
        order_id: Option<&crate::order::id::OrderId>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<Trade>, ClientError>> + Send;

    /// Cancel-and-replace, used by venues lacking a native amend (spec §4.6 `modifyOrder`).
    fn modify_order(
        &self,
        cancel: OrderRequestCancel,
        replacement: OrderRequestOpen,
    ) -> impl Future<Output = Result<Order<ActiveOrderState>, ClientError>> + Send {
        async move {
            self.cancel_order(cancel).await?;
            self.place_order(replacement).await
        }
    }

    fn get_assets_info(
        &self,
    ) -> impl Future<Output = Result<Vec<xt_model::withdrawal::AssetNetworkInfo>, ClientError>> + Send;

    fn get_trading_fees(
        &self,
        symbol: Option<&Symbol>,
    ) -> impl Future<Output = Result<Vec<(Symbol, Fees)>, ClientError>> + Send;

    fn submit_withdrawal(
        &self,
        request: WithdrawalRequest,
    ) -> impl Future<Output = Result<WithdrawalResponse, ClientError>> + Send;

    /// MEXC exposes no native withdrawal-cancellation endpoint and always reports failure (spec
    /// §9 Open Questions); Gate.io overrides with its real cancel call.
    fn cancel_withdrawal(
        &self,
        _withdrawal_id: &str,
    ) -> impl Future<Output = Result<bool, ClientError>> + Send {
        async { Ok(false) }
    }

    fn get_withdrawal_status(
        &self,
        withdrawal_id: &str,
    ) -> impl Future<Output = Result<WithdrawalResponse, ClientError>> + Send;

    fn get_withdrawal_history(
        &self,
        asset: Option<&str>,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<WithdrawalResponse>, ClientError>> + Send;

    fn get_deposit_address(
        &self,
        asset: &str,
        network: Option<&str>,
    ) -> impl Future<Output = Result<DepositAddress, ClientError>> + Send;

    fn get_deposit_history(
        &self,
        asset: Option<&str>,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<DepositRecord>, ClientError>> + Send;

    /// Listen-key lifecycle for venues requiring one to authenticate private WS channels (spec
    /// §4.8). The default rejects with [`crate::error::ExchangeErrorKind::NotSupported`] for
    /// venues (Gate.io) that authenticate private WS channels directly with API key/secret
    /// instead.
    fn create_listen_key(&self) -> impl Future<Output = Result<String, ClientError>> + Send {
        async {
            Err(ClientError::Exchange(crate::error::ExchangeError::new(
                crate::error::ExchangeErrorKind::NotSupported,
                "venue has no listen-key concept",
            )))
        }
    }

    fn keep_alive_listen_key(
        &self,
        _listen_key: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        async {
            Err(ClientError::Exchange(crate::error::ExchangeError::new(
                crate::error::ExchangeErrorKind::NotSupported,
                "venue has no listen-key concept",
            )))
        }
    }

    fn delete_listen_key(
        &self,
        _listen_key: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        async {
            Err(ClientError::Exchange(crate::error::ExchangeError::new(
                crate::error::ExchangeErrorKind::NotSupported,
                "venue has no listen-key concept",
            )))
        }
    }
}

/// Private futures trading: the [`AccountClient`] superset plus position management (spec §4.6
/// "Private futures").
pub trait FuturesAccountClient: AccountClient + FuturesMarketDataClient {
    fn get_positions(&self) -> impl Future<Output = Result<Vec<Position>, ClientError>> + Send;

    fn get_position(
        &self,
        symbol: &Symbol,
    ) -> impl Future<Output = Result<Option<Position>, ClientError>> + Send;

    fn update_position_margin(
        &self,
        symbol: &Symbol,
        delta: Decimal,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn update_position_leverage(
        &self,
        symbol: &Symbol,
        leverage: u32,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// No venue exposes a native "close position" endpoint; closing is a market order sized at
    /// the position's full quantity on the opposite side (spec §4.6).
    fn close_position(
        &self,
        position: &Position,
        strategy: crate::order::id::StrategyId,
    ) -> impl Future<Output = Result<Order<ActiveOrderState>, ClientError>> + Send {
        async move {
            let side = match position.side {
                xt_model::PositionSide::Long => xt_model::Side::Sell,
                xt_model::PositionSide::Short => xt_model::Side::Buy,
            };

            let key = crate::order::OrderKey::new(
                Self::EXCHANGE,
                position.symbol.clone(),
                strategy,
                crate::order::id::ClientOrderId::random(),
            );

            let request = OrderRequestOpen::new(
                key,
                crate::order::request::RequestOpen::market_base(side, position.size),
            );

            self.place_order(request).await
        }
    }
}
