//! The orchestrator never talks to a venue's REST adapter directly; it goes through this module's
//! object-safe façade traits (spec §3 "Ownership": "The orchestrator holds a back-reference to
//! façades per venue"). [`SpotVenueFacade`]/[`FuturesVenueFacade`] are intentionally narrower than
//! [`xt_execution::client::AccountClient`]/[`FuturesAccountClient`] - only the operations the
//! arbitrage engine needs - and are `async_trait`-boxed so a heterogeneous, runtime-sized
//! collection of spot venues (spec §3: "N spot venues") can be held as `Vec<Arc<dyn
//! SpotVenueFacade>>`. [`SpotAdapter`]/[`FuturesAdapter`] blanket-implement these over any
//! concrete `xt-execution` client, so no venue-specific code lives in this crate.

use async_trait::async_trait;
use xt_execution::{
    client::{AccountClient, FuturesAccountClient},
    error::ClientError,
    order::{
        Order,
        id::OrderId,
        request::{OrderRequestCancel, OrderRequestOpen},
        state::{ActiveOrderState, OrderState},
    },
};
use xt_model::{BookTicker, Position, SymbolInfo, exchange::ExchangeId, symbol::Symbol};

/// Narrow contract the orchestrator needs from one spot venue's composite façade (spec C11/C12).
#[async_trait]
pub trait SpotVenueFacade: Send + Sync {
    fn exchange(&self) -> ExchangeId;

    /// Freshest book ticker available - a live WS push cache or a fresh REST fetch (spec §3
    /// `BookTicker`: "never cached ... must reflect the latest WS push or a fresh REST fetch").
    async fn book_ticker(&self, symbol: &Symbol) -> Result<BookTicker, ClientError>;

    async fn symbol_info(&self, symbol: &Symbol) -> Result<SymbolInfo, ClientError>;

    async fn place_order(
        &self,
        request: OrderRequestOpen,
    ) -> Result<Order<ActiveOrderState>, ClientError>;

    async fn cancel_order(&self, request: OrderRequestCancel) -> Result<Order<OrderState>, ClientError>;

    async fn get_order(&self, symbol: &Symbol, order_id: &OrderId) -> Result<Order<OrderState>, ClientError>;
}

/// Narrow contract the orchestrator needs from the single futures hedge venue.
#[async_trait]
pub trait FuturesVenueFacade: Send + Sync {
    fn exchange(&self) -> ExchangeId;

    async fn book_ticker(&self, symbol: &Symbol) -> Result<BookTicker, ClientError>;

    async fn symbol_info(&self, symbol: &Symbol) -> Result<SymbolInfo, ClientError>;

    async fn place_order(
        &self,
        request: OrderRequestOpen,
    ) -> Result<Order<ActiveOrderState>, ClientError>;

    async fn cancel_order(&self, request: OrderRequestCancel) -> Result<Order<OrderState>, ClientError>;

    async fn get_order(&self, symbol: &Symbol, order_id: &OrderId) -> Result<Order<OrderState>, ClientError>;

    async fn get_position(&self, symbol: &Symbol) -> Result<Option<Position>, ClientError>;
}

/// Blanket [`SpotVenueFacade`] over any concrete `xt-execution` [`AccountClient`] (the composite
/// façade's bound REST adapter - spec C11).
#[derive(Debug, Clone)]
pub struct SpotAdapter<C>(pub C);

#[async_trait]
impl<C> SpotVenueFacade for SpotAdapter<C>
where
    C: AccountClient,
{
    fn exchange(&self) -> ExchangeId {
        C::EXCHANGE
    }

    async fn book_ticker(&self, symbol: &Symbol) -> Result<BookTicker, ClientError> {
        self.0
            .get_ticker(Some(symbol))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::Exchange(xt_execution::error::ExchangeError::new(
                    xt_execution::error::ExchangeErrorKind::InvalidSymbol,
                    format!("no ticker returned for {symbol}"),
                ))
            })
    }

    async fn symbol_info(&self, symbol: &Symbol) -> Result<SymbolInfo, ClientError> {
        self.0
            .get_symbols_info()
            .await?
            .into_iter()
            .find(|info| &info.symbol == symbol)
            .ok_or_else(|| {
                ClientError::Exchange(xt_execution::error::ExchangeError::new(
                    xt_execution::error::ExchangeErrorKind::InvalidSymbol,
                    format!("no symbol info for {symbol}"),
                ))
            })
    }

    async fn place_order(&self, request: OrderRequestOpen) -> Result<Order<ActiveOrderState>, ClientError> {
        self.0.place_order(request).await
    }

    async fn cancel_order(&self, request: OrderRequestCancel) -> Result<Order<OrderState>, ClientError> {
        self.0.cancel_order(request).await
    }

    async fn get_order(&self, symbol: &Symbol, order_id: &OrderId) -> Result<Order<OrderState>, ClientError> {
        self.0.get_order(symbol, order_id).await
    }
}

/// Blanket [`FuturesVenueFacade`] over any concrete [`FuturesAccountClient`].
#[derive(Debug, Clone)]
pub struct FuturesAdapter<C>(pub C);

#[async_trait]
impl<C> FuturesVenueFacade for FuturesAdapter<C>
where
    C: FuturesAccountClient,
{
    fn exchange(&self) -> ExchangeId {
        C::EXCHANGE
    }

    async fn book_ticker(&self, symbol: &Symbol) -> Result<BookTicker, ClientError> {
        self.0
            .get_ticker(Some(symbol))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::Exchange(xt_execution::error::ExchangeError::new(
                    xt_execution::error::ExchangeErrorKind::InvalidSymbol,
                    format!("no ticker returned for {symbol}"),
                ))
            })
    }

    async fn symbol_info(&self, symbol: &Symbol) -> Result<SymbolInfo, ClientError> {
        self.0
            .get_symbols_info()
            .await?
            .into_iter()
            .find(|info| &info.symbol == symbol)
            .ok_or_else(|| {
                ClientError::Exchange(xt_execution::error::ExchangeError::new(
                    xt_execution::error::ExchangeErrorKind::InvalidSymbol,
                    format!("no symbol info for {symbol}"),
                ))
            })
    }

    async fn place_order(&self, request: OrderRequestOpen) -> Result<Order<ActiveOrderState>, ClientError> {
        self.0.place_order(request).await
    }

    async fn cancel_order(&self, request: OrderRequestCancel) -> Result<Order<OrderState>, ClientError> {
        self.0.cancel_order(request).await
    }

    async fn get_order(&self, symbol: &Symbol, order_id: &OrderId) -> Result<Order<OrderState>, ClientError> {
        self.0.get_order(symbol, order_id).await
    }

    async fn get_position(&self, symbol: &Symbol) -> Result<Option<Position>, ClientError> {
        self.0.get_position(symbol).await
    }
}
