//! [`CompositeFacade`] (spec §4.9, component C11): binds one venue's REST `Client` to a
//! `BookTickerCache` fed by a background WS task, and is the single place a strategy's
//! business-level request is translated into a venue request.
//!
//! Lifecycle (spec §4.9):
//! 1. Construction ([`CompositeFacade::new`]) - inject the client, do no I/O.
//! 2. [`CompositeFacade::initialize`] - open the WS session and subscribe `OrderBooksL1` for the
//!    given symbols, populating the cache in the background.
//! 3. [`CompositeFacade::initialize_private`] (private mode) - create a listen key, open the
//!    authenticated WS channel and bind handlers that keep [`Self::account_mirror`] warm.
//! 4. [`CompositeFacade::close`] - abort the background tasks and release the listen key.

use super::{cache::BookTickerCache, mirror::AccountMirror, stream};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::warn;
use xt_arbitrage::venue::{FuturesVenueFacade, SpotVenueFacade};
use xt_execution::{
    client::{AccountClient, FuturesAccountClient, MarketDataClient},
    error::{ClientError, ConnectivityError, ExchangeError, ExchangeErrorKind},
    mexc::symbol::MexcSymbolMapper,
    order::{
        Order,
        id::OrderId,
        request::{OrderRequestCancel, OrderRequestOpen},
        state::{ActiveOrderState, OrderState},
    },
};
use xt_model::{BookTicker, Position, SymbolInfo, exchange::ExchangeId, symbol::Symbol};
use xt_stream::{
    exchange::mexc::private::{ListenKeyHandle, spawn_private_stream},
    subscription::account::{PrivateChannelKind, PrivateChannelRegistry, PrivateEvent},
};

/// A venue's REST client plus the live WS book-ticker cache the façade prefers over REST.
#[derive(Debug)]
pub struct CompositeFacade<Client> {
    client: Arc<Client>,
    cache: BookTickerCache,
    stream_task: Mutex<Option<JoinHandle<()>>>,
    account_mirror: AccountMirror,
    private: Mutex<Option<PrivateSession>>,
}

/// The listen key and background tasks backing a private-mode subscription; torn down together by
/// [`CompositeFacade::close`].
#[derive(Debug)]
struct PrivateSession {
    listen_key: ListenKeyHandle,
    stream_task: JoinHandle<()>,
    keep_alive_task: JoinHandle<()>,
}

impl<Client> CompositeFacade<Client> {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
            cache: BookTickerCache::new(),
            stream_task: Mutex::new(None),
            account_mirror: AccountMirror::new(),
            private: Mutex::new(None),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Order/balance/position state mirrored from the private WS channel (spec §4.9 item 2). Empty
    /// until [`Self::initialize_private`] has run and the venue actually supports a private
    /// channel.
    pub fn account_mirror(&self) -> &AccountMirror {
        &self.account_mirror
    }
}

impl<Client> CompositeFacade<Client>
where
    Client: MarketDataClient,
{
    /// Open the WS session and begin streaming `OrderBooksL1` for `symbols` into the cache.
    /// Replaces (aborting) any previously running stream task.
    pub async fn initialize(&self, symbols: Vec<Symbol>) -> Result<(), ClientError> {
        let handle = stream::spawn_book_ticker_stream(Client::EXCHANGE, symbols, self.cache.clone())
            .await
            .map_err(|error| {
                ClientError::Connectivity(ConnectivityError::Socket(error.to_string()))
            })?;

        if let Some(previous) = self.stream_task.lock().replace(handle) {
            previous.abort();
        }

        Ok(())
    }

    /// Abort the background WS task and, if private mode was initialised, its keep-alive and
    /// private-stream tasks. Idempotent.
    pub fn close(&self) {
        if let Some(handle) = self.stream_task.lock().take() {
            handle.abort();
        }

        if let Some(session) = self.private.lock().take() {
            session.stream_task.abort();
            session.keep_alive_task.abort();
        }
    }

    async fn fresh_book_ticker(&self, symbol: &Symbol) -> Result<BookTicker, ClientError> {
        if let Some(ticker) = self.cache.get_fresh(symbol, Utc::now()) {
            return Ok(ticker);
        }

        self.client
            .get_ticker(Some(symbol))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::Exchange(ExchangeError::new(
                    ExchangeErrorKind::InvalidSymbol,
                    format!("no ticker returned for {symbol}"),
                ))
            })
    }

    async fn symbol_info(&self, symbol: &Symbol) -> Result<SymbolInfo, ClientError> {
        self.client
            .get_symbols_info()
            .await?
            .into_iter()
            .find(|info| &info.symbol == symbol)
            .ok_or_else(|| {
                ClientError::Exchange(ExchangeError::new(
                    ExchangeErrorKind::InvalidSymbol,
                    format!("no symbol info for {symbol}"),
                ))
            })
    }
}

/// Keep-alive interval for a listen key: comfortably inside the venue-prescribed ~30 min window
/// (spec §4.8) so a refresh always lands before expiry under scheduling jitter.
const LISTEN_KEY_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(25 * 60);

fn spawn_keep_alive_task<Client>(client: Arc<Client>, listen_key: ListenKeyHandle) -> JoinHandle<()>
where
    Client: AccountClient + Send + Sync + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(LISTEN_KEY_KEEP_ALIVE_INTERVAL).await;

            let current = listen_key.get();
            if let Err(error) = client.keep_alive_listen_key(&current).await {
                warn!(?error, "listen key keep-alive failed, re-creating");
                match client.create_listen_key().await {
                    Ok(new_key) => listen_key.set(new_key),
                    Err(error) => warn!(?error, "failed to re-create listen key after keep-alive failure"),
                }
            }
        }
    })
}

impl<Client> CompositeFacade<Client>
where
    Client: AccountClient + Send + Sync + 'static,
{
    /// Create a listen key, open the private WS channel and bind handlers that keep
    /// [`Self::account_mirror`] warm (spec §4.9 item 2, §4.8). Replaces (tearing down) any
    /// previously running private session.
    ///
    /// Gate.io authenticates its private WS channel directly with its API key/secret rather than a
    /// listen key (spec §4.8): there, `create_listen_key` rejects with
    /// [`ExchangeErrorKind::NotSupported`] and this returns `Ok(())` without starting anything.
    pub async fn initialize_private(&self) -> Result<(), ClientError> {
        let listen_key = match self.client.create_listen_key().await {
            Ok(key) => key,
            Err(ClientError::Exchange(ExchangeError { kind: ExchangeErrorKind::NotSupported, .. })) => {
                return Ok(());
            }
            Err(error) => return Err(error),
        };
        let listen_key = ListenKeyHandle::new(listen_key);

        let mut registry = PrivateChannelRegistry::new();
        {
            let mirror = self.account_mirror.clone();
            registry.bind(PrivateChannelKind::Order, move |event| {
                if let PrivateEvent::Order(order) = event {
                    mirror.update_order(order.clone());
                }
            });
        }
        {
            let mirror = self.account_mirror.clone();
            registry.bind(PrivateChannelKind::AssetBalance, move |event| {
                if let PrivateEvent::AssetBalance(balance) = event {
                    mirror.update_balance(balance.clone());
                }
            });
        }
        {
            let mirror = self.account_mirror.clone();
            registry.bind(PrivateChannelKind::Position, move |event| {
                if let PrivateEvent::Position(position) = event {
                    mirror.update_position(position.clone());
                }
            });
        }

        let stream_task = spawn_private_stream(
            listen_key.clone(),
            Arc::new(MexcSymbolMapper),
            Arc::new(registry),
        );
        let keep_alive_task = spawn_keep_alive_task(self.client.clone(), listen_key.clone());

        if let Some(previous) = self.private.lock().replace(PrivateSession {
            listen_key,
            stream_task,
            keep_alive_task,
        }) {
            previous.stream_task.abort();
            previous.keep_alive_task.abort();
        }

        Ok(())
    }

    /// Delete the listen key over REST, then abort the private-mode tasks. Best-effort: the tasks
    /// are torn down even if the deletion call fails. [`Self::close`] (used from [`Drop`], which
    /// cannot await) only aborts the tasks - call this first for a graceful shutdown.
    pub async fn close_private(&self) {
        if let Some(session) = self.private.lock().take() {
            session.stream_task.abort();
            session.keep_alive_task.abort();

            if let Err(error) = self.client.delete_listen_key(&session.listen_key.get()).await {
                warn!(?error, "failed to delete listen key on close");
            }
        }
    }
}

impl<Client> Drop for CompositeFacade<Client> {
    fn drop(&mut self) {
        self.close();
    }
}

#[async_trait]
impl<Client> SpotVenueFacade for CompositeFacade<Client>
where
    Client: AccountClient,
{
    fn exchange(&self) -> ExchangeId {
        Client::EXCHANGE
    }

    async fn book_ticker(&self, symbol: &Symbol) -> Result<BookTicker, ClientError> {
        self.fresh_book_ticker(symbol).await
    }

    async fn symbol_info(&self, symbol: &Symbol) -> Result<SymbolInfo, ClientError> {
        CompositeFacade::symbol_info(self, symbol).await
    }

    async fn place_order(&self, request: OrderRequestOpen) -> Result<Order<ActiveOrderState>, ClientError> {
        self.client.place_order(request).await
    }

    async fn cancel_order(&self, request: OrderRequestCancel) -> Result<Order<OrderState>, ClientError> {
        self.client.cancel_order(request).await
    }

    async fn get_order(&self, symbol: &Symbol, order_id: &OrderId) -> Result<Order<OrderState>, ClientError> {
        self.client.get_order(symbol, order_id).await
    }
}

#[async_trait]
impl<Client> FuturesVenueFacade for CompositeFacade<Client>
where
    Client: FuturesAccountClient,
{
    fn exchange(&self) -> ExchangeId {
        Client::EXCHANGE
    }

    async fn book_ticker(&self, symbol: &Symbol) -> Result<BookTicker, ClientError> {
        self.fresh_book_ticker(symbol).await
    }

    async fn symbol_info(&self, symbol: &Symbol) -> Result<SymbolInfo, ClientError> {
        CompositeFacade::symbol_info(self, symbol).await
    }

    async fn place_order(&self, request: OrderRequestOpen) -> Result<Order<ActiveOrderState>, ClientError> {
        self.client.place_order(request).await
    }

    async fn cancel_order(&self, request: OrderRequestCancel) -> Result<Order<OrderState>, ClientError> {
        self.client.cancel_order(request).await
    }

    async fn get_order(&self, symbol: &Symbol, order_id: &OrderId) -> Result<Order<OrderState>, ClientError> {
        self.client.get_order(symbol, order_id).await
    }

    async fn get_position(&self, symbol: &Symbol) -> Result<Option<Position>, ClientError> {
        self.client.get_position(symbol).await
    }
}
