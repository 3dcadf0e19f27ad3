//! Background tasks that drain `OrderBooksL1` WebSocket pushes (spec C9/C10) into a
//! [`BookTickerCache`], one task per venue connector. Mirrors the canonical multi-venue streaming
//! pattern `xt-stream` documents (`Streams::<Kind>::builder().subscribe(...).init()`), just with
//! `OrderBooksL1` in place of public trades and a cache insert in place of `println!`.

use super::cache::BookTickerCache;
use chrono::Utc;
use futures::StreamExt;
use std::fmt::Debug;
use tokio::task::JoinHandle;
use xt_model::{
    BookTicker,
    exchange::ExchangeId,
    instrument::{MarketDataInstrument, MarketDataInstrumentKind},
    symbol::Symbol,
};
use xt_stream::{
    error::DataError,
    exchange::{Connector, StreamSelector, gateio::Gateio, mexc::Mexc},
    streams::{Streams, reconnect::stream::ReconnectingStream},
    subscription::book::{OrderBookL1, OrderBooksL1},
};

fn book_ticker_from_l1(symbol: &Symbol, book: &OrderBookL1) -> Option<BookTicker> {
    let best_bid = book.best_bid?;
    let best_ask = book.best_ask?;

    Some(BookTicker {
        symbol: symbol.clone(),
        bid_price: best_bid.price,
        bid_qty: best_bid.amount,
        ask_price: best_ask.price,
        ask_qty: best_ask.amount,
        timestamp: Utc::now(),
    })
}

/// Spawn a background task subscribing to `OrderBooksL1` for every `symbol` on `Exchange`,
/// draining pushes into `cache` until the task is aborted or the connection permanently fails.
async fn spawn_l1_cache_task<Exchange>(
    exchange: Exchange,
    symbols: Vec<Symbol>,
    instrument_kind: MarketDataInstrumentKind,
    cache: BookTickerCache,
) -> Result<JoinHandle<()>, DataError>
where
    Exchange: StreamSelector<MarketDataInstrument, OrderBooksL1>
        + Connector
        + Ord
        + Clone
        + Debug
        + Send
        + Sync
        + 'static,
{
    let subscriptions = symbols
        .iter()
        .map(|symbol| {
            (
                exchange.clone(),
                symbol.base.clone(),
                symbol.quote.clone(),
                instrument_kind,
                OrderBooksL1,
            )
        })
        .collect::<Vec<_>>();

    let streams = Streams::<OrderBooksL1>::builder()
        .subscribe(subscriptions)
        .init()
        .await?;

    let mut joined = streams
        .select_all()
        .with_error_handler(|error| tracing::warn!(?error, "book ticker MarketStream error"));

    Ok(tokio::spawn(async move {
        while let Some(event) = joined.next().await {
            if let xt_stream::streams::reconnect::Event::Item(market_event) = event {
                let symbol = Symbol::new(
                    market_event.instrument.base.clone(),
                    market_event.instrument.quote.clone(),
                );
                if let Some(ticker) = book_ticker_from_l1(&symbol, &market_event.kind) {
                    cache.insert(symbol, ticker);
                }
            }
        }
    }))
}

pub async fn spawn_mexc_book_ticker_stream(
    symbols: Vec<Symbol>,
    cache: BookTickerCache,
) -> Result<JoinHandle<()>, DataError> {
    spawn_l1_cache_task(Mexc::default(), symbols, MarketDataInstrumentKind::Spot, cache).await
}

pub async fn spawn_gateio_spot_book_ticker_stream(
    symbols: Vec<Symbol>,
    cache: BookTickerCache,
) -> Result<JoinHandle<()>, DataError> {
    spawn_l1_cache_task(
        Gateio::<xt_stream::exchange::gateio::spot::GateioServerSpot>::default(),
        symbols,
        MarketDataInstrumentKind::Spot,
        cache,
    )
    .await
}

pub async fn spawn_gateio_perpetuals_usd_book_ticker_stream(
    symbols: Vec<Symbol>,
    cache: BookTickerCache,
) -> Result<JoinHandle<()>, DataError> {
    spawn_l1_cache_task(
        Gateio::<xt_stream::exchange::gateio::perpetual::GateioServerPerpetualsUsd>::default(),
        symbols,
        MarketDataInstrumentKind::Perpetual,
        cache,
    )
    .await
}

/// Symmetrical with the USDT family; kept even though [`xt_execution::gateio::futures`] has no
/// concrete BTC-settled REST client yet (spec §9, recorded in `DESIGN.md`) - the WS side already
/// supports it and a composite façade for it is only a client type away.
pub async fn spawn_gateio_perpetuals_btc_book_ticker_stream(
    symbols: Vec<Symbol>,
    cache: BookTickerCache,
) -> Result<JoinHandle<()>, DataError> {
    spawn_l1_cache_task(
        Gateio::<xt_stream::exchange::gateio::perpetual::GateioServerPerpetualsBtc>::default(),
        symbols,
        MarketDataInstrumentKind::Perpetual,
        cache,
    )
    .await
}

/// Dispatch to the right venue's spawn function by [`ExchangeId`].
pub async fn spawn_book_ticker_stream(
    exchange: ExchangeId,
    symbols: Vec<Symbol>,
    cache: BookTickerCache,
) -> Result<JoinHandle<()>, DataError> {
    match exchange {
        ExchangeId::MexcSpot => spawn_mexc_book_ticker_stream(symbols, cache).await,
        ExchangeId::GateioSpot => spawn_gateio_spot_book_ticker_stream(symbols, cache).await,
        ExchangeId::GateioPerpetualsUsd => {
            spawn_gateio_perpetuals_usd_book_ticker_stream(symbols, cache).await
        }
        ExchangeId::GateioPerpetualsBtc => {
            spawn_gateio_perpetuals_btc_book_ticker_stream(symbols, cache).await
        }
    }
}
