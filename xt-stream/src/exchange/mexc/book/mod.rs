use crate::{
    books::Level,
    error::DataError,
    event::{MarketEvent, MarketIter},
    subscription::book::OrderBookL1,
};
use xt_model::exchange::ExchangeId;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::trade::MexcPushData;

/// Best bid/ask payload reported by MEXC's `spot@public.bookTicker.v3.api` channel.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct MexcBookTickerData {
    #[serde(rename = "b")]
    pub bid_price: String,
    #[serde(rename = "B")]
    pub bid_quantity: String,
    #[serde(rename = "a")]
    pub ask_price: String,
    #[serde(rename = "A")]
    pub ask_quantity: String,
}

fn parse_level(price: &str, qty: &str) -> Result<Level, DataError> {
    let price = price.parse::<Decimal>().map_err(|e| {
        DataError::Socket(format!(
            "Failed to parse price from MEXC book ticker: '{}', error: {}",
            price, e
        ))
    })?;
    let amount = qty.parse::<Decimal>().map_err(|e| {
        DataError::Socket(format!(
            "Failed to parse quantity from MEXC book ticker: '{}', error: {}",
            qty, e
        ))
    })?;
    Ok(Level::new(price, amount))
}

impl<InstrumentKey> From<(ExchangeId, InstrumentKey, MexcPushData)>
    for MarketIter<InstrumentKey, OrderBookL1>
where
    InstrumentKey: Clone,
{
    fn from(
        (exchange_id, instrument, push): (ExchangeId, InstrumentKey, MexcPushData),
    ) -> Self {
        if !push.channel.contains("bookTicker") {
            return Self(vec![]);
        }

        let time_received = Utc::now();
        let exchange_time = push
            .timestamp_ms
            .and_then(|ms| chrono::DateTime::from_timestamp_millis(ms))
            .unwrap_or(time_received);

        let ticker = match serde_json::from_value::<MexcBookTickerData>(push.data) {
            Ok(ticker) => ticker,
            Err(error) => {
                return Self(vec![Err(DataError::Socket(format!(
                    "failed to deserialise MEXC book ticker payload: {error}"
                )))]);
            }
        };

        let best_bid = match parse_level(&ticker.bid_price, &ticker.bid_quantity) {
            Ok(level) => Some(level),
            Err(error) => return Self(vec![Err(error)]),
        };
        let best_ask = match parse_level(&ticker.ask_price, &ticker.ask_quantity) {
            Ok(level) => Some(level),
            Err(error) => return Self(vec![Err(error)]),
        };

        Self(vec![Ok(MarketEvent {
            time_exchange: exchange_time,
            time_received,
            exchange: exchange_id,
            instrument,
            kind: OrderBookL1 {
                last_update_time: exchange_time,
                best_bid,
                best_ask,
            },
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xt_core::de::datetime_utc_from_epoch_duration;
    use rust_decimal_macros::dec;
    use serde::Serialize;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct TestInstrument {
        base: String,
        quote: String,
    }

    fn book_ticker_push(symbol: &str, ticker: serde_json::Value) -> MexcPushData {
        MexcPushData {
            channel: format!("spot@public.bookTicker.v3.api@{symbol}"),
            symbol: Some(symbol.to_string()),
            timestamp_ms: Some(1609459200500),
            data: ticker,
        }
    }

    #[test]
    fn test_book_ticker_into_order_book_l1() {
        let instrument = TestInstrument {
            base: "BTC".into(),
            quote: "USDT".into(),
        };

        let push = book_ticker_push(
            "BTCUSDT",
            serde_json::json!({
                "b": "50000.5", "B": "0.1", "a": "50001", "A": "0.2"
            }),
        );

        let market_iter =
            MarketIter::<TestInstrument, OrderBookL1>::from((ExchangeId::Mexc, instrument.clone(), push));

        let events: Vec<_> = market_iter
            .0
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.exchange, ExchangeId::Mexc);
        assert_eq!(event.instrument, instrument);

        let expected_time = datetime_utc_from_epoch_duration(Duration::from_millis(1609459200500));
        assert_eq!(event.time_exchange, expected_time);
        assert_eq!(event.kind.last_update_time, expected_time);
        assert_eq!(
            event.kind.best_bid,
            Some(Level::new(dec!(50000.5), dec!(0.1)))
        );
        assert_eq!(
            event.kind.best_ask,
            Some(Level::new(dec!(50001), dec!(0.2)))
        );
    }

    #[test]
    fn test_book_ticker_invalid_price() {
        let instrument = TestInstrument {
            base: "BTC".into(),
            quote: "USDT".into(),
        };

        let push = book_ticker_push(
            "BTCUSDT",
            serde_json::json!({
                "b": "not_a_decimal", "B": "0.1", "a": "50001", "A": "0.2"
            }),
        );

        let events = MarketIter::<TestInstrument, OrderBookL1>::from((
            ExchangeId::Mexc,
            instrument,
            push,
        ))
        .0;

        assert_eq!(events.len(), 1);
        match &events[0] {
            Err(DataError::Socket(s)) => assert!(s.contains("Failed to parse price")),
            other => panic!("Unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_non_book_ticker_push_yields_no_events() {
        let instrument = TestInstrument {
            base: "BTC".into(),
            quote: "USDT".into(),
        };

        let push = MexcPushData {
            channel: "spot@public.deals.v3.api@BTCUSDT".to_string(),
            symbol: Some("BTCUSDT".to_string()),
            timestamp_ms: Some(1609459200000),
            data: serde_json::json!({ "deals": [] }),
        };

        let events =
            MarketIter::<TestInstrument, OrderBookL1>::from((ExchangeId::Mexc, instrument, push)).0;

        assert!(events.is_empty());
    }
}
