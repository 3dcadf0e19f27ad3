use xt_core::subscription::SubscriptionId;
use xt_model::{Side, exchange::ExchangeId};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    Identifier,
    error::DataError,
    event::{MarketEvent, MarketIter},
    subscription::trade::PublicTrade,
};

/// Envelope MEXC wraps every public WebSocket push under: a `c` (channel, echoing the
/// subscribed topic including symbol), optional `s` (symbol) and `t` (exchange timestamp,
/// milliseconds), with channel-specific data nested in `d`.
///
/// eg/ `{"c":"spot@public.deals.v3.api@BTCUSDT","d":{"deals":[...]},"s":"BTCUSDT","t":1609459200000}`
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct MexcPushData {
    #[serde(rename = "c")]
    pub channel: String,
    #[serde(rename = "s", default)]
    pub symbol: Option<String>,
    #[serde(rename = "t", default)]
    pub timestamp_ms: Option<i64>,
    #[serde(rename = "d")]
    pub data: serde_json::Value,
}

/// Single deal reported by MEXC's `spot@public.deals.v3.api` channel.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct MexcDeal {
    #[serde(rename = "p")]
    pub price: String,
    #[serde(rename = "v")]
    pub quantity: String,
    /// `1` = buy, `2` = sell.
    #[serde(rename = "S")]
    pub trade_type: i32,
    #[serde(rename = "t")]
    pub time: i64,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct MexcDealsData {
    pub deals: Vec<MexcDeal>,
}

impl Identifier<Option<SubscriptionId>> for MexcPushData {
    fn id(&self) -> Option<SubscriptionId> {
        // `channel` echoes the full subscribed topic, eg/
        // "spot@public.deals.v3.api@BTCUSDT". `SubscriptionId`s are stored as
        // "{base_channel}|{symbol}" (see ExchangeSub::id), so split off the trailing symbol.
        let (base_channel, symbol) = self.channel.rsplit_once('@')?;
        let symbol = self.symbol.as_deref().unwrap_or(symbol);
        Some(SubscriptionId::from(format!("{base_channel}|{symbol}")))
    }
}

fn ms_epoch_to_datetime_utc(ms: i64) -> Result<DateTime<Utc>, DataError> {
    if ms < 0 {
        return Err(DataError::Socket(format!(
            "Unsupported MexcTrade::Timestamp: invalid unix_epoch_ms (negative): {}",
            ms
        )));
    }
    DateTime::from_timestamp_millis(ms).ok_or_else(|| {
        DataError::Socket(format!(
            "Unsupported MexcTrade::Timestamp: invalid unix_epoch_ms: {}",
            ms
        ))
    })
}

impl<InstrumentKey> From<(ExchangeId, InstrumentKey, MexcPushData)>
    for MarketIter<InstrumentKey, PublicTrade>
where
    InstrumentKey: Clone,
{
    fn from(
        (exchange_id, instrument, push): (ExchangeId, InstrumentKey, MexcPushData),
    ) -> Self {
        if !push.channel.contains("deals") {
            return Self(vec![]);
        }

        let deals = match serde_json::from_value::<MexcDealsData>(push.data) {
            Ok(deals) => deals,
            Err(error) => {
                return Self(vec![Err(DataError::Socket(format!(
                    "failed to deserialise MEXC public deals payload: {error}"
                )))]);
            }
        };

        Self(map_deals_to_market_events(exchange_id, instrument, &deals))
    }
}

fn map_deals_to_market_events<InstrumentKey: Clone>(
    exchange_id: ExchangeId,
    instrument: InstrumentKey,
    deals: &MexcDealsData,
) -> Vec<Result<MarketEvent<InstrumentKey, PublicTrade>, DataError>> {
    deals
        .deals
        .iter()
        .map(|deal| {
            let price = deal.price.parse::<f64>().map_err(|e| {
                DataError::Socket(format!(
                    "Failed to parse price from MEXC deal: '{}', error: {}",
                    deal.price, e
                ))
            })?;
            let amount = deal.quantity.parse::<f64>().map_err(|e| {
                DataError::Socket(format!(
                    "Failed to parse quantity from MEXC deal: '{}', error: {}",
                    deal.quantity, e
                ))
            })?;
            let side = match deal.trade_type {
                1 => Side::Buy,
                2 => Side::Sell,
                other => {
                    return Err(DataError::Socket(format!(
                        "Unsupported trade_type for MEXC deal: {other}"
                    )));
                }
            };
            let exchange_time = ms_epoch_to_datetime_utc(deal.time)?;

            Ok(MarketEvent {
                time_exchange: exchange_time,
                time_received: Utc::now(),
                exchange: exchange_id,
                instrument: instrument.clone(),
                kind: PublicTrade {
                    id: exchange_time.timestamp_millis().to_string(),
                    price,
                    amount,
                    side,
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use xt_core::de::datetime_utc_from_epoch_duration;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    struct TestInstrument {
        base: String,
        quote: String,
    }

    fn deals_push(channel: &str, symbol: &str, deals_json: serde_json::Value) -> MexcPushData {
        MexcPushData {
            channel: channel.to_string(),
            symbol: Some(symbol.to_string()),
            timestamp_ms: Some(1609459200000),
            data: deals_json,
        }
    }

    #[test]
    fn test_ms_epoch_to_datetime_utc_conversion() {
        let timestamp_ms_valid = 1609459200000i64;
        let expected_datetime =
            datetime_utc_from_epoch_duration(Duration::from_millis(timestamp_ms_valid as u64));
        assert_eq!(
            ms_epoch_to_datetime_utc(timestamp_ms_valid),
            Ok(expected_datetime)
        );

        match ms_epoch_to_datetime_utc(-1) {
            Err(DataError::Socket(s)) => {
                assert!(s.contains("Unsupported MexcTrade::Timestamp"));
                assert!(s.contains("invalid unix_epoch_ms (negative): -1"));
            }
            other => panic!(
                "Expected DataError::Socket(String) for negative timestamp, got {:?}",
                other
            ),
        }
    }

    #[test]
    fn test_push_data_id_splits_channel_and_symbol() {
        let push = deals_push(
            "spot@public.deals.v3.api@BTCUSDT",
            "BTCUSDT",
            serde_json::json!({ "deals": [] }),
        );

        assert_eq!(
            push.id(),
            Some(SubscriptionId::from("spot@public.deals.v3.api|BTCUSDT"))
        );
    }

    #[test]
    fn test_transform_deals_push_to_public_trades() {
        let push = deals_push(
            "spot@public.deals.v3.api@BTCUSDT",
            "BTCUSDT",
            serde_json::json!({
                "deals": [
                    { "p": "50000.5", "v": "0.01", "S": 1, "t": 1609459200100i64 },
                    { "p": "50001.0", "v": "0.02", "S": 2, "t": 1609459200200i64 },
                ]
            }),
        );

        let instrument = TestInstrument {
            base: "BTC".into(),
            quote: "USDT".into(),
        };

        let market_iter =
            MarketIter::<TestInstrument, PublicTrade>::from((ExchangeId::Mexc, instrument, push));

        let events: Vec<_> = market_iter
            .0
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind.side, Side::Buy);
        assert_eq!(events[0].kind.price, 50000.5);
        assert_eq!(events[1].kind.side, Side::Sell);
    }

    #[test]
    fn test_transform_non_deals_push_yields_no_events() {
        let push = MexcPushData {
            channel: "spot@public.bookTicker.v3.api@BTCUSDT".to_string(),
            symbol: Some("BTCUSDT".to_string()),
            timestamp_ms: Some(1609459200000),
            data: serde_json::json!({
                "b": "50000.5", "B": "0.1", "a": "50001.0", "A": "0.2"
            }),
        };

        let instrument = TestInstrument {
            base: "BTC".into(),
            quote: "USDT".into(),
        };

        let events = MarketIter::<TestInstrument, PublicTrade>::from((
            ExchangeId::Mexc,
            instrument,
            push,
        ))
        .0;

        assert!(events.is_empty());
    }

    #[test]
    fn test_transform_deal_with_invalid_price() {
        let push = deals_push(
            "spot@public.deals.v3.api@BTCUSDT",
            "BTCUSDT",
            serde_json::json!({
                "deals": [{ "p": "not_a_float", "v": "0.01", "S": 1, "t": 1609459200100i64 }]
            }),
        );

        let instrument = TestInstrument {
            base: "BTC".into(),
            quote: "USDT".into(),
        };

        let events = MarketIter::<TestInstrument, PublicTrade>::from((
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
}
