use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{
    borrow::Borrow,
    fmt::{Display, Formatter},
};

/// New type representing a unique `String` identifier for a stream that has been subscribed to.
/// Used to associate received WebSocket payloads with the original subscription that was actioned
/// over the socket (spec C10, channel registry).
///
/// eg/ [`SubscriptionId`] of a Gate.io spot trade channel is "spot.trades" (ie/ the channel name).
/// eg/ [`SubscriptionId`] of a MEXC trade channel is "spot@public.deals.v3.api@{symbol}".
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub struct SubscriptionId(pub SmolStr);

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SubscriptionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SubscriptionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<S> From<S> for SubscriptionId
where
    S: Into<SmolStr>,
{
    fn from(input: S) -> Self {
        Self(input.into())
    }
}
