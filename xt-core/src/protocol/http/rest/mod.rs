use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Configurable [`client::RestClient`] capable of executing signed [`RestRequest`]s and parsing
/// responses.
pub mod client;

/// Default Http [`reqwest::Request`] connect+read timeout (spec §5: defaults 2s connect / 5s
/// read; a single request-level timeout of 5s is used here as `reqwest` does not separate the
/// two phases).
const DEFAULT_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Http REST request that can be executed by a [`RestClient`](self::client::RestClient).
pub trait RestRequest {
    /// Expected response type if this request was successful.
    type Response: DeserializeOwned;

    /// Serialisable query parameters type - use unit struct `()` if not required.
    type QueryParams: Serialize;

    /// Serialisable body type - use unit struct `()` if not required.
    type Body: Serialize;

    /// Additional Url path to the resource (spec §6 literal venue paths).
    fn path(&self) -> std::borrow::Cow<'static, str>;

    /// Http [`reqwest::Method`] of this request.
    fn method() -> reqwest::Method;

    /// Optional query parameters for this request.
    fn query_params(&self) -> Option<&Self::QueryParams> {
        None
    }

    /// Optional body for this request.
    fn body(&self) -> Option<&Self::Body> {
        None
    }

    /// Http request timeout.
    fn timeout() -> Duration {
        DEFAULT_HTTP_REQUEST_TIMEOUT
    }

    /// Logical endpoint class used to key the [`crate::ratelimit::RateLimiter`] bucket for this
    /// request (spec §4.3). Defaults to the request's path.
    fn rate_limit_key(&self) -> std::borrow::Cow<'static, str> {
        self.path()
    }
}
