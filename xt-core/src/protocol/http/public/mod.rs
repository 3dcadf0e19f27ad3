use super::BuildStrategy;
use crate::error::SocketError;

/// [`RestRequest`](super::RestRequest) [`BuildStrategy`] that builds a non-authenticated Http
/// request with no headers. Used for every public-market-data endpoint (ping, depth, trades,
/// klines, ...).
#[derive(Debug, Copy, Clone, Default)]
pub struct PublicNoHeaders;

impl BuildStrategy for PublicNoHeaders {
    fn build<Request>(
        &self,
        _: Request,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Request, SocketError> {
        builder.build().map_err(SocketError::from)
    }
}
