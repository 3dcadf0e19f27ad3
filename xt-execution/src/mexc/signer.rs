use std::sync::atomic::{AtomicI64, Ordering};
use xt_core::{
    error::SocketError,
    protocol::http::{
        private::{RequestSigner, Signer, encoder::HexEncoder},
        rest::RestRequest,
    },
};

pub type MexcRequestSigner = RequestSigner<MexcSigner, hmac::Hmac<sha2::Sha256>, HexEncoder>;

const RECV_WINDOW_MS: i64 = 5_000;

/// Baseline clock-skew compensation applied to every request timestamp (spec §4.4: "offset by
/// +500 ms to compensate for local clock skew").
const BASE_TIMESTAMP_OFFSET_MS: i64 = 500;

/// Amount [`MexcSigner::refresh_timestamp`] nudges the offset by on a `requestExpired`
/// classification (spec §4.4 `refreshTimestamp` hook, §4.2 `requestExpired` retryability).
const TIMESTAMP_NUDGE_MS: i64 = 250;
const MAX_TIMESTAMP_OFFSET_MS: i64 = 5_000;

/// MEXC spot authenticator (spec C4): HMAC-SHA256 over the URL-encoded query string plus
/// `timestamp`/`recvWindow`, with `X-MEXC-APIKEY` as a header and the signature appended as a
/// query parameter.
#[derive(Debug)]
pub struct MexcSigner {
    api_key: String,
    offset_ms: AtomicI64,
}

impl MexcSigner {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            offset_ms: AtomicI64::new(BASE_TIMESTAMP_OFFSET_MS),
        }
    }
}

#[derive(Debug)]
pub struct MexcSignConfig<'a> {
    api_key: &'a str,
    timestamp: i64,
    params_to_sign: String,
}

impl Signer for MexcSigner {
    type Config<'a>
        = MexcSignConfig<'a>
    where
        Self: 'a;

    fn config<'a, Request>(
        &'a self,
        request: Request,
        _builder: &reqwest::RequestBuilder,
    ) -> Result<Self::Config<'a>, SocketError>
    where
        Request: RestRequest,
    {
        // Fresh timestamp generated immediately before signing, never reused across retries
        // (spec §4.4 freshness contract).
        let timestamp = chrono::Utc::now().timestamp_millis() + self.offset_ms.load(Ordering::Relaxed);

        let params_to_sign = match request.query_params() {
            Some(params) => serde_urlencoded::to_string(params)?,
            None => String::new(),
        };

        Ok(Self::Config {
            api_key: self.api_key.as_str(),
            timestamp,
            params_to_sign,
        })
    }

    fn add_bytes_to_sign<M>(mac: &mut M, config: &Self::Config<'_>)
    where
        M: hmac::Mac,
    {
        if !config.params_to_sign.is_empty() {
            mac.update(config.params_to_sign.as_bytes());
            mac.update(b"&");
        }
        mac.update(format!("timestamp={}&recvWindow={RECV_WINDOW_MS}", config.timestamp).as_bytes());
    }

    fn build_signed_request(
        config: Self::Config<'_>,
        builder: reqwest::RequestBuilder,
        signature: String,
    ) -> Result<reqwest::Request, SocketError> {
        builder
            .header("X-MEXC-APIKEY", config.api_key)
            .query(&[
                ("timestamp", config.timestamp.to_string()),
                ("recvWindow", RECV_WINDOW_MS.to_string()),
                ("signature", signature),
            ])
            .build()
            .map_err(SocketError::from)
    }

    fn refresh_timestamp(&self) {
        let nudged = (self.offset_ms.load(Ordering::Relaxed) + TIMESTAMP_NUDGE_MS)
            .min(MAX_TIMESTAMP_OFFSET_MS);
        self.offset_ms.store(nudged, Ordering::Relaxed);
    }
}
