use chrono::Utc;
use sha2::{Digest, Sha512};
use xt_core::{
    error::SocketError,
    protocol::http::{
        private::{RequestSigner, Signer, encoder::HexEncoder},
        rest::RestRequest,
    },
};

/// Shared Gate.io spot/futures authenticator type: HMAC-SHA512, hex-encoded.
pub type GateioRequestSigner = RequestSigner<GateioSigner, hmac::Hmac<sha2::Sha512>, HexEncoder>;

/// Gate.io authenticator (spec C4, §4.4): signs
/// `METHOD\nURL_PATH\nQUERY_STRING\nSHA512HEX(BODY)\nTIMESTAMP` and sends the signature via the
/// `SIGN` header alongside `KEY` and `Timestamp` (spec §6 E2E-3 test vector).
#[derive(Debug)]
pub struct GateioSigner {
    api_key: String,
}

impl GateioSigner {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug)]
pub struct GateioSignConfig<'a> {
    api_key: &'a str,
    /// Decimal-seconds timestamp with a trimmed millisecond fraction (eg/ `"1700000000.5"`, not
    /// `"1700000000.500"`), used verbatim in both the signature string and the `Timestamp`
    /// header - spec §8 E2E-3 signs over the literal trimmed string.
    timestamp: String,
    method: String,
    url_path: String,
    query_string: String,
    hashed_payload: String,
}

impl Signer for GateioSigner {
    type Config<'a>
        = GateioSignConfig<'a>
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
        let now = Utc::now();
        let timestamp = format_decimal_seconds(now.timestamp(), now.timestamp_subsec_millis());

        let query_string = match request.query_params() {
            Some(params) => serde_urlencoded::to_string(params)?,
            None => String::new(),
        };

        let body_bytes = match request.body() {
            Some(body) => serde_json::to_vec(body).map_err(SocketError::Serialise)?,
            None => Vec::new(),
        };
        let hashed_payload = hex::encode(Sha512::digest(&body_bytes));

        Ok(Self::Config {
            api_key: self.api_key.as_str(),
            timestamp,
            method: Request::method().as_str().to_string(),
            url_path: request.path().into_owned(),
            query_string,
            hashed_payload,
        })
    }

    fn add_bytes_to_sign<M>(mac: &mut M, config: &Self::Config<'_>)
    where
        M: hmac::Mac,
    {
        mac.update(config.method.as_bytes());
        mac.update(b"\n");
        mac.update(config.url_path.as_bytes());
        mac.update(b"\n");
        mac.update(config.query_string.as_bytes());
        mac.update(b"\n");
        mac.update(config.hashed_payload.as_bytes());
        mac.update(b"\n");
        mac.update(config.timestamp.as_bytes());
    }

    fn build_signed_request(
        config: Self::Config<'_>,
        builder: reqwest::RequestBuilder,
        signature: String,
    ) -> Result<reqwest::Request, SocketError> {
        builder
            .header("KEY", config.api_key)
            .header("SIGN", signature)
            .header("Timestamp", config.timestamp)
            .header("Content-Type", "application/json")
            .build()
            .map_err(SocketError::from)
    }

    // Gate.io carries no adjustable clock-skew offset; `requestExpired` is retried unchanged
    // with a freshly generated timestamp on the next attempt (spec §4.4).
}

/// Renders `secs.millis` as Gate.io expects: the millisecond fraction right-trimmed of trailing
/// zeros (`500` -> `"5"`, `50` -> `"05"`, `0` -> no fraction at all), matching the decimal-seconds
/// timestamps Gate.io's own clients emit rather than a fixed-width `%.3f`.
fn format_decimal_seconds(secs: i64, millis: u32) -> String {
    let millis = format!("{millis:03}");
    let trimmed = millis.trim_end_matches('0');
    if trimmed.is_empty() {
        secs.to_string()
    } else {
        format!("{secs}.{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_of_empty_body_matches_known_digest() {
        let digest = hex::encode(Sha512::digest(b""));
        assert_eq!(
            digest,
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9c\
             e47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3"
        );
    }

    #[test]
    fn decimal_seconds_timestamp_is_trimmed_not_zero_padded() {
        assert_eq!(format_decimal_seconds(1_700_000_000, 500), "1700000000.5");
        assert_eq!(format_decimal_seconds(1_700_000_000, 50), "1700000000.05");
        assert_eq!(format_decimal_seconds(1_700_000_000, 5), "1700000000.005");
        assert_eq!(format_decimal_seconds(1_700_000_000, 0), "1700000000");
    }

    /// Spec §8 E2E-3: for `POST /api/v4/spot/orders` with the given body at instant
    /// `1700000000.5`, `SIGN` must equal `HMAC_SHA512(secret, "POST\n/api/v4/spot/orders\n\n" +
    /// SHA512HEX(body) + "\n1700000000.5")`. This reproduces that vector independently of
    /// [`GateioSigner::config`] (which draws its timestamp from `Utc::now`) by constructing the
    /// `Config` by hand with the vector's literal timestamp, guarding against the
    /// `"1700000000.500"` zero-padding regression which would sign a different byte string
    /// entirely.
    #[test]
    fn e2e3_gateio_order_signature_matches_spec_vector() {
        use hmac::Mac;

        let secret = b"e2e3_test_secret";
        let body = br#"{"currency_pair":"BTC_USDT","side":"buy","type":"limit","amount":"0.001","price":"10000","time_in_force":"gtc"}"#;
        let hashed_payload = hex::encode(Sha512::digest(body));
        let timestamp = "1700000000.5";

        let expected_message =
            format!("POST\n/api/v4/spot/orders\n\n{hashed_payload}\n{timestamp}");
        let mut expected_mac = hmac::Hmac::<Sha512>::new_from_slice(secret).unwrap();
        expected_mac.update(expected_message.as_bytes());
        let expected_signature = hex::encode(expected_mac.finalize().into_bytes());

        let config = GateioSignConfig {
            api_key: "KEY",
            timestamp: timestamp.to_string(),
            method: "POST".to_string(),
            url_path: "/api/v4/spot/orders".to_string(),
            query_string: String::new(),
            hashed_payload,
        };

        let mut mac = hmac::Hmac::<Sha512>::new_from_slice(secret).unwrap();
        GateioSigner::add_bytes_to_sign(&mut mac, &config);
        let actual_signature = hex::encode(mac.finalize().into_bytes());

        assert_eq!(actual_signature, expected_signature);
    }
}
