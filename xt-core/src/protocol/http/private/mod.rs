use self::encoder::Encoder;
use crate::{error::SocketError, protocol::http::BuildStrategy, protocol::http::rest::RestRequest};
use hmac::Mac;

/// Encodes the raw HMAC digest bytes into the final signature `String` representation (hex for
/// MEXC & Gate.io, per spec §4.4/§6).
pub mod encoder;

/// Per-venue authentication logic (spec C4). A [`Signer`] is configuration-free business logic:
/// it is combined with a keyed [`Mac`] and an [`Encoder`] by [`RequestSigner`] to produce the
/// final signed [`reqwest::Request`].
///
/// Each venue's variant lives in `xt-execution`: [`crate::protocol::http::private::Signer`] is
/// implemented once per venue (MEXC, Gate.io spot, Gate.io futures) capturing that venue's exact
/// signature-string assembly and header/query placement.
pub trait Signer {
    /// Venue-specific data required to assemble the bytes-to-sign and the final signed request.
    /// Carries a freshly generated timestamp - spec §4.4 requires a new timestamp immediately
    /// before every signature, never reused across retries.
    type Config<'a>
    where
        Self: 'a;

    /// Generate the [`Self::Config`] for this outbound `request`, including a fresh timestamp.
    fn config<'a, Request>(
        &'a self,
        request: Request,
        builder: &reqwest::RequestBuilder,
    ) -> Result<Self::Config<'a>, SocketError>
    where
        Request: RestRequest;

    /// Append the venue-specific bytes-to-sign to the provided [`Mac`].
    fn add_bytes_to_sign<M>(mac: &mut M, config: &Self::Config<'_>)
    where
        M: Mac;

    /// Consume the [`Self::Config`], the in-progress [`reqwest::RequestBuilder`] and the computed
    /// `signature` to build the final signed [`reqwest::Request`] (adds venue-specific headers /
    /// query parameters - eg/ `X-MEXC-APIKEY`, or `KEY`/`SIGN`/`Timestamp` for Gate.io).
    fn build_signed_request(
        config: Self::Config<'_>,
        builder: reqwest::RequestBuilder,
        signature: String,
    ) -> Result<reqwest::Request, SocketError>;

    /// Invoked when the transport observes a `requestExpired` classification. Default
    /// implementation is a no-op; venues with adjustable clock-skew offsets (MEXC) override this
    /// to nudge their offset before the retrier's single forced retry (spec §4.4, §4.2).
    fn refresh_timestamp(&self) {}
}

/// Generic [`BuildStrategy`] that signs a [`RestRequest`] using a venue-specific [`Signer`], a
/// keyed [`Mac`] (HMAC-SHA256 for MEXC, HMAC-SHA512 for Gate.io) and an [`Encoder`] (hex for
/// both).
#[derive(Debug, Clone)]
pub struct RequestSigner<SignerImpl, HmacMac, EncoderImpl> {
    signer: SignerImpl,
    mac: HmacMac,
    encoder: EncoderImpl,
}

impl<SignerImpl, HmacMac, EncoderImpl> RequestSigner<SignerImpl, HmacMac, EncoderImpl> {
    pub fn new(signer: SignerImpl, mac: HmacMac, encoder: EncoderImpl) -> Self {
        Self {
            signer,
            mac,
            encoder,
        }
    }

    pub fn signer(&self) -> &SignerImpl {
        &self.signer
    }
}

impl<SignerImpl, HmacMac, EncoderImpl> BuildStrategy
    for RequestSigner<SignerImpl, HmacMac, EncoderImpl>
where
    SignerImpl: Signer,
    HmacMac: Mac + Clone,
    EncoderImpl: Encoder,
{
    fn build<Request>(
        &self,
        request: Request,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Request, SocketError>
    where
        Request: RestRequest,
    {
        // Generate a fresh Signer::Config (fresh timestamp) for this exact attempt - never
        // reused across retries (spec §4.4 freshness contract).
        let config = self.signer.config(request, &builder)?;

        let mut mac = self.mac.clone();
        SignerImpl::add_bytes_to_sign(&mut mac, &config);
        let signature = self.encoder.encode(mac.finalize().into_bytes());

        SignerImpl::build_signed_request(config, builder, signature)
    }
}
