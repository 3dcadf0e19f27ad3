//! Gate.io spot and futures (USDT-settled) adapters (spec §4.4/§4.6/§6). Both venues share one
//! host, one HMAC-SHA512 authenticator and one `label`/`message` error classifier; only the
//! literal endpoint paths, symbol/contract format and response shapes differ, so [`signer`],
//! [`parser`] and [`symbol`] are written once and reused by both [`spot`] and [`futures`].

/// Shared HMAC-SHA512 authenticator: `METHOD\nURL_PATH\nQUERY_STRING\nSHA512(BODY)\nTIMESTAMP`
/// (spec §4.4, §6).
pub mod signer;

/// Shared `label`/`message` error envelope classifier (spec C5).
pub mod parser;

/// Shared `BASE_QUOTE` symbol/contract mapper (eg/ `"BTC_USDT"`).
pub mod symbol;

/// Gate.io spot adapter.
pub mod spot;

/// Gate.io USDT-settled perpetual futures adapter.
pub mod futures;

pub use futures::{GateioFuturesClient, GateioFuturesConfig};
pub use spot::{GateioSpotClient, GateioSpotConfig};

/// Host shared by every Gate.io spot and futures REST endpoint; each request's `path()` supplies
/// its own `/api/v4/...` prefix (spec §6).
pub const BASE_URL: &str = "https://api.gateio.ws";
