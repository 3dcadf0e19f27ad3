//! MEXC spot adapter (spec §4.4/§4.6/§6): HMAC-SHA256 query-string signing, numeric error-code
//! classification, concatenated-pair symbol mapping, and the full public/private REST surface.

pub mod client;
pub mod parser;
pub mod requests;
pub mod signer;
pub mod symbol;

pub use client::{MexcSpotClient, MexcSpotConfig};
