use crate::error::{ClientError, ExchangeError, ExchangeErrorKind};
use reqwest::StatusCode;
use serde::Deserialize;
use xt_core::protocol::http::HttpParser;

/// MEXC spot error classifier (spec C5). MEXC's wire error envelope is `{"code": i64, "msg":
/// String}` on both 2xx-with-embedded-error and 4xx/5xx responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct MexcParser;

impl HttpParser for MexcParser {
    type ApiError = MexcApiError;
    type OutputError = ClientError;

    fn parse_api_error(&self, status: StatusCode, error: Self::ApiError) -> Self::OutputError {
        let kind = match error.code {
            10072 => ExchangeErrorKind::InvalidKey,
            10073 => ExchangeErrorKind::SignatureMismatch,
            700003 => ExchangeErrorKind::RequestExpired,
            10101 => ExchangeErrorKind::InsufficientBalance,
            10212 | 30016 => ExchangeErrorKind::OrderNotFound,
            10007 => ExchangeErrorKind::InvalidSymbol,
            10219 => ExchangeErrorKind::TradingDisabled,
            429 => ExchangeErrorKind::RateLimit,
            _ => ExchangeErrorKind::from_http_status(status.as_u16()),
        };

        ClientError::Exchange(
            ExchangeError::new(kind, error.msg)
                .with_http_status(status.as_u16())
                .with_venue_code(error.code.to_string()),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MexcApiError {
    pub code: i64,
    pub msg: String,
}
