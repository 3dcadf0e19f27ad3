use crate::error::{ClientError, ExchangeError, ExchangeErrorKind};
use reqwest::StatusCode;
use serde::Deserialize;
use xt_core::protocol::http::HttpParser;

/// Gate.io's `label`/`message` error envelope, shared verbatim by spot and futures (spec C5).
#[derive(Debug, Clone, Deserialize)]
pub struct GateioApiError {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct GateioParser;

impl HttpParser for GateioParser {
    type ApiError = GateioApiError;
    type OutputError = ClientError;

    fn parse_api_error(&self, status: StatusCode, error: Self::ApiError) -> Self::OutputError {
        let kind = classify_label(&error.label, status.as_u16());
        ClientError::Exchange(
            ExchangeError::new(kind, error.message)
                .with_http_status(status.as_u16())
                .with_venue_code(error.label),
        )
    }
}

/// Maps Gate.io's `label` error code onto the canonical taxonomy (spec §4.2), falling back to
/// [`ExchangeErrorKind::from_http_status`] for labels not in this venue-specific list.
fn classify_label(label: &str, status: u16) -> ExchangeErrorKind {
    match label {
        "INVALID_CREDENTIALS" => ExchangeErrorKind::InvalidCredentials,
        "INVALID_KEY" => ExchangeErrorKind::InvalidKey,
        "INVALID_SIGNATURE" => ExchangeErrorKind::SignatureMismatch,
        "REQUEST_EXPIRED" => ExchangeErrorKind::RequestExpired,
        "MISSING_REQUIRED_HEADER" => ExchangeErrorKind::InvalidCredentials,
        "IP_FORBIDDEN" => ExchangeErrorKind::IpNotWhitelisted,
        "READ_ONLY" => ExchangeErrorKind::ReadOnlyKey,
        "FORBIDDEN" => ExchangeErrorKind::InsufficientPermissions,

        "INVALID_PARAM_VALUE" | "INVALID_PROTOCOL" | "INVALID_ARGUMENT" | "INVALID_REQUEST_BODY"
        | "MISSING_REQUIRED_PARAM" | "BAD_REQUEST" | "INVALID_CONTENT_TYPE" | "NOT_ACCEPTABLE"
        | "INVALID_CLIENT_ORDER_ID" | "INVALID_PRECISION" => ExchangeErrorKind::InvalidParameter,
        "METHOD_NOT_ALLOWED" => ExchangeErrorKind::MethodNotAllowed,
        "NOT_FOUND" => ExchangeErrorKind::NotFound,
        "INVALID_CURRENCY" | "INVALID_CURRENCY_PAIR" => ExchangeErrorKind::InvalidSymbol,

        "ORDER_NOT_FOUND" => ExchangeErrorKind::OrderNotFound,
        "ORDER_CLOSED" | "ORDER_CANCELLED" => ExchangeErrorKind::OrderAlreadyDone,
        "CANCEL_FAIL" => ExchangeErrorKind::CancelFailed,
        "AMOUNT_TOO_LITTLE" | "AMOUNT_TOO_MUCH" | "QUANTITY_NOT_ENOUGH" => {
            ExchangeErrorKind::OrderSizeError
        }
        "TRADE_RESTRICTED" => ExchangeErrorKind::TradeRestricted,
        "TRADING_DISABLED" | "MARGIN_NOT_SUPPORTED" => ExchangeErrorKind::TradingDisabled,

        "INSUFFICIENT_AVAILABLE" | "BALANCE_NOT_ENOUGH" | "MARGIN_BALANCE_NOT_ENOUGH" => {
            ExchangeErrorKind::InsufficientBalance
        }
        "LEVERAGE_TOO_HIGH" | "LEVERAGE_TOO_LOW" => ExchangeErrorKind::LeverageOutOfRange,
        "INITIAL_MARGIN_TOO_LOW" | "AUTO_BORROW_TOO_MUCH" => ExchangeErrorKind::RiskLimitExceeded,
        "LIQUIDATE_IMMEDIATELY" => ExchangeErrorKind::LiquidationImminent,
        "ORDER_BOOK_NOT_FOUND" | "FAILED_RETRIEVE_ASSETS" => {
            ExchangeErrorKind::ServiceUnavailable
        }

        "INTERNAL" | "SERVER_ERROR" => ExchangeErrorKind::ServerError,
        _ => ExchangeErrorKind::from_http_status(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_labels() {
        assert_eq!(classify_label("ORDER_NOT_FOUND", 400), ExchangeErrorKind::OrderNotFound);
        assert_eq!(classify_label("BALANCE_NOT_ENOUGH", 400), ExchangeErrorKind::InsufficientBalance);
        assert_eq!(classify_label("INVALID_SIGNATURE", 401), ExchangeErrorKind::SignatureMismatch);
        assert!(classify_label("SERVER_ERROR", 500).is_retryable());
    }

    #[test]
    fn unknown_label_falls_back_to_http_status() {
        assert_eq!(classify_label("SOME_NEW_LABEL", 503), ExchangeErrorKind::ServiceUnavailable);
    }
}
