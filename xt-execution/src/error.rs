use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use xt_core::error::SocketError;
use xt_model::exchange::ExchangeId;

/// Canonical error taxonomy (spec §4.2). Every per-venue classifier (spec C5) parses its wire
/// error envelope (`code`/`msg` for MEXC, `label`/`message` for Gate.io) and maps it onto one of
/// these tags; when the body does not decode as JSON, classification falls back on
/// [`ExchangeErrorKind::from_http_status`] alone.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display,
)]
pub enum ExchangeErrorKind {
    // Authentication
    InvalidCredentials,
    InvalidKey,
    SignatureMismatch,
    IpNotWhitelisted,
    InsufficientPermissions,
    ReadOnlyKey,
    RequestExpired,

    // Request
    InvalidParameter,
    InvalidSymbol,
    NotFound,
    MethodNotAllowed,

    // Trading
    OrderNotFound,
    OrderAlreadyDone,
    CancelFailed,
    OrderSizeError,
    TradingDisabled,
    TradeRestricted,
    InsufficientBalance,

    // Futures
    LeverageOutOfRange,
    RiskLimitExceeded,
    LiquidationImminent,
    PositionEmpty,
    PositionModeConflict,

    // Transport
    ConnectionError,
    Timeout,

    // Throttling
    RateLimit,

    // Server
    ServerError,
    ServiceUnavailable,
    Maintenance,

    /// Venue does not expose this operation at all (eg/ MEXC native order amend, MEXC
    /// withdrawal cancellation - spec §9 Open Questions).
    NotSupported,
}

impl ExchangeErrorKind {
    /// Retryability matrix, spec §4.2. `RequestExpired` is retried exactly once by the retrier
    /// after the authenticator refreshes its clock-skew offset; everything else in this list may
    /// be retried per the backoff schedule in spec §4.5.
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            ExchangeErrorKind::RateLimit
                | ExchangeErrorKind::RequestExpired
                | ExchangeErrorKind::ConnectionError
                | ExchangeErrorKind::Timeout
                | ExchangeErrorKind::ServerError
                | ExchangeErrorKind::ServiceUnavailable
                | ExchangeErrorKind::Maintenance
        )
    }

    /// Status-code-only classification fallback, used when a failed response body does not
    /// decode as the venue's JSON error envelope (spec §4.2).
    pub const fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => ExchangeErrorKind::InvalidCredentials,
            404 => ExchangeErrorKind::NotFound,
            405 => ExchangeErrorKind::MethodNotAllowed,
            429 => ExchangeErrorKind::RateLimit,
            503 => ExchangeErrorKind::ServiceUnavailable,
            s if s >= 500 => ExchangeErrorKind::ServerError,
            _ => ExchangeErrorKind::InvalidParameter,
        }
    }
}

/// A classified venue error, always carrying the raw HTTP status and venue error code alongside
/// the canonical [`ExchangeErrorKind`] (spec §4.2: "all carry `httpStatus?`, `venueCode?`,
/// `message`").
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Error)]
#[error("{kind} (http_status={http_status:?}, venue_code={venue_code:?}): {message}")]
pub struct ExchangeError {
    pub kind: ExchangeErrorKind,
    pub http_status: Option<u16>,
    pub venue_code: Option<String>,
    pub message: String,
    /// Server-supplied retry-after hint in milliseconds, honoured by the retrier in preference to
    /// the exponential backoff delay (spec §4.5).
    pub retry_after_ms: Option<u64>,
}

impl ExchangeError {
    pub fn new(kind: ExchangeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            http_status: None,
            venue_code: None,
            message: message.into(),
            retry_after_ms: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_venue_code(mut self, code: impl Into<String>) -> Self {
        self.venue_code = Some(code.into());
        self
    }

    pub fn with_retry_after_ms(mut self, retry_after_ms: u64) -> Self {
        self.retry_after_ms = Some(retry_after_ms);
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Transport/connectivity failure, upstream of venue error classification.
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error,
)]
pub enum ConnectivityError {
    #[error("exchange offline: {0}")]
    ExchangeOffline(ExchangeId),

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Socket(String),
}

impl From<SocketError> for ConnectivityError {
    fn from(value: SocketError) -> Self {
        match value {
            SocketError::HttpTimeout(_) => Self::Timeout,
            other => Self::Socket(other.to_string()),
        }
    }
}

/// Top level error returned from every [`crate::client::ExecutionClient`] operation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Error)]
pub enum ClientError {
    #[error("connectivity: {0}")]
    Connectivity(#[from] ConnectivityError),

    #[error("exchange: {0}")]
    Exchange(#[from] ExchangeError),
}

impl From<SocketError> for ClientError {
    fn from(value: SocketError) -> Self {
        Self::Connectivity(ConnectivityError::from(value))
    }
}

impl ClientError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Connectivity(_) => true,
            ClientError::Exchange(error) => error.is_retryable(),
        }
    }
}
