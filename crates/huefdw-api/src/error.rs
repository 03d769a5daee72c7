use thiserror::Error;

use crate::bridge_error::BridgeErrorKind;

/// Top-level error type for the `huefdw-api` crate.
///
/// Covers every way a single bridge call can fail as a whole. Per-field
/// failures inside a successful PUT are not errors at this level; they are
/// reported through [`BridgeResponse`](crate::BridgeResponse).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The bridge answered with a non-2xx status.
    #[error("Bridge returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Bridge ──────────────────────────────────────────────────────
    /// The bridge rejected the whole request with an error array
    /// (e.g. `[{"error":{"type":1,...}}]` for an unknown username).
    #[error("Bridge error {code} at {address}: {description}")]
    Bridge {
        code: u16,
        address: String,
        description: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body was not the JSON shape we expected, with the raw
    /// body kept for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the bridge refused the API token.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Bridge { code, .. } => {
                BridgeErrorKind::from_code(*code) == BridgeErrorKind::UnauthorizedUser
            }
            Self::Http { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying by hand.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            Self::Bridge { code, .. } => BridgeErrorKind::from_code(*code).is_transient(),
            _ => false,
        }
    }

    /// Returns `true` if the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Http { status: 404, .. } => true,
            Self::Bridge { code, .. } => {
                BridgeErrorKind::from_code(*code) == BridgeErrorKind::ResourceNotAvailable
            }
            _ => false,
        }
    }

    /// The raw response body, when the failure carried one.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } | Self::Deserialization { body, .. } => Some(body),
            _ => None,
        }
    }
}
