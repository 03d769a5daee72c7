// ── Core error types ──
//
// Errors surfaced to the relational engine. Field-level mutation failures
// are not errors; they travel inside `MutationOutcome`. The
// `From<huefdw_api::Error>` impl folds transport failures into call-level
// variants.

use thiserror::Error;

use crate::kind::ResourceKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Missing required option '{option}' for {kind} adapter")]
    MissingOption {
        option: &'static str,
        kind: ResourceKind,
    },

    #[error("Invalid option {field}: {reason}")]
    Config { field: String, reason: String },

    #[error("Unknown column '{column}' for {kind}")]
    UnknownColumn { kind: ResourceKind, column: String },

    #[error("Column '{column}' declared more than once for {kind}")]
    DuplicateColumn { kind: ResourceKind, column: String },

    // ── Query errors ─────────────────────────────────────────────────
    #[error("Unsupported qualifier operator '{symbol}'")]
    UnsupportedOperator { symbol: String },

    #[error("Invalid {kind} row id '{row_id}'")]
    InvalidRowId { kind: ResourceKind, row_id: String },

    #[error("Malformed {kind} resource: {message}")]
    MalformedResource { kind: ResourceKind, message: String },

    // ── Bridge errors ────────────────────────────────────────────────
    #[error("Cannot reach bridge: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Bridge rejected the API token: {message}")]
    Unauthorized { message: String },

    #[error("Bridge error {code}: {description}")]
    BridgeRejected {
        code: u16,
        address: String,
        description: String,
    },

    #[error("Unexpected response from bridge: {message}")]
    UnexpectedResponse { message: String, body: String },

    #[error("Bridge returned HTTP {status}")]
    Http { status: u16, body: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl CoreError {
    /// Configuration errors are raised only while building an adapter.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingOption { .. }
                | Self::Config { .. }
                | Self::UnknownColumn { .. }
                | Self::DuplicateColumn { .. }
        )
    }

    /// The raw bridge body, when one was captured.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::UnexpectedResponse { body, .. } | Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<huefdw_api::Error> for CoreError {
    fn from(err: huefdw_api::Error) -> Self {
        if err.is_unauthorized() {
            return CoreError::Unauthorized {
                message: err.to_string(),
            };
        }
        match err {
            huefdw_api::Error::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            huefdw_api::Error::InvalidUrl(e) => CoreError::Config {
                field: "bridge".into(),
                reason: e.to_string(),
            },
            huefdw_api::Error::Tls(reason) => CoreError::Config {
                field: "insecure".into(),
                reason,
            },
            huefdw_api::Error::Http { status, body } => CoreError::Http { status, body },
            huefdw_api::Error::Bridge {
                code,
                address,
                description,
            } => CoreError::BridgeRejected {
                code,
                address,
                description,
            },
            huefdw_api::Error::Deserialization { message, body } => {
                CoreError::UnexpectedResponse { message, body }
            }
        }
    }
}
