//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use huefdw_config::ConfigError;
use huefdw_core::CoreError;

/// Process exit codes.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REFUSED: i32 = 5;
    pub const PARTIAL: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the bridge: {reason}")]
    #[diagnostic(
        code(huefdw::connection_failed),
        help(
            "Check that the bridge is powered and reachable from this host.\n\
             Try: huefdw --bridge <address> select config -c name"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Bridge answered HTTP {status}")]
    #[diagnostic(code(huefdw::http))]
    Http { status: u16, body: String },

    #[error("Unexpected response from bridge: {message}")]
    #[diagnostic(
        code(huefdw::unexpected_response),
        help("Raw body (first 200 chars): {preview}")
    )]
    UnexpectedResponse { message: String, preview: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("The bridge does not recognise this username")]
    #[diagnostic(
        code(huefdw::unauthorized),
        help(
            "Create a whitelisted user by pressing the link button and POSTing to /api,\n\
             then pass it with --username or set username_env in your profile.\n\
             Bridge said: {message}"
        )
    )]
    Unauthorized { message: String },

    // ── Table errors ─────────────────────────────────────────────────

    #[error("Unknown column '{column}' for {kind}")]
    #[diagnostic(
        code(huefdw::unknown_column),
        help("Run: huefdw columns {kind}")
    )]
    UnknownColumn { kind: String, column: String },

    #[error("Bridge refused the request ({code}): {description}")]
    #[diagnostic(code(huefdw::bridge_error))]
    BridgeRejected {
        code: u16,
        address: String,
        description: String,
    },

    #[error("{failed} of {total} column(s) were not applied")]
    #[diagnostic(
        code(huefdw::partial_update),
        help("See the outcome above for the bridge's reason per column.")
    )]
    PartialUpdate { failed: usize, total: usize },

    #[error("{message}")]
    #[diagnostic(code(huefdw::refused))]
    Refused { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(huefdw::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(huefdw::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: huefdw config init --address <bridge>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No bridge configured")]
    #[diagnostic(
        code(huefdw::no_config),
        help(
            "Pass --bridge, set HUEFDW_BRIDGE, or create a profile with:\n\
             huefdw config init --address <bridge>\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(huefdw::config))]
    Config(Box<ConfigError>),

    // ── IO / Runtime ─────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(huefdw::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Http { .. } | Self::UnexpectedResponse { .. } => {
                exit_code::CONNECTION
            }
            Self::Unauthorized { .. } => exit_code::AUTH,
            Self::UnknownColumn { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::Config(_) => exit_code::USAGE,
            Self::Refused { .. } | Self::BridgeRejected { .. } => exit_code::REFUSED,
            Self::PartialUpdate { .. } => exit_code::PARTIAL,
            Self::Io(_) | Self::Internal(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::Unauthorized { message } => CliError::Unauthorized { message },

            CoreError::UnknownColumn { kind, column } => CliError::UnknownColumn {
                kind: kind.to_string(),
                column,
            },

            CoreError::BridgeRejected {
                code,
                address,
                description,
            } => CliError::BridgeRejected {
                code,
                address,
                description,
            },

            CoreError::UnexpectedResponse { message, body } => CliError::UnexpectedResponse {
                message,
                preview: body.chars().take(200).collect(),
            },

            CoreError::Http { status, body } => CliError::Http { status, body },

            CoreError::MissingOption { option, kind } => CliError::Validation {
                field: option.into(),
                reason: format!("required for {kind}"),
            },

            CoreError::Config { field, reason } => CliError::Validation { field, reason },

            CoreError::DuplicateColumn { kind, column } => CliError::Validation {
                field: "declare".into(),
                reason: format!("column '{column}' declared twice for {kind}"),
            },

            CoreError::InvalidRowId { kind, row_id } => CliError::Validation {
                field: "id".into(),
                reason: format!("'{row_id}' is not a valid {kind} row id"),
            },

            err @ (CoreError::UnsupportedOperator { .. } | CoreError::MalformedResource { .. }) => {
                CliError::Internal(err.to_string())
            }

            CoreError::Runtime(e) => CliError::Io(e),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Adapter(core) => core.into(),
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huefdw_core::ResourceKind;

    #[test]
    fn config_errors_keep_their_exit_codes() {
        let unknown: CliError = ConfigError::UnknownProfile {
            name: "attic".into(),
        }
        .into();
        assert!(matches!(unknown, CliError::Config(_)));
        assert_eq!(unknown.exit_code(), exit_code::USAGE);

        let wrapped: CliError = ConfigError::Adapter(CoreError::InvalidRowId {
            kind: ResourceKind::Lights,
            row_id: "..".into(),
        })
        .into();
        assert!(matches!(wrapped, CliError::Validation { .. }));
        assert_eq!(wrapped.exit_code(), exit_code::USAGE);
    }
}
