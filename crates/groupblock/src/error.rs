//! CLI error types with miette diagnostics.
//!
//! Maps setup, core, and config errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use groupblock_config::ConfigError;
use groupblock_core::{CoreError, SetupError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the Unifi controller: {reason}")]
    #[diagnostic(
        code(groupblock::connection_failed),
        help(
            "Check host, port, scheme, and credentials in your config.\n\
             Self-signed controllers need verify_ssl = false or a CA bundle path."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(groupblock::auth_failed),
        help("Run: groupblock config set-password")
    )]
    AuthFailed { message: String },

    #[error("No password configured for {username}@{host}")]
    #[diagnostic(
        code(groupblock::no_credentials),
        help(
            "Store one with: groupblock config set-password\n\
             Or set GROUPBLOCK_PASSWORD."
        )
    )]
    NoCredentials { username: String, host: String },

    #[error("Controller request timed out")]
    #[diagnostic(
        code(groupblock::timeout),
        help("Raise timeout / write_timeout in the config or check controller responsiveness.")
    )]
    Timeout,

    // ── Resources ────────────────────────────────────────────────────

    #[error("User group '{name}' not found")]
    #[diagnostic(
        code(groupblock::group_not_found),
        help("Group names are matched exactly, including case.")
    )]
    GroupNotFound { name: String },

    #[error("No client '{identifier}' in the configured group")]
    #[diagnostic(
        code(groupblock::not_found),
        help("Run: groupblock list to see the group's clients")
    )]
    SwitchNotFound { identifier: String },

    #[error("'{identifier}' matches {count} clients")]
    #[diagnostic(
        code(groupblock::ambiguous),
        help("Use the MAC address instead of the name.")
    )]
    AmbiguousSwitch { identifier: String, count: usize },

    #[error("Client {mac} is no longer known to the controller")]
    #[diagnostic(code(groupblock::client_gone))]
    ClientNotFound { mac: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(code(groupblock::api_error))]
    Api { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(groupblock::validation),
        help("Config file: {path}")
    )]
    Validation {
        field: String,
        reason: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(groupblock::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(groupblock::keyring))]
    Keyring(#[from] keyring::Error),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::GroupNotFound { .. }
            | Self::SwitchNotFound { .. }
            | Self::ClientNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::AmbiguousSwitch { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the config file location to a [`ConfigError`].
    pub fn from_config(err: ConfigError, path: &std::path::Path) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation {
                field,
                reason,
                path: path.display().to_string(),
            },
            ConfigError::NoPassword { username, host } => Self::NoCredentials { username, host },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}

// ── Core / setup mapping ─────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                reason: format!("{url}: {reason}"),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::ClientNotFound { mac } => CliError::ClientNotFound { mac },
            CoreError::Api { message } => CliError::Api { message },
            CoreError::Config { message } => CliError::Validation {
                field: "controller".into(),
                reason: message,
                path: String::new(),
            },
        }
    }
}

impl From<SetupError> for CliError {
    fn from(err: SetupError) -> Self {
        match err {
            SetupError::Connection(inner) => CliError::ConnectionFailed {
                reason: inner.to_string(),
            },
            SetupError::GroupNotFound { name } => CliError::GroupNotFound { name },
            SetupError::Enumeration(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_failures_map_to_connection_or_not_found() {
        let conn: CliError = SetupError::Connection(CoreError::Timeout).into();
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        let auth: CliError = SetupError::Connection(CoreError::AuthenticationFailed {
            message: "bad".into(),
        })
        .into();
        assert_eq!(auth.exit_code(), exit_code::CONNECTION);

        let group: CliError = SetupError::GroupNotFound {
            name: "Guests".into(),
        }
        .into();
        assert_eq!(group.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn config_validation_is_a_usage_error() {
        let err = CliError::from_config(
            ConfigError::Validation {
                field: "port".into(),
                reason: "must be between 1 and 65535".into(),
            },
            std::path::Path::new("/tmp/config.toml"),
        );
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(matches!(err, CliError::Validation { ref path, .. } if path == "/tmp/config.toml"));
    }
}
