// ── Core error types ──
//
// Domain errors from groupblock-core. Callers never see HTTP status codes or
// JSON parse failures directly; `From<groupblock_api::Error>` translates
// transport-layer errors into these variants.

use thiserror::Error;

use crate::platform::Notification;

/// Error from a remote interaction with the controller.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Client not found: {mac}")]
    ClientNotFound { mac: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<groupblock_api::Error> for CoreError {
    fn from(err: groupblock_api::Error) -> Self {
        use groupblock_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::LegacyApi { message } => CoreError::Api { message },
            ApiError::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("unexpected response: {message}"),
            },
        }
    }
}

/// Why the platform could not be set up. Setup is all-or-nothing: any of
/// these means no switch was registered.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The controller was unreachable or rejected the credentials.
    #[error("Failed to connect to Unifi: {0}")]
    Connection(#[source] CoreError),

    /// No user group on the controller carries the configured name.
    #[error("Failed to find Unifi userGroup with name of: {name}")]
    GroupNotFound { name: String },

    /// Connected, but listing groups or users failed.
    #[error("Failed to enumerate Unifi clients: {0}")]
    Enumeration(#[source] CoreError),
}

impl SetupError {
    /// The persistent notification the host should show for this failure.
    ///
    /// Only connection and missing-group failures are user-actionable;
    /// enumeration failures are logged without a notification.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            Self::Connection(err) => Some(Notification::new(format!(
                "Failed to connect to Unifi. Error: {err}\n\
                 You will need to restart after fixing."
            ))),
            Self::GroupNotFound { name } => Some(Notification::new(format!(
                "Failed to find Unifi User Group Name: {name}\n\
                 You will need to restart after fixing."
            ))),
            Self::Enumeration(_) => None,
        }
    }
}
