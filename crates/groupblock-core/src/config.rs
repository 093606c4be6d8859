// ── Runtime connection configuration ──
//
// Describes *how* to reach the controller and which user group to expose.
// Built once by the config crate and handed in by reference; core never
// reads files or the environment.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// API version tag of the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
    /// Standalone Network Application (`v4`).
    #[default]
    V4,
    /// UniFi OS console (UDM, UCG, Cloud Key Gen2+).
    UnifiOs,
    /// Try the login endpoints to decide.
    Auto,
}

/// URL scheme used to reach the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scheme {
    #[default]
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Connection parameters for a single controller.
///
/// Immutable once built; the password never appears in `Debug` output.
#[derive(Debug, Clone)]
pub struct ControllerConnectionConfig {
    pub host: String,
    pub port: u16,
    pub site_id: String,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    pub version: ApiVersion,
    pub scheme: Scheme,
    /// Timeout for reads and login.
    pub timeout: Duration,
    /// Timeout for block/unblock commands.
    pub write_timeout: Duration,
}

impl ControllerConnectionConfig {
    /// Controller root URL, e.g. `https://localhost:8443/`.
    pub fn base_url(&self) -> Result<Url, CoreError> {
        // Bare IPv6 literals need brackets inside a URL authority.
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let raw = format!("{}://{host}:{}", self.scheme.as_str(), self.port);
        Url::parse(&raw).map_err(|e| CoreError::Config {
            message: format!("invalid controller address {raw}: {e}"),
        })
    }
}

/// Everything the platform setup routine needs.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub connection: ControllerConnectionConfig,
    /// Name of the controller user group whose members become switches.
    pub user_group_name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn connection(host: &str) -> ControllerConnectionConfig {
        ControllerConnectionConfig {
            host: host.into(),
            port: 8443,
            site_id: "default".into(),
            username: "admin".into(),
            password: SecretString::from("pw".to_string()),
            tls: TlsVerification::default(),
            version: ApiVersion::default(),
            scheme: Scheme::default(),
            timeout: Duration::from_secs(1),
            write_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn base_url_uses_scheme_host_and_port() {
        let url = connection("localhost").base_url().unwrap();
        assert_eq!(url.as_str(), "https://localhost:8443/");
    }

    #[test]
    fn base_url_brackets_ipv6_literals() {
        let url = connection("fd00::1").base_url().unwrap();
        assert_eq!(url.as_str(), "https://[fd00::1]:8443/");
    }

    #[test]
    fn base_url_rejects_garbage_host() {
        let err = connection("bad host").base_url().unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", connection("localhost"));
        assert!(!rendered.contains("\"pw\""));
    }
}
