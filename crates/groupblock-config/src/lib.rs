//! Configuration for groupblock.
//!
//! A flat TOML file plus `GROUPBLOCK_*` environment overrides, validated and
//! translated into [`groupblock_core::PlatformConfig`]. The password is
//! resolved through a credential chain: environment, system keyring, then
//! plaintext in the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use groupblock_core::{
    ApiVersion, ControllerConnectionConfig, PlatformConfig, Scheme, TlsVerification,
};

/// Prefix for environment overrides (`GROUPBLOCK_HOST`, `GROUPBLOCK_PORT`, ...).
pub const ENV_PREFIX: &str = "GROUPBLOCK_";

/// Environment variable holding the password. Checked before the keyring.
pub const PASSWORD_ENV: &str = "GROUPBLOCK_PASSWORD";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GROUPBLOCK_CONFIG";

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "groupblock";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for {username}@{host}")]
    NoPassword { username: String, host: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// `verify_ssl`: a boolean, or the path of a CA bundle to trust.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum VerifySsl {
    Flag(bool),
    CaPath(PathBuf),
}

impl Default for VerifySsl {
    fn default() -> Self {
        Self::Flag(true)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionTag {
    #[default]
    V4,
    UnifiOs,
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeTag {
    #[default]
    Https,
    Http,
}

/// On-disk configuration, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_site_id")]
    pub site_id: String,

    pub username: Option<String>,

    /// Plaintext password. Prefer the keyring or `GROUPBLOCK_PASSWORD`.
    pub password: Option<String>,

    #[serde(default)]
    pub verify_ssl: VerifySsl,

    /// Read/login timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Block/unblock timeout in seconds.
    #[serde(default = "default_timeout")]
    pub write_timeout: u64,

    pub user_group_name: Option<String>,

    #[serde(default)]
    pub version: VersionTag,

    #[serde(default)]
    pub scheme: SchemeTag,

    /// Seconds between state refreshes in `poll`.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            site_id: default_site_id(),
            username: None,
            password: None,
            verify_ssl: VerifySsl::default(),
            timeout: default_timeout(),
            write_timeout: default_timeout(),
            user_group_name: None,
            version: VersionTag::default(),
            scheme: SchemeTag::default(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    8443
}
fn default_site_id() -> String {
    "default".into()
}
fn default_timeout() -> u64 {
    1
}
fn default_poll_interval() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `GROUPBLOCK_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("", "", "groupblock").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("groupblock");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` plus `GROUPBLOCK_*` overrides.
///
/// A missing file is not an error; defaults and environment still apply.
/// The password and config-path variables are not merged here, see
/// [`Config::resolve_password`].
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["password", "config"]));

    Ok(figment.extract()?)
}

// ── Validation ──────────────────────────────────────────────────────

impl Config {
    /// Validate every field and build the platform configuration,
    /// resolving the password along the way.
    pub fn to_platform_config(&self) -> Result<PlatformConfig, ConfigError> {
        self.validate()?;
        let password = self.resolve_password()?;
        Ok(self.build_platform_config(password))
    }

    /// Field checks that need no credential lookup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", "must not be empty"));
        }
        if self.port == 0 {
            return Err(invalid("port", "must be between 1 and 65535"));
        }
        if self.site_id.trim().is_empty() {
            return Err(invalid("site_id", "must not be empty"));
        }
        if self.username().is_none() {
            return Err(invalid("username", "is required"));
        }
        if self.user_group_name().is_none() {
            return Err(invalid("user_group_name", "is required"));
        }
        for (field, secs) in [
            ("timeout", self.timeout),
            ("write_timeout", self.write_timeout),
            ("poll_interval", self.poll_interval),
        ] {
            if secs == 0 {
                return Err(invalid(field, "must be a positive number of seconds"));
            }
        }
        if let VerifySsl::CaPath(ref path) = self.verify_ssl {
            if !path.exists() {
                return Err(invalid(
                    "verify_ssl",
                    format!("CA bundle {} does not exist", path.display()),
                ));
            }
        }
        Ok(())
    }

    fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.trim().is_empty())
    }

    fn user_group_name(&self) -> Option<&str> {
        self.user_group_name
            .as_deref()
            .filter(|g| !g.trim().is_empty())
    }

    /// Keyring entry name for this config's credentials.
    pub fn keyring_entry(&self) -> String {
        keyring_entry(self.username().unwrap_or_default(), &self.host)
    }

    /// Resolve the password: `GROUPBLOCK_PASSWORD`, then the system keyring,
    /// then plaintext in the config file.
    pub fn resolve_password(&self) -> Result<SecretString, ConfigError> {
        let entry = self.keyring_entry();
        password_chain(
            std::env::var(PASSWORD_ENV).ok(),
            || keyring_password(&entry),
            self.password.as_deref(),
        )
        .ok_or_else(|| ConfigError::NoPassword {
            username: self.username().unwrap_or_default().to_owned(),
            host: self.host.clone(),
        })
    }

    /// Polling cadence for hosts that drive `update()` themselves.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    /// A copy safe to print: the plaintext password is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.password.is_some() {
            copy.password = Some("********".into());
        }
        copy
    }

    fn build_platform_config(&self, password: SecretString) -> PlatformConfig {
        let tls = match self.verify_ssl {
            VerifySsl::Flag(true) => TlsVerification::SystemDefaults,
            VerifySsl::Flag(false) => TlsVerification::DangerAcceptInvalid,
            VerifySsl::CaPath(ref path) => TlsVerification::CustomCa(path.clone()),
        };
        let version = match self.version {
            VersionTag::V4 => ApiVersion::V4,
            VersionTag::UnifiOs => ApiVersion::UnifiOs,
            VersionTag::Auto => ApiVersion::Auto,
        };
        let scheme = match self.scheme {
            SchemeTag::Https => Scheme::Https,
            SchemeTag::Http => Scheme::Http,
        };

        PlatformConfig {
            connection: ControllerConnectionConfig {
                host: self.host.trim().to_owned(),
                port: self.port,
                site_id: self.site_id.clone(),
                username: self.username().unwrap_or_default().to_owned(),
                password,
                tls,
                version,
                scheme,
                timeout: Duration::from_secs(self.timeout),
                write_timeout: Duration::from_secs(self.write_timeout),
            },
            user_group_name: self.user_group_name().unwrap_or_default().to_owned(),
        }
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Keyring entry name: `<username>@<host>/password`.
pub fn keyring_entry(username: &str, host: &str) -> String {
    format!("{username}@{host}/password")
}

fn keyring_password(entry: &str) -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, entry).ok()?;
    entry.get_password().ok()
}

fn password_chain(
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    let non_empty = |pw: &String| !pw.is_empty();
    env.filter(non_empty)
        .or_else(|| keyring().filter(non_empty))
        .or_else(|| plaintext.map(str::to_owned).filter(non_empty))
        .map(SecretString::from)
}
