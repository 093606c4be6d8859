// ── Controller session ──
//
// One authenticated legacy-API session shared by every switch of the
// platform. Cloning is cheap (Arc); all clones talk through the same cookie
// jar and CSRF token.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use groupblock_api::transport::{TlsMode, TransportConfig};
use groupblock_api::{ControllerPlatform, LegacyClient, LegacyUser, LegacyUserGroup};

use crate::config::{ApiVersion, ControllerConnectionConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::MacAddress;

/// Shared handle to an authenticated controller session.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    client: LegacyClient,
    url: Url,
}

impl Controller {
    /// Resolve the platform, build the HTTP client, and log in.
    ///
    /// A single attempt: any failure is returned as-is, no retry.
    pub async fn connect(config: &ControllerConnectionConfig) -> Result<Self, CoreError> {
        let url = config.base_url()?;
        let transport = build_transport(config);

        let platform = match config.version {
            ApiVersion::V4 => ControllerPlatform::ClassicController,
            ApiVersion::UnifiOs => ControllerPlatform::UnifiOs,
            ApiVersion::Auto => LegacyClient::detect_platform(&url, &transport).await?,
        };
        debug!(?platform, %url, "controller platform");

        let client = LegacyClient::new(url.clone(), config.site_id.clone(), platform, &transport)?;
        client.login(&config.username, &config.password).await?;

        info!(%url, site = %config.site_id, "connected to controller");
        Ok(Self::from_client(client))
    }

    /// Wrap an already-authenticated client.
    pub fn from_client(client: LegacyClient) -> Self {
        let url = client.base_url().clone();
        Self {
            inner: Arc::new(ControllerInner { client, url }),
        }
    }

    /// The controller root URL.
    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Log out of the session. Failures are logged, not returned.
    pub async fn disconnect(&self) {
        if let Err(e) = self.inner.client.logout().await {
            warn!(error = %e, "logout failed (non-fatal)");
        }
    }

    // ── Enumeration ──────────────────────────────────────────────

    pub async fn user_groups(&self) -> Result<Vec<LegacyUserGroup>, CoreError> {
        Ok(self.inner.client.list_user_groups().await?)
    }

    pub async fn users(&self) -> Result<Vec<LegacyUser>, CoreError> {
        Ok(self.inner.client.list_users().await?)
    }

    // ── Per-client operations ────────────────────────────────────

    /// Current blocked flag for one client.
    ///
    /// A record without the field counts as not blocked (typical for a
    /// client that is offline). A MAC the controller no longer knows is
    /// [`CoreError::ClientNotFound`].
    pub async fn client_blocked(&self, mac: &MacAddress) -> Result<bool, CoreError> {
        let user = match self.inner.client.get_user(mac.as_str()).await {
            Ok(user) => user,
            Err(groupblock_api::Error::LegacyApi { message }) if is_unknown_user(&message) => None,
            Err(e) => return Err(e.into()),
        };

        user.map(|u| u.blocked.unwrap_or(false))
            .ok_or_else(|| CoreError::ClientNotFound {
                mac: mac.to_string(),
            })
    }

    pub async fn block(&self, mac: &MacAddress) -> Result<(), CoreError> {
        Ok(self.inner.client.block_client(mac.as_str()).await?)
    }

    pub async fn unblock(&self, mac: &MacAddress) -> Result<(), CoreError> {
        Ok(self.inner.client.unblock_client(mac.as_str()).await?)
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the connection configuration.
fn build_transport(config: &ControllerConnectionConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        write_timeout: config.write_timeout,
        cookie_jar: None, // LegacyClient::new adds one automatically
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

/// `stat/user/{mac}` answers an unknown MAC with `api.err.UnknownUser`
/// on some firmware and with an empty `data` array on others.
fn is_unknown_user(message: &str) -> bool {
    message.contains("UnknownUser") || message.contains("UnknownStation")
}
