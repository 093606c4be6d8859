// Session login, logout, and platform probing
//
// The session itself is a cookie in the client's jar; UniFi OS also issues
// a CSRF token at login that commands must echo back.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::client::{LegacyClient, preview};
use crate::transport::TransportConfig;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl LegacyClient {
    /// Open a session. Any non-2xx answer is an authentication failure.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.base_url().join(self.platform().login_path())?;
        debug!(%url, username, "logging in");

        let resp = self
            .http()
            .post(url)
            .json(&LoginRequest {
                username,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("controller answered {status}: {}", preview(&body)),
            });
        }

        let csrf = resp
            .headers()
            .get("X-CSRF-Token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        if let Some(token) = csrf {
            self.set_csrf_token(token);
        }
        Ok(())
    }

    /// Close the session. The response body is not inspected.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.base_url().join(self.platform().logout_path())?;
        debug!(%url, "logging out");
        self.http().post(url).send().await?;
        Ok(())
    }

    /// Work out which login path the controller serves.
    ///
    /// Anything but 404 on the UniFi OS login path means UniFi OS; otherwise
    /// the controller is classic as long as it answers at all.
    pub async fn detect_platform(
        base_url: &Url,
        transport: &TransportConfig,
    ) -> Result<ControllerPlatform, Error> {
        let http = transport.build_client()?;

        let login_url = base_url.join(ControllerPlatform::UnifiOs.login_path())?;
        match http.get(login_url).send().await {
            Ok(resp) if resp.status() != reqwest::StatusCode::NOT_FOUND => {
                debug!("controller is UniFi OS");
                return Ok(ControllerPlatform::UnifiOs);
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "UniFi OS login path unreachable"),
        }

        let login_url = base_url.join(ControllerPlatform::ClassicController.login_path())?;
        http.get(login_url).send().await?;
        debug!("controller is a classic Network Application");
        Ok(ControllerPlatform::ClassicController)
    }
}
