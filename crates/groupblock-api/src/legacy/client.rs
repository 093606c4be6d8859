// Session-holding HTTP client for the legacy endpoints
//
// Requests go out through `send`, which rotates the CSRF token from the
// response headers and hands status + body to `decode`. Endpoint methods
// live in the sibling `auth`, `users`, and `clients` modules.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::models::LegacyResponse;
use crate::transport::TransportConfig;

/// Client for one controller site.
///
/// Holds the session cookie (in the `reqwest` jar) and, on UniFi OS, the
/// CSRF token that has to accompany every command.
pub struct LegacyClient {
    http: reqwest::Client,
    base_url: Url,
    site: String,
    platform: ControllerPlatform,
    write_timeout: Duration,
    csrf: CsrfToken,
}

impl LegacyClient {
    /// Build a client (and its cookie jar) from transport settings.
    ///
    /// `base_url` is the controller root, e.g. `https://unifi.lan:8443`.
    pub fn new(
        base_url: Url,
        site: String,
        platform: ControllerPlatform,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let transport = match transport.cookie_jar {
            Some(_) => transport.clone(),
            None => transport.clone().with_cookie_jar(),
        };
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            site,
            platform,
            write_timeout: transport.write_timeout,
            csrf: CsrfToken::default(),
        })
    }

    /// Wrap an existing `reqwest::Client`. Commands use the default
    /// write timeout.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        site: String,
        platform: ControllerPlatform,
    ) -> Self {
        Self {
            http,
            base_url,
            site,
            platform,
            write_timeout: TransportConfig::default().write_timeout,
            csrf: CsrfToken::default(),
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn platform(&self) -> ControllerPlatform {
        self.platform
    }

    pub(crate) fn set_csrf_token(&self, token: String) {
        debug!("storing CSRF token");
        self.csrf.set(token);
    }

    /// `{base}{prefix}/api/s/{site}/{path}`
    pub(crate) fn site_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}{}/api/s/{}/{path}",
            self.base_url.as_str().trim_end_matches('/'),
            self.platform.legacy_prefix(),
            self.site,
        );
        Ok(Url::parse(&full)?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);
        self.send(self.http.get(url)).await
    }

    /// POST a JSON command under the write timeout.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Vec<T>, Error> {
        debug!("POST {}", url);
        let mut request = self.http.post(url).json(body).timeout(self.write_timeout);
        if let Some(token) = self.csrf.get() {
            request = request.header("X-CSRF-Token", token);
        }
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, Error> {
        let resp = request.send().await?;
        let status = resp.status();
        if let Some(token) = rotated_csrf(resp.headers()) {
            trace!("CSRF token rotated");
            self.csrf.set(token);
        }
        let body = resp.text().await?;
        decode(status, &body)
    }
}

// ── CSRF ────────────────────────────────────────────────────────────

#[derive(Default)]
struct CsrfToken(RwLock<Option<String>>);

impl CsrfToken {
    fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, token: String) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }
}

fn rotated_csrf(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Updated-CSRF-Token")
        .or_else(|| headers.get("X-CSRF-Token"))
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

// ── Response decoding ───────────────────────────────────────────────

/// Error body UniFi OS sends through its proxy, sometimes with HTTP 200.
#[derive(serde::Deserialize)]
struct ProxyError {
    error: Option<ProxyErrorDetail>,
}

#[derive(serde::Deserialize)]
struct ProxyErrorDetail {
    code: u16,
    message: Option<String>,
}

/// Turn a status + body into the envelope's `data`, or an error.
fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Vec<T>, Error> {
    match status {
        StatusCode::UNAUTHORIZED => {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }
        StatusCode::FORBIDDEN => {
            return Err(Error::LegacyApi {
                message: "insufficient permissions (HTTP 403)".into(),
            });
        }
        _ => {}
    }

    if !status.is_success() {
        // Unknown-object lookups still come back as an envelope.
        let message = serde_json::from_str::<LegacyResponse<serde_json::Value>>(body)
            .ok()
            .and_then(|env| env.meta.msg)
            .unwrap_or_else(|| format!("HTTP {status}: {}", preview(body)));
        return Err(Error::LegacyApi { message });
    }

    if let Ok(ProxyError {
        error: Some(detail),
    }) = serde_json::from_str::<ProxyError>(body)
    {
        let message = detail.message.unwrap_or_default();
        return Err(match detail.code {
            401 => Error::Authentication { message },
            code => Error::LegacyApi {
                message: format!("UniFi OS error {code}: {message}"),
            },
        });
    }

    let envelope: LegacyResponse<T> =
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        })?;

    if envelope.meta.rc == "ok" {
        Ok(envelope.data)
    } else {
        Err(Error::LegacyApi {
            message: envelope
                .meta
                .msg
                .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
        })
    }
}

/// At most 200 characters of `body`.
pub(crate) fn preview(body: &str) -> &str {
    body.char_indices()
        .nth(200)
        .map_or(body, |(idx, _)| &body[..idx])
}
