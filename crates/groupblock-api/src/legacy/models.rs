// Legacy API response types
//
// All responses are wrapped in the `LegacyResponse<T>` envelope. Fields use
// `#[serde(default)]` liberally because the API is inconsistent about field
// presence across firmware versions.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── User group ───────────────────────────────────────────────────────

/// User group from `list/usergroup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyUserGroup {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── User (known client) ──────────────────────────────────────────────

/// Known client from `list/user` or `stat/user/{mac}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyUser {
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Id of the user group this client is assigned to, if any.
    #[serde(default)]
    pub usergroup_id: Option<String>,
    /// Absent for clients the controller has never blocked.
    #[serde(default)]
    pub blocked: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
