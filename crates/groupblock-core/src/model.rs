// ── Domain model ──
//
// Identity and snapshot types derived from the controller's legacy records.
// Field-absence defaults are decided here and nowhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use groupblock_api::{LegacyUser, LegacyUserGroup};

/// Display name used when the controller has no name for a client.
pub const DEFAULT_DEVICE_NAME: &str = "no name";

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address. Accepts colon- or dash-separated input.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().trim().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ── TargetUserGroup ─────────────────────────────────────────────────

/// The configured user group, resolved to its controller id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUserGroup {
    name: String,
    id: String,
}

impl TargetUserGroup {
    /// Find the group whose name matches exactly (case-sensitive).
    ///
    /// The first match in enumeration order wins. Groups without a name
    /// never match.
    pub fn resolve(name: &str, groups: &[LegacyUserGroup]) -> Option<Self> {
        groups
            .iter()
            .find(|g| g.name.as_deref() == Some(name))
            .map(|g| Self {
                name: name.to_owned(),
                id: g.id.clone(),
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the user's group-membership field names this group.
    pub fn contains(&self, user: &LegacyUser) -> bool {
        user.usergroup_id.as_deref() == Some(self.id.as_str())
    }
}

// ── DeviceRecord ────────────────────────────────────────────────────

/// Snapshot of one known client, taken at enumeration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub name: String,
    pub mac: MacAddress,
    pub blocked: bool,
}

impl From<&LegacyUser> for DeviceRecord {
    fn from(user: &LegacyUser) -> Self {
        Self {
            name: user
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_owned()),
            mac: MacAddress::new(&user.mac),
            blocked: user.blocked.unwrap_or(false),
        }
    }
}
