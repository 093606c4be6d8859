//! Group block switches for a UniFi network controller.
//!
//! Every known client that belongs to one named user group is exposed as an
//! on/off switch: *on* means the client may use the network, *off* means the
//! controller blocks it.
//!
//! - **[`setup_platform`]**: connects, resolves the group name to its id,
//!   enumerates member clients, and registers one [`ClientBlockSwitch`] per
//!   member with a [`PlatformHost`]. Failures are logged and surfaced to the
//!   host as a [`Notification`].
//! - **[`ClientBlockSwitch`]**: implements [`SwitchEntity`]. Its cached state
//!   only changes through [`update()`](SwitchEntity::update); turning it on or
//!   off issues the unblock/block command and waits for the next poll.
//! - **[`Controller`]**: the shared, cheaply cloneable controller session.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod platform;
pub mod switch;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ApiVersion, ControllerConnectionConfig, PlatformConfig, Scheme, TlsVerification};
pub use controller::Controller;
pub use error::{CoreError, SetupError};
pub use model::{DeviceRecord, MacAddress, TargetUserGroup};
pub use platform::{
    NOTIFICATION_ID, NOTIFICATION_TITLE, Notification, PlatformHost, discover_switches,
    setup_platform,
};
pub use switch::{ClientBlockSwitch, SwitchEntity};
