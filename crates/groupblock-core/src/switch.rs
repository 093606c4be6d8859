// ── Switch entity ──
//
// One switch per group member. "On" mirrors "not blocked" as last reported
// by the controller; commands never touch the cached state.

use tracing::{debug, warn};

use crate::controller::Controller;
use crate::error::CoreError;
use crate::model::{DeviceRecord, MacAddress};

/// Capability contract the host platform drives.
///
/// The host owns scheduling: it calls [`update`](Self::update) on its own
/// polling cadence and reads [`is_on`](Self::is_on) / [`available`](Self::available)
/// in between.
pub trait SwitchEntity {
    fn name(&self) -> &str;

    /// Stable identity across restarts.
    fn unique_id(&self) -> &str;

    /// Last cached state. No remote call.
    fn is_on(&self) -> bool;

    /// Whether the last poll reached the controller and found the client.
    fn available(&self) -> bool;

    async fn turn_on(&self) -> Result<(), CoreError>;

    async fn turn_off(&self) -> Result<(), CoreError>;

    /// Refresh cached state from the controller.
    async fn update(&mut self) -> Result<(), CoreError>;
}

/// A controller client exposed as a switch: on = unblocked, off = blocked.
#[derive(Clone)]
pub struct ClientBlockSwitch {
    name: String,
    mac: MacAddress,
    not_blocked: bool,
    available: bool,
    controller: Controller,
}

impl ClientBlockSwitch {
    /// Build a switch from a freshly enumerated record.
    pub fn new(record: DeviceRecord, controller: Controller) -> Self {
        Self {
            name: record.name,
            mac: record.mac,
            not_blocked: !record.blocked,
            available: true,
            controller,
        }
    }

    pub fn mac(&self) -> &MacAddress {
        &self.mac
    }

    /// The session this switch issues commands through.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }
}

impl std::fmt::Debug for ClientBlockSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBlockSwitch")
            .field("name", &self.name)
            .field("mac", &self.mac)
            .field("not_blocked", &self.not_blocked)
            .field("available", &self.available)
            .field("controller", &self.controller.url().as_str())
            .finish()
    }
}

impl SwitchEntity for ClientBlockSwitch {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        self.mac.as_str()
    }

    fn is_on(&self) -> bool {
        self.not_blocked
    }

    fn available(&self) -> bool {
        self.available
    }

    async fn turn_on(&self) -> Result<(), CoreError> {
        debug!(mac = %self.mac, "requesting unblock");
        self.controller.unblock(&self.mac).await
    }

    async fn turn_off(&self) -> Result<(), CoreError> {
        debug!(mac = %self.mac, "requesting block");
        self.controller.block(&self.mac).await
    }

    async fn update(&mut self) -> Result<(), CoreError> {
        match self.controller.client_blocked(&self.mac).await {
            Ok(blocked) => {
                self.not_blocked = !blocked;
                self.available = true;
                Ok(())
            }
            Err(e) => {
                warn!(mac = %self.mac, error = %e, "switch update failed");
                self.available = false;
                Err(e)
            }
        }
    }
}
