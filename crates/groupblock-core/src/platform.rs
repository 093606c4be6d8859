// ── Platform setup ──
//
// Connect once, resolve the configured group, and hand one switch per member
// to the host. All-or-nothing: on failure nothing is registered.

use tracing::{debug, error, info, warn};

use crate::config::PlatformConfig;
use crate::controller::Controller;
use crate::error::SetupError;
use crate::model::{DeviceRecord, TargetUserGroup};
use crate::switch::ClientBlockSwitch;

/// Identifier shared by every setup-failure notification.
pub const NOTIFICATION_ID: &str = "unifi_device_block";

/// Title shared by every setup-failure notification.
pub const NOTIFICATION_TITLE: &str = "Unifi Device Block";

/// A persistent user-visible message raised when setup fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub notification_id: String,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            notification_id: NOTIFICATION_ID.to_owned(),
            title: NOTIFICATION_TITLE.to_owned(),
            message: message.into(),
        }
    }
}

/// The host side of the platform contract.
pub trait PlatformHost {
    /// Register the discovered switches. Called at most once per setup.
    fn add_entities(&mut self, switches: Vec<ClientBlockSwitch>);

    /// Show a persistent notification to the user.
    fn notify(&mut self, notification: Notification);
}

/// Connect, resolve the group, and build one switch per member.
///
/// Clients whose group-membership field is absent are skipped. The session
/// is logged out again if anything after login fails, and when the group has
/// no members, since no switch is left holding it.
pub async fn discover_switches(
    config: &PlatformConfig,
) -> Result<Vec<ClientBlockSwitch>, SetupError> {
    let controller = Controller::connect(&config.connection)
        .await
        .map_err(SetupError::Connection)?;

    match enumerate(&controller, &config.user_group_name).await {
        Ok(records) if records.is_empty() => {
            controller.disconnect().await;
            Ok(Vec::new())
        }
        Ok(records) => Ok(records
            .into_iter()
            .map(|r| ClientBlockSwitch::new(r, controller.clone()))
            .collect()),
        Err(e) => {
            controller.disconnect().await;
            Err(e)
        }
    }
}

async fn enumerate(
    controller: &Controller,
    group_name: &str,
) -> Result<Vec<DeviceRecord>, SetupError> {
    let groups = controller
        .user_groups()
        .await
        .map_err(SetupError::Enumeration)?;

    let target = TargetUserGroup::resolve(group_name, &groups).ok_or_else(|| {
        SetupError::GroupNotFound {
            name: group_name.to_owned(),
        }
    })?;
    debug!(group = target.name(), id = target.id(), "resolved user group");

    let users = controller.users().await.map_err(SetupError::Enumeration)?;
    let total = users.len();

    let records: Vec<DeviceRecord> = users
        .iter()
        .filter(|u| target.contains(u))
        .map(DeviceRecord::from)
        .collect();

    debug!(total, members = records.len(), "filtered clients by group");
    Ok(records)
}

/// Run setup against a host: register the switches, or log and notify.
///
/// Returns the number of registered switches.
pub async fn setup_platform(
    config: &PlatformConfig,
    host: &mut impl PlatformHost,
) -> Result<usize, SetupError> {
    match discover_switches(config).await {
        Ok(switches) => {
            let count = switches.len();
            if count == 0 {
                warn!(group = %config.user_group_name, "user group has no known clients");
            }
            host.add_entities(switches);
            info!(count, group = %config.user_group_name, "registered client switches");
            Ok(count)
        }
        Err(e) => {
            error!(error = %e, "platform setup failed");
            if let Some(notification) = e.notification() {
                host.notify(notification);
            }
            Err(e)
        }
    }
}
