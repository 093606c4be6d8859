pub mod config_cmd;
pub mod poll;
pub mod switches;

use groupblock_core::{ClientBlockSwitch, MacAddress, SwitchEntity, setup_platform};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::host::CliHost;
use crate::output;

/// Load and validate the config, then run platform setup.
///
/// Setup failures have already been printed as a notification by the time
/// the error is returned.
pub(crate) async fn setup(
    global: &GlobalOpts,
) -> Result<(groupblock_config::Config, Vec<ClientBlockSwitch>), CliError> {
    let path = global.config_path();
    let cfg = groupblock_config::load_config(&path)
        .map_err(|e| CliError::from_config(e, &path))?;
    let platform = cfg
        .to_platform_config()
        .map_err(|e| CliError::from_config(e, &path))?;

    let mut host = CliHost::new(output::should_color(&global.color));
    setup_platform(&platform, &mut host).await?;
    Ok((cfg, host.into_switches()))
}

/// Log out of the session the switches share.
pub(crate) async fn disconnect(switches: &[ClientBlockSwitch]) {
    if let Some(first) = switches.first() {
        first.controller().disconnect().await;
    }
}

/// Find a switch by MAC address, or by exact display name.
pub(crate) fn find_switch<'a>(
    switches: &'a [ClientBlockSwitch],
    identifier: &str,
) -> Result<&'a ClientBlockSwitch, CliError> {
    let mac = MacAddress::new(identifier);
    if let Some(found) = switches.iter().find(|s| *s.mac() == mac) {
        return Ok(found);
    }

    let by_name: Vec<&ClientBlockSwitch> = switches
        .iter()
        .filter(|s| s.name() == identifier)
        .collect();
    match by_name.as_slice() {
        [only] => Ok(*only),
        [] => Err(CliError::SwitchNotFound {
            identifier: identifier.to_owned(),
        }),
        many => Err(CliError::AmbiguousSwitch {
            identifier: identifier.to_owned(),
            count: many.len(),
        }),
    }
}
