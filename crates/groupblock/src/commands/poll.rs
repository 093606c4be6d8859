//! `poll`: refresh every switch on an interval until Ctrl-C.

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use groupblock_core::{ClientBlockSwitch, SwitchEntity};

use crate::cli::{GlobalOpts, PollArgs};
use crate::error::CliError;
use crate::output;

pub async fn run(global: &GlobalOpts, args: &PollArgs) -> Result<(), CliError> {
    let (cfg, mut switches) = super::setup(global).await?;
    let period = args
        .interval
        .map_or_else(|| cfg.poll_interval(), Duration::from_secs);

    info!(switches = switches.len(), ?period, "polling");

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("interrupted");
                break;
            }
            _ = ticker.tick() => {
                for switch in &mut switches {
                    refresh(switch, global.quiet).await;
                }
            }
        }
    }

    super::disconnect(&switches).await;
    Ok(())
}

/// What a poll can observe about one switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Observed {
    on: bool,
    available: bool,
}

impl Observed {
    fn of(switch: &ClientBlockSwitch) -> Self {
        Self {
            on: switch.is_on(),
            available: switch.available(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self {
                available: false, ..
            } => "unavailable",
            Self { on: true, .. } => "allowed",
            Self { on: false, .. } => "blocked",
        }
    }
}

/// One update; failures were already logged by the switch.
async fn refresh(switch: &mut ClientBlockSwitch, quiet: bool) {
    let before = Observed::of(switch);
    let _ = switch.update().await;
    let after = Observed::of(switch);

    if before != after {
        info!(
            mac = switch.unique_id(),
            on = after.on,
            available = after.available,
            "state changed"
        );
        output::print_output(
            &format!(
                "{} ({}): {} -> {}",
                switch.name(),
                switch.unique_id(),
                before.describe(),
                after.describe()
            ),
            quiet,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_hides_cached_state() {
        let stale_on = Observed {
            on: true,
            available: false,
        };
        assert_eq!(stale_on.describe(), "unavailable");
    }

    #[test]
    fn available_switch_reports_block_state() {
        let on = Observed {
            on: true,
            available: true,
        };
        let off = Observed {
            on: false,
            available: true,
        };
        assert_eq!(on.describe(), "allowed");
        assert_eq!(off.describe(), "blocked");
    }
}
