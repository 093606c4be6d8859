//! `list`, `on`, and `off`.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use groupblock_core::{ClientBlockSwitch, SwitchEntity};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SwitchView {
    name: String,
    mac: String,
    on: bool,
    available: bool,
}

impl From<&ClientBlockSwitch> for SwitchView {
    fn from(s: &ClientBlockSwitch) -> Self {
        Self {
            name: s.name().to_owned(),
            mac: s.unique_id().to_owned(),
            on: s.is_on(),
            available: s.available(),
        }
    }
}

#[derive(Tabled)]
struct SwitchRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "State")]
    state: String,
}

fn row(view: &SwitchView, color: bool) -> SwitchRow {
    let state = match (view.on, color) {
        (true, true) => "allowed".green().to_string(),
        (true, false) => "allowed".to_owned(),
        (false, true) => "blocked".red().to_string(),
        (false, false) => "blocked".to_owned(),
    };
    SwitchRow {
        name: view.name.clone(),
        mac: view.mac.clone(),
        state,
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(global: &GlobalOpts) -> Result<(), CliError> {
    let (_, switches) = super::setup(global).await?;
    super::disconnect(&switches).await;

    let views: Vec<SwitchView> = switches.iter().map(SwitchView::from).collect();
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &views,
        |v| row(v, color),
        |v| v.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Issue unblock (`on == true`) or block for one switch.
///
/// The displayed state is whatever setup enumerated; the command's effect
/// shows up on the next refresh.
pub async fn set(global: &GlobalOpts, target: &str, on: bool) -> Result<(), CliError> {
    let (_, switches) = super::setup(global).await?;

    let result = run_command(&switches, target, on).await;
    super::disconnect(&switches).await;
    let switch = result?;

    let verb = if on { "Unblock" } else { "Block" };
    output::print_output(
        &format!("{verb} requested for {} ({})", switch.name(), switch.unique_id()),
        global.quiet,
    );
    Ok(())
}

async fn run_command<'a>(
    switches: &'a [ClientBlockSwitch],
    target: &str,
    on: bool,
) -> Result<&'a ClientBlockSwitch, CliError> {
    let switch = super::find_switch(switches, target)?;
    if on {
        switch.turn_on().await?;
    } else {
        switch.turn_off().await?;
    }
    Ok(switch)
}
