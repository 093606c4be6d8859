//! The CLI's side of the platform contract: collect switches, print
//! notifications to stderr.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use groupblock_core::{ClientBlockSwitch, Notification, PlatformHost};

pub struct CliHost {
    switches: Vec<ClientBlockSwitch>,
    color: bool,
}

impl CliHost {
    pub fn new(color: bool) -> Self {
        Self {
            switches: Vec::new(),
            color,
        }
    }

    pub fn into_switches(self) -> Vec<ClientBlockSwitch> {
        self.switches
    }
}

impl PlatformHost for CliHost {
    fn add_entities(&mut self, switches: Vec<ClientBlockSwitch>) {
        self.switches.extend(switches);
    }

    fn notify(&mut self, notification: Notification) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{}", notification.title.bold().red());
        } else {
            let _ = writeln!(stderr, "{}", notification.title);
        }
        let _ = writeln!(stderr, "{}", notification.message);
    }
}
