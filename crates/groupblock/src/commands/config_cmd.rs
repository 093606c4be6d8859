//! Config subcommand handlers.

use std::fmt::Write as _;

use groupblock_config::{Config, KEYRING_SERVICE, VerifySsl};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global.config_path();

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = groupblock_config::load_config(&path)
                .map_err(|e| CliError::from_config(e, &path))?
                .redacted();
            let out = output::render_single(
                &global.output,
                &cfg,
                format_config,
                |c| c.host.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = groupblock_config::load_config(&path)
                .map_err(|e| CliError::from_config(e, &path))?;
            if cfg.username.as_deref().is_none_or(|u| u.trim().is_empty()) {
                return Err(CliError::Validation {
                    field: "username".into(),
                    reason: "is required to name the keyring entry".into(),
                    path: path.display().to_string(),
                });
            }

            let password = rpassword::prompt_password("Password: ")?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "must not be empty".into(),
                    path: path.display().to_string(),
                });
            }

            let entry_name = cfg.keyring_entry();
            keyring::Entry::new(KEYRING_SERVICE, &entry_name)?.set_password(&password)?;
            output::print_output(
                &format!("Password stored in keyring as {KEYRING_SERVICE}/{entry_name}"),
                global.quiet,
            );
            Ok(())
        }
    }
}

/// TOML-like view of the resolved configuration.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "host = \"{}\"", cfg.host);
    let _ = writeln!(out, "port = {}", cfg.port);
    let _ = writeln!(out, "site_id = \"{}\"", cfg.site_id);
    if let Some(ref u) = cfg.username {
        let _ = writeln!(out, "username = \"{u}\"");
    }
    if let Some(ref p) = cfg.password {
        let _ = writeln!(out, "password = \"{p}\"");
    }
    match cfg.verify_ssl {
        VerifySsl::Flag(flag) => {
            let _ = writeln!(out, "verify_ssl = {flag}");
        }
        VerifySsl::CaPath(ref ca) => {
            let _ = writeln!(out, "verify_ssl = \"{}\"", ca.display());
        }
    }
    let _ = writeln!(out, "timeout = {}", cfg.timeout);
    let _ = writeln!(out, "write_timeout = {}", cfg.write_timeout);
    if let Some(ref g) = cfg.user_group_name {
        let _ = writeln!(out, "user_group_name = \"{g}\"");
    }
    let _ = writeln!(out, "version = \"{}\"", tag(&cfg.version));
    let _ = writeln!(out, "scheme = \"{}\"", tag(&cfg.scheme));
    let _ = write!(out, "poll_interval = {}", cfg.poll_interval);
    out
}

/// The serde name of a unit enum variant.
fn tag<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}
