//! `tandem config`: print the resolved startup configuration.

use std::io::{self, Write};

use tandem_core::Configuration;

/// Arguments for the `config` subcommand.
#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    /// Print as JSON instead of `key: value` lines.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ConfigArgs, config: &Configuration) -> anyhow::Result<()> {
    let text = if args.json {
        serde_json::to_string_pretty(config)?
    } else {
        render(config)
    };
    write_listing(&mut io::stdout(), &text)?;
    Ok(())
}

/// A reader that closed the pipe early (`tandem config | head`) is not an error.
fn write_listing(out: &mut impl Write, text: &str) -> io::Result<()> {
    match writeln!(out, "{text}") {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() { "(not set)" } else { value }
}

/// Human-readable `key: value` listing.
pub fn render(config: &Configuration) -> String {
    let paths = config.paths();
    let rows = [
        ("version", config.cli_version().to_string()),
        ("server_url", or_unset(config.server_url()).to_string()),
        ("webapp_url", or_unset(config.webapp_url()).to_string()),
        ("home_dir", paths.home_dir.display().to_string()),
        ("logs_dir", paths.logs_dir.display().to_string()),
        ("settings_file", paths.settings_file.display().to_string()),
        ("private_key_file", paths.private_key_file.display().to_string()),
        ("daemon_state_file", paths.daemon_state_file.display().to_string()),
        ("daemon_lock_file", paths.daemon_lock_file.display().to_string()),
        ("experimental", config.experimental_enabled().to_string()),
        ("caffeinate_disabled", config.caffeinate_disabled().to_string()),
    ];
    rows.iter()
        .map(|(key, value)| format!("{:<21}{value}", format!("{key}:")))
        .collect::<Vec<_>>()
        .join("\n")
}
