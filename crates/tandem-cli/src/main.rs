//! Tandem CLI
//!
//! Resolves the startup configuration from URL flags and environment first,
//! then dispatches subcommands on the remaining arguments.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::{debug, error, info};

use tandem_cli::auth_cmd::{self, AuthAction};
use tandem_cli::config_cmd::{self, ConfigArgs};
use tandem_cli::daemon_cmd::{self, DaemonAction};
use tandem_core::env::LOG_JSON_VAR;
use tandem_core::tracing_init::{self, LogTarget};
use tandem_core::{Configuration, EnvSnapshot, Resolver};

const DEFAULT_LOG_FILTER: &str = "tandem_cli=info,tandem_core=info";

const CONNECTION_HELP: &str = "\
Connection flags (accepted anywhere on the command line):
  --server-url <url>, --server <url>   Server URL (required)
  --webapp-url <url>, --webapp <url>   Web app URL for browser pairing [env: TANDEM_WEBAPP_URL]";

#[derive(Parser, Debug)]
#[command(
    name = "tandem",
    about = "Terminal client for Tandem",
    after_help = CONNECTION_HELP,
    disable_version_flag = true
)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", global = true)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Pair this terminal with your account
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Show the resolved configuration
    Config(ConfigArgs),
    /// Manage the background sync daemon
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
}

impl Commands {
    /// Commands that draw on the terminal or run detached log to a file.
    const fn logs_to_file(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::Daemon { .. })
    }
}

#[allow(clippy::print_stderr)]
fn report_fatal(message: &dyn std::fmt::Display) {
    eprintln!("{message}");
}

#[tokio::main]
async fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let env = EnvSnapshot::capture();

    // Resolution must finish before anything else reads configuration.
    let resolved = match Resolver::new(&env, env!("CARGO_PKG_VERSION")).resolve(&argv) {
        Ok(resolved) => resolved,
        Err(e) => {
            report_fatal(&e);
            return ExitCode::FAILURE;
        }
    };
    let config = resolved.config;

    let cli = match Cli::try_parse_from(std::iter::once("tandem".to_string()).chain(resolved.args))
    {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if cli.version {
        let _ = writeln!(io::stdout(), "tandem {}", config.cli_version());
        return ExitCode::SUCCESS;
    }
    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    let target = if command.logs_to_file() || config.is_daemon_process() {
        LogTarget::File(config.logs_dir().to_path_buf())
    } else {
        LogTarget::Stderr
    };
    tracing_init::init_tracing(
        tracing_init::filter_directives(&env, DEFAULT_LOG_FILTER),
        env.flag(LOG_JSON_VAR),
        &target,
    );

    info!(
        version = config.cli_version(),
        server = config.server_url(),
        home = %config.home_dir().display(),
        "Starting tandem CLI"
    );
    debug!(
        home = %config.home_dir().display(),
        logs = %config.logs_dir().display(),
        "home directories ready"
    );

    match run(command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            report_fatal(&format_args!("Error: {e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &Configuration) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => auth_cmd::run(action, config),
        Commands::Config(args) => config_cmd::run(&args, config),
        Commands::Daemon { action } => daemon_cmd::run(action, config).await,
    }
}
