//! Auth subcommands: login.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use tandem_core::Configuration;
use tandem_crypto::EphemeralKeyPair;

use crate::tui::{self, AuthMethod, AuthSelector, SelectorOutcome};

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Pair this terminal with your account.
    Login {
        /// Skip the interactive prompt and use this method.
        #[arg(long, value_enum)]
        method: Option<MethodChoice>,
    },
}

/// `--method` values.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodChoice {
    Mobile,
    Web,
}

impl From<MethodChoice> for AuthMethod {
    fn from(choice: MethodChoice) -> Self {
        match choice {
            MethodChoice::Mobile => Self::Mobile,
            MethodChoice::Web => Self::Web,
        }
    }
}

/// Execute an auth subcommand.
pub fn run(action: AuthAction, config: &Configuration) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { method } => login(config, method),
    }
}

fn login(config: &Configuration, method: Option<MethodChoice>) -> anyhow::Result<()> {
    let mut out = io::stdout();

    let method = match method {
        Some(choice) => AuthMethod::from(choice),
        None => {
            let selector = AuthSelector::new(config.supports_web_auth());
            match tokio::task::block_in_place(|| tui::run_auth_selector(selector))? {
                SelectorOutcome::Selected(method) => method,
                SelectorOutcome::Cancelled => {
                    tracing::info!("authentication cancelled by user");
                    writeln!(out, "Authentication cancelled")?;
                    return Ok(());
                }
            }
        }
    };

    let key = EphemeralKeyPair::generate();
    tracing::info!(%method, key = %key.short_id(), server = config.server_url(), "starting pairing");

    let text = pairing_instructions(config, method, &key.public_bytes())?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Text telling the user how to finish pairing with `public_key`.
pub fn pairing_instructions(
    config: &Configuration,
    method: AuthMethod,
    public_key: &[u8],
) -> anyhow::Result<String> {
    Ok(match method {
        AuthMethod::Web => {
            let url = config.web_auth_url(public_key)?;
            format!("Open this URL in your browser to connect this terminal:\n\n  {url}\n")
        }
        AuthMethod::Mobile => {
            let code = URL_SAFE_NO_PAD.encode(public_key);
            format!(
                "Open the Tandem mobile app, choose \"Connect terminal\" and enter:\n\n  {code}\n\nServer: {}",
                config.server_url()
            )
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tandem_core::{EnvSnapshot, Error, Resolver};

    fn config(argv: &[&str], home: &std::path::Path) -> Configuration {
        Resolver::new(&EnvSnapshot::default(), "0.0.0")
            .with_user_home(Some(home.to_path_buf()))
            .resolve(argv)
            .unwrap()
            .config
    }

    #[test]
    fn web_instructions_contain_connect_url() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(&["--server", "https://s.test", "--webapp", "https://w.test"], tmp.path());
        let text = pairing_instructions(&cfg, AuthMethod::Web, &[0xfb, 0xff]).unwrap();
        assert!(text.contains("https://w.test/terminal/connect#key=-_8"));
    }

    #[test]
    fn web_instructions_fail_without_webapp_url() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(&["--server", "https://s.test"], tmp.path());
        let err = pairing_instructions(&cfg, AuthMethod::Web, &[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ConfigurationMissing)
        ));
    }

    #[test]
    fn mobile_instructions_contain_code_and_server() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(&["--server", "https://s.test"], tmp.path());
        let text = pairing_instructions(&cfg, AuthMethod::Mobile, &[0xfb, 0xff]).unwrap();
        assert!(text.contains("  -_8\n"));
        assert!(text.contains("Server: https://s.test"));
    }

    #[test]
    fn method_choice_maps_to_auth_method() {
        assert_eq!(AuthMethod::from(MethodChoice::Mobile), AuthMethod::Mobile);
        assert_eq!(AuthMethod::from(MethodChoice::Web), AuthMethod::Web);
    }
}
