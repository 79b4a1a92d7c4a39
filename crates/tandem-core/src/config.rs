//! Startup configuration resolution for Tandem.
//!
//! Resolution order for each value:
//! 1. CLI flags (`--server-url`, `--webapp-url` and aliases)
//! 2. Environment variables (`TANDEM_*`)
//! 3. Built-in defaults (`~/.tandem`, empty web-app URL)
//!
//! The result is a [`Configuration`] snapshot that is never mutated; callers
//! receive it by reference.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::args::{self, ParsedArgs};
use crate::env::{
    DISABLE_CAFFEINATE_VAR, EXPERIMENTAL_VAR, EnvSnapshot, SERVER_URL_VAR, TEST_HARNESS_VAR,
    WEBAPP_URL_VAR,
};
use crate::error::{Error, Result};
use crate::paths::HomeLayout;
use crate::web_auth;

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    server_url: String,
    webapp_url: String,
    is_daemon_process: bool,
    #[serde(flatten)]
    paths: HomeLayout,
    cli_version: String,
    experimental_enabled: bool,
    caffeinate_disabled: bool,
}

impl Configuration {
    /// Server URL; empty only for help/version invocations.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Web-app base URL; empty when never configured.
    pub fn webapp_url(&self) -> &str {
        &self.webapp_url
    }

    /// Whether web-browser authentication can be offered.
    pub fn supports_web_auth(&self) -> bool {
        !self.webapp_url.is_empty()
    }

    pub const fn is_daemon_process(&self) -> bool {
        self.is_daemon_process
    }

    pub const fn paths(&self) -> &HomeLayout {
        &self.paths
    }

    pub fn home_dir(&self) -> &Path {
        &self.paths.home_dir
    }

    pub fn logs_dir(&self) -> &Path {
        &self.paths.logs_dir
    }

    pub fn settings_file(&self) -> &Path {
        &self.paths.settings_file
    }

    pub fn private_key_file(&self) -> &Path {
        &self.paths.private_key_file
    }

    pub fn daemon_state_file(&self) -> &Path {
        &self.paths.daemon_state_file
    }

    pub fn daemon_lock_file(&self) -> &Path {
        &self.paths.daemon_lock_file
    }

    pub fn cli_version(&self) -> &str {
        &self.cli_version
    }

    pub const fn experimental_enabled(&self) -> bool {
        self.experimental_enabled
    }

    pub const fn caffeinate_disabled(&self) -> bool {
        self.caffeinate_disabled
    }

    /// Build the browser pairing URL for `public_key` from the configured web app.
    pub fn web_auth_url(&self, public_key: &[u8]) -> Result<String> {
        web_auth::web_auth_url(&self.webapp_url, public_key)
    }
}

/// Output of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: Configuration,
    /// Arguments left after the URL flags were removed, for command dispatch.
    pub args: Vec<String>,
}

/// Turns raw arguments and an environment snapshot into a [`Configuration`].
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    env: &'a EnvSnapshot,
    user_home: Option<PathBuf>,
    cli_version: String,
    allow_harness_fallback: bool,
}

impl<'a> Resolver<'a> {
    /// Create a resolver using the real user home directory.
    pub fn new(env: &'a EnvSnapshot, cli_version: impl Into<String>) -> Self {
        Self {
            env,
            user_home: dirs::home_dir(),
            cli_version: cli_version.into(),
            allow_harness_fallback: false,
        }
    }

    /// Override the user home directory used for defaults and `~` expansion.
    #[must_use]
    pub fn with_user_home(mut self, user_home: Option<PathBuf>) -> Self {
        self.user_home = user_home;
        self
    }

    /// Opt in to reading `TANDEM_SERVER_URL` when no server flag is given.
    ///
    /// Even when enabled, the fallback only applies while
    /// `TANDEM_TEST_HARNESS` is set to a truthy value.
    #[must_use]
    pub fn allow_harness_fallback(mut self, allow: bool) -> Self {
        self.allow_harness_fallback = allow;
        self
    }

    /// Resolve `argv` (program name excluded).
    ///
    /// Creates the root and logs directories as a side effect. Either a whole
    /// configuration is returned or nothing is.
    pub fn resolve<S: AsRef<str>>(&self, argv: &[S]) -> Result<Resolved> {
        let ParsedArgs {
            server_url,
            webapp_url,
            cleaned_args,
        } = args::parse_url_args(argv)?;

        let server_url = match server_url.or_else(|| self.harness_server_url()) {
            Some(url) => url,
            None if args::requires_server_url(argv) => return Err(Error::MissingServerUrl),
            None => String::new(),
        };

        let webapp_url = webapp_url
            .or_else(|| self.env.get(WEBAPP_URL_VAR).map(str::to_string))
            .unwrap_or_default();

        let paths = HomeLayout::resolve(self.env, self.user_home.as_deref())?;
        paths.ensure_dirs()?;

        let config = Configuration {
            server_url,
            webapp_url,
            is_daemon_process: args::is_daemon_invocation(argv),
            paths,
            cli_version: self.cli_version.clone(),
            experimental_enabled: self.env.flag(EXPERIMENTAL_VAR),
            caffeinate_disabled: self.env.flag(DISABLE_CAFFEINATE_VAR),
        };

        Ok(Resolved {
            config,
            args: cleaned_args,
        })
    }

    fn harness_server_url(&self) -> Option<String> {
        if !self.allow_harness_fallback || !self.env.flag(TEST_HARNESS_VAR) {
            return None;
        }
        self.env.get(SERVER_URL_VAR).map(str::to_string)
    }
}
