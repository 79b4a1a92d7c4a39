//! Environment variable snapshot.
//!
//! The process environment is captured once in `main` and handed to the
//! resolver as a value. Nothing in the workspace writes to the process
//! environment.

use std::collections::HashMap;

/// Server URL override. Only consulted through the test-harness fallback.
pub const SERVER_URL_VAR: &str = "TANDEM_SERVER_URL";
/// Web-app URL fallback when no `--webapp-url` flag is given.
pub const WEBAPP_URL_VAR: &str = "TANDEM_WEBAPP_URL";
/// Root directory override; a leading `~` is expanded.
pub const HOME_DIR_VAR: &str = "TANDEM_HOME_DIR";
pub const EXPERIMENTAL_VAR: &str = "TANDEM_EXPERIMENTAL";
pub const DISABLE_CAFFEINATE_VAR: &str = "TANDEM_DISABLE_CAFFEINATE";
/// Marks a process as running under an automated test harness.
pub const TEST_HARNESS_VAR: &str = "TANDEM_TEST_HARNESS";
/// Switches log output to JSON lines.
pub const LOG_JSON_VAR: &str = "TANDEM_LOG_JSON";
/// Tracing filter directives.
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

/// Tokens accepted as "on" for boolean environment toggles (case-insensitive).
pub const TRUTHY_TOKENS: [&str; 3] = ["true", "1", "yes"];

/// Whether `value` is one of [`TRUTHY_TOKENS`], ignoring ASCII case.
pub fn is_truthy(value: &str) -> bool {
    TRUTHY_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}

/// Immutable view of environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    pub fn capture() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Look up a variable. Empty values are treated as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Parse a boolean toggle against [`TRUTHY_TOKENS`]. Unset means `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
