//! URL flag extraction from the raw argument list.
//!
//! Two flag families are recognized, each accepting `--flag <value>` and
//! `--flag=<value>`:
//!
//! | Family | Names                        |
//! |--------|------------------------------|
//! | server | `--server-url`, `--server`   |
//! | webapp | `--webapp-url`, `--webapp`   |
//!
//! Every other token is passed through untouched so `clap` can dispatch
//! subcommands on the cleaned list afterwards.

use crate::error::{Error, Result};

/// Tokens that exempt an invocation from the server URL requirement.
pub const HELP_VERSION_FLAGS: [&str; 4] = ["--help", "-h", "--version", "-v"];

/// Subcommand + action marking a background daemon launch.
pub const DAEMON_SENTINEL: [&str; 2] = ["daemon", "start-sync"];

#[derive(Debug, Clone, Copy)]
enum Target {
    Server,
    Webapp,
}

struct FlagFamily {
    names: &'static [&'static str],
    example_url: &'static str,
    target: Target,
}

const FAMILIES: [FlagFamily; 2] = [
    FlagFamily {
        names: &["--server-url", "--server"],
        example_url: "https://api.example.com",
        target: Target::Server,
    },
    FlagFamily {
        names: &["--webapp-url", "--webapp"],
        example_url: "https://webapp.example.com",
        target: Target::Webapp,
    },
];

/// Result of stripping the URL flags out of an argument list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Last server URL given, if any.
    pub server_url: Option<String>,
    /// Last web-app URL given, if any.
    pub webapp_url: Option<String>,
    /// All unrecognized tokens, in their original order.
    pub cleaned_args: Vec<String>,
}

impl ParsedArgs {
    fn set(&mut self, target: Target, value: &str) {
        let slot = match target {
            Target::Server => &mut self.server_url,
            Target::Webapp => &mut self.webapp_url,
        };
        *slot = Some(value.to_string());
    }
}

/// Whether a flag value is usable: present and not itself flag-like.
fn is_usable_value(value: &str) -> bool {
    !value.is_empty() && !value.starts_with('-')
}

/// Extract server and web-app URL flags from `argv`.
///
/// A later occurrence of the same family overwrites an earlier one.
pub fn parse_url_args<S: AsRef<str>>(argv: &[S]) -> Result<ParsedArgs> {
    let mut parsed = ParsedArgs::default();
    let mut i = 0;

    'tokens: while i < argv.len() {
        let arg = argv[i].as_ref();

        for family in &FAMILIES {
            for &name in family.names {
                if arg == name {
                    let value = match argv.get(i + 1) {
                        Some(next) => next.as_ref(),
                        None => "",
                    };
                    if !is_usable_value(value) {
                        return Err(Error::MissingFlagValue {
                            flag: name.to_string(),
                            example: format!("{name} {}", family.example_url),
                        });
                    }
                    parsed.set(family.target, value);
                    i += 2;
                    continue 'tokens;
                }

                if let Some(value) = arg
                    .strip_prefix(name)
                    .and_then(|rest| rest.strip_prefix('='))
                {
                    if !is_usable_value(value) {
                        return Err(Error::MissingFlagValue {
                            flag: name.to_string(),
                            example: format!("{name}={}", family.example_url),
                        });
                    }
                    parsed.set(family.target, value);
                    i += 1;
                    continue 'tokens;
                }
            }
        }

        parsed.cleaned_args.push(arg.to_string());
        i += 1;
    }

    Ok(parsed)
}

/// Whether the invocation must supply a server URL (i.e. is not help/version).
pub fn requires_server_url<S: AsRef<str>>(argv: &[S]) -> bool {
    !argv
        .iter()
        .any(|arg| HELP_VERSION_FLAGS.contains(&arg.as_ref()))
}

/// Whether the raw arguments start with `daemon start-sync`.
pub fn is_daemon_invocation<S: AsRef<str>>(argv: &[S]) -> bool {
    argv.len() >= DAEMON_SENTINEL.len()
        && argv
            .iter()
            .zip(DAEMON_SENTINEL)
            .all(|(arg, expected)| arg.as_ref() == expected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> ParsedArgs {
        parse_url_args(argv).unwrap()
    }

    fn missing_flag(argv: &[&str]) -> (String, String) {
        match parse_url_args(argv) {
            Err(Error::MissingFlagValue { flag, example }) => (flag, example),
            other => panic!("expected MissingFlagValue, got {other:?}"),
        }
    }

    // -- Space-separated form --

    #[test]
    fn server_url_space_form() {
        let parsed = parse(&["auth", "--server-url", "https://a.test", "login"]);
        assert_eq!(parsed.server_url.as_deref(), Some("https://a.test"));
        assert_eq!(parsed.cleaned_args, vec!["auth", "login"]);
    }

    #[test]
    fn short_alias_space_form() {
        let parsed = parse(&["--server", "https://a.test", "--webapp", "https://w.test"]);
        assert_eq!(parsed.server_url.as_deref(), Some("https://a.test"));
        assert_eq!(parsed.webapp_url.as_deref(), Some("https://w.test"));
        assert!(parsed.cleaned_args.is_empty());
    }

    // -- Equals form --

    #[test]
    fn equals_form() {
        let parsed = parse(&["--server=https://a.test", "--webapp-url=https://w.test", "x"]);
        assert_eq!(parsed.server_url.as_deref(), Some("https://a.test"));
        assert_eq!(parsed.webapp_url.as_deref(), Some("https://w.test"));
        assert_eq!(parsed.cleaned_args, vec!["x"]);
    }

    #[test]
    fn equals_form_keeps_everything_after_first_equals() {
        let parsed = parse(&["--server-url=https://a.test/?x=1"]);
        assert_eq!(parsed.server_url.as_deref(), Some("https://a.test/?x=1"));
    }

    #[test]
    fn similar_prefix_is_not_a_flag() {
        let parsed = parse(&["--server-urls", "--serverx=1", "--webapp-urlx"]);
        assert_eq!(parsed.server_url, None);
        assert_eq!(parsed.webapp_url, None);
        assert_eq!(
            parsed.cleaned_args,
            vec!["--server-urls", "--serverx=1", "--webapp-urlx"]
        );
    }

    // -- Ordering --

    #[test]
    fn last_occurrence_wins() {
        let parsed = parse(&["--server-url", "A", "--server", "B"]);
        assert_eq!(parsed.server_url.as_deref(), Some("B"));

        let parsed = parse(&["--webapp=B", "--webapp-url", "A"]);
        assert_eq!(parsed.webapp_url.as_deref(), Some("A"));
    }

    #[test]
    fn unrelated_tokens_keep_order_and_duplicates() {
        let parsed = parse(&["a", "b", "--server", "S", "a", "-x", "b"]);
        assert_eq!(parsed.cleaned_args, vec!["a", "b", "a", "-x", "b"]);
    }

    // -- Missing values --

    #[test]
    fn trailing_flag_is_missing_value() {
        let (flag, example) = missing_flag(&["daemon", "--server-url"]);
        assert_eq!(flag, "--server-url");
        assert_eq!(example, "--server-url https://api.example.com");
    }

    #[test]
    fn flag_followed_by_flag_is_missing_value() {
        let (flag, example) = missing_flag(&["--webapp", "--server", "S"]);
        assert_eq!(flag, "--webapp");
        assert_eq!(example, "--webapp https://webapp.example.com");
    }

    #[test]
    fn empty_equals_value_is_missing_value() {
        let (flag, example) = missing_flag(&["--server="]);
        assert_eq!(flag, "--server");
        assert_eq!(example, "--server=https://api.example.com");
    }

    #[test]
    fn missing_value_message_names_flag_and_example() {
        let err = parse_url_args(&["--webapp-url"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing value for --webapp-url. Example: --webapp-url https://webapp.example.com"
        );
    }

    // -- Gates --

    #[test]
    fn help_and_version_exempt_server_url() {
        for flag in HELP_VERSION_FLAGS {
            assert!(!requires_server_url(&["auth", flag]), "{flag}");
        }
        assert!(requires_server_url(&["auth", "login"]));
        assert!(requires_server_url::<&str>(&[]));
    }

    #[test]
    fn daemon_sentinel_detection() {
        assert!(is_daemon_invocation(&["daemon", "start-sync"]));
        assert!(is_daemon_invocation(&["daemon", "start-sync", "--extra"]));
        assert!(!is_daemon_invocation(&["daemon", "stop"]));
        assert!(!is_daemon_invocation(&["daemon"]));
        assert!(!is_daemon_invocation::<&str>(&[]));
        assert!(!is_daemon_invocation(&["--server", "S", "daemon", "start-sync"]));
    }
}
