//! Domain entities: subcommands, revisions, global options

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;
use super::options::{OptionSet, OptionValue};

/// Executable invoked when nothing else is configured.
pub const DEFAULT_EXECUTABLE: &str = "svn";

/// Default `--config-option`: force basic HTTP auth.
pub const DEFAULT_CONFIG_OPTION: &str = "servers:global:http-auth-types=basic";

/// Placeholder shown instead of secrets in logs and config dumps.
pub const MASK: &str = "********";

/// Supported svn subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    Checkout,
    Add,
    Commit,
    Cat,
    Info,
    Update,
    Log,
    Diff,
    List,
    Cleanup,
}

impl Subcommand {
    pub const ALL: [Subcommand; 10] = [
        Subcommand::Checkout,
        Subcommand::Add,
        Subcommand::Commit,
        Subcommand::Cat,
        Subcommand::Info,
        Subcommand::Update,
        Subcommand::Log,
        Subcommand::Diff,
        Subcommand::List,
        Subcommand::Cleanup,
    ];

    /// Literal passed to svn as the first argument.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcommand::Checkout => "checkout",
            Subcommand::Add => "add",
            Subcommand::Commit => "commit",
            Subcommand::Cat => "cat",
            Subcommand::Info => "info",
            Subcommand::Update => "update",
            Subcommand::Log => "log",
            Subcommand::Diff => "diff",
            Subcommand::List => "list",
            Subcommand::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Revision argument as svn understands it.
///
/// Accepts numbers (`52983`), keywords (`HEAD`, `BASE`, `PREV`),
/// dates (`{2018-02-01}`) and ranges (`100:HEAD`). The text is passed
/// through; only values svn would misread as a flag are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.starts_with('-') {
            return Err(DomainError::InvalidRevision(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn head() -> Self {
        Self("HEAD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Revision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for Revision {
    fn from(number: u64) -> Self {
        Self(number.to_string())
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options attached to every invocation.
///
/// Immutable once a session holds it; build a new value to change credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    /// `--no-auth-cache`
    pub no_auth_cache: bool,
    /// `--non-interactive`
    pub non_interactive: bool,
    /// `--trust-server-cert`
    pub trust_server_cert: bool,
    /// `--config-option <value>`
    pub config_option: Option<String>,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            no_auth_cache: true,
            non_interactive: true,
            trust_server_cert: true,
            config_option: Some(DEFAULT_CONFIG_OPTION.to_string()),
        }
    }
}

impl GlobalOptions {
    /// Defaults plus the given credentials.
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Build the option set in a fixed order.
    ///
    /// Empty credentials are left out: a bare `--username` would make svn
    /// swallow the next token as the user name.
    pub fn to_option_set(&self) -> OptionSet {
        let mut set = OptionSet::new();
        if let Some(username) = non_empty(&self.username) {
            set.insert("--username", OptionValue::scalar(username));
        }
        if let Some(password) = non_empty(&self.password) {
            set.insert("--password", OptionValue::scalar(password));
        }
        if self.no_auth_cache {
            set.insert("--no-auth-cache", OptionValue::Flag);
        }
        if self.non_interactive {
            set.insert("--non-interactive", OptionValue::Flag);
        }
        if self.trust_server_cert {
            set.insert("--trust-server-cert", OptionValue::Flag);
        }
        if let Some(config_option) = non_empty(&self.config_option) {
            set.insert("--config-option", OptionValue::scalar(config_option));
        }
        set
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Copy of `argv` with the value following `--password` masked.
pub fn redact_argv(argv: &[String]) -> Vec<String> {
    let mut redacted = Vec::with_capacity(argv.len());
    let mut mask_next = false;
    for token in argv {
        if mask_next {
            redacted.push(MASK.to_string());
            mask_next = false;
            continue;
        }
        mask_next = token == "--password";
        redacted.push(token.clone());
    }
    redacted
}

/// Expand environment variables and tilde in a string.
///
/// Supports:
/// - `$VAR` syntax
/// - `${VAR}` syntax
/// - `~` for home directory
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
