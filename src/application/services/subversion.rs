//! Subversion session: argument assembly and process dispatch
//!
//! Every operation builds a [`CallArguments`] value and hands it to
//! [`Subversion::invoke`], which prepends the subcommand and the global
//! options, runs the executable and returns stdout on success or stderr
//! on failure. A failing svn process is not an error here; only a process
//! that cannot be spawned yields `Err`.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    redact_argv, CallArguments, GlobalOptions, OptionSet, OptionValue, Revision,
    Subcommand, DEFAULT_EXECUTABLE,
};
use crate::infrastructure::traits::{CommandRunner, RealCommandRunner};

/// Captured result of one svn run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnOutput {
    pub success: bool,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl SvnOutput {
    /// stdout on success, stderr otherwise.
    pub fn into_text(self) -> String {
        if self.success {
            self.stdout
        } else {
            self.stderr
        }
    }
}

/// A svn session: process runner plus an immutable options snapshot.
///
/// Cloning is cheap; changing credentials returns a new session.
#[derive(Clone)]
pub struct Subversion {
    cmd: Arc<dyn CommandRunner>,
    executable: String,
    options: Arc<GlobalOptions>,
}

impl Subversion {
    /// Session running the system `svn` with the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_runner(
            Arc::new(RealCommandRunner),
            DEFAULT_EXECUTABLE,
            GlobalOptions::with_credentials(username, password),
        )
    }

    /// Session with an explicit runner (used by tests and the service container).
    pub fn with_runner(
        cmd: Arc<dyn CommandRunner>,
        executable: impl Into<String>,
        options: GlobalOptions,
    ) -> Self {
        Self {
            cmd,
            executable: executable.into(),
            options: Arc::new(options),
        }
    }

    /// Session configured from loaded settings.
    pub fn from_settings(settings: &Settings, cmd: Arc<dyn CommandRunner>) -> Self {
        Self::with_runner(cmd, settings.executable.clone(), settings.global_options())
    }

    /// New session sharing the runner, with other credentials.
    pub fn with_credentials(&self, username: impl Into<String>, password: impl Into<String>) -> Self {
        let options = GlobalOptions {
            username: Some(username.into()),
            password: Some(password.into()),
            ..(*self.options).clone()
        };
        Self {
            cmd: Arc::clone(&self.cmd),
            executable: self.executable.clone(),
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// `[subcommand] + global options + call arguments`
    pub fn build_argv(&self, subcommand: Subcommand, arguments: CallArguments) -> Vec<String> {
        let mut argv = vec![subcommand.as_str().to_string()];
        argv.extend(self.options.to_option_set().serialize());
        argv.extend(arguments.into_argv());
        argv
    }

    /// Run svn and return the full captured result.
    #[instrument(level = "debug", skip(self, arguments), fields(executable = %self.executable))]
    pub fn run(&self, subcommand: Subcommand, arguments: CallArguments) -> ApplicationResult<SvnOutput> {
        let argv = self.build_argv(subcommand, arguments);
        debug!("argv: {:?}", redact_argv(&argv));

        let args: Vec<&str> = argv.iter().map(String::as_str).collect();
        let output = self
            .cmd
            .run(&self.executable, &args)
            .with_context(format!("run {} {}", self.executable, subcommand))?;

        let result = SvnOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            "run: success={}, exit_code={:?}, stdout={}B, stderr={}B",
            result.success,
            result.exit_code,
            result.stdout.len(),
            result.stderr.len()
        );
        Ok(result)
    }

    /// Run svn; stdout if it succeeded, stderr if it did not.
    pub fn invoke(&self, subcommand: Subcommand, arguments: CallArguments) -> ApplicationResult<String> {
        self.run(subcommand, arguments).map(SvnOutput::into_text)
    }

    // ============================================================
    // Argument assembly per subcommand
    // ============================================================

    pub fn checkout_args(url: &str, path: Option<&str>, revision: Option<Revision>) -> CallArguments {
        let mut options = OptionSet::new().flag(url);
        if let Some(path) = path {
            options.insert(path, OptionValue::Flag);
        }
        if let Some(rev) = revision {
            options.insert("--revision", OptionValue::scalar(rev));
        }
        options.into()
    }

    /// An empty path list is passed through; svn then commits `.`.
    pub fn commit_args(paths: &[String], message: &str) -> CallArguments {
        let mut tokens = vec![
            "--force-log".to_string(),
            "--message".to_string(),
            message.to_string(),
        ];
        tokens.extend(paths.iter().cloned());
        tokens.into()
    }

    pub fn add_args(path: &str) -> CallArguments {
        CallArguments::positional(["--force", path])
    }

    /// Shared shape of `cat` and `info`.
    pub fn target_args(path: &str, revision: Option<Revision>) -> CallArguments {
        let mut options = OptionSet::new().flag(path);
        if let Some(rev) = revision {
            options.insert("--revision", OptionValue::scalar(rev));
        }
        options.into()
    }

    pub fn log_args(paths: &[String], revision: Option<Revision>) -> CallArguments {
        let mut tokens = vec!["--xml".to_string()];
        tokens.extend(revision_tokens(revision));
        tokens.extend(paths.iter().cloned());
        tokens.into()
    }

    pub fn update_args(paths: &[String], revision: Option<Revision>) -> CallArguments {
        let mut tokens = revision_tokens(revision);
        tokens.extend(paths.iter().cloned());
        tokens.into()
    }

    /// `--old path@old`, `--new path[@new]`; svn reads a bare `--new`
    /// target as its working-copy state.
    pub fn diff_args(
        path: &str,
        summarize: bool,
        old_revision: &Revision,
        new_revision: Option<&Revision>,
    ) -> CallArguments {
        let old_target = format!("{}@{}", path, old_revision);
        let new_target = match new_revision {
            Some(rev) => format!("{}@{}", path, rev),
            None => path.to_string(),
        };
        let mut options = OptionSet::new()
            .flag("--git")
            .with("--old", OptionValue::Scalar(old_target))
            .with("--new", OptionValue::Scalar(new_target));
        if summarize {
            options.insert("--summarize", OptionValue::Flag);
        }
        options.into()
    }

    // ============================================================
    // Operations
    // ============================================================

    pub fn checkout(
        &self,
        url: &str,
        path: Option<&str>,
        revision: Option<Revision>,
    ) -> ApplicationResult<String> {
        self.invoke(Subcommand::Checkout, Self::checkout_args(url, path, revision))
    }

    pub fn commit(&self, paths: &[String], message: &str) -> ApplicationResult<String> {
        self.invoke(Subcommand::Commit, Self::commit_args(paths, message))
    }

    pub fn add(&self, path: &str) -> ApplicationResult<String> {
        self.invoke(Subcommand::Add, Self::add_args(path))
    }

    pub fn cat(&self, path: &str, revision: Option<Revision>) -> ApplicationResult<String> {
        self.invoke(Subcommand::Cat, Self::target_args(path, revision))
    }

    pub fn info(&self, path: &str, revision: Option<Revision>) -> ApplicationResult<String> {
        self.invoke(Subcommand::Info, Self::target_args(path, revision))
    }

    pub fn log(&self, paths: &[String], revision: Option<Revision>) -> ApplicationResult<String> {
        self.invoke(Subcommand::Log, Self::log_args(paths, revision))
    }

    pub fn update(&self, paths: &[String], revision: Option<Revision>) -> ApplicationResult<String> {
        self.invoke(Subcommand::Update, Self::update_args(paths, revision))
    }

    pub fn diff(
        &self,
        path: &str,
        summarize: bool,
        old_revision: &Revision,
        new_revision: Option<&Revision>,
    ) -> ApplicationResult<String> {
        self.invoke(
            Subcommand::Diff,
            Self::diff_args(path, summarize, old_revision, new_revision),
        )
    }

    pub fn list(&self, target: &str) -> ApplicationResult<String> {
        self.invoke(Subcommand::List, CallArguments::from(target))
    }

    pub fn cleanup(&self, path: &str) -> ApplicationResult<String> {
        self.invoke(Subcommand::Cleanup, CallArguments::from(path))
    }
}

fn revision_tokens(revision: Option<Revision>) -> Vec<String> {
    match revision {
        Some(rev) => vec!["--revision".to_string(), rev.to_string()],
        None => Vec::new(),
    }
}
