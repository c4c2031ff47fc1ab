//! Command dispatch: settings → session → svn run → terminal

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::Subversion;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{CallArguments, Subcommand};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let command = match &cli.command {
        Some(command) => command,
        None => return Err(CliError::Usage("no command given, see --help".to_string())),
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let cwd = std::env::current_dir().map_err(|e| InfraError::io("resolve current directory", e))?;
    let mut settings = Settings::load(Some(cwd.as_path()))?;
    apply_cli_overrides(&mut settings, cli);
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Checkout {
            url,
            path,
            revision,
        } => run_svn(
            &container,
            Subcommand::Checkout,
            Subversion::checkout_args(url, path.as_deref(), revision.clone()),
        ),
        Commands::Add { path } => run_svn(&container, Subcommand::Add, Subversion::add_args(path)),
        Commands::Commit { message, paths } => run_svn(
            &container,
            Subcommand::Commit,
            Subversion::commit_args(paths, message),
        ),
        Commands::Cat { path, revision } => run_svn(
            &container,
            Subcommand::Cat,
            Subversion::target_args(path, revision.clone()),
        ),
        Commands::Info { path, revision } => run_svn(
            &container,
            Subcommand::Info,
            Subversion::target_args(path, revision.clone()),
        ),
        Commands::Update { paths, revision } => run_svn(
            &container,
            Subcommand::Update,
            Subversion::update_args(paths, revision.clone()),
        ),
        Commands::Log { paths, revision } => run_svn(
            &container,
            Subcommand::Log,
            Subversion::log_args(paths, revision.clone()),
        ),
        Commands::Diff {
            path,
            old_rev,
            new_rev,
            summarize,
        } => run_svn(
            &container,
            Subcommand::Diff,
            Subversion::diff_args(path, *summarize, old_rev, new_rev.as_ref()),
        ),
        Commands::List { target } => run_svn(
            &container,
            Subcommand::List,
            CallArguments::from(target.as_str()),
        ),
        Commands::Cleanup { path } => run_svn(
            &container,
            Subcommand::Cleanup,
            CallArguments::from(path.as_str()),
        ),
        Commands::Config { command } => execute_config(command, &container.settings, &cwd),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Command-line flags win over every config layer.
fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(username) = &cli.username {
        settings.username = Some(username.clone());
    }
    if let Some(password) = &cli.password {
        settings.password = Some(password.clone());
    }
    if let Some(executable) = &cli.executable {
        settings.executable = executable.clone();
    }
}

#[instrument(level = "debug", skip(container, arguments))]
fn run_svn(
    container: &ServiceContainer,
    subcommand: Subcommand,
    arguments: CallArguments,
) -> CliResult<()> {
    let result = container.subversion().run(subcommand, arguments)?;
    if result.success {
        output::raw(&result.stdout);
        Ok(())
    } else {
        debug!("svn {} failed: exit_code={:?}", subcommand, result.exit_code);
        Err(InfraError::Svn {
            message: result.stderr.trim_end().to_string(),
            exit_code: result.exit_code,
        }
        .into())
    }
}

fn execute_config(command: &ConfigCommands, settings: &Settings, cwd: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence):");
            match global_config_path() {
                Some(path) => output::detail(&describe_path("global", &path)),
                None => output::detail("global: <no config directory>"),
            }
            output::detail(&describe_path("local", &local_config_path(cwd)));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(cwd)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created config: {}", path.display()));
            Ok(())
        }
    }
}

fn describe_path(label: &str, path: &Path) -> String {
    let state = if path.exists() { "" } else { " (not present)" };
    format!("{}: {}{}", label, path.display(), state)
}
