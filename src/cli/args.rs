//! CLI argument definitions using clap

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::Revision;

/// Subversion command-line binding: auth options injected, output captured
#[derive(Parser, Debug)]
#[command(name = "rsvn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// svn user name (overrides config)
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// svn password (overrides config)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// svn executable (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::CommandName)]
    pub executable: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check out a working copy
    Checkout {
        /// Repository URL
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        /// Destination directory
        #[arg(value_hint = ValueHint::DirPath)]
        path: Option<String>,
        /// Revision to check out
        #[arg(short, long)]
        revision: Option<Revision>,
    },

    /// Schedule a path for addition (forced)
    Add {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: String,
    },

    /// Commit changes
    Commit {
        /// Log message
        #[arg(short, long)]
        message: String,
        /// Paths to commit
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        paths: Vec<String>,
    },

    /// Print file content
    Cat {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: String,
        #[arg(short, long)]
        revision: Option<Revision>,
    },

    /// Show item information
    Info {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: String,
        #[arg(short, long)]
        revision: Option<Revision>,
    },

    /// Update working copy
    Update {
        #[arg(value_hint = ValueHint::AnyPath)]
        paths: Vec<String>,
        #[arg(short, long)]
        revision: Option<Revision>,
    },

    /// Show log messages as XML
    Log {
        #[arg(value_hint = ValueHint::AnyPath)]
        paths: Vec<String>,
        #[arg(short, long)]
        revision: Option<Revision>,
    },

    /// Git-style diff between two revisions of a target
    Diff {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: String,
        /// Old revision
        #[arg(long)]
        old_rev: Revision,
        /// New revision (default: working copy)
        #[arg(long)]
        new_rev: Option<Revision>,
        /// Show only changed paths
        #[arg(long)]
        summarize: bool,
    },

    /// List directory entries
    List {
        /// Path or URL
        target: String,
    },

    /// Recover from an interrupted operation
    Cleanup {
        #[arg(value_hint = ValueHint::DirPath)]
        path: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
