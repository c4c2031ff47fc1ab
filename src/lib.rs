//! rsvn: typed binding around the Subversion command-line client
//!
//! ```no_run
//! use rsvn::{Revision, Subversion};
//!
//! let svn = Subversion::new("myid", "****");
//! let text = svn
//!     .checkout("https://svn.example.com/repo/trunk", Some("Src"), Some(Revision::from(350_994u64)))
//!     .expect("svn could not be started");
//! println!("{text}");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{Subversion, SvnOutput};
pub use application::{ApplicationError, ApplicationResult};
pub use config::Settings;
pub use domain::{CallArguments, GlobalOptions, OptionSet, OptionValue, Revision, Subcommand};

/// Short alias for [`Subversion`].
pub type Svn = Subversion;
