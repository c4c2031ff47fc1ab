//! Service container for dependency injection
//!
//! Wires the command runner and settings into a svn session.

use std::sync::Arc;

use crate::application::services::Subversion;
use crate::config::Settings;
use crate::infrastructure::traits::{CommandRunner, RealCommandRunner};

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealCommandRunner))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, cmd: Arc<dyn CommandRunner>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, cmd }
    }

    /// Session built from the container's settings and runner.
    pub fn subversion(&self) -> Subversion {
        Subversion::from_settings(&self.settings, Arc::clone(&self.cmd))
    }
}
