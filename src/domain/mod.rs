//! Domain layer: entities and argument serialization
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arguments;
pub mod entities;
pub mod error;
pub mod options;

pub use arguments::CallArguments;
pub use entities::*;
pub use error::DomainError;
pub use options::{OptionSet, OptionValue};
