//! Infrastructure layer for NetOps Skills.
//!
//! Reads skill definitions, templates, defaults, profiles, and settings from
//! the embedded assets or a config directory, and builds the registry that
//! `netops-core` runs against. Also loads caller input files.

pub mod config;
pub mod input;
pub mod loader;
pub mod paths;
pub mod source;

pub use loader::{LoadedConfig, load};
pub use source::ConfigSource;
