//! Skill registration and execution.
//!
//! A skill bundles a schema, one or more template variants, and derivation
//! rules. The registry is built once at startup; the runner drives a single
//! invocation through resolution, validation, and rendering.

pub mod registry;
pub mod runner;

pub use registry::{Skill, SkillRegistry, SkillSource};
pub use runner::{Rendered, SkillRunner};
