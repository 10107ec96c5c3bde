//! Shared domain types for NetOps Skills.
//!
//! This crate contains the data shapes every other crate agrees on: field
//! values, schemas, profiles, skill definitions, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod profile;
pub mod record;
pub mod schema;
pub mod skill;
pub mod value;
