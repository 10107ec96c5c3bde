//! Core logic for NetOps Skills.
//!
//! Layered input resolution, schema validation, the template engine, and the
//! skill registry/runner. This crate depends only on `netops-types` and does
//! no I/O; loading configuration from disk lives in `netops-infra`.

pub mod resolver;
pub mod skill;
pub mod template;
pub mod validator;
