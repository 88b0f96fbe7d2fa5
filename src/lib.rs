//! Trellis: project scaffolding for a Python web-application framework.
//!
//! Resolves named projects, sites, instances, packages and resources across
//! configured roots, creates their skeletons idempotently, and generates
//! admin list/form resources from exported schema metadata.

pub mod cli;
pub mod core;
pub mod generator;
pub mod scaffold;
pub mod schema;

pub use crate::core::error::{Error, Result};
