//! Core infrastructure: types, configuration tree, resolution, planning, execution.

pub mod error;
pub mod executor;
pub mod parser;
pub mod planner;
pub mod resolver;
pub mod template;
pub mod tree;
pub mod types;
pub mod xml;

pub use error::{Error, Result};
