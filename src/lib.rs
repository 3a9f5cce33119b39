//! Yo - a yaml-driven task runner for lazy people.
//!
//! Tasks are declared in a YAML taskfile, resolved into trees of shell
//! commands (`core`), and run by the `engine`, which forwards termination
//! requests (usually OS signals) into the running tree.

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod log;
pub mod shell;
pub mod signals;
pub mod taskfile;

pub use crate::core::{Node, NodeRef};
pub use engine::Engine;
pub use error::{Error, Result};
pub use taskfile::{Resolver, TaskDefs};
