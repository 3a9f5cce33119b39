//! The task tree.
//!
//! A taskfile resolves into a forest of nodes: single commands (`Task`) and
//! lists that run their children in order (`Sequential`) or all at once
//! (`Concurrent`). Every node supports the same two operations, `run` and
//! `terminate`.

pub mod concurrent;
pub mod node;
pub mod sequential;
pub mod task;

pub use concurrent::Concurrent;
pub use node::{Node, NodeRef};
pub use sequential::Sequential;
pub use task::{Environment, ProcessState, Task};
