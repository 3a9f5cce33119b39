//! The task tree node shared by leaves and composites.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use super::{Concurrent, Sequential, Task};
use crate::error::Result;

/// Shared handle to a node.
///
/// A named task referenced from several lists is the same `Node`, not a
/// copy, so its runtime state is visible from every place that uses it.
pub type NodeRef = Arc<Node>;

/// A runnable unit: a single command or a list of nodes.
#[derive(Debug)]
pub enum Node {
    Task(Task),
    Sequential(Sequential),
    Concurrent(Concurrent),
}

impl Node {
    /// Run this node to completion. `args` go to the final command only.
    pub fn run<'a>(&'a self, args: &'a [String]) -> BoxFuture<'a, Result<()>> {
        match self {
            Node::Task(task) => task.run(args).boxed(),
            Node::Sequential(seq) => seq.run(args).boxed(),
            Node::Concurrent(conc) => conc.run(args).boxed(),
        }
    }

    /// Ask this node to stop. Safe to call at any time, any number of times.
    pub fn terminate(&self) {
        match self {
            Node::Task(task) => task.terminate(),
            Node::Sequential(seq) => seq.terminate(),
            Node::Concurrent(conc) => conc.terminate(),
        }
    }

    /// Child nodes, empty for a task.
    pub fn children(&self) -> &[NodeRef] {
        match self {
            Node::Task(_) => &[],
            Node::Sequential(seq) => seq.children(),
            Node::Concurrent(conc) => conc.children(),
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Node::Task(task) => Some(task),
            _ => None,
        }
    }

    pub fn as_sequential(&self) -> Option<&Sequential> {
        match self {
            Node::Sequential(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_concurrent(&self) -> Option<&Concurrent> {
        match self {
            Node::Concurrent(conc) => Some(conc),
            _ => None,
        }
    }
}

impl From<Task> for Node {
    fn from(task: Task) -> Self {
        Node::Task(task)
    }
}

impl From<Sequential> for Node {
    fn from(seq: Sequential) -> Self {
        Node::Sequential(seq)
    }
}

impl From<Concurrent> for Node {
    fn from(conc: Concurrent) -> Self {
        Node::Concurrent(conc)
    }
}
