//! Tasks run side by side.

use futures::stream::{FuturesUnordered, StreamExt};

use super::node::NodeRef;
use crate::error::{Error, Result};

/// A list of nodes started together.
///
/// `run` resolves when every child has succeeded, or as soon as one child
/// fails. Children still running at that point are left alone; only
/// `terminate()` stops them. Their exits are still recorded on each task.
#[derive(Debug)]
pub struct Concurrent {
    children: Vec<NodeRef>,
}

impl Concurrent {
    pub fn new(children: Vec<NodeRef>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub async fn run(&self, args: &[String]) -> Result<()> {
        if !args.is_empty() {
            return Err(Error::ConcurrentArgs);
        }

        let mut running: FuturesUnordered<_> =
            self.children.iter().map(|child| child.run(&[])).collect();
        while let Some(result) = running.next().await {
            result?;
        }
        Ok(())
    }

    pub fn terminate(&self) {
        for child in &self.children {
            child.terminate();
        }
    }
}
