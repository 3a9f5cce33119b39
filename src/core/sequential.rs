//! Tasks run one after another.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;

use super::node::NodeRef;
use crate::error::Result;
use crate::ylog_debug;

/// An ordered list of nodes run strictly in sequence.
///
/// Only the last child receives the caller's extra arguments. The first
/// failing child aborts the rest. Once terminated, the list never starts
/// another child, including on later runs.
#[derive(Debug)]
pub struct Sequential {
    children: Vec<NodeRef>,
    stop: CancellationToken,
    current: Mutex<Option<NodeRef>>,
}

impl Sequential {
    pub fn new(children: Vec<NodeRef>) -> Self {
        Self {
            children,
            stop: CancellationToken::new(),
            current: Mutex::new(None),
        }
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// The child most recently started, if any.
    pub fn current(&self) -> Option<NodeRef> {
        self.current_slot().clone()
    }

    pub fn is_terminated(&self) -> bool {
        self.stop.is_cancelled()
    }

    fn current_slot(&self) -> MutexGuard<'_, Option<NodeRef>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn run(&self, args: &[String]) -> Result<()> {
        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            if self.stop.is_cancelled() {
                ylog_debug!(
                    "Sequence stopped before step {} of {}",
                    i + 1,
                    self.children.len()
                );
                break;
            }
            *self.current_slot() = Some(Arc::clone(child));
            let child_args: &[String] = if i == last { args } else { &[] };
            child.run(child_args).await?;
        }
        Ok(())
    }

    pub fn terminate(&self) {
        self.stop.cancel();
        if let Some(current) = self.current() {
            current.terminate();
        }
    }
}
