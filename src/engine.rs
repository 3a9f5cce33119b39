//! Runs one named task tree and forwards cancellation into it.

use std::fmt::Display;

use futures::stream::{Stream, StreamExt};

use crate::core::NodeRef;
use crate::error::{Error, Result};
use crate::taskfile::TaskDefs;
use crate::ylog_debug;

/// Executes tasks from a resolved taskfile.
///
/// # Example
///
/// ```ignore
/// let engine = Engine::new(TaskDefs::load(Path::new("yo.yaml"))?);
/// let signals = yo::signals::termination_signals()?;
/// engine.run("build", &[], signals).await?;
/// ```
#[derive(Debug)]
pub struct Engine {
    defs: TaskDefs,
}

impl Engine {
    pub fn new(defs: TaskDefs) -> Self {
        Self { defs }
    }

    pub fn defs(&self) -> &TaskDefs {
        &self.defs
    }

    /// Look up the root node for `name`.
    pub fn select(&self, name: &str) -> Result<NodeRef> {
        self.defs
            .get(name)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound {
                name: name.to_string(),
                available: self.defs.to_string(),
            })
    }

    /// Run task `name` with `args` until it finishes.
    ///
    /// Every item from `cancellations` terminates the running tree. Once the
    /// stream ends the run can no longer be cancelled.
    pub async fn run<S>(&self, name: &str, args: &[String], cancellations: S) -> Result<()>
    where
        S: Stream + Unpin,
        S::Item: Display,
    {
        let root = self.select(name)?;
        ylog_debug!("Running task {} with args {:?}", name, args);

        let mut run = root.run(args);
        let mut cancellations = cancellations.fuse();
        loop {
            tokio::select! {
                result = &mut run => return result,
                Some(event) = cancellations.next() => {
                    ylog_debug!("Caught {}", event);
                    root.terminate();
                }
            }
        }
    }
}
