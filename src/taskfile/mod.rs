//! Taskfile loading and resolution.
//!
//! A taskfile is a YAML mapping from task names to either one command or a
//! list of commands and task references:
//!
//! ```yaml
//! env:
//!   PORT: "8555"
//! vars:
//!   greeting: hello
//! foo: echo {greeting}
//! bar:
//!   - echo hi
//!   - echo there
//! baz_c:
//!   - echo solo
//!   - bar
//! ```
//!
//! Entries are resolved in document order. A list item naming an earlier
//! task reuses that task's node; anything else is an inline command. Names
//! ending in `_c` become concurrent lists registered without the suffix.

pub mod sections;
pub mod template;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;

use crate::config::Config;
use crate::core::{Concurrent, Environment, Node, NodeRef, Sequential, Task};
use crate::error::{Error, Result};
use crate::shell::Shell;
use crate::ylog_debug;

pub use sections::Sections;
pub use template::{substitute, Variables};

/// Suffix marking a concurrent task list.
pub const CONCURRENT_SUFFIX: &str = "_c";

/// Named root nodes in definition order.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<(String, NodeRef)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` under `name`. Redefining a name replaces its node but
    /// keeps the name's original position.
    pub fn insert(&mut self, name: String, node: NodeRef) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = node,
            None => self.entries.push((name, node)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&NodeRef> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeRef)> {
        self.entries.iter().map(|(n, node)| (n.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolved task definitions: the environment and the named task trees.
#[derive(Debug)]
pub struct TaskDefs {
    env: Arc<Environment>,
    tasks: Registry,
}

impl TaskDefs {
    /// Load a taskfile using the host environment and the default shell.
    pub fn load(path: &Path) -> Result<Self> {
        Resolver::from_host().load(path)
    }

    /// Resolve taskfile text using the host environment and the default shell.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Resolver::from_host().resolve_yaml(text)
    }

    /// The environment every task runs with.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn get(&self, name: &str) -> Option<&NodeRef> {
        self.tasks.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.names()
    }

    pub fn tasks(&self) -> &Registry {
        &self.tasks
    }
}

impl fmt::Display for TaskDefs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Available tasks:")?;
        for name in self.names() {
            write!(f, "\n\t{}", name)?;
        }
        Ok(())
    }
}

/// Turns a parsed taskfile into [`TaskDefs`].
#[derive(Debug, Clone)]
pub struct Resolver {
    base_env: Environment,
    shell: Shell,
}

impl Resolver {
    /// A resolver whose `env` section is merged over `base_env`.
    pub fn new(base_env: Environment) -> Self {
        Self {
            base_env,
            shell: Shell::default(),
        }
    }

    /// A resolver seeded with the current process environment.
    pub fn from_host() -> Self {
        Self::new(std::env::vars().collect())
    }

    /// A host resolver using the shell from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::from_host().with_shell(config.effective_shell())
    }

    /// Run every task through `shell`.
    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    pub fn load(&self, path: &Path) -> Result<TaskDefs> {
        ylog_debug!("Loading taskfile {}", path.display());
        let text = std::fs::read_to_string(path)?;
        self.resolve_yaml(&text)
    }

    pub fn resolve_yaml(&self, text: &str) -> Result<TaskDefs> {
        if text.trim().is_empty() {
            return Err(Error::Malformed("taskfile is empty".to_string()));
        }
        match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(mapping) => self.resolve(mapping),
            Value::Null => Err(Error::Malformed("taskfile is empty".to_string())),
            other => Err(Error::Malformed(format!(
                "taskfile must be a mapping of task names, found {}",
                sections::kind(&other)
            ))),
        }
    }

    /// Resolve an already-parsed taskfile mapping.
    pub fn resolve(&self, mapping: serde_yaml::Mapping) -> Result<TaskDefs> {
        let (leading, entries) = sections::extract(mapping.into_iter().collect())?;

        let mut env = self.base_env.clone();
        env.extend(leading.env);
        let env = Arc::new(env);
        let vars = leading.vars;

        let mut tasks = Registry::new();
        for (key, body) in entries {
            let name = match key {
                Value::String(name) => name,
                other => {
                    return Err(Error::Malformed(format!(
                        "task names must be strings, found {}",
                        sections::kind(&other)
                    )))
                }
            };
            ylog_debug!("Parsing `{}`", name);

            match body {
                Value::String(command) => {
                    let task = self.task(&command, &vars, &env)?;
                    tasks.insert(name, Arc::new(task.into()));
                }
                Value::Sequence(items) => {
                    let children = self.children(&name, items, &vars, &env, &tasks)?;
                    let (name, node) = composite(name, children)?;
                    tasks.insert(name, Arc::new(node));
                }
                other => {
                    return Err(Error::Malformed(format!(
                        "task '{}' must be a command or a list, found {}",
                        name,
                        sections::kind(&other)
                    )))
                }
            }
        }

        Ok(TaskDefs { env, tasks })
    }

    fn task(&self, template: &str, vars: &Variables, env: &Arc<Environment>) -> Result<Task> {
        let command = substitute(template, vars)?;
        Ok(Task::new(command, Arc::clone(env)).with_shell(self.shell.clone()))
    }

    fn children(
        &self,
        name: &str,
        items: Vec<Value>,
        vars: &Variables,
        env: &Arc<Environment>,
        tasks: &Registry,
    ) -> Result<Vec<NodeRef>> {
        items
            .into_iter()
            .map(|item| match item {
                Value::String(entry) => match tasks.get(&entry) {
                    Some(node) => Ok(Arc::clone(node)),
                    None => Ok(Arc::new(self.task(&entry, vars, env)?.into())),
                },
                other => Err(Error::InvalidEntry {
                    task: name.to_string(),
                    entry: format!(
                        "expected a command or task name, found {}",
                        sections::kind(&other)
                    ),
                }),
            })
            .collect()
    }
}

/// Build the list node for `name`, stripping the concurrency suffix.
fn composite(name: String, children: Vec<NodeRef>) -> Result<(String, Node)> {
    match name.strip_suffix(CONCURRENT_SUFFIX) {
        Some("") => Err(Error::Malformed(format!(
            "'{}' is not a valid task name",
            CONCURRENT_SUFFIX
        ))),
        Some(stripped) => Ok((stripped.to_string(), Concurrent::new(children).into())),
        None => Ok((name, Sequential::new(children).into())),
    }
}
