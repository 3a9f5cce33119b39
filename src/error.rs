use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Malformed taskfile: {0}")]
    Malformed(String),

    #[error("Undefined variable '{name}' in \"{template}\"")]
    UndefinedVariable { name: String, template: String },

    #[error("Invalid template \"{template}\": {reason}")]
    BadTemplate { template: String, reason: String },

    #[error("Invalid entry in task '{task}': {entry}")]
    InvalidEntry { task: String, entry: String },

    #[error("Task {name} not defined. {available}")]
    TaskNotFound { name: String, available: String },

    #[error("Failed to spawn \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command \"{command}\" failed: {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("Command \"{command}\" was terminated")]
    Terminated { command: String },

    #[error("Additional arguments not valid for concurrent tasks")]
    ConcurrentArgs,
}

impl Error {
    /// Whether the error happened while loading the taskfile, before any task ran.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Yaml(_)
                | Error::Malformed(_)
                | Error::UndefinedVariable { .. }
                | Error::BadTemplate { .. }
                | Error::InvalidEntry { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
