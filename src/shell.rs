//! Shell invocation and argument quoting.

use std::borrow::Cow;

use tokio::process::Command;

/// The shell used to run task commands.
///
/// Commands are passed as a single string, e.g. `sh -c "<command>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    program: String,
    flag: String,
}

impl Shell {
    /// A POSIX-style shell invoked with `-c`.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            flag: "-c".to_string(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build the process command that runs `line` through this shell.
    pub fn command(&self, line: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.flag).arg(line);
        cmd
    }
}

impl Default for Shell {
    #[cfg(not(windows))]
    fn default() -> Self {
        Self::new("sh")
    }

    #[cfg(windows)]
    fn default() -> Self {
        Self {
            program: "cmd".to_string(),
            flag: "/C".to_string(),
        }
    }
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c)
}

/// Quote `arg` so a POSIX shell reads it back as one literal word.
pub fn quote(arg: &str) -> Cow<'_, str> {
    if arg.is_empty() {
        return Cow::Borrowed("''");
    }
    if arg.chars().all(is_safe) {
        return Cow::Borrowed(arg);
    }
    Cow::Owned(format!("'{}'", arg.replace('\'', r#"'"'"'"#)))
}

/// Append `args` to `command`, each individually quoted.
pub fn with_args(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        return command.to_string();
    }
    let quoted: Vec<_> = args.iter().map(|a| quote(a)).collect();
    format!("{} {}", command, quoted.join(" "))
}
