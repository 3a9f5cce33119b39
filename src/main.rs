use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use yo::config::Config;
use yo::log::LogLevel;
use yo::{signals, ylog_debug, ylog_error, Engine, Resolver, Result};

/// Yo - a yaml-driven task runner for lazy people
#[derive(Parser, Debug)]
#[command(name = "yo")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    YO_DEBUG=1      Enable debug logging (alternative to --verbose)\n    YO_CONFIG=PATH  Config file (default: ~/.yo/yo.toml)")]
#[command(group = clap::ArgGroup::new("target").required(true).multiple(true).args(["list", "command"]))]
pub struct Cli {
    /// File containing task definitions (default: yo.yaml)
    #[arg(short = 'f', long)]
    pub taskfile: Option<PathBuf>,

    /// List available tasks
    #[arg(long)]
    pub list: bool,

    /// Print additional information
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print less information
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Task to execute, followed by arguments passed verbatim to its command
    #[arg(value_name = "TASK", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Name of the task to execute.
    fn task(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    /// Everything after the task name, untouched by yo's own flags.
    fn task_args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }

    fn log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Warn
        } else {
            LogLevel::Info
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    yo::log::init(cli.log_level());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ylog_error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let taskfile = cli
        .taskfile
        .clone()
        .unwrap_or_else(|| config.effective_taskfile());

    let defs = Resolver::from_config(&config).load(&taskfile)?;
    if cli.list {
        println!("{}", defs);
        return Ok(());
    }

    let Some(task) = cli.task() else {
        return Ok(());
    };
    let engine = Engine::new(defs);
    // Fail on an unknown name before any signal handler is installed.
    engine.select(task)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async {
        let signals = signals::termination_signals()?;
        ylog_debug!("Running {} from {}", task, taskfile.display());
        engine.run(task, cli.task_args(), signals).await
    })
}
