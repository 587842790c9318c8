//! drumbench: the command-line front end of the drum machine verification harness.
//!
//! Provides `drumbench run` for running test phases against the reference
//! models, `drumbench list` for the phase catalogue, and `drumbench probe`
//! for pinning the mode controller's request priority.

#![warn(missing_docs)]

mod list;
mod pipeline;
mod probe;
mod run;

use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use drumbench_config::ConfigError;
use drumbench_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticRenderer, TerminalRenderer};
use drumbench_harness::{HarnessError, Phase};
use tracing_subscriber::EnvFilter;

/// drumbench: golden-model verification for a drum machine.
#[derive(Parser, Debug)]
#[command(name = "drumbench", version, about = "Drum machine verification harness")]
pub struct Cli {
    /// Suppress all output except errors and the verdict.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `drumbench.toml` file or the directory holding it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run test phases and report the verdict.
    Run(RunArgs),
    /// List the available phases.
    List,
    /// Probe the controller's request priority.
    Probe,
}

/// Arguments for the `drumbench run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Phases to run, in order (all phases if omitted).
    pub phases: Vec<Phase>,

    /// Report format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Run the phases on a thread pool.
    #[arg(long)]
    pub parallel: bool,

    /// Write the top phase's recordings into this directory.
    #[arg(long, value_name = "DIR")]
    pub save_recordings: Option<PathBuf>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file or its directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => auto_color(
            std::io::stdout().is_terminal(),
            std::env::var("TERM").ok().as_deref(),
        ),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::List => list::run(&global),
        Command::Probe => probe::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            match error_diagnostic(e.as_ref()) {
                Some(diag) => eprint!("{}", TerminalRenderer::new(global.color).render(&diag)),
                None => eprintln!("error: {e}"),
            }
            process::exit(1);
        }
    }
}

/// Color is used only on a terminal that is not `TERM=dumb`.
fn auto_color(is_terminal: bool, term: Option<&str>) -> bool {
    is_terminal && term != Some("dumb")
}

/// The setup or internal diagnostic for a failed command, if it has one.
fn error_diagnostic(err: &(dyn Error + 'static)) -> Option<Diagnostic> {
    if let Some(err) = err.downcast_ref::<HarnessError>() {
        return Some(err.to_diagnostic());
    }
    err.downcast_ref::<ConfigError>().map(|err| {
        Diagnostic::error(DiagnosticCode::SETUP_FAILED, err.to_string())
            .with_help("check drumbench.toml")
    })
}

/// The log filter used when `RUST_LOG` is unset.
fn default_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(global)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .init();
}
