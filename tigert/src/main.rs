//! tigert - driver for programs built by the Tiger compiler.
//!
//! Links generated x86-64 assembly against the Tiger runtime, runs the
//! result, and prints the object layouts the code generator assumes.

mod commands;
mod config;
mod error;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{run_layout, run_link, run_program, LayoutArgs, LinkArgs, RunArgs};
use config::Config;
use error::{Result, TigertError};

/// tigert - link and run Tiger programs
#[derive(Parser, Debug)]
#[command(name = "tigert")]
#[command(author = "Tiger Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Link and run programs built by the Tiger compiler", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "TIGERT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TIGERT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "TIGERT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Link generated assembly with the runtime into an executable
    Link(LinkCommand),

    /// Link into a temporary directory and run the program
    Run(RunCommand),

    /// Print object and method table layouts for a class file
    Layout(LayoutCommand),
}

#[derive(Parser, Debug)]
struct LinkCommand {
    /// Assembly files produced by the compiler
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output executable
    #[arg(short, long, default_value = "a.out")]
    output: PathBuf,

    /// Entry label emitted by the compiler (default: Tiger_main)
    #[arg(short, long)]
    entry: Option<String>,

    /// Directory containing libtiger_start.a
    #[arg(long)]
    runtime_dir: Option<PathBuf>,

    /// C compiler driver
    #[arg(long)]
    cc: Option<String>,
}

#[derive(Parser, Debug)]
struct RunCommand {
    /// Assembly files produced by the compiler
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Entry label emitted by the compiler (default: Tiger_main)
    #[arg(short, long)]
    entry: Option<String>,

    /// Directory containing libtiger_start.a
    #[arg(long)]
    runtime_dir: Option<PathBuf>,

    /// C compiler driver
    #[arg(long)]
    cc: Option<String>,

    /// Arguments passed to the program
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Parser, Debug)]
struct LayoutCommand {
    /// TOML file with [[class]] tables
    input: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let verbose = cli.verbose || config.verbose;

    init_logging(verbose, cli.no_color)?;

    let code = execute_command(cli.command, verbose, &config)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Log to stderr so the program output on stdout stays untouched.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| TigertError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Run the selected command and return the process exit code.
fn execute_command(command: Commands, verbose: bool, config: &Config) -> Result<i32> {
    match command {
        Commands::Link(args) => {
            let link_args = LinkArgs {
                inputs: args.inputs,
                output: args.output,
                entry: args.entry,
                runtime_dir: args.runtime_dir,
                cc: args.cc,
                verbose,
            };
            run_link(link_args, config)?;
            Ok(0)
        },
        Commands::Run(args) => {
            let run_args = RunArgs {
                inputs: args.inputs,
                entry: args.entry,
                runtime_dir: args.runtime_dir,
                cc: args.cc,
                program_args: args.args,
                verbose,
            };
            run_program(run_args, config)
        },
        Commands::Layout(args) => {
            run_layout(LayoutArgs {
                input: args.input,
                json: args.json,
            })?;
            Ok(0)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_link() {
        let cli = Cli::parse_from(["tigert", "link", "SumRec.s", "-o", "sumrec"]);
        if let Commands::Link(args) = cli.command {
            assert_eq!(args.inputs, vec![PathBuf::from("SumRec.s")]);
            assert_eq!(args.output, PathBuf::from("sumrec"));
            assert!(args.entry.is_none());
        } else {
            panic!("Expected Link command");
        }
    }

    #[test]
    fn test_cli_parse_link_defaults() {
        let cli = Cli::parse_from(["tigert", "link", "a.s", "b.s"]);
        if let Commands::Link(args) = cli.command {
            assert_eq!(args.inputs.len(), 2);
            assert_eq!(args.output, PathBuf::from("a.out"));
        } else {
            panic!("Expected Link command");
        }
    }

    #[test]
    fn test_cli_parse_link_requires_input() {
        assert!(Cli::try_parse_from(["tigert", "link"]).is_err());
    }

    #[test]
    fn test_cli_parse_run_with_program_args() {
        let cli = Cli::parse_from([
            "tigert", "run", "SumRec.s", "--entry", "SumRec_main", "--", "1", "2",
        ]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.entry.as_deref(), Some("SumRec_main"));
            assert_eq!(args.args, vec!["1", "2"]);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_layout_json() {
        let cli = Cli::parse_from(["tigert", "layout", "classes.toml", "--json"]);
        if let Commands::Layout(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("classes.toml"));
            assert!(args.json);
        } else {
            panic!("Expected Layout command");
        }
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::parse_from([
            "tigert",
            "--verbose",
            "--no-color",
            "--config",
            "/etc/tigert.toml",
            "layout",
            "classes.toml",
        ]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/tigert.toml")));
    }
}
