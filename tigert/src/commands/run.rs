//! Run command implementation.
//!
//! Links into a temporary directory and executes the result with inherited
//! stdio, so the program's output reaches the terminal unchanged.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use tempfile::TempDir;
use tracing::debug;

use crate::commands::link::{run_link, LinkArgs};
use crate::config::Config;
use crate::error::{Result, TigertError};

/// Arguments for the run command.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub inputs: Vec<PathBuf>,
    pub entry: Option<String>,
    pub runtime_dir: Option<PathBuf>,
    pub cc: Option<String>,
    /// Arguments passed through to the program.
    pub program_args: Vec<String>,
    pub verbose: bool,
}

/// Link and execute the program, returning its exit code.
pub fn run_program(args: RunArgs, config: &Config) -> Result<i32> {
    let workdir = TempDir::new()?;
    let executable = workdir.path().join(program_name(&args.inputs));

    let link_args = LinkArgs {
        inputs: args.inputs,
        output: executable,
        entry: args.entry,
        runtime_dir: args.runtime_dir,
        cc: args.cc,
        verbose: args.verbose,
    };
    let executable = run_link(link_args, config)?;

    debug!("Executing {}", executable.display());
    let status = Command::new(&executable)
        .args(&args.program_args)
        .status()
        .map_err(|e| {
            TigertError::CommandExecution(format!("Failed to run {}: {}", executable.display(), e))
        })?;

    Ok(exit_code(status))
}

fn program_name(inputs: &[PathBuf]) -> String {
    inputs
        .first()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "a.out".to_string())
}

/// Shell convention: a signal death maps to 128 + signal number.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
