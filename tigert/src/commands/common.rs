//! Shared helpers for tigert commands.

use std::path::{Path, PathBuf};

use tiger_rt::abi::START_LIB;

use crate::config::Config;
use crate::error::{Result, TigertError};

/// Host libraries a Rust static library needs on Linux.
pub const HOST_LIBS: &[&str] = &["pthread", "dl", "m"];

/// File name of the entry-point archive (`libtiger_start.a`).
pub fn start_library_file() -> String {
    format!("lib{}.a", START_LIB)
}

/// Pick the runtime directory: flag, then config, then the directory of the
/// running executable. The directory must contain the entry-point archive.
pub fn resolve_runtime_dir(flag: Option<&Path>, config: &Config) -> Result<PathBuf> {
    let dir = match flag.or(config.runtime_dir.as_deref()) {
        Some(dir) => dir.to_path_buf(),
        None => executable_dir()?,
    };

    let archive = dir.join(start_library_file());
    if !archive.is_file() {
        return Err(TigertError::Validation(format!(
            "{} {}",
            error_messages::RUNTIME_NOT_FOUND,
            archive.display()
        )));
    }
    Ok(dir)
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| TigertError::Config("Cannot locate the tigert executable directory".to_string()))
}

/// Check that every input exists and is a regular file.
pub fn validate_inputs(inputs: &[PathBuf]) -> Result<()> {
    if inputs.is_empty() {
        return Err(TigertError::Validation(error_messages::NO_INPUT_FILES.to_string()));
    }
    for input in inputs {
        if !input.exists() {
            return Err(TigertError::Validation(format!(
                "{} {}",
                error_messages::INPUT_PATH_NOT_EXIST,
                input.display()
            )));
        }
        if !input.is_file() {
            return Err(TigertError::Validation(format!(
                "{} {}",
                error_messages::INPUT_PATH_NOT_FILE,
                input.display()
            )));
        }
    }
    Ok(())
}

/// Whether `name` can be used as an assembler symbol.
pub fn is_symbol_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '.' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$')
}

/// Standard error message prefixes.
pub mod error_messages {
    pub const NO_INPUT_FILES: &str = "No input files specified";

    pub const INPUT_PATH_NOT_EXIST: &str = "Input path does not exist:";

    pub const INPUT_PATH_NOT_FILE: &str = "Input path is not a file:";

    pub const RUNTIME_NOT_FOUND: &str = "Runtime library not found:";

    pub const INVALID_ENTRY: &str = "Invalid entry symbol:";
}
