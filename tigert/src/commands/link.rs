//! Link command implementation.
//!
//! Hands the generated assembly to the system C compiler driver together
//! with `libtiger_start.a`, which carries both the runtime and `main`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tiger_rt::abi::{ENTRY_SYMBOL, START_LIB};
use tracing::{debug, info};

use crate::commands::common::{
    error_messages, is_symbol_name, resolve_runtime_dir, validate_inputs, HOST_LIBS,
};
use crate::config::Config;
use crate::error::{Result, TigertError};

/// Arguments for the link command.
#[derive(Debug, Clone, Default)]
pub struct LinkArgs {
    /// Generated assembly files.
    pub inputs: Vec<PathBuf>,
    /// Executable to produce.
    pub output: PathBuf,
    /// Entry label in the generated code, when not `Tiger_main`.
    pub entry: Option<String>,
    pub runtime_dir: Option<PathBuf>,
    pub cc: Option<String>,
    pub verbose: bool,
}

/// A fully resolved compiler driver invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkPlan {
    pub program: String,
    pub args: Vec<OsString>,
}

impl LinkPlan {
    pub fn new(
        cc: &str,
        inputs: &[PathBuf],
        output: &Path,
        entry: &str,
        runtime_dir: &Path,
        extra_libs: &[String],
    ) -> Self {
        let mut args: Vec<OsString> = inputs.iter().map(|p| p.as_os_str().to_owned()).collect();
        args.push("-o".into());
        args.push(output.as_os_str().to_owned());

        let mut search = OsString::from("-L");
        search.push(runtime_dir.as_os_str());
        args.push(search);
        args.push(format!("-l{}", START_LIB).into());

        if let Some(alias) = entry_alias(entry) {
            args.push(alias.into());
        }

        for lib in extra_libs.iter().map(String::as_str).chain(HOST_LIBS.iter().copied()) {
            args.push(format!("-l{}", lib).into());
        }

        Self {
            program: cc.to_string(),
            args,
        }
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Linker flag defining `Tiger_main` as another name for `entry`.
pub fn entry_alias(entry: &str) -> Option<String> {
    (entry != ENTRY_SYMBOL).then(|| format!("-Wl,--defsym,{}={}", ENTRY_SYMBOL, entry))
}

/// Link command handler.
pub struct LinkCommand<'a> {
    args: LinkArgs,
    config: &'a Config,
}

impl<'a> LinkCommand<'a> {
    pub fn new(args: LinkArgs, config: &'a Config) -> Self {
        Self { args, config }
    }

    /// Resolve the invocation without running it.
    pub fn plan(&self) -> Result<LinkPlan> {
        validate_inputs(&self.args.inputs)?;

        let entry = self.args.entry.as_deref().unwrap_or(&self.config.entry);
        if !is_symbol_name(entry) {
            return Err(TigertError::Validation(format!(
                "{} {}",
                error_messages::INVALID_ENTRY,
                entry
            )));
        }

        let runtime_dir = resolve_runtime_dir(self.args.runtime_dir.as_deref(), self.config)?;
        let cc = self.args.cc.as_deref().unwrap_or(&self.config.cc);

        Ok(LinkPlan::new(
            cc,
            &self.args.inputs,
            &self.args.output,
            entry,
            &runtime_dir,
            &self.config.extra_libs,
        ))
    }

    pub fn run(&self) -> Result<PathBuf> {
        let plan = self.plan()?;
        debug!("Running {}", plan.display());

        let output = plan.to_command().output().map_err(|e| {
            TigertError::CommandExecution(format!("Failed to start '{}': {}", plan.program, e))
        })?;
        if !output.status.success() {
            return Err(TigertError::link_failed(output.status, &output.stderr));
        }

        if self.args.verbose {
            info!("Linked {}", self.args.output.display());
        }
        Ok(self.args.output.clone())
    }
}

/// Link the inputs into an executable and return its path.
pub fn run_link(args: LinkArgs, config: &Config) -> Result<PathBuf> {
    LinkCommand::new(args, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::start_library_file;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(start_library_file()), b"!<arch>\n").unwrap();
        let asm = dir.path().join("SumRec.s");
        std::fs::write(&asm, ".text\n").unwrap();
        (dir, asm)
    }

    fn args_of(plan: &LinkPlan) -> Vec<String> {
        plan.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_entry_alias() {
        assert_eq!(entry_alias("Tiger_main"), None);
        assert_eq!(
            entry_alias("SumRec_main").as_deref(),
            Some("-Wl,--defsym,Tiger_main=SumRec_main")
        );
    }

    #[test]
    fn test_plan_default_entry() {
        let (dir, asm) = setup();
        let args = LinkArgs {
            inputs: vec![asm.clone()],
            output: PathBuf::from("a.out"),
            runtime_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let plan = LinkCommand::new(args, &Config::default()).plan().unwrap();

        assert_eq!(plan.program, "cc");
        let expected = vec![
            asm.display().to_string(),
            "-o".to_string(),
            "a.out".to_string(),
            format!("-L{}", dir.path().display()),
            "-ltiger_start".to_string(),
            "-lpthread".to_string(),
            "-ldl".to_string(),
            "-lm".to_string(),
        ];
        assert_eq!(args_of(&plan), expected);
    }

    #[test]
    fn test_plan_with_overrides() {
        let (dir, asm) = setup();
        let config = Config {
            cc: "gcc".to_string(),
            extra_libs: vec!["rt".to_string()],
            ..Default::default()
        };
        let args = LinkArgs {
            inputs: vec![asm],
            output: PathBuf::from("sumrec"),
            entry: Some("SumRec_main".to_string()),
            runtime_dir: Some(dir.path().to_path_buf()),
            cc: Some("clang".to_string()),
            verbose: false,
        };
        let plan = LinkCommand::new(args, &config).plan().unwrap();
        let rendered = args_of(&plan);

        assert_eq!(plan.program, "clang");
        assert!(rendered.contains(&"-Wl,--defsym,Tiger_main=SumRec_main".to_string()));
        let rt = rendered.iter().position(|a| a == "-lrt").unwrap();
        let pthread = rendered.iter().position(|a| a == "-lpthread").unwrap();
        assert!(rt < pthread);
    }

    #[test]
    fn test_plan_rejects_bad_entry() {
        let (dir, asm) = setup();
        let args = LinkArgs {
            inputs: vec![asm],
            output: PathBuf::from("a.out"),
            entry: Some("main,-evil".to_string()),
            runtime_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = LinkCommand::new(args, &Config::default()).plan().unwrap_err();
        assert!(matches!(err, TigertError::Validation(_)));
    }

    #[test]
    fn test_missing_compiler_is_reported() {
        let (dir, asm) = setup();
        let args = LinkArgs {
            inputs: vec![asm],
            output: dir.path().join("a.out"),
            runtime_dir: Some(dir.path().to_path_buf()),
            cc: Some("/nonexistent/tiger-cc".to_string()),
            ..Default::default()
        };
        let err = run_link(args, &Config::default()).unwrap_err();
        assert!(matches!(err, TigertError::CommandExecution(_)));
    }
}
