//! External command execution.
//!
//! Every call to `go`, `goctl`, `protoc`, `goimports` and `cargo` goes through
//! [`CommandRunner`], so workflows can be driven by [`RecordingRunner`] in tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Result, ScaffoldError};

/// One external command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Directory the command runs in, `.` when unset.
    pub fn working_dir(&self) -> &Path {
        self.dir.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Seam between workflows and the external generator binaries.
pub trait CommandRunner {
    /// Run with inherited stdout/stderr. A non-zero exit status is an error.
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Run and capture stdout.
    fn output(&self, invocation: &Invocation) -> Result<String>;

    /// Whether `program` resolves on `PATH`.
    fn look_path(&self, program: &str) -> bool;
}

/// Runs commands for real via [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        tracing::debug!(command = %invocation, dir = %invocation.working_dir().display(), "running");
        let status = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ScaffoldError::CommandSpawn {
                command: invocation.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(ScaffoldError::CommandFailed {
                command: invocation.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }

    fn output(&self, invocation: &Invocation) -> Result<String> {
        tracing::debug!(command = %invocation, "capturing output");
        let output = Self::command(invocation)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| ScaffoldError::CommandSpawn {
                command: invocation.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ScaffoldError::CommandFailed {
                command: invocation.to_string(),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn look_path(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

type Hook = Box<dyn Fn(&Invocation) -> std::io::Result<()>>;

/// In-memory runner that records invocations instead of spawning processes.
///
/// Patterns match against the rendered command line (`program arg1 arg2 ...`)
/// by prefix. Hooks let a test emulate the files a generator would write.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    installed: HashSet<String>,
    outputs: Vec<(String, String)>,
    hooks: Vec<(String, Hook)>,
    failures: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs that [`CommandRunner::look_path`] reports as installed.
    pub fn with_installed(mut self, programs: &[&str]) -> Self {
        self.installed
            .extend(programs.iter().map(|p| p.to_string()));
        self
    }

    /// Canned stdout for [`CommandRunner::output`].
    pub fn respond(mut self, pattern: &str, stdout: &str) -> Self {
        self.outputs.push((pattern.to_string(), stdout.to_string()));
        self
    }

    /// Side effect executed when a matching command runs.
    pub fn on<F>(mut self, pattern: &str, hook: F) -> Self
    where
        F: Fn(&Invocation) -> std::io::Result<()> + 'static,
    {
        self.hooks.push((pattern.to_string(), Box::new(hook)));
        self
    }

    /// Make matching commands exit with status 1.
    pub fn fail(mut self, pattern: &str) -> Self {
        self.failures.push(pattern.to_string());
        self
    }

    /// Everything run so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Rendered command lines of everything run so far.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }

    pub fn was_called(&self, pattern: &str) -> bool {
        self.command_lines().iter().any(|c| c.starts_with(pattern))
    }

    fn dispatch(&self, invocation: &Invocation) -> Result<()> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.to_string();

        if self.failures.iter().any(|p| line.starts_with(p.as_str())) {
            return Err(ScaffoldError::CommandFailed {
                command: line,
                code: Some(1),
            });
        }

        for (pattern, hook) in &self.hooks {
            if line.starts_with(pattern.as_str()) {
                hook(invocation).map_err(|e| ScaffoldError::io(invocation.working_dir(), e))?;
            }
        }
        Ok(())
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.dispatch(invocation)
    }

    fn output(&self, invocation: &Invocation) -> Result<String> {
        self.dispatch(invocation)?;
        let line = invocation.to_string();
        Ok(self
            .outputs
            .iter()
            .find(|(p, _)| line.starts_with(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default())
    }

    fn look_path(&self, program: &str) -> bool {
        self.installed.contains(program)
    }
}
