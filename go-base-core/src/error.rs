use std::path::PathBuf;

/// Error type for every scaffolding operation.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("project directory '{0}' already exists. Please remove it first or use a different name")]
    ProjectExists(String),

    #[error("command `{command}` failed with exit code {}", .code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("failed to spawn `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} command not found. {hint}")]
    ToolMissing { program: String, hint: String },

    #[error("failed to extract module path from {}", .0.display())]
    ModulePathNotFound(PathBuf),

    #[error("{what} does not exist: {} (make sure RPC code is generated first)", .path.display())]
    MissingDirectory { what: &'static str, path: PathBuf },

    #[error("no server packages found in {}", .0.display())]
    EmptyServerDir(PathBuf),

    #[error("no services found to register (checked {0} server packages)")]
    NoServices(usize),

    #[error("main file not found in {}", .0.display())]
    MainFileNotFound(PathBuf),

    #[error("{0}")]
    ImportBlock(&'static str),

    #[error("cannot parse goctl version from: {0}")]
    VersionParse(String),

    #[error("invalid file pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("failed to {step}: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<ScaffoldError>,
    },
}

impl ScaffoldError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap this error with the name of the workflow step that produced it.
    pub fn in_step(self, step: impl Into<String>) -> Self {
        ScaffoldError::Step {
            step: step.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Attach a step name to the error side of a result.
pub trait StepContext<T> {
    fn step(self, step: &str) -> Result<T>;
}

impl<T> StepContext<T> for Result<T> {
    fn step(self, step: &str) -> Result<T> {
        self.map_err(|e| e.in_step(step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_message_includes_code() {
        let err = ScaffoldError::CommandFailed {
            command: "go mod tidy".into(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "command `go mod tidy` failed with exit code 2");
    }

    #[test]
    fn command_failed_without_code() {
        let err = ScaffoldError::CommandFailed {
            command: "goctl".into(),
            code: None,
        };
        assert!(err.to_string().ends_with("exit code unknown"));
    }

    #[test]
    fn step_context_prefixes_message() {
        let res: Result<()> = Err(ScaffoldError::NoServices(3));
        let err = res.step("generate server register file").unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to generate server register file: no services found to register (checked 3 server packages)"
        );
    }
}
