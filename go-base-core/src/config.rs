use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaffoldError};

/// Names (or paths) of the external binaries the tool drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binaries {
    pub go: String,
    pub goctl: String,
    pub protoc: String,
    pub goimports: String,
    pub cargo: String,
}

impl Default for Binaries {
    fn default() -> Self {
        Self {
            go: "go".into(),
            goctl: "goctl".into(),
            protoc: "protoc".into(),
            goimports: "goimports".into(),
            cargo: "cargo".into(),
        }
    }
}

/// Tool configuration.
///
/// Resolution order (lowest to highest priority):
/// 1. built-in defaults
/// 2. `$HOME/.go-base/config.yaml`, or the file passed with `--config`
/// 3. `GO_BASE_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub binaries: Binaries,
    /// goctl `--style` flag for generated file names.
    pub style: String,
    /// Go module of the companion framework library.
    pub framework_module: String,
    pub goctl_package: String,
    pub goimports_package: String,
    /// crates.io name used by `upgrade`.
    pub cli_crate: String,
    /// Overrides `$HOME/.goctl`.
    pub goctl_home: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            binaries: Binaries::default(),
            style: "go_zero".into(),
            framework_module: "github.com/addls/go-base".into(),
            goctl_package: "github.com/zeromicro/go-zero/tools/goctl@latest".into(),
            goimports_package: "golang.org/x/tools/cmd/goimports@latest".into(),
            cli_crate: "go-base-cli".into(),
            goctl_home: None,
        }
    }
}

impl ToolConfig {
    /// Load defaults, the config file and environment overrides.
    ///
    /// An explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ScaffoldError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading config file");
        let content = std::fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ScaffoldError::Config(e.to_string()))
    }

    /// Apply `GO_BASE_*` overrides through `lookup`, so tests need not touch
    /// the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("GO_BASE_GO") {
            self.binaries.go = v;
        }
        if let Some(v) = get("GO_BASE_GOCTL") {
            self.binaries.goctl = v;
        }
        if let Some(v) = get("GO_BASE_PROTOC") {
            self.binaries.protoc = v;
        }
        if let Some(v) = get("GO_BASE_GOIMPORTS") {
            self.binaries.goimports = v;
        }
        if let Some(v) = get("GO_BASE_CARGO") {
            self.binaries.cargo = v;
        }
        if let Some(v) = get("GO_BASE_STYLE") {
            self.style = v;
        }
        if let Some(v) = get("GO_BASE_FRAMEWORK_MODULE") {
            self.framework_module = v;
        }
        if let Some(v) = get("GO_BASE_GOCTL_HOME") {
            self.goctl_home = Some(PathBuf::from(v));
        }
    }

    /// Root of goctl's template directories (`~/.goctl`).
    pub fn goctl_home(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.goctl_home {
            return Ok(dir.clone());
        }
        home_dir()
            .map(|home| home.join(".goctl"))
            .ok_or_else(|| ScaffoldError::Config("cannot determine home directory (HOME is unset)".into()))
    }
}

/// `$HOME`, falling back to the platform home directory.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// `$HOME/.go-base/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".go-base").join("config.yaml"))
}
