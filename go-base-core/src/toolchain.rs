use crate::config::ToolConfig;
use crate::error::Result;
use crate::runner::{CommandRunner, Invocation};

/// Make sure goctl is installed and its own dependencies are in place.
///
/// Installs goctl with `go install` when it is not on `PATH`, then runs
/// `goctl env check --install --verbose --force` either way.
pub fn ensure_goctl(runner: &dyn CommandRunner, config: &ToolConfig) -> Result<()> {
    let goctl = &config.binaries.goctl;
    if !runner.look_path(goctl) {
        tracing::info!(package = %config.goctl_package, "goctl not found, installing");
        runner
            .run(&Invocation::new(&config.binaries.go).args(["install", config.goctl_package.as_str()]))
            .map_err(|e| e.in_step("install goctl"))?;
    }

    runner.run(&Invocation::new(goctl).args(["env", "check", "--install", "--verbose", "--force"]))
}

/// Install goimports with `go install` when it is not on `PATH`.
pub fn ensure_goimports(runner: &dyn CommandRunner, config: &ToolConfig) -> Result<()> {
    if runner.look_path(&config.binaries.goimports) {
        return Ok(());
    }
    tracing::info!(package = %config.goimports_package, "goimports not found, installing");
    runner
        .run(&Invocation::new(&config.binaries.go).args(["install", config.goimports_package.as_str()]))
        .map_err(|e| e.in_step("install goimports"))
}
