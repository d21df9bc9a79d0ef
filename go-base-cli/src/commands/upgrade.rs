use std::path::Path;

use colored::Colorize;
use go_base_core::error::{Result, ScaffoldError};
use go_base_core::gomod;
use go_base_core::naming::major_version;
use go_base_core::{CommandRunner, Invocation, ToolConfig};

use super::output;

/// Version of this binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upgrade the CLI to the latest release of its major line, then, inside a
/// Go project that depends on the framework, bump that dependency to the
/// same major line.
///
/// A failed CLI upgrade is an error. A failed dependency upgrade only warns
/// and prints the commands to run by hand.
pub fn run(runner: &dyn CommandRunner, config: &ToolConfig) -> Result<()> {
    println!("{} Upgrading go-base CLI tool...", "->".blue());
    println!("Current version: v{VERSION}");
    println!();

    let cargo = &config.binaries.cargo;
    if !runner.look_path(cargo) {
        return Err(ScaffoldError::ToolMissing {
            program: cargo.clone(),
            hint: "Please install Rust first: https://rustup.rs".into(),
        });
    }

    let major = major_version(VERSION);
    let requirement = format!("^{}", major.trim_start_matches('v'));
    println!(
        "{} Step 1: Upgrading go-base CLI tool to {} (latest release)...",
        "->".blue(),
        major.cyan()
    );
    let install = Invocation::new(cargo).args([
        "install",
        config.cli_crate.as_str(),
        "--version",
        requirement.as_str(),
    ]);
    if let Err(e) = runner.run(&install) {
        output::hint(&format!(
            "Please try manually: cargo install {} --version '{requirement}'",
            config.cli_crate
        ));
        return Err(e.in_step("upgrade go-base CLI"));
    }
    output::done("CLI tool upgraded");

    match upgrade_project_dependency(runner, config, Path::new("."), &major) {
        Ok(true) => output::done("Project dependency upgraded"),
        Ok(false) => {}
        Err(e) => {
            println!();
            output::warn(&format!("Failed to upgrade project dependency: {e}"));
            println!("You can manually upgrade by running:");
            println!("  go get {}@{major}", config.framework_module);
            println!("  go mod tidy");
        }
    }

    println!();
    println!("{}", "Upgrade completed successfully!".green().bold());
    println!();
    println!("To verify the new version, run:");
    println!("  go-base --version");
    Ok(())
}

/// Bump the framework dependency of the Go project in `dir` to `major`.
///
/// Returns `Ok(false)` without running anything when `dir` is not a Go
/// project or does not depend on the framework.
pub fn upgrade_project_dependency(
    runner: &dyn CommandRunner,
    config: &ToolConfig,
    dir: &Path,
    major: &str,
) -> Result<bool> {
    if !gomod::go_mod_requires(dir, &config.framework_module) {
        return Ok(false);
    }

    let go = &config.binaries.go;
    if !runner.look_path(go) {
        return Err(ScaffoldError::ToolMissing {
            program: go.clone(),
            hint: "Please install Go first: https://golang.org/dl/".into(),
        });
    }

    let target = format!("{}@{major}", config.framework_module);
    println!();
    println!(
        "{} Step 2: Upgrading {} dependency to {} (latest patch version)...",
        "->".blue(),
        config.framework_module,
        major.cyan()
    );
    runner
        .run(&Invocation::new(go).args(["get", target.as_str()]).current_dir(dir))
        .map_err(|e| e.in_step("run go get"))?;

    println!("{} Running go mod tidy...", "->".blue());
    runner
        .run(&Invocation::new(go).args(["mod", "tidy"]).current_dir(dir))
        .map_err(|e| e.in_step("run go mod tidy"))?;
    Ok(true)
}
