use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use dialoguer::{Input, Select};
use go_base_core::error::{Result, ScaffoldError, StepContext};
use go_base_core::{imports, layout, naming, register, templates, toolchain};
use go_base_core::{CommandRunner, Invocation, ToolConfig};

use super::output::{self, Steps};

/// Layout produced by `go-base init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProjectKind {
    /// Gateway plus a `services/ping` RPC service
    #[default]
    #[value(skip)]
    Business,
    /// Single go-zero API service
    Http,
    /// Single go-zero RPC service
    Rpc,
}

/// Raw options for `go-base init`, before prompting.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub name: Option<String>,
    pub kind: Option<ProjectKind>,
    /// Prompt for missing values instead of failing.
    pub interactive: bool,
}

impl InitOptions {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            kind: None,
            interactive: false,
        }
    }

    pub fn with_kind(mut self, kind: ProjectKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Whether stdin and stdout are both attached to a terminal.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Create a new go-zero project in `./<name>`.
///
/// Validates the name before anything runs, prepares goctl and the bundled
/// templates, then runs the generator sequence for the selected
/// [`ProjectKind`]. Critical failures stop the command (created directories
/// are left in place); descriptor generation and `go mod tidy` only warn.
pub fn run(runner: &dyn CommandRunner, config: &ToolConfig, opts: InitOptions) -> Result<()> {
    let (name, kind) = resolve(opts)?;
    naming::validate_project_name(&name)?;
    if Path::new(&name).exists() {
        return Err(ScaffoldError::ProjectExists(name));
    }

    let banner = match kind {
        ProjectKind::Business => "business project",
        ProjectKind::Http => "HTTP service",
        ProjectKind::Rpc => "RPC service",
    };
    println!("{} Initializing {}: {}", "->".blue(), banner, name.green());

    let mut steps = Steps::new();

    steps.next("Checking and installing goctl...");
    toolchain::ensure_goctl(runner, config).step("check/install goctl")?;
    output::done("goctl is ready");

    steps.next("Installing go-base templates...");
    let template_dir = templates::install_templates(runner, config).step("install go-base templates")?;
    output::done(&format!("Templates installed to {}", template_dir.display()));

    match kind {
        ProjectKind::Business => init_business(runner, config, &name, &mut steps)?,
        ProjectKind::Http => init_http(runner, config, &name, &mut steps)?,
        ProjectKind::Rpc => init_rpc(runner, config, &name, &mut steps)?,
    }

    println!();
    println!(
        "{} {} {} initialized successfully!",
        "✓".green().bold(),
        naming::capitalize_first(banner),
        name.green()
    );
    print_summary(&name, kind, &config.style);
    Ok(())
}

fn resolve(opts: InitOptions) -> Result<(String, ProjectKind)> {
    match opts.name {
        Some(name) => Ok((name, opts.kind.unwrap_or_default())),
        None if opts.interactive => {
            let name = prompt_name()?;
            let kind = match opts.kind {
                Some(kind) => kind,
                None => prompt_kind()?,
            };
            Ok((name, kind))
        }
        None => Err(ScaffoldError::InvalidProjectName {
            name: String::new(),
            reason: "a project name is required, e.g. `go-base init demo`".into(),
        }),
    }
}

fn prompt_name() -> Result<String> {
    Input::<String>::new()
        .with_prompt("Project name")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            naming::validate_project_name(input).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(|e| ScaffoldError::Prompt(e.to_string()))
}

fn prompt_kind() -> Result<ProjectKind> {
    let choices = &[
        "Business project (gateway + ping RPC service)",
        "HTTP API service",
        "RPC service",
    ];
    let idx = Select::new()
        .with_prompt("Project type")
        .items(choices)
        .default(0)
        .interact()
        .map_err(|e| ScaffoldError::Prompt(e.to_string()))?;
    Ok(match idx {
        1 => ProjectKind::Http,
        2 => ProjectKind::Rpc,
        _ => ProjectKind::Business,
    })
}

fn exec(runner: &dyn CommandRunner, invocation: Invocation, step: &str) -> Result<()> {
    runner.run(&invocation).step(step)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| ScaffoldError::io(path, e))
}

fn go_mod_init(runner: &dyn CommandRunner, config: &ToolConfig, root: &Path, module: &str, steps: &mut Steps) -> Result<()> {
    steps.next("Initializing go.mod...");
    exec(
        runner,
        Invocation::new(&config.binaries.go)
            .args(["mod", "init", module])
            .current_dir(root),
        "init go.mod",
    )?;
    output::done("go.mod initialized");
    Ok(())
}

/// `goctl rpc -o <name>.proto` followed by `goctl rpc protoc` in multi-service mode.
fn generate_rpc(runner: &dyn CommandRunner, config: &ToolConfig, dir: &Path, proto: &str, steps: &mut Steps) -> Result<()> {
    let goctl = &config.binaries.goctl;

    steps.next(&format!("Generating proto file {proto}..."));
    exec(
        runner,
        Invocation::new(goctl).args(["rpc", "-o", proto]).current_dir(dir),
        "generate proto file",
    )?;
    output::done("Proto file generated");

    steps.next("Generating RPC service code...");
    exec(
        runner,
        Invocation::new(goctl)
            .args(["rpc", "protoc", proto])
            .args([
                "--go_out=./pb",
                "--go-grpc_out=./pb",
                "--zrpc_out=.",
                "--client=true",
            ])
            .arg(format!("--style={}", config.style))
            .arg("-m")
            .current_dir(dir),
        "generate RPC code",
    )?;
    output::done("RPC service code generated");
    Ok(())
}

/// Server registration file, entrypoint import and config rename for a
/// freshly generated RPC service.
fn wire_rpc_service(runner: &dyn CommandRunner, config: &ToolConfig, service_dir: &Path, steps: &mut Steps) -> Result<()> {
    steps.next("Generating server registration file...");
    let outcome = register::generate_server_register_file(service_dir).step("generate server register file")?;
    for reason in &outcome.skipped {
        output::warn(reason);
    }
    output::done(&format!(
        "Server registration file generated ({} service(s))",
        outcome.registrations.len()
    ));

    steps.next("Updating main file imports...");
    let main_file = imports::ensure_server_import(runner, config, service_dir).step("update main file imports")?;
    output::done(&format!("{} imports updated", file_name(&main_file)));

    steps.next("Renaming RPC config file to config.yaml...");
    layout::rename_service_config(service_dir).step("rename RPC config file")?;
    output::done("RPC config file renamed to config.yaml");
    Ok(())
}

fn go_mod_tidy(runner: &dyn CommandRunner, config: &ToolConfig, root: &Path, steps: &mut Steps) {
    steps.next("Running go mod tidy...");
    let tidy = Invocation::new(&config.binaries.go)
        .args(["mod", "tidy"])
        .current_dir(root);
    match runner.run(&tidy) {
        Ok(()) => output::done("Dependencies updated"),
        Err(e) => output::warn(&format!("go mod tidy failed: {e}")),
    }
}

fn init_business(runner: &dyn CommandRunner, config: &ToolConfig, name: &str, steps: &mut Steps) -> Result<()> {
    let root = Path::new(name);
    let gateway_dir = root.join("gateway");
    let ping_dir = root.join("services").join("ping");

    steps.next("Creating project structure...");
    create_dir(root).step("create project directory")?;
    create_dir(&gateway_dir).step("create gateway directory")?;
    create_dir(&ping_dir).step("create services/ping directory")?;
    output::done("Project directories created");

    go_mod_init(runner, config, root, name, steps)?;
    generate_rpc(runner, config, &ping_dir, "ping.proto", steps)?;
    wire_rpc_service(runner, config, &ping_dir, steps)?;

    steps.next("Generating gateway service code...");
    exec(
        runner,
        Invocation::new(&config.binaries.goctl)
            .args(["gateway", "--dir", "."])
            .current_dir(&gateway_dir),
        "generate gateway code",
    )?;
    output::done("Gateway service code generated");
    match layout::rename_gateway_config(&gateway_dir) {
        Ok(true) => output::done("Gateway config file renamed to config.yaml"),
        Ok(false) => {}
        Err(e) => output::warn(&format!("failed to rename gateway config file: {e}")),
    }

    steps.next("Generating proto descriptor file for gateway...");
    create_dir(&gateway_dir.join("pb")).step("create gateway/pb directory")?;
    generate_descriptor(runner, config, root, &ping_dir.join("ping.proto"));

    go_mod_tidy(runner, config, root, steps);
    Ok(())
}

/// `protoc --descriptor_set_out` for the gateway's `ProtoSets`. Only warns.
fn generate_descriptor(runner: &dyn CommandRunner, config: &ToolConfig, root: &Path, proto_file: &Path) {
    const OUT: &str = "gateway/pb/ping.pb";
    const PROTO: &str = "services/ping/ping.proto";

    if !proto_file.exists() {
        output::warn(&format!(
            "proto file not found: {}, skipping descriptor generation",
            proto_file.display()
        ));
        return;
    }

    let protoc = Invocation::new(&config.binaries.protoc)
        .args(["--descriptor_set_out", OUT, "--include_imports", PROTO])
        .current_dir(root);
    match runner.run(&protoc) {
        Ok(()) => output::done(&format!("Proto descriptor file generated: {OUT}")),
        Err(e) => {
            output::warn(&format!("failed to generate proto descriptor file: {e}"));
            output::hint(&format!(
                "You can manually run: protoc --descriptor_set_out={OUT} --include_imports {PROTO}"
            ));
        }
    }
}

fn init_rpc(runner: &dyn CommandRunner, config: &ToolConfig, name: &str, steps: &mut Steps) -> Result<()> {
    let root = Path::new(name);

    steps.next("Creating project structure...");
    create_dir(root).step("create project directory")?;
    output::done("Project directory created");

    go_mod_init(runner, config, root, name, steps)?;
    generate_rpc(runner, config, root, &format!("{name}.proto"), steps)?;
    wire_rpc_service(runner, config, root, steps)?;
    go_mod_tidy(runner, config, root, steps);
    Ok(())
}

fn init_http(runner: &dyn CommandRunner, config: &ToolConfig, name: &str, steps: &mut Steps) -> Result<()> {
    let root = Path::new(name);
    let api_file = format!("{name}.api");
    let goctl = &config.binaries.goctl;

    steps.next("Creating project structure...");
    create_dir(root).step("create project directory")?;
    output::done("Project directory created");

    go_mod_init(runner, config, root, name, steps)?;

    steps.next(&format!("Generating API file {api_file}..."));
    exec(
        runner,
        Invocation::new(goctl).args(["api", "-o", api_file.as_str()]).current_dir(root),
        "generate API file",
    )?;
    output::done("API file generated");

    steps.next("Generating API service code...");
    exec(
        runner,
        Invocation::new(goctl)
            .args(["api", "go", "-api", api_file.as_str(), "-dir", "."])
            .arg(format!("--style={}", config.style))
            .current_dir(root),
        "generate API code",
    )?;
    output::done("API service code generated");

    steps.next("Renaming API config file to config.yaml...");
    layout::rename_service_config(root).step("rename API config file")?;
    output::done("API config file renamed to config.yaml");

    go_mod_tidy(runner, config, root, steps);
    Ok(())
}

fn print_summary(name: &str, kind: ProjectKind, style: &str) {
    println!();
    println!("Project structure:");
    println!("  {name}/");
    println!("  ├── go.mod");
    match kind {
        ProjectKind::Business => {
            println!("  ├── gateway/          # Gateway service");
            println!("  │   ├── etc/");
            println!("  │   │   └── config.yaml");
            println!("  │   ├── pb/ping.pb");
            println!("  │   └── gateway.go");
            println!("  └── services/");
            println!("      └── ping/         # Ping RPC service");
            println!("          ├── ping.proto");
            println!("          ├── etc/");
            println!("          │   └── config.yaml");
            println!("          └── ping.go");
        }
        ProjectKind::Rpc => {
            println!("  ├── {name}.proto");
            println!("  ├── etc/");
            println!("  │   └── config.yaml");
            println!("  ├── internal/server/server.go");
            println!("  └── {name}.go");
        }
        ProjectKind::Http => {
            println!("  ├── {name}.api");
            println!("  ├── etc/");
            println!("  │   └── config.yaml");
            println!("  └── {name}.go");
        }
    }

    println!();
    println!("Next steps:");
    println!("  1. cd {name}");
    match kind {
        ProjectKind::Business => {
            println!("  2. Edit services/ping/ping.proto to define your RPC service");
            println!("  3. Regenerate RPC code: cd services/ping && {}", regenerate_command(name, kind, style));
            println!("  4. Edit gateway/etc/config.yaml to configure upstreams");
            println!("  5. Run services: cd services/ping && go run ping.go");
            println!("  6. Run gateway: cd gateway && go run gateway.go");
        }
        ProjectKind::Rpc => {
            println!("  2. Edit {name}.proto to define your RPC service");
            println!("  3. Regenerate RPC code: {}", regenerate_command(name, kind, style));
            println!("  4. Run: go run {name}.go");
        }
        ProjectKind::Http => {
            println!("  2. Edit {name}.api to define your routes");
            println!("  3. Regenerate API code: {}", regenerate_command(name, kind, style));
            println!("  4. Run: go run {name}.go");
        }
    }
}

/// goctl command that regenerates the project's code after the definition
/// file is edited.
pub fn regenerate_command(name: &str, kind: ProjectKind, style: &str) -> String {
    match kind {
        ProjectKind::Business => format!(
            "goctl rpc protoc ping.proto --go_out=./pb --go-grpc_out=./pb --zrpc_out=. --client=true --style={style} -m"
        ),
        ProjectKind::Rpc => format!(
            "goctl rpc protoc {name}.proto --go_out=./pb --go-grpc_out=./pb --zrpc_out=. --client=true --style={style} -m"
        ),
        ProjectKind::Http => format!("goctl api go -api {name}.api -dir . --style={style}"),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
