use go_base_cli::commands::init::{self, InitOptions, ProjectKind};
use go_base_core::{Invocation, RecordingRunner, ScaffoldError, ToolConfig};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    fn new(path: &Path) -> Self {
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(path).unwrap();
        CwdGuard { original }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

// ── Fake generators ─────────────────────────────────────────────────

fn write(path: PathBuf, content: &str) -> std::io::Result<()> {
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, content)
}

fn config(tmp: &TempDir) -> ToolConfig {
    ToolConfig {
        goctl_home: Some(tmp.path().join("home/.goctl")),
        ..ToolConfig::default()
    }
}

fn go_mod_init(inv: &Invocation) -> std::io::Result<()> {
    let module = inv.args.last().unwrap();
    write(inv.working_dir().join("go.mod"), &format!("module {module}\n\ngo 1.22\n"))
}

fn goctl_rpc_template(inv: &Invocation) -> std::io::Result<()> {
    let proto = inv.args.last().unwrap();
    write(inv.working_dir().join(proto), "syntax = \"proto3\";\n")
}

/// What `goctl rpc protoc <svc>.proto ... -m` leaves behind (trimmed).
fn goctl_rpc_protoc(inv: &Invocation) -> std::io::Result<()> {
    let dir = inv.working_dir();
    let svc = inv.args[2].trim_end_matches(".proto");
    let service = go_base_core::naming::capitalize_first(svc);
    let module = go_base_core::gomod::find_module_path(dir).unwrap();

    write(
        dir.join(format!("internal/server/{svc}/{svc}_server.go")),
        &format!("package server\n\nfunc New{service}Server(svcCtx *svc.ServiceContext) *{service}Server {{\n}}\n"),
    )?;
    write(
        dir.join(format!("pb/{svc}/{svc}_grpc.pb.go")),
        &format!("package {svc}\n\nfunc Register{service}Server(s grpc.ServiceRegistrar, srv {service}Server) {{\n}}\n"),
    )?;
    write(
        dir.join(format!("{svc}.go")),
        &format!("package main\n\nimport (\n\t\"{module}/internal/config\"\n\t\"{module}/internal/svc\"\n)\n\nfunc main() {{}}\n"),
    )?;
    write(dir.join(format!("etc/{svc}.yaml")), "Name: svc.rpc\n")
}

fn goctl_gateway(inv: &Invocation) -> std::io::Result<()> {
    let dir = inv.working_dir();
    write(dir.join("etc/gateway.yaml"), "Name: gateway\n")?;
    write(dir.join("gateway.go"), "package main\n")
}

fn goctl_api(inv: &Invocation) -> std::io::Result<()> {
    let dir = inv.working_dir();
    let name = dir.file_name().unwrap().to_string_lossy().to_string();
    write(dir.join(format!("etc/{name}-api.yaml")), "Name: api\n")?;
    write(dir.join(format!("{name}.go")), "package main\n")
}

fn fake_toolchain() -> RecordingRunner {
    RecordingRunner::new()
        .with_installed(&["goctl", "goimports"])
        .respond("goctl -v", "goctl version 1.8.5 linux/amd64\n")
        .on("go mod init", go_mod_init)
        .on("goctl rpc -o", goctl_rpc_template)
        .on("goctl rpc protoc", goctl_rpc_protoc)
        .on("goctl gateway", goctl_gateway)
        .on("goctl api go", goctl_api)
}

// ── Business project (default) ──────────────────────────────────────

#[test]
#[serial]
fn business_project_runs_generators_in_order() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain();

    init::run(&runner, &config(&tmp), InitOptions::new("demo")).unwrap();

    assert_eq!(
        runner.command_lines(),
        vec![
            "goctl env check --install --verbose --force",
            "goctl template init",
            "goctl -v",
            "go mod init demo",
            "goctl rpc -o ping.proto",
            "goctl rpc protoc ping.proto --go_out=./pb --go-grpc_out=./pb --zrpc_out=. --client=true --style=go_zero -m",
            "goimports -w ping.go",
            "goctl gateway --dir .",
            "protoc --descriptor_set_out gateway/pb/ping.pb --include_imports services/ping/ping.proto",
            "go mod tidy",
        ]
    );

    let dirs: Vec<_> = runner
        .calls()
        .into_iter()
        .map(|c| c.dir.map(|d| d.to_string_lossy().replace('\\', "/")))
        .collect();
    assert_eq!(dirs[3].as_deref(), Some("demo"));
    assert_eq!(dirs[4].as_deref(), Some("demo/services/ping"));
    assert_eq!(dirs[7].as_deref(), Some("demo/gateway"));
    assert_eq!(dirs[8].as_deref(), Some("demo"));
}

#[test]
#[serial]
fn business_project_layout() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain();

    init::run(&runner, &config(&tmp), InitOptions::new("demo")).unwrap();

    assert!(Path::new("demo/gateway/etc/config.yaml").is_file());
    assert!(!Path::new("demo/gateway/etc/gateway.yaml").exists());
    assert!(Path::new("demo/gateway/pb").is_dir());
    assert!(Path::new("demo/services/ping/etc/config.yaml").is_file());
    assert!(!Path::new("demo/services/ping/etc/ping.yaml").exists());

    let server = fs::read_to_string("demo/services/ping/internal/server/server.go").unwrap();
    assert!(server.contains("\tserverPing \"demo/services/ping/internal/server/ping\""));
    assert!(server.contains("\tping.RegisterPingServer(grpcServer, serverPing.NewPingServer(ctx))"));

    let main = fs::read_to_string("demo/services/ping/ping.go").unwrap();
    assert!(main.contains(
        "\t\"demo/services/ping/internal/svc\"\n\t\"demo/services/ping/internal/server\"\n)"
    ));
}

#[test]
#[serial]
fn installs_templates_under_goctl_version() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());

    init::run(&fake_toolchain(), &config(&tmp), InitOptions::new("demo")).unwrap();

    let version_dir = tmp.path().join("home/.goctl/1.8.5");
    assert!(version_dir.join("api/handler.tpl").is_file());
    assert!(version_dir.join("rpc/register.tpl").is_file());
    assert!(version_dir.join("gateway/main.tpl").is_file());
}

#[test]
#[serial]
fn optional_step_failures_only_warn() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain().fail("protoc").fail("go mod tidy");

    init::run(&runner, &config(&tmp), InitOptions::new("demo")).unwrap();

    assert!(runner.was_called("protoc"));
    assert!(runner.was_called("go mod tidy"));
}

#[test]
#[serial]
fn missing_proto_skips_descriptor() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain()
        .on("goctl gateway", |_| fs::remove_file("demo/services/ping/ping.proto"));

    init::run(&runner, &config(&tmp), InitOptions::new("demo")).unwrap();

    assert!(!runner.was_called("protoc"));
    assert!(runner.was_called("go mod tidy"));
}

#[test]
#[serial]
fn critical_failure_names_the_step() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain().fail("goctl rpc protoc");

    let err = init::run(&runner, &config(&tmp), InitOptions::new("demo")).unwrap_err();

    assert!(err.to_string().starts_with("failed to generate RPC code"));
    assert!(!runner.was_called("goctl gateway"));
    // no rollback
    assert!(Path::new("demo/services/ping").is_dir());
}

#[test]
#[serial]
fn missing_generated_server_code_fails() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = RecordingRunner::new()
        .with_installed(&["goctl", "goimports"])
        .respond("goctl -v", "goctl version 1.8.5 linux/amd64\n")
        .on("go mod init", go_mod_init);

    let err = init::run(&runner, &config(&tmp), InitOptions::new("demo")).unwrap_err();
    assert!(err.to_string().starts_with("failed to generate server register file"));
}

// ── Name validation ─────────────────────────────────────────────────

#[test]
#[serial]
fn hyphenated_name_is_rejected_before_any_command() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain();

    let err = init::run(&runner, &config(&tmp), InitOptions::new("my-app")).unwrap_err();

    assert!(matches!(err, ScaffoldError::InvalidProjectName { .. }));
    assert!(runner.calls().is_empty());
    assert!(!Path::new("my-app").exists());
}

#[test]
#[serial]
fn existing_directory_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::create_dir("demo").unwrap();
    let runner = fake_toolchain();

    let err = init::run(&runner, &config(&tmp), InitOptions::new("demo")).unwrap_err();

    assert!(err.to_string().contains("already exists"));
    assert!(runner.calls().is_empty());
}

#[test]
#[serial]
fn missing_name_without_terminal_errors() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain();

    let err = init::run(&runner, &config(&tmp), InitOptions::default()).unwrap_err();
    assert!(err.to_string().contains("project name is required"));
}

// ── Single-service projects ─────────────────────────────────────────

#[test]
#[serial]
fn rpc_project() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain();

    init::run(
        &runner,
        &config(&tmp),
        InitOptions::new("order").with_kind(ProjectKind::Rpc),
    )
    .unwrap();

    assert_eq!(
        runner.command_lines()[3..].to_vec(),
        vec![
            "go mod init order",
            "goctl rpc -o order.proto",
            "goctl rpc protoc order.proto --go_out=./pb --go-grpc_out=./pb --zrpc_out=. --client=true --style=go_zero -m",
            "goimports -w order.go",
            "go mod tidy",
        ]
    );
    assert!(Path::new("order/etc/config.yaml").is_file());
    let server = fs::read_to_string("order/internal/server/server.go").unwrap();
    assert!(server.contains("\tserverOrder \"order/internal/server/order\""));
    assert!(server.contains("\t\"order/internal/svc\""));
    let main = fs::read_to_string("order/order.go").unwrap();
    assert!(main.contains("\t\"order/internal/svc\"\n\t\"order/internal/server\"\n)"));
}

#[test]
#[serial]
fn http_project() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain();

    init::run(
        &runner,
        &config(&tmp),
        InitOptions::new("shop").with_kind(ProjectKind::Http),
    )
    .unwrap();

    assert_eq!(
        runner.command_lines()[3..].to_vec(),
        vec![
            "go mod init shop",
            "goctl api -o shop.api",
            "goctl api go -api shop.api -dir . --style=go_zero",
            "go mod tidy",
        ]
    );
    assert!(Path::new("shop/etc/config.yaml").is_file());
    assert!(!Path::new("shop/etc/shop-api.yaml").exists());
    assert!(!Path::new("shop/internal/server/server.go").exists());
}

#[test]
#[serial]
fn custom_style_is_passed_to_goctl() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    let runner = fake_toolchain();
    let config = ToolConfig {
        style: "goZero".into(),
        ..config(&tmp)
    };

    init::run(&runner, &config, InitOptions::new("shop").with_kind(ProjectKind::Http)).unwrap();

    assert!(runner.was_called("goctl api go -api shop.api -dir . --style=goZero"));
}

#[test]
fn regenerate_hint_uses_configured_style() {
    assert_eq!(
        init::regenerate_command("shop", ProjectKind::Http, "goZero"),
        "goctl api go -api shop.api -dir . --style=goZero"
    );
    assert!(init::regenerate_command("order", ProjectKind::Rpc, "gozero")
        .starts_with("goctl rpc protoc order.proto "));
    assert!(init::regenerate_command("demo", ProjectKind::Business, "gozero")
        .ends_with("--style=gozero -m"));
}
