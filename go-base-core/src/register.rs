//! Generation of `internal/server/server.go`.
//!
//! goctl with `-m` emits one package per gRPC service under `internal/server/`
//! and protoc emits the matching stubs under `pb/`. This module pairs them up
//! by scanning the generated sources and renders a `RegisterServices`
//! function that wires every service onto the gRPC server.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};
use crate::gomod;
use crate::layout::glob_sorted;
use crate::naming::capitalize_first;
use crate::scan::{find_new_server_fn, find_register_fn};
use crate::templates::{register_template, render};

/// One gRPC service to register: `<pb>.<register_fn>(grpcServer, <alias>.<new_server_fn>(ctx))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistration {
    pub server_pkg: String,
    /// Identifier the server package is referenced by in `server.go`.
    pub server_alias: String,
    pub pb_pkg: String,
    pub new_server_fn: String,
    pub register_fn: String,
}

impl ServiceRegistration {
    pub fn new(server_pkg: &str, pb_pkg: &str, new_server_fn: &str, register_fn: &str) -> Self {
        // Same-named packages would shadow each other in server.go.
        let server_alias = if server_pkg == pb_pkg {
            format!("server{}", capitalize_first(server_pkg))
        } else {
            server_pkg.to_string()
        };
        Self {
            server_pkg: server_pkg.to_string(),
            server_alias,
            pb_pkg: pb_pkg.to_string(),
            new_server_fn: new_server_fn.to_string(),
            register_fn: register_fn.to_string(),
        }
    }

    pub fn line(&self) -> String {
        format!(
            "\t{}.{}(grpcServer, {}.{}(ctx))",
            self.pb_pkg, self.register_fn, self.server_alias, self.new_server_fn
        )
    }
}

/// One Go import line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
}

impl ImportSpec {
    /// An alias equal to the last path segment is dropped.
    pub fn new(alias: &str, path: impl Into<String>) -> Self {
        let path = path.into();
        let base = path.rsplit('/').next().unwrap_or(&path);
        let alias = (alias != base).then(|| alias.to_string());
        Self { alias, path }
    }

    pub fn line(&self) -> String {
        match &self.alias {
            Some(alias) => format!("\t{alias} \"{}\"", self.path),
            None => format!("\t\"{}\"", self.path),
        }
    }
}

/// Result of scanning the generated tree.
#[derive(Debug, Default)]
pub struct Discovery {
    pub registrations: Vec<ServiceRegistration>,
    /// Human-readable reasons for every server package that was skipped.
    pub skipped: Vec<String>,
    /// Number of entries looked at under `internal/server`.
    pub checked: usize,
    /// Server package directories found under `internal/server`, in name order.
    pub server_dirs: Vec<String>,
}

/// Pair every server package under `internal/server` with its pb package.
pub fn discover_registrations(service_dir: &Path) -> Result<Discovery> {
    let server_dir = service_dir.join("internal").join("server");
    let pb_dir = service_dir.join("pb");

    if !server_dir.exists() {
        return Err(ScaffoldError::MissingDirectory {
            what: "server directory",
            path: server_dir,
        });
    }

    let entries = sorted_entries(&server_dir)?;
    if entries.is_empty() {
        return Err(ScaffoldError::EmptyServerDir(server_dir));
    }

    let mut discovery = Discovery {
        checked: entries.len(),
        ..Discovery::default()
    };

    for (server_pkg, path, is_dir) in entries {
        if !is_dir || server_pkg.ends_with(".go") {
            continue;
        }
        tracing::debug!(package = %server_pkg, "scanning server package");
        discovery.server_dirs.push(server_pkg.clone());

        let server_files = glob_sorted(&path, "*_server.go")?;
        let Some(server_file) = server_files.first() else {
            discovery
                .skipped
                .push(format!("no server files found for package {server_pkg}"));
            continue;
        };
        let server_src = match fs::read_to_string(server_file) {
            Ok(src) => src,
            Err(e) => {
                discovery
                    .skipped
                    .push(format!("failed to read {}: {e}", server_file.display()));
                continue;
            }
        };
        let Some(new_server_fn) = find_new_server_fn(&server_src) else {
            discovery.skipped.push(format!(
                "NewXxxServer function not found in server package {server_pkg}"
            ));
            continue;
        };

        if !pb_dir.exists() {
            return Err(ScaffoldError::MissingDirectory {
                what: "pb directory",
                path: pb_dir,
            });
        }

        let Some((pb_pkg, grpc_file)) = find_grpc_file(&pb_dir, &server_pkg)? else {
            discovery.skipped.push(format!(
                "pb package not found for server package {server_pkg}, skipping"
            ));
            continue;
        };
        let grpc_src = match fs::read_to_string(&grpc_file) {
            Ok(src) => src,
            Err(e) => {
                discovery
                    .skipped
                    .push(format!("failed to read {}: {e}", grpc_file.display()));
                continue;
            }
        };
        let Some(register_fn) = find_register_fn(&grpc_src) else {
            discovery.skipped.push(format!(
                "RegisterXxxServer function not found in pb package {pb_pkg}, skipping"
            ));
            continue;
        };

        discovery.registrations.push(ServiceRegistration::new(
            &server_pkg,
            &pb_pkg,
            &new_server_fn,
            &register_fn,
        ));
    }

    for reason in &discovery.skipped {
        tracing::debug!(%reason, "server package skipped");
    }
    Ok(discovery)
}

/// `pb/<preferred>/*_grpc.pb.go`, else the first pb package that has one.
fn find_grpc_file(pb_dir: &Path, preferred: &str) -> Result<Option<(String, PathBuf)>> {
    let same_name = pb_dir.join(preferred);
    if same_name.is_dir() {
        if let Some(file) = glob_sorted(&same_name, "*_grpc.pb.go")?.into_iter().next() {
            return Ok(Some((preferred.to_string(), file)));
        }
    }

    for (name, path, is_dir) in sorted_entries(pb_dir)? {
        if !is_dir {
            continue;
        }
        if let Some(file) = glob_sorted(&path, "*_grpc.pb.go")?.into_iter().next() {
            return Ok(Some((name, file)));
        }
    }
    Ok(None)
}

/// `(name, path, is_dir)` for every entry of `dir`, sorted by name.
fn sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ScaffoldError::io(dir, e))? {
        let entry = entry.map_err(|e| ScaffoldError::io(dir, e))?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push((entry.file_name().to_string_lossy().into_owned(), entry.path(), is_dir));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Imports of `server.go`: server packages, then pb packages, then `svc`.
pub fn build_imports(module_path: &str, registrations: &[ServiceRegistration]) -> Vec<ImportSpec> {
    let mut server_imports = BTreeMap::new();
    let mut pb_imports = BTreeMap::new();

    for reg in registrations {
        let server_path = format!("{module_path}/internal/server/{}", reg.server_pkg);
        server_imports.insert(server_path.clone(), ImportSpec::new(&reg.server_alias, server_path));

        let pb_path = format!("{module_path}/pb/{}", reg.pb_pkg);
        pb_imports.insert(pb_path.clone(), ImportSpec::new(&reg.pb_pkg, pb_path));
    }

    let mut imports: Vec<ImportSpec> = server_imports.into_values().collect();
    imports.extend(pb_imports.into_values());
    imports.push(ImportSpec::new("svc", format!("{module_path}/internal/svc")));
    imports
}

/// Render `server.go` from the embedded `register.tpl`.
pub fn render_server_file(module_path: &str, registrations: &[ServiceRegistration]) -> Result<String> {
    let imports = build_imports(module_path, registrations)
        .iter()
        .map(ImportSpec::line)
        .collect::<Vec<_>>()
        .join("\n");
    let lines = registrations
        .iter()
        .map(ServiceRegistration::line)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(render(
        &register_template()?,
        &[("importPackages", &imports), ("serviceRegistrations", &lines)],
    ))
}

/// Outcome of [`generate_server_register_file`].
#[derive(Debug)]
pub struct RegisterOutcome {
    pub path: PathBuf,
    pub registrations: Vec<ServiceRegistration>,
    pub skipped: Vec<String>,
}

/// Scan the generated service and write `internal/server/server.go`.
pub fn generate_server_register_file(service_dir: &Path) -> Result<RegisterOutcome> {
    let module_path = gomod::find_module_path(service_dir)
        .ok_or_else(|| ScaffoldError::ModulePathNotFound(service_dir.to_path_buf()))?;

    let discovery = discover_registrations(service_dir)?;
    if discovery.registrations.is_empty() {
        tracing::debug!(
            server_dir = %service_dir.join("internal/server").display(),
            checked = discovery.checked,
            "no registrations discovered"
        );
        for dir in &discovery.server_dirs {
            tracing::debug!(server_dir = %dir, "found server subdir");
        }
        return Err(ScaffoldError::NoServices(discovery.checked));
    }

    let content = render_server_file(&module_path, &discovery.registrations)?;
    let path = service_dir.join("internal").join("server").join("server.go");
    fs::write(&path, content).map_err(|e| ScaffoldError::io(&path, e))?;

    Ok(RegisterOutcome {
        path,
        registrations: discovery.registrations,
        skipped: discovery.skipped,
    })
}
