use std::fs;
use std::path::{Component, Path};

/// Go import path of `service_dir`.
///
/// Walks up from `service_dir` to the nearest `go.mod`, reads its `module`
/// line and appends the relative path from the module root, always with `/`
/// separators.
pub fn find_module_path(service_dir: &Path) -> Option<String> {
    for dir in service_dir.ancestors() {
        let go_mod = dir.join("go.mod");
        if !go_mod.is_file() {
            continue;
        }
        let content = fs::read_to_string(&go_mod).ok()?;
        let module = module_name(&content)?;
        let rel = service_dir.strip_prefix(dir).ok()?;
        return Some(join_import_path(&module, rel));
    }
    None
}

/// Value of the `module` directive in go.mod content.
pub fn module_name(go_mod: &str) -> Option<String> {
    go_mod
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("module "))
        .map(|m| m.trim().trim_matches('"').to_string())
        .filter(|m| !m.is_empty())
}

/// Whether `dir/go.mod` exists and mentions `module`.
pub fn go_mod_requires(dir: &Path, module: &str) -> bool {
    fs::read_to_string(dir.join("go.mod"))
        .map(|content| content.contains(module))
        .unwrap_or(false)
}

/// Join a module path with a filesystem-relative path using `/`.
pub fn join_import_path(module: &str, rel: &Path) -> String {
    let mut path = module.to_string();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            path.push('/');
            path.push_str(&part.to_string_lossy());
        }
    }
    path
}
