//! Import wiring for the generated service entrypoint.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ToolConfig;
use crate::error::{Result, ScaffoldError};
use crate::gomod;
use crate::layout::glob_sorted;
use crate::runner::{CommandRunner, Invocation};
use crate::toolchain;

/// Entrypoint of a goctl service: `<dir>/<dir name>.go`, otherwise the first
/// non-test `.go` file in name order.
pub fn locate_main_file(service_dir: &Path) -> Result<PathBuf> {
    if let Some(name) = service_dir.file_name() {
        let conventional = service_dir.join(format!("{}.go", name.to_string_lossy()));
        if conventional.is_file() {
            return Ok(conventional);
        }
    }

    glob_sorted(service_dir, "*.go")?
        .into_iter()
        .find(|p| !p.to_string_lossy().ends_with("_test.go"))
        .ok_or_else(|| ScaffoldError::MainFileNotFound(service_dir.to_path_buf()))
}

/// Add `import_path` to the first `import ( ... )` block of Go source.
///
/// Returns `Ok(None)` when the path is already imported. The new line goes
/// right after the line holding the block's last quoted import; a block whose
/// imports sit on the `import (` line itself gets it before the closing
/// parenthesis.
pub fn splice_import(content: &str, import_path: &str) -> Result<Option<String>> {
    let quoted = format!("\"{import_path}\"");
    if content.lines().any(|line| line.contains(&quoted)) {
        return Ok(None);
    }

    let start = content.find("import (").ok_or(ScaffoldError::ImportBlock(
        "cannot find import block in main file (expected multi-line import)",
    ))?;
    let end = content[start..]
        .find(')')
        .map(|i| start + i)
        .ok_or(ScaffoldError::ImportBlock("cannot find end of import block"))?;

    let block = &content[start..end];
    let last_quote = block
        .rfind('"')
        .ok_or(ScaffoldError::ImportBlock("cannot find last import in import block"))?;

    let new_line = format!("\t{quoted}\n");
    let (insert_at, needs_newline) = match block[last_quote..].find('\n') {
        Some(nl) => (start + last_quote + nl + 1, false),
        None => (end, true),
    };

    let mut spliced = String::with_capacity(content.len() + new_line.len() + 1);
    spliced.push_str(&content[..insert_at]);
    if needs_newline {
        spliced.push('\n');
    }
    spliced.push_str(&new_line);
    spliced.push_str(&content[insert_at..]);
    Ok(Some(spliced))
}

/// Make the service entrypoint import `<module>/internal/server`, then let
/// goimports tidy the import block.
pub fn ensure_server_import(
    runner: &dyn CommandRunner,
    config: &ToolConfig,
    service_dir: &Path,
) -> Result<PathBuf> {
    let main_file = locate_main_file(service_dir)?;
    toolchain::ensure_goimports(runner, config)?;

    let module_path = gomod::find_module_path(service_dir)
        .ok_or_else(|| ScaffoldError::ModulePathNotFound(service_dir.to_path_buf()))?;
    let server_import = format!("{module_path}/internal/server");

    let content = fs::read_to_string(&main_file).map_err(|e| ScaffoldError::io(&main_file, e))?;
    if let Some(updated) = splice_import(&content, &server_import)? {
        fs::write(&main_file, updated).map_err(|e| ScaffoldError::io(&main_file, e))?;
        tracing::debug!(file = %main_file.display(), import = %server_import, "import added");
    }

    let file_name = main_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    runner
        .run(
            &Invocation::new(&config.binaries.goimports)
                .args(["-w", file_name.as_str()])
                .current_dir(service_dir),
        )
        .map_err(|e| e.in_step("run goimports"))?;

    Ok(main_file)
}
