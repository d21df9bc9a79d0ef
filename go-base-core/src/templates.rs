//! goctl templates shipped inside the binary.

use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;

use crate::config::ToolConfig;
use crate::error::{Result, ScaffoldError};
use crate::runner::{CommandRunner, Invocation};

#[derive(RustEmbed)]
#[folder = "templates/"]
struct GoctlTemplates;

/// Template directories under `~/.goctl/<version>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateGroup {
    Api,
    Rpc,
    Gateway,
}

impl TemplateGroup {
    pub const ALL: [TemplateGroup; 3] = [TemplateGroup::Api, TemplateGroup::Rpc, TemplateGroup::Gateway];

    pub fn dir_name(self) -> &'static str {
        match self {
            TemplateGroup::Api => "api",
            TemplateGroup::Rpc => "rpc",
            TemplateGroup::Gateway => "gateway",
        }
    }

    /// Embedded files of this group as `(relative path, contents)`.
    pub fn files(self) -> Vec<(String, Vec<u8>)> {
        let prefix = format!("{}/", self.dir_name());
        let mut files: Vec<_> = GoctlTemplates::iter()
            .filter_map(|path| {
                let rel = path.strip_prefix(&prefix)?.to_string();
                let file = GoctlTemplates::get(&path)?;
                Some((rel, file.data.into_owned()))
            })
            .collect();
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files
    }
}

/// Replace every `{{.key}}` placeholder with its value.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut output = template.to_string();
    for (key, value) in vars {
        output = output.replace(&format!("{{{{.{key}}}}}"), value);
    }
    output
}

/// The `register.tpl` used to generate `internal/server/server.go`.
pub fn register_template() -> Result<String> {
    let file = GoctlTemplates::get("rpc/register.tpl")
        .ok_or_else(|| ScaffoldError::Config("embedded template rpc/register.tpl is missing".into()))?;
    Ok(String::from_utf8_lossy(&file.data).into_owned())
}

/// Version number out of `goctl -v` output (`goctl version 1.8.5 linux/amd64`).
pub fn parse_goctl_version(output: &str) -> Result<String> {
    let trimmed = output.trim();
    trimmed
        .split_whitespace()
        .nth(2)
        .map(str::to_string)
        .ok_or_else(|| ScaffoldError::VersionParse(trimmed.to_string()))
}

/// Write one group's templates into `dst`, creating directories as needed.
/// Returns how many files were written.
pub fn copy_group(group: TemplateGroup, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst).map_err(|e| ScaffoldError::io(dst, e))?;
    let files = group.files();
    for (rel, data) in &files {
        let target = dst.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
        }
        fs::write(&target, data).map_err(|e| ScaffoldError::io(&target, e))?;
    }
    Ok(files.len())
}

/// Initialize goctl's template home and overlay the bundled templates.
///
/// Runs `goctl template init`, reads the goctl version and copies every
/// group to `<goctl home>/<version>/<group>/`. Returns the version directory.
pub fn install_templates(runner: &dyn CommandRunner, config: &ToolConfig) -> Result<PathBuf> {
    let goctl = &config.binaries.goctl;

    runner
        .run(&Invocation::new(goctl).args(["template", "init"]))
        .map_err(|e| e.in_step("init goctl templates"))?;

    let output = runner
        .output(&Invocation::new(goctl).arg("-v"))
        .map_err(|e| e.in_step("get goctl version"))?;
    let version = parse_goctl_version(&output)?;

    let version_dir = config.goctl_home()?.join(&version);
    for group in TemplateGroup::ALL {
        let dst = version_dir.join(group.dir_name());
        let count = copy_group(group, &dst)
            .map_err(|e| e.in_step(format!("copy {} templates", group.dir_name())))?;
        tracing::debug!(group = group.dir_name(), count, dst = %dst.display(), "templates copied");
    }
    Ok(version_dir)
}
