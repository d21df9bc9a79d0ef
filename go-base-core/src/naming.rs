use crate::error::{Result, ScaffoldError};

/// Check that `name` can be used both as a directory and as a Go module name.
///
/// Hyphens are rejected explicitly: goctl derives Go package identifiers from
/// the project name and a hyphen produces code that does not compile.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = |reason: String| ScaffoldError::InvalidProjectName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name must not be empty".into()));
    }
    if name.contains('-') {
        return Err(invalid(format!(
            "hyphens are not allowed, try '{}'",
            name.replace('-', "_")
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(invalid(format!(
            "unsupported character '{c}' (use letters, digits and underscores)"
        )));
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid("name must not start with a digit".into()));
    }
    Ok(())
}

/// Upper-case the first character: `ping` -> `Ping`.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Major version of a semver-ish string, always `v`-prefixed: `1.4.2` -> `v1`.
pub fn major_version(version: &str) -> String {
    let trimmed = version.trim_start_matches('v');
    let major = trimmed.split('.').next().unwrap_or(trimmed);
    format!("v{major}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(validate_project_name("demo").is_ok());
        assert!(validate_project_name("order_service").is_ok());
        assert!(validate_project_name("Shop2").is_ok());
    }

    #[test]
    fn rejects_hyphen_with_suggestion() {
        let err = validate_project_name("my-app").unwrap_err().to_string();
        assert!(err.contains("hyphens are not allowed"));
        assert!(err.contains("my_app"));
    }

    #[test]
    fn rejects_empty_and_leading_digit() {
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("9lives").is_err());
    }

    #[test]
    fn rejects_path_characters() {
        assert!(validate_project_name("a/b").is_err());
        assert!(validate_project_name("a.b").is_err());
        assert!(validate_project_name("a b").is_err());
    }

    #[test]
    fn capitalizes() {
        assert_eq!(capitalize_first("ping"), "Ping");
        assert_eq!(capitalize_first("P"), "P");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn major_versions() {
        assert_eq!(major_version("v1.0.0"), "v1");
        assert_eq!(major_version("2.3.4"), "v2");
        assert_eq!(major_version("v3"), "v3");
    }
}
