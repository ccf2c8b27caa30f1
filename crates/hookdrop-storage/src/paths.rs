//! Rendering stored paths for responses.
//!
//! Responses never carry absolute paths: everything is reported relative to
//! the process working directory.

use std::path::{Component, Path, PathBuf};

/// Lexical path from `base` to `target`, both absolute.
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base_components: Vec<Component<'_>> = base.components().collect();
    let target_components: Vec<Component<'_>> = target.components().collect();

    let common = base_components
        .iter()
        .zip(target_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push("..");
    }
    for component in &target_components[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// `path` relative to the current working directory. Relative inputs are
/// already relative to it and are returned unchanged.
pub fn relative_to_cwd(path: &Path) -> PathBuf {
    if path.is_relative() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => relative_to(&cwd, path),
        Err(e) => {
            tracing::warn!(error = %e, "Working directory unavailable, reporting absolute path");
            path.to_path_buf()
        }
    }
}

/// String form used in JSON responses, always with `/` separators and no
/// leading `./`.
pub fn display_path(path: &Path) -> String {
    relative_to_cwd(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
