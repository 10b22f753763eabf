//! Lexical path helpers
//!
//! Nothing here touches the file system; existence checks belong to `FileStore`.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without consulting the file system.
///
/// `..` above the root of an absolute path is dropped; surplus `..` at the
/// start of a relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => result.push(".."),
            },
            _ => result.push(component.as_os_str()),
        }
    }
    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Join a relative import specifier onto the directory of `from_file`
pub fn join_relative(from_file: &Path, specifier: &str) -> PathBuf {
    let base = from_file.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&base.join(specifier))
}

/// `path` relative to `root` with `/` separators, or `None` if `path` lies outside
pub fn relative_slash_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
