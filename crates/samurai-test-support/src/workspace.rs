use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Manages a temporary directory for a test scenario.
/// Cleans up automatically when dropped.
pub struct TestWorkspace {
    pub temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Creates a new empty workspace.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Returns the root path of the workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Creates a file with content within the workspace.
    /// Automatically creates parent directories.
    pub fn create_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent dirs for '{}': {}", rel_path, e)
            });
        }
        fs::write(&file_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", file_path.display(), e));
    }

    pub fn read_file(&self, rel_path: &str) -> String {
        let file_path = self.path().join(rel_path);
        fs::read_to_string(&file_path)
            .unwrap_or_else(|e| panic!("Failed to read file '{}': {}", file_path.display(), e))
    }

    pub fn absolute_path(&self, rel_path: &str) -> PathBuf {
        self.path().join(rel_path)
    }

    /// Create a package.json naming the library package.
    pub fn create_package_json(&self, rel_dir: &str, name: &str) {
        let package_json = serde_json::json!({
            "name": name,
            "version": "0.0.1",
            "peerDependencies": {
                "@angular/core": "^17.0.0"
            }
        });

        let path = if rel_dir.is_empty() {
            "package.json".to_string()
        } else {
            format!("{}/package.json", rel_dir)
        };
        self.create_file(&path, &serde_json::to_string_pretty(&package_json).unwrap());
    }

    /// Create an angular.json with a single library project.
    pub fn create_angular_json(&self, project: &str, project_root: &str) {
        let angular_json = serde_json::json!({
            "version": 1,
            "projects": {
                project: {
                    "projectType": "library",
                    "root": project_root,
                    "sourceRoot": format!("{}/src", project_root),
                    "prefix": "lib"
                }
            }
        });

        self.create_file(
            "angular.json",
            &serde_json::to_string_pretty(&angular_json).unwrap(),
        );
    }
}
