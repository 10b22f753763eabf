//! angular.json workspace file handling
//!
//! Only the fields needed to locate a library's source tree are read:
//!
//! ```json
//! {
//!   "defaultProject": "my-lib",
//!   "projects": {
//!     "my-lib": {
//!       "projectType": "library",
//!       "root": "projects/my-lib",
//!       "sourceRoot": "projects/my-lib/src"
//!     }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use samurai_foundation::{SamuraiError, SamuraiResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const WORKSPACE_FILE: &str = "angular.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceFile {
    default_project: Option<String>,
    /// IndexMap keeps the declaration order of angular.json
    #[serde(default)]
    projects: IndexMap<String, ProjectEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectEntry {
    project_type: Option<String>,
    #[serde(default)]
    root: String,
    source_root: Option<String>,
}

/// A parsed angular.json
#[derive(Debug, Clone)]
pub struct AngularWorkspace {
    /// Directory holding angular.json; project paths are relative to it
    base_dir: PathBuf,
    file: WorkspaceFile,
}

impl AngularWorkspace {
    /// Read `angular.json` from `dir`
    pub fn load(dir: &Path) -> SamuraiResult<Self> {
        let path = dir.join(WORKSPACE_FILE);
        let content =
            std::fs::read_to_string(&path).map_err(|e| SamuraiError::io_at(&path, e))?;
        Self::parse(dir, &content).map_err(|e| match e {
            SamuraiError::Manifest { message, .. } => SamuraiError::manifest(&path, message),
            other => other,
        })
    }

    /// Parse angular.json content; `base_dir` anchors relative project paths
    pub fn parse(base_dir: &Path, content: &str) -> SamuraiResult<Self> {
        let file: WorkspaceFile = serde_json::from_str(content).map_err(|e| {
            SamuraiError::manifest(
                base_dir.join(WORKSPACE_FILE),
                format!("Failed to parse angular.json: {}", e),
            )
        })?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            file,
        })
    }

    /// Pick the project: the requested one, else `defaultProject`, else the
    /// only library project.
    fn select(&self, project: Option<&str>) -> SamuraiResult<(&str, &ProjectEntry)> {
        let manifest_path = self.base_dir.join(WORKSPACE_FILE);

        if let Some(name) = project.or(self.file.default_project.as_deref()) {
            return self
                .file
                .projects
                .get_key_value(name)
                .map(|(k, v)| (k.as_str(), v))
                .ok_or_else(|| {
                    SamuraiError::manifest(
                        &manifest_path,
                        format!("Project '{}' not found in angular.json", name),
                    )
                });
        }

        let libraries: Vec<_> = self
            .file
            .projects
            .iter()
            .filter(|(_, p)| p.project_type.as_deref() == Some("library"))
            .map(|(name, entry)| (name.as_str(), entry))
            .collect();

        match libraries.as_slice() {
            [(name, entry)] => Ok((*name, *entry)),
            [] => Err(SamuraiError::manifest(
                &manifest_path,
                "No library project found in angular.json",
            )),
            _ => Err(SamuraiError::manifest(
                &manifest_path,
                format!(
                    "Several library projects found ({}); choose one with library.project",
                    libraries
                        .iter()
                        .map(|(name, _)| *name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )),
        }
    }

    /// Library root of the selected project: `<sourceRoot>/lib`
    pub fn library_root(&self, project: Option<&str>) -> SamuraiResult<PathBuf> {
        let (name, entry) = self.select(project)?;
        let source_root = match &entry.source_root {
            Some(source_root) => self.base_dir.join(source_root),
            None => self.base_dir.join(&entry.root).join("src"),
        };
        let root = source_root.join("lib");
        debug!(project = %name, root = %root.display(), "Resolved library root");
        Ok(root)
    }
}
