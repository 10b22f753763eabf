//! Library root and public prefix discovery

use samurai_config::LibraryConfig;
use samurai_foundation::paths::normalize_path;
use samurai_foundation::{SamuraiError, SamuraiResult};
use samurai_lang_typescript::{AngularWorkspace, PackageManifest};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the library lives and how its modules are published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLayout {
    pub root: PathBuf,
    pub public_prefix: String,
}

impl LibraryLayout {
    /// Resolve the layout for a workspace rooted at `workspace_dir`.
    ///
    /// The root comes from configuration, else from angular.json. The prefix
    /// comes from configuration, else from the nearest package.json at or
    /// above the library root.
    pub fn discover(config: &LibraryConfig, workspace_dir: &Path) -> SamuraiResult<Self> {
        let root = match &config.root {
            Some(root) => workspace_dir.join(root),
            None => AngularWorkspace::load(workspace_dir)?.library_root(config.project.as_deref())?,
        };
        let root = normalize_path(&root);

        if !root.is_dir() {
            return Err(SamuraiError::invalid_path(
                &root,
                "library root is not a directory",
            ));
        }

        let public_prefix = match &config.public_prefix {
            Some(prefix) => prefix.clone(),
            None => PackageManifest::find_nearest(&root)?
                .map(|manifest| manifest.name)
                .ok_or_else(|| {
                    SamuraiError::config(format!(
                        "No public prefix configured and no package.json found above {}",
                        root.display()
                    ))
                })?,
        };

        info!(root = %root.display(), prefix = %public_prefix, "Library layout");

        Ok(Self {
            root,
            public_prefix,
        })
    }
}
