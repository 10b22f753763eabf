//! package.json manifest file handling
//!
//! The package name of a library is the alias prefix its secondary entry
//! points are published under (`@acme/lib` → `@acme/lib/moduleB`).

use samurai_foundation::{SamuraiError, SamuraiResult};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE: &str = "package.json";

/// The subset of package.json samurai cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    pub path: PathBuf,
    pub name: String,
}

impl PackageManifest {
    /// Parse package.json content
    pub fn parse(path: &Path, content: &str) -> SamuraiResult<Self> {
        let json: Value = serde_json::from_str(content).map_err(|e| {
            SamuraiError::manifest(path, format!("Failed to parse package.json: {}", e))
        })?;

        let name = json
            .as_object()
            .ok_or_else(|| SamuraiError::manifest(path, "package.json root must be an object"))?
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SamuraiError::manifest(path, "Missing 'name' field in package.json"))?
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
        })
    }

    /// Read `package.json` from `dir`
    pub fn load(dir: &Path) -> SamuraiResult<Self> {
        let path = dir.join(MANIFEST_FILE);
        let content =
            std::fs::read_to_string(&path).map_err(|e| SamuraiError::io_at(&path, e))?;
        Self::parse(&path, &content)
    }

    /// Nearest package.json at or above `start`
    pub fn find_nearest(start: &Path) -> SamuraiResult<Option<Self>> {
        for dir in start.ancestors() {
            if dir.join(MANIFEST_FILE).is_file() {
                debug!(dir = %dir.display(), "Found package.json");
                return Self::load(dir).map(Some);
            }
        }
        Ok(None)
    }
}
