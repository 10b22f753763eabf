//! Module ownership and import target resolution
//!
//! A module is the nearest ancestor directory (bounded by the library root)
//! that holds exactly one module marker file.

use regex::Regex;
use samurai_config::LibraryConfig;
use samurai_foundation::paths::{join_relative, normalize_path};
use samurai_foundation::{unquote, FileStore, ModuleId, SamuraiError, SamuraiResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, trace};

/// Extensions tried, in order, when an import omits one
const SOURCE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "d.ts", "js"];

/// Index files tried when an import names a directory
const INDEX_FILES: [&str; 3] = ["index.ts", "index.tsx", "index.js"];

/// Resolution capability the classifier depends on
pub trait ModuleResolver {
    /// Module owning `path` (a file or a directory)
    fn owner_module(&self, path: &Path) -> SamuraiResult<ModuleId>;

    /// Absolute path of the file a relative import literal designates
    fn resolve_import_target(&self, from_file: &Path, literal: &str) -> SamuraiResult<PathBuf>;
}

/// Decides which file names are module markers
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    marker: Regex,
    ignored: Option<Regex>,
}

impl MarkerPattern {
    pub fn new(marker: &str, ignored: Option<&str>) -> SamuraiResult<Self> {
        let marker = Regex::new(marker).map_err(|e| {
            SamuraiError::config(format!("Invalid marker pattern '{}': {}", marker, e))
        })?;
        let ignored = ignored
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    SamuraiError::config(format!(
                        "Invalid ignored marker pattern '{}': {}",
                        pattern, e
                    ))
                })
            })
            .transpose()?;
        Ok(Self { marker, ignored })
    }

    pub fn from_config(config: &LibraryConfig) -> SamuraiResult<Self> {
        Self::new(
            &config.marker_pattern,
            config.ignored_marker_pattern.as_deref(),
        )
    }

    pub fn is_marker(&self, file_name: &str) -> bool {
        self.marker.is_match(file_name)
            && !self
                .ignored
                .as_ref()
                .is_some_and(|ignored| ignored.is_match(file_name))
    }
}

impl Default for MarkerPattern {
    /// Angular NgModule files, excluding routing modules
    fn default() -> Self {
        Self {
            marker: Regex::new(r"\.module\.ts$").expect("default marker regex should be valid"),
            ignored: Some(
                Regex::new(r"-routing\.module\.ts$")
                    .expect("default ignored marker regex should be valid"),
            ),
        }
    }
}

/// `ModuleResolver` that discovers modules from marker files in a `FileStore`
pub struct MarkerModuleResolver<'a> {
    store: &'a dyn FileStore,
    library_root: PathBuf,
    pattern: MarkerPattern,
    /// Directory → owning module of anything inside it (None: no owner)
    owner_cache: Mutex<HashMap<PathBuf, Option<ModuleId>>>,
}

impl<'a> MarkerModuleResolver<'a> {
    pub fn new(store: &'a dyn FileStore, library_root: impl Into<PathBuf>, pattern: MarkerPattern) -> Self {
        Self {
            store,
            library_root: normalize_path(&library_root.into()),
            pattern,
            owner_cache: Mutex::new(HashMap::new()),
        }
    }

    /// The single marker directly inside `dir`, if any
    fn marker_in(&self, dir: &Path) -> SamuraiResult<Option<ModuleId>> {
        let mut markers: Vec<String> = self
            .store
            .file_names_in(dir)?
            .into_iter()
            .filter(|name| self.pattern.is_marker(name))
            .collect();

        match markers.len() {
            0 => Ok(None),
            1 => Ok(markers.pop().map(|name| ModuleId::new(dir.join(name)))),
            _ => Err(SamuraiError::AmbiguousModule {
                directory: dir.to_path_buf(),
                candidates: markers,
            }),
        }
    }

    fn cached(&self, dir: &Path) -> Option<Option<ModuleId>> {
        self.owner_cache.lock().ok()?.get(dir).cloned()
    }

    fn remember(&self, dirs: &[PathBuf], owner: &Option<ModuleId>) {
        if let Ok(mut cache) = self.owner_cache.lock() {
            for dir in dirs {
                cache.insert(dir.clone(), owner.clone());
            }
        }
    }

    /// Walk from `start` up to the library root looking for a marker
    fn find_owner(&self, start: &Path) -> SamuraiResult<Option<ModuleId>> {
        let mut visited: Vec<PathBuf> = Vec::new();

        for dir in start.ancestors() {
            if !dir.starts_with(&self.library_root) {
                break;
            }

            if let Some(result) = self.cached(dir) {
                trace!(dir = %dir.display(), "Owner cache hit");
                self.remember(&visited, &result);
                return Ok(result);
            }

            visited.push(dir.to_path_buf());

            if let Some(module) = self.marker_in(dir)? {
                let result = Some(module);
                self.remember(&visited, &result);
                return Ok(result);
            }
        }

        self.remember(&visited, &None);
        Ok(None)
    }

    fn existing_target(&self, candidate: &Path, directory_only: bool) -> Option<PathBuf> {
        if !directory_only {
            if self.store.is_file(candidate) {
                return Some(candidate.to_path_buf());
            }

            // Append rather than replace: `./b.component` names `b.component.ts`
            let file_name = candidate.file_name()?.to_string_lossy().into_owned();
            for ext in SOURCE_EXTENSIONS {
                let with_ext = candidate.with_file_name(format!("{}.{}", file_name, ext));
                if self.store.is_file(&with_ext) {
                    return Some(with_ext);
                }
            }
        }

        if self.store.is_dir(candidate) {
            for index in INDEX_FILES {
                let index_path = candidate.join(index);
                if self.store.is_file(&index_path) {
                    return Some(index_path);
                }
            }
        }

        None
    }
}

impl ModuleResolver for MarkerModuleResolver<'_> {
    fn owner_module(&self, path: &Path) -> SamuraiResult<ModuleId> {
        let start = if self.store.is_dir(path) {
            path
        } else {
            path.parent().unwrap_or(path)
        };

        let owner = self
            .find_owner(start)?
            .ok_or_else(|| SamuraiError::no_owning_module(path))?;

        debug!(path = %path.display(), module = %owner, "Resolved owning module");
        Ok(owner)
    }

    fn resolve_import_target(&self, from_file: &Path, literal: &str) -> SamuraiResult<PathBuf> {
        let specifier = unquote(literal);
        // `.`, `..` and `dir/` only ever name a directory
        let directory_only = specifier == "." || specifier == ".." || specifier.ends_with('/');
        let candidate = join_relative(from_file, specifier);
        self.existing_target(&candidate, directory_only)
            .ok_or_else(|| SamuraiError::unresolvable_import(from_file, literal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use samurai_foundation::MemoryFileStore;

    fn library() -> MemoryFileStore {
        MemoryFileStore::from_files([
            ("/lib/moduleA/a.module.ts", ""),
            ("/lib/moduleA/a-routing.module.ts", ""),
            ("/lib/moduleA/x.ts", ""),
            ("/lib/moduleA/helper.ts", ""),
            ("/lib/moduleA/deep/nested/y.ts", ""),
            ("/lib/moduleB/b.module.ts", ""),
            ("/lib/moduleB/internal.ts", ""),
            ("/lib/moduleB/b.component.ts", ""),
            ("/lib/moduleB/widgets/index.ts", ""),
            ("/lib/moduleB/inner/inner.module.ts", ""),
            ("/lib/moduleB/inner/thing.ts", ""),
            ("/lib/orphan/o.ts", ""),
            ("/outside/z.ts", ""),
        ])
    }

    #[test]
    fn test_owner_is_nearest_marker() {
        let store = library();
        let resolver = MarkerModuleResolver::new(&store, "/lib", MarkerPattern::default());

        assert_eq!(
            resolver.owner_module(Path::new("/lib/moduleA/x.ts")).unwrap(),
            ModuleId::new("/lib/moduleA/a.module.ts")
        );
        assert_eq!(
            resolver
                .owner_module(Path::new("/lib/moduleA/deep/nested/y.ts"))
                .unwrap(),
            ModuleId::new("/lib/moduleA/a.module.ts")
        );
        assert_eq!(
            resolver.owner_module(Path::new("/lib/moduleB/inner/thing.ts")).unwrap(),
            ModuleId::new("/lib/moduleB/inner/inner.module.ts")
        );
    }

    #[test]
    fn test_owner_is_consistent_across_calls() {
        let store = library();
        let resolver = MarkerModuleResolver::new(&store, "/lib", MarkerPattern::default());

        let first = resolver.owner_module(Path::new("/lib/moduleA/deep/nested/y.ts")).unwrap();
        // Second call goes through the cache
        let second = resolver.owner_module(Path::new("/lib/moduleA/deep/nested/y.ts")).unwrap();
        let sibling = resolver.owner_module(Path::new("/lib/moduleA/helper.ts")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, sibling);
    }

    #[test]
    fn test_no_owner_below_root() {
        let store = library();
        let resolver = MarkerModuleResolver::new(&store, "/lib", MarkerPattern::default());

        let err = resolver.owner_module(Path::new("/lib/orphan/o.ts")).unwrap_err();
        assert!(matches!(err, SamuraiError::NoOwningModule { .. }));

        let err = resolver.owner_module(Path::new("/outside/z.ts")).unwrap_err();
        assert!(matches!(err, SamuraiError::NoOwningModule { .. }));
    }

    #[test]
    fn test_two_markers_in_one_directory_are_ambiguous() {
        let store = MemoryFileStore::from_files([
            ("/lib/m/one.module.ts", ""),
            ("/lib/m/two.module.ts", ""),
            ("/lib/m/x.ts", ""),
        ]);
        let resolver = MarkerModuleResolver::new(&store, "/lib", MarkerPattern::default());

        let err = resolver.owner_module(Path::new("/lib/m/x.ts")).unwrap_err();
        match err {
            SamuraiError::AmbiguousModule { candidates, .. } => {
                assert_eq!(candidates, vec!["one.module.ts", "two.module.ts"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_import_target_variants() {
        let store = library();
        let resolver = MarkerModuleResolver::new(&store, "/lib", MarkerPattern::default());
        let from = Path::new("/lib/moduleA/x.ts");

        assert_eq!(
            resolver.resolve_import_target(from, "'../moduleB/internal'").unwrap(),
            PathBuf::from("/lib/moduleB/internal.ts")
        );
        assert_eq!(
            resolver.resolve_import_target(from, "'../moduleB/b.component'").unwrap(),
            PathBuf::from("/lib/moduleB/b.component.ts")
        );
        assert_eq!(
            resolver.resolve_import_target(from, "\"../moduleB/widgets\"").unwrap(),
            PathBuf::from("/lib/moduleB/widgets/index.ts")
        );
        assert_eq!(
            resolver.resolve_import_target(from, "'./helper.ts'").unwrap(),
            PathBuf::from("/lib/moduleA/helper.ts")
        );
    }

    #[test]
    fn test_bare_directory_specifiers_skip_sibling_files() {
        let store = MemoryFileStore::from_files([
            ("/lib/moduleB.ts", ""),
            ("/lib/moduleB/b.module.ts", ""),
            ("/lib/moduleB/index.ts", ""),
            ("/lib/moduleB/inner/x.ts", ""),
        ]);
        let resolver = MarkerModuleResolver::new(&store, "/lib", MarkerPattern::default());
        let from = Path::new("/lib/moduleB/inner/x.ts");

        assert_eq!(
            resolver.resolve_import_target(from, "'..'").unwrap(),
            PathBuf::from("/lib/moduleB/index.ts")
        );
        assert_eq!(
            resolver.resolve_import_target(from, "'../'").unwrap(),
            PathBuf::from("/lib/moduleB/index.ts")
        );
        assert_eq!(
            resolver.resolve_import_target(from, "'../../moduleB/'").unwrap(),
            PathBuf::from("/lib/moduleB/index.ts")
        );
        assert_eq!(
            resolver.resolve_import_target(from, "'../../moduleB'").unwrap(),
            PathBuf::from("/lib/moduleB.ts")
        );
    }

    #[test]
    fn test_unnormalized_library_root_still_bounds_the_walk() {
        let store = library();
        let resolver = MarkerModuleResolver::new(&store, "/elsewhere/../lib", MarkerPattern::default());

        assert_eq!(
            resolver.owner_module(Path::new("/lib/moduleA/x.ts")).unwrap(),
            ModuleId::new("/lib/moduleA/a.module.ts")
        );
    }

    #[test]
    fn test_missing_target_is_unresolvable() {
        let store = library();
        let resolver = MarkerModuleResolver::new(&store, "/lib", MarkerPattern::default());

        let err = resolver
            .resolve_import_target(Path::new("/lib/moduleA/x.ts"), "'../missing/thing'")
            .unwrap_err();
        match err {
            SamuraiError::UnresolvableImportTarget { file, literal } => {
                assert_eq!(file, PathBuf::from("/lib/moduleA/x.ts"));
                assert_eq!(literal, "'../missing/thing'");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_marker_pattern_excludes_routing_modules() {
        let pattern = MarkerPattern::default();
        assert!(pattern.is_marker("a.module.ts"));
        assert!(!pattern.is_marker("a-routing.module.ts"));
        assert!(!pattern.is_marker("a.module.spec.ts.bak"));
        assert!(MarkerPattern::new("(", None).is_err());
    }
}
