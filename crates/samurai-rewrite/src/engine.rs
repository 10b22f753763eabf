//! Per-file rewrite pipeline and library runs
//!
//! Files are processed one at a time, in sorted path order. Each file is read
//! once, all of its modifications are computed, and only then is the new text
//! written back. A failing file is never written.

use crate::classifier::{ImportClass, ImportClassifier};
use crate::resolver::ModuleResolver;
use crate::rewriter::PathRewriter;
use crate::transformer::apply_modifications;
use samurai_config::logging::file_span;
use samurai_config::{AppConfig, ErrorPolicy};
use samurai_foundation::{FileStore, Modification, SamuraiError, SamuraiResult};
use samurai_lang_typescript::{parse_imports, ParseOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Knobs of a run
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub parse: ParseOptions,
    pub error_policy: ErrorPolicy,
    /// Write rewritten files back; false computes a report only
    pub write: bool,
    /// Extensions (without dot) of files to process
    pub extensions: Vec<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            error_policy: ErrorPolicy::FailFast,
            write: true,
            extensions: vec!["ts".to_string()],
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            parse: ParseOptions {
                include_reexports: config.rewrite.include_reexports,
            },
            error_policy: config.rewrite.error_policy,
            write: true,
            extensions: config.library.extensions.clone(),
        }
    }

    pub fn dry_run(mut self) -> Self {
        self.write = false;
        self
    }
}

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub path: PathBuf,
    pub modifications: Vec<Modification>,
    /// Whether the rewritten text differs from the original
    pub changed: bool,
}

/// A per-file problem recorded while collecting diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub file: Option<PathBuf>,
    pub literal: Option<String>,
    pub message: String,
}

impl From<&SamuraiError> for Diagnostic {
    fn from(err: &SamuraiError) -> Self {
        let literal = match err {
            SamuraiError::UnresolvableImportTarget { literal, .. } => Some(literal.clone()),
            _ => None,
        };
        Self {
            file: err.file().map(Path::to_path_buf),
            literal,
            message: err.to_string(),
        }
    }
}

/// Summary of a library run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub files_scanned: usize,
    /// Files whose text changed (or would change, in a dry run)
    pub files_changed: Vec<PathBuf>,
    pub modifications: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub written: bool,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Rewrites cross-module relative imports to public entry points
pub struct ImportRewriteEngine<'a> {
    store: &'a dyn FileStore,
    classifier: ImportClassifier<'a>,
    resolver: &'a dyn ModuleResolver,
    rewriter: PathRewriter,
    options: EngineOptions,
}

impl<'a> ImportRewriteEngine<'a> {
    pub fn new(
        store: &'a dyn FileStore,
        resolver: &'a dyn ModuleResolver,
        rewriter: PathRewriter,
        options: EngineOptions,
    ) -> Self {
        Self {
            store,
            classifier: ImportClassifier::new(resolver),
            resolver,
            rewriter,
            options,
        }
    }

    /// Modifications needed to make every cross-module import of `path`
    /// point at a public entry point
    pub fn plan(&self, path: &Path, source: &str) -> SamuraiResult<Vec<Modification>> {
        let file_module = self.resolver.owner_module(path)?;
        let imports = parse_imports(path, source, self.options.parse)?;

        let mut modifications = Vec::new();
        for import in &imports {
            if let ImportClass::CrossModule { module, .. } =
                self.classifier.classify(path, &file_module, import)?
            {
                let modification = self.rewriter.modification_for(import, &module)?;
                if source.get(modification.start..modification.end)
                    == Some(modification.content.as_str())
                {
                    continue;
                }
                debug!(
                    literal = %import.literal,
                    replacement = %modification.content,
                    "Cross-module import"
                );
                modifications.push(modification);
            }
        }

        Ok(modifications)
    }

    /// Process one file: parse, classify, rewrite and (unless dry-running)
    /// overwrite it in place
    pub fn rewrite_file(&self, path: &Path) -> SamuraiResult<FileOutcome> {
        let _span = file_span(path).entered();

        let source = self.store.read_to_string(path)?;
        let modifications = self.plan(path, &source)?;

        if modifications.is_empty() {
            return Ok(FileOutcome {
                path: path.to_path_buf(),
                modifications,
                changed: false,
            });
        }

        let rewritten = apply_modifications(path, &source, &modifications)?;
        let changed = rewritten != source;

        if changed && self.options.write {
            self.store.overwrite(path, &rewritten)?;
            info!(modifications = modifications.len(), "Rewrote imports");
        }

        Ok(FileOutcome {
            path: path.to_path_buf(),
            modifications,
            changed,
        })
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.options.extensions.iter().any(|e| e == ext))
    }

    /// Process every matching file under `root`
    pub fn run(&self, root: &Path) -> SamuraiResult<RunReport> {
        let files: Vec<PathBuf> = self
            .store
            .list_files(root)?
            .into_iter()
            .filter(|path| self.wants(path))
            .collect();

        info!(root = %root.display(), files = files.len(), "Rewriting library imports");

        let mut report = RunReport {
            written: self.options.write,
            ..RunReport::default()
        };

        for path in files {
            report.files_scanned += 1;
            match self.rewrite_file(&path) {
                Ok(outcome) => {
                    report.modifications += outcome.modifications.len();
                    if outcome.changed {
                        report.files_changed.push(outcome.path);
                    }
                }
                Err(err)
                    if self.options.error_policy == ErrorPolicy::Collect
                        && !err.is_fatal_for_run() =>
                {
                    warn!(file = %path.display(), error = %err, "Skipping file");
                    report.diagnostics.push(Diagnostic::from(&err));
                }
                Err(err) => {
                    error!(file = %path.display(), error = %err, "Aborting run");
                    return Err(err);
                }
            }
        }

        info!(
            scanned = report.files_scanned,
            changed = report.files_changed.len(),
            modifications = report.modifications,
            diagnostics = report.diagnostics.len(),
            "Run finished"
        );

        Ok(report)
    }
}
