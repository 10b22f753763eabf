//! Import classification by module ownership

use crate::resolver::ModuleResolver;
use samurai_foundation::{ImportStatement, ModuleId, SamuraiError, SamuraiResult};
use std::path::{Path, PathBuf};
use tracing::trace;

/// How an import relates to the module of the file containing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportClass {
    /// Non-relative literal (package or alias); never touched
    External,
    /// Relative literal resolving into the importing file's own module
    IntraModule,
    /// Relative literal resolving into another module
    CrossModule { target: PathBuf, module: ModuleId },
}

/// Classifies import statements using a `ModuleResolver`
pub struct ImportClassifier<'r> {
    resolver: &'r dyn ModuleResolver,
}

impl<'r> ImportClassifier<'r> {
    pub fn new(resolver: &'r dyn ModuleResolver) -> Self {
        Self { resolver }
    }

    /// Classify one import of `file`, whose owning module is `file_module`.
    ///
    /// Only the shape of the path literal matters. A relative import whose
    /// target cannot be found, or whose target has no owning module, is an
    /// `UnresolvableImportTarget` error.
    pub fn classify(
        &self,
        file: &Path,
        file_module: &ModuleId,
        import: &ImportStatement,
    ) -> SamuraiResult<ImportClass> {
        if !import.is_relative() {
            trace!(literal = %import.literal, "External import");
            return Ok(ImportClass::External);
        }

        let target = self.resolver.resolve_import_target(file, &import.literal)?;

        let module = match self.resolver.owner_module(&target) {
            Ok(module) => module,
            Err(SamuraiError::NoOwningModule { .. }) => {
                return Err(SamuraiError::unresolvable_import(file, &import.literal));
            }
            Err(other) => return Err(other),
        };

        if &module == file_module {
            trace!(literal = %import.literal, "Intra-module import");
            Ok(ImportClass::IntraModule)
        } else {
            trace!(literal = %import.literal, target_module = %module, "Cross-module import");
            Ok(ImportClass::CrossModule { target, module })
        }
    }
}
