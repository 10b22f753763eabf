//! Public entry point naming and modification construction

use samurai_foundation::paths::{normalize_path, relative_slash_path};
use samurai_foundation::{ImportStatement, Modification, ModuleId, QuoteStyle, SamuraiError, SamuraiResult};
use std::path::PathBuf;

/// Builds replacement literals naming a module's public entry point
#[derive(Debug, Clone)]
pub struct PathRewriter {
    library_root: PathBuf,
    public_prefix: String,
    quote_style: QuoteStyle,
}

impl PathRewriter {
    pub fn new(
        library_root: impl Into<PathBuf>,
        public_prefix: impl Into<String>,
        quote_style: QuoteStyle,
    ) -> Self {
        Self {
            library_root: normalize_path(&library_root.into()),
            public_prefix: public_prefix.into(),
            quote_style,
        }
    }

    /// Canonical import path of `module`: `<prefix>/<module dir relative to the library root>`.
    ///
    /// Pure string computation, no file access.
    pub fn public_entry(&self, module: &ModuleId) -> SamuraiResult<String> {
        let relative = relative_slash_path(module.root_dir(), &self.library_root).ok_or_else(|| {
            SamuraiError::invalid_path(
                module.marker(),
                format!(
                    "module lies outside the library root {}",
                    self.library_root.display()
                ),
            )
        })?;

        if relative.is_empty() {
            Ok(self.public_prefix.clone())
        } else {
            Ok(format!("{}/{}", self.public_prefix, relative))
        }
    }

    /// Modification replacing the literal of `import` (and its `;`, if it has
    /// one) with the public entry of `module`
    pub fn modification_for(
        &self,
        import: &ImportStatement,
        module: &ModuleId,
    ) -> SamuraiResult<Modification> {
        let mut content = self.quote_style.quote(&self.public_entry(module)?);
        let mut end = import.end;
        if import.terminated {
            content.push(';');
            end += 1;
        }
        Ok(Modification::new(import.start, end, content))
    }
}
