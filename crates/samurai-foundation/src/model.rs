//! Core data structures shared by the parser, resolver and rewriter

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a logical module: the path of its module marker file.
///
/// Two files belong to the same module exactly when their owners compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(PathBuf);

impl ModuleId {
    pub fn new(marker: impl Into<PathBuf>) -> Self {
        Self(marker.into())
    }

    /// Path of the module marker file
    pub fn marker(&self) -> &Path {
        &self.0
    }

    /// Root directory of the module (the directory holding the marker)
    pub fn root_dir(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Kind of top-level declaration carrying a module specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportKind {
    /// `import … from '…'` or `import '…'`
    Import,
    /// `export … from '…'`
    ReExport,
}

/// An import declaration found in a source file.
///
/// Offsets are byte offsets into the original text; `start..end` covers the
/// path-literal token including its quote characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStatement {
    /// Raw literal text, quotes included (e.g. `'../moduleB/internal'`)
    pub literal: String,
    pub start: usize,
    pub end: usize,
    /// Whether a `;` immediately follows the literal
    pub terminated: bool,
    pub kind: ImportKind,
}

impl ImportStatement {
    /// Literal text without its surrounding quote characters
    pub fn specifier(&self) -> &str {
        unquote(&self.literal)
    }

    /// Whether the literal names a path relative to the importing file
    pub fn is_relative(&self) -> bool {
        let spec = self.specifier();
        spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../")
    }
}

/// Strip one pair of matching quote characters, if present
pub fn unquote(literal: &str) -> &str {
    let bytes = literal.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"' || first == b'`') {
            return &literal[1..literal.len() - 1];
        }
    }
    literal
}

/// Quote character used for rewritten literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    pub fn quote(self, value: &str) -> String {
        match self {
            QuoteStyle::Single => format!("'{}'", value.replace('\'', "\\'")),
            QuoteStyle::Double => format!("\"{}\"", value.replace('"', "\\\"")),
        }
    }
}

/// A text replacement over the half-open byte range `start..end` of a file's
/// original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modification {
    pub start: usize,
    pub end: usize,
    pub content: String,
}

impl Modification {
    pub fn new(start: usize, end: usize, content: impl Into<String>) -> Self {
        Self {
            start,
            end,
            content: content.into(),
        }
    }

    /// Ranges overlap when they share at least one byte. Two empty ranges at
    /// the same offset also conflict, since their order would be ambiguous.
    pub fn overlaps(&self, other: &Modification) -> bool {
        if self.start == other.start {
            return true;
        }
        self.start < other.end && other.start < self.end
    }
}
