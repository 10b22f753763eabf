//! samurai-rewrite: cross-module import path rewriting
//!
//! Pipeline per source file, leaves first:
//!
//! ```text
//! parse (samurai-lang-typescript)
//!   ↓ ImportStatement spans
//! classifier  → external | intra-module | cross-module
//!   ↓ uses resolver (owning module of a path, import target resolution)
//! rewriter    → Modification pointing at the target's public entry point
//!   ↓
//! transformer → splice modifications in descending start order
//! ```
//!
//! `engine` drives the pipeline over a library; `layout` works out the library
//! root and public prefix from configuration and workspace files.

pub mod classifier;
pub mod engine;
pub mod layout;
pub mod resolver;
pub mod rewriter;
pub mod transformer;

pub use classifier::{ImportClass, ImportClassifier};
pub use engine::{Diagnostic, EngineOptions, FileOutcome, ImportRewriteEngine, RunReport};
pub use layout::LibraryLayout;
pub use resolver::{MarkerModuleResolver, MarkerPattern, ModuleResolver};
pub use rewriter::PathRewriter;
pub use transformer::apply_modifications;
