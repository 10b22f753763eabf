//! TypeScript support for samurai
//!
//! - `parser`: locate top-level import declarations and the byte span of their
//!   path literals using SWC
//! - `workspace`: read `angular.json` to find the library root
//! - `manifest`: read the library's `package.json`

pub mod manifest;
pub mod parser;
pub mod workspace;

pub use manifest::PackageManifest;
pub use parser::{parse_imports, ParseOptions};
pub use workspace::AngularWorkspace;
