//! Foundation Layer - shared types for the samurai import rewriter
//!
//! This crate provides the building blocks every other samurai crate relies on:
//! - The error taxonomy (`SamuraiError`)
//! - Core data structures (`ModuleId`, `ImportStatement`, `Modification`)
//! - The file access capability (`FileStore`) with disk and in-memory backends
//! - Lexical path helpers

pub mod error;
pub mod file_store;
pub mod model;
pub mod paths;

// Re-export commonly used types for convenience
pub use error::{SamuraiError, SamuraiResult};
pub use file_store::{DiskFileStore, FileStore, MemoryFileStore};
pub use model::*;
