//! Test support utilities and fixtures for samurai tests

pub mod fixtures;
pub mod mocks;
pub mod workspace;

pub use fixtures::{sample_library, SampleLibrary};
pub use mocks::MockFileStore;
pub use workspace::TestWorkspace;
