//! Mock implementations for testing

use mockall::mock;
use samurai_foundation::{FileStore, SamuraiResult};
use std::path::{Path, PathBuf};

mock! {
    pub FileStore {}

    impl FileStore for FileStore {
        fn list_files(&self, root: &Path) -> SamuraiResult<Vec<PathBuf>>;
        fn file_names_in(&self, dir: &Path) -> SamuraiResult<Vec<String>>;
        fn read_to_string(&self, path: &Path) -> SamuraiResult<String>;
        fn overwrite(&self, path: &Path, content: &str) -> SamuraiResult<()>;
        fn is_file(&self, path: &Path) -> bool;
        fn is_dir(&self, path: &Path) -> bool;
    }
}
