//! A small Angular library used across the rewrite tests
//!
//! ```text
//! projects/ui/
//!   package.json                  "@acme/ui"
//!   src/lib/
//!     root.module.ts
//!     moduleA/a.module.ts
//!     moduleA/a-routing.module.ts
//!     moduleA/x.ts                imports moduleB internals
//!     moduleA/helper.ts
//!     moduleB/b.module.ts
//!     moduleB/internal.ts
//!     moduleB/widgets/index.ts
//! ```

use crate::workspace::TestWorkspace;
use samurai_foundation::MemoryFileStore;
use std::path::{Path, PathBuf};

pub const PROJECT: &str = "ui";
pub const PROJECT_ROOT: &str = "projects/ui";
pub const LIBRARY_ROOT: &str = "projects/ui/src/lib";
pub const PACKAGE_NAME: &str = "@acme/ui";

pub const X_TS: &str = "\
import { Component } from '@angular/core';
import {f} from '../moduleB/internal';
import { Widget } from \"../moduleB/widgets\";
import {g} from './helper';

@Component({ selector: 'lib-x', template: '' })
export class XComponent {
  value = f(g);
}
";

pub const X_TS_REWRITTEN: &str = "\
import { Component } from '@angular/core';
import {f} from '@acme/ui/moduleB';
import { Widget } from '@acme/ui/moduleB';
import {g} from './helper';

@Component({ selector: 'lib-x', template: '' })
export class XComponent {
  value = f(g);
}
";

/// Library source files, relative to the library root
pub fn library_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("root.module.ts", "export class RootModule {}\n"),
        ("moduleA/a.module.ts", "import { XComponent } from './x';\nexport class AModule {}\n"),
        (
            "moduleA/a-routing.module.ts",
            "import { Routes } from '@angular/router';\nexport const routes: Routes = [];\n",
        ),
        ("moduleA/x.ts", X_TS),
        ("moduleA/helper.ts", "export const g = 1;\n"),
        ("moduleB/b.module.ts", "export class BModule {}\n"),
        ("moduleB/internal.ts", "export function f(n: number) { return n; }\n"),
        ("moduleB/widgets/index.ts", "export class Widget {}\n"),
    ]
}

/// The sample library laid out in an in-memory store rooted at `root`
pub fn memory_library(root: &Path) -> MemoryFileStore {
    MemoryFileStore::from_files(
        library_files()
            .into_iter()
            .map(|(rel, content)| (root.join(rel), content)),
    )
}

/// The sample library on disk, inside an Angular workspace
pub struct SampleLibrary {
    pub workspace: TestWorkspace,
}

impl SampleLibrary {
    pub fn root(&self) -> PathBuf {
        self.workspace.absolute_path(LIBRARY_ROOT)
    }

    pub fn read(&self, rel: &str) -> String {
        self.workspace.read_file(&format!("{}/{}", LIBRARY_ROOT, rel))
    }

    pub fn write(&self, rel: &str, content: &str) {
        self.workspace
            .create_file(&format!("{}/{}", LIBRARY_ROOT, rel), content);
    }
}

pub fn sample_library() -> SampleLibrary {
    let workspace = TestWorkspace::new();
    workspace.create_angular_json(PROJECT, PROJECT_ROOT);
    workspace.create_package_json(PROJECT_ROOT, PACKAGE_NAME);
    for (rel, content) in library_files() {
        workspace.create_file(&format!("{}/{}", LIBRARY_ROOT, rel), content);
    }
    SampleLibrary { workspace }
}
