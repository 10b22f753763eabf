//! End-to-end runs of the import rewrite engine

use pretty_assertions::assert_eq;
use samurai_config::{AppConfig, ErrorPolicy, LibraryConfig};
use samurai_foundation::{DiskFileStore, MemoryFileStore, QuoteStyle, SamuraiError};
use samurai_lang_typescript::ParseOptions;
use samurai_rewrite::{
    EngineOptions, ImportRewriteEngine, LibraryLayout, MarkerModuleResolver, MarkerPattern,
    PathRewriter,
};
use samurai_test_support::fixtures::{self, memory_library, X_TS, X_TS_REWRITTEN};
use samurai_test_support::{sample_library, MockFileStore, TestWorkspace};
use std::path::{Path, PathBuf};

const ROOT: &str = "/ws/projects/ui/src/lib";

fn rewriter() -> PathRewriter {
    PathRewriter::new(ROOT, fixtures::PACKAGE_NAME, QuoteStyle::Single)
}

fn run_in_memory(
    store: &MemoryFileStore,
    options: EngineOptions,
) -> Result<samurai_rewrite::RunReport, SamuraiError> {
    let resolver = MarkerModuleResolver::new(store, ROOT, MarkerPattern::default());
    let engine = ImportRewriteEngine::new(store, &resolver, rewriter(), options);
    engine.run(Path::new(ROOT))
}

fn lib_path(rel: &str) -> PathBuf {
    Path::new(ROOT).join(rel)
}

#[test]
fn rewrites_only_cross_module_imports() {
    let store = memory_library(Path::new(ROOT));

    let report = run_in_memory(&store, EngineOptions::default()).unwrap();

    assert_eq!(store.get(lib_path("moduleA/x.ts")).unwrap(), X_TS_REWRITTEN);
    assert_eq!(report.files_changed, vec![lib_path("moduleA/x.ts")]);
    assert_eq!(report.modifications, 2);
    assert_eq!(report.files_scanned, fixtures::library_files().len());
    assert!(report.is_clean());

    for (rel, content) in fixtures::library_files() {
        if rel != "moduleA/x.ts" {
            assert_eq!(store.get(lib_path(rel)).unwrap(), content, "{} changed", rel);
        }
    }
}

#[test]
fn second_run_is_a_no_op() {
    let store = memory_library(Path::new(ROOT));
    run_in_memory(&store, EngineOptions::default()).unwrap();

    let report = run_in_memory(&store, EngineOptions::default()).unwrap();

    assert!(report.files_changed.is_empty());
    assert_eq!(report.modifications, 0);
    assert_eq!(store.get(lib_path("moduleA/x.ts")).unwrap(), X_TS_REWRITTEN);
}

#[test]
fn library_without_cross_module_imports_is_untouched() {
    let store = memory_library(Path::new(ROOT));
    store.insert(lib_path("moduleA/x.ts"), "import {g} from './helper';\n");

    let report = run_in_memory(&store, EngineOptions::default()).unwrap();

    assert!(report.files_changed.is_empty());
    for (rel, content) in fixtures::library_files() {
        if rel != "moduleA/x.ts" {
            assert_eq!(store.get(lib_path(rel)).unwrap(), content);
        }
    }
}

#[test]
fn missing_target_stops_the_run_before_later_files_are_written() {
    let store = memory_library(Path::new(ROOT));
    // Sorts before x.ts
    store.insert(
        lib_path("moduleA/bad.ts"),
        "import { thing } from '../missing/thing';\n",
    );

    let err = run_in_memory(&store, EngineOptions::default()).unwrap_err();

    match err {
        SamuraiError::UnresolvableImportTarget { file, literal } => {
            assert_eq!(file, lib_path("moduleA/bad.ts"));
            assert_eq!(literal, "'../missing/thing'");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.get(lib_path("moduleA/x.ts")).unwrap(), X_TS);
}

#[test]
fn collect_policy_records_diagnostics_and_keeps_going() {
    let store = memory_library(Path::new(ROOT));
    store.insert(
        lib_path("moduleA/bad.ts"),
        "import { thing } from '../missing/thing';\n",
    );
    store.insert(lib_path("moduleB/broken.ts"), "import { from ;\n");

    let options = EngineOptions {
        error_policy: ErrorPolicy::Collect,
        ..EngineOptions::default()
    };
    let report = run_in_memory(&store, options).unwrap();

    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(report.diagnostics[0].file, Some(lib_path("moduleA/bad.ts")));
    assert_eq!(
        report.diagnostics[0].literal.as_deref(),
        Some("'../missing/thing'")
    );
    assert_eq!(report.diagnostics[1].file, Some(lib_path("moduleB/broken.ts")));
    assert_eq!(store.get(lib_path("moduleA/x.ts")).unwrap(), X_TS_REWRITTEN);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["filesChanged"].as_array().unwrap().len(), 1);
}

#[test]
fn ambiguous_module_is_fatal_even_when_collecting() {
    let store = memory_library(Path::new(ROOT));
    store.insert(lib_path("moduleB/other.module.ts"), "export class OtherModule {}\n");

    let options = EngineOptions {
        error_policy: ErrorPolicy::Collect,
        ..EngineOptions::default()
    };
    let err = run_in_memory(&store, options).unwrap_err();

    assert!(matches!(err, SamuraiError::AmbiguousModule { .. }));
}

#[test]
fn reexports_are_rewritten_when_enabled() {
    let store = memory_library(Path::new(ROOT));
    store.insert(
        lib_path("moduleA/public.ts"),
        "export * from '../moduleB/internal';\nexport { g } from './helper';\n",
    );

    run_in_memory(&store, EngineOptions::default()).unwrap();
    assert_eq!(
        store.get(lib_path("moduleA/public.ts")).unwrap(),
        "export * from '../moduleB/internal';\nexport { g } from './helper';\n"
    );

    let options = EngineOptions {
        parse: ParseOptions {
            include_reexports: true,
        },
        ..EngineOptions::default()
    };
    run_in_memory(&store, options).unwrap();
    assert_eq!(
        store.get(lib_path("moduleA/public.ts")).unwrap(),
        "export * from '@acme/ui/moduleB';\nexport { g } from './helper';\n"
    );
}

#[test]
fn source_file_without_owning_module_aborts_even_when_collecting() {
    let store = MemoryFileStore::from_files(
        fixtures::library_files()
            .into_iter()
            .filter(|(rel, _)| *rel != "root.module.ts")
            .map(|(rel, content)| (lib_path(rel), content)),
    );
    store.insert(lib_path("shared/loose.ts"), "export const l = 1;\n");

    let options = EngineOptions {
        error_policy: ErrorPolicy::Collect,
        ..EngineOptions::default()
    };
    let err = run_in_memory(&store, options).unwrap_err();

    match err {
        SamuraiError::NoOwningModule { path } => assert_eq!(path, lib_path("shared/loose.ts")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn file_with_byte_order_mark_is_rewritten_in_place() {
    let store = memory_library(Path::new(ROOT));
    store.insert(
        lib_path("moduleA/x.ts"),
        "\u{feff}import {f} from '../moduleB/internal';\nimport {g} from './helper';\n",
    );

    run_in_memory(&store, EngineOptions::default()).unwrap();

    assert_eq!(
        store.get(lib_path("moduleA/x.ts")).unwrap(),
        "\u{feff}import {f} from '@acme/ui/moduleB';\nimport {g} from './helper';\n"
    );
}

#[test]
fn library_root_above_the_workspace_is_normalized() {
    let workspace = TestWorkspace::new();
    for (rel, content) in fixtures::library_files() {
        workspace.create_file(&format!("shared/lib/{}", rel), content);
    }
    workspace.create_file("ws/samurai.toml", "[library]\nroot = \"../shared/lib\"\npublic_prefix = \"@acme/ui\"\n");

    let workspace_dir = workspace.absolute_path("ws");
    let config = AppConfig::load_from(&workspace_dir, None).unwrap();
    let layout = LibraryLayout::discover(&config.library, &workspace_dir).unwrap();
    assert_eq!(layout.root, workspace.absolute_path("shared/lib"));

    let store = DiskFileStore::new();
    let resolver = MarkerModuleResolver::new(&store, &layout.root, MarkerPattern::default());
    let engine = ImportRewriteEngine::new(
        &store,
        &resolver,
        PathRewriter::new(&layout.root, &layout.public_prefix, QuoteStyle::Single),
        EngineOptions::default(),
    );

    let report = engine.run(&layout.root).unwrap();

    assert_eq!(report.files_changed.len(), 1);
    assert_eq!(workspace.read_file("shared/lib/moduleA/x.ts"), X_TS_REWRITTEN);
}

#[test]
fn file_without_cross_module_imports_is_never_written() {
    let file = lib_path("moduleA/y.ts");
    let mut store = MockFileStore::new();
    store
        .expect_read_to_string()
        .returning(|_| Ok("import { Component } from '@angular/core';\n".to_string()));
    store.expect_is_dir().returning(|_| false);
    store
        .expect_file_names_in()
        .returning(|_| Ok(vec!["a.module.ts".to_string(), "y.ts".to_string()]));
    store.expect_overwrite().times(0);

    let resolver = MarkerModuleResolver::new(&store, ROOT, MarkerPattern::default());
    let engine = ImportRewriteEngine::new(&store, &resolver, rewriter(), EngineOptions::default());

    let outcome = engine.rewrite_file(&file).unwrap();

    assert!(!outcome.changed);
    assert!(outcome.modifications.is_empty());
}

#[test]
fn disk_library_discovered_from_angular_workspace() {
    let library = sample_library();
    let layout =
        LibraryLayout::discover(&LibraryConfig::default(), library.workspace.path()).unwrap();
    assert_eq!(layout.root, library.root());
    assert_eq!(layout.public_prefix, fixtures::PACKAGE_NAME);

    let store = DiskFileStore::new().with_excluded_dirs(["node_modules".to_string()]);
    let resolver = MarkerModuleResolver::new(&store, &layout.root, MarkerPattern::default());
    let engine = ImportRewriteEngine::new(
        &store,
        &resolver,
        PathRewriter::new(&layout.root, &layout.public_prefix, QuoteStyle::Single),
        EngineOptions::default(),
    );

    let report = engine.run(&layout.root).unwrap();

    assert_eq!(report.files_changed, vec![library.root().join("moduleA/x.ts")]);
    assert_eq!(library.read("moduleA/x.ts"), X_TS_REWRITTEN);
    assert_eq!(library.read("moduleA/helper.ts"), "export const g = 1;\n");
}
