//! CLI command handling for samurai

mod report;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use samurai_config::{logging, AppConfig, ErrorPolicy};
use samurai_foundation::paths::normalize_path;
use samurai_foundation::{DiskFileStore, SamuraiResult};
use samurai_rewrite::{
    EngineOptions, ImportRewriteEngine, LibraryLayout, MarkerModuleResolver, MarkerPattern,
    ModuleResolver, PathRewriter, RunReport,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "samurai")]
#[command(about = "Rewrite cross-module relative imports of an Angular library to public entry points")]
#[command(version)]
pub struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite cross-module relative imports in place
    Rewrite {
        #[command(flatten)]
        library: LibraryArgs,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,

        /// Record unresolvable imports and parse failures and continue
        #[arg(long)]
        keep_going: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Exit with status 1 if any file would be rewritten
    Check {
        #[command(flatten)]
        library: LibraryArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Print the owning module and public entry point of a file
    Resolve {
        /// File or directory inside the library
        file: PathBuf,

        #[command(flatten)]
        library: LibraryArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

/// Options locating the library, shared by all commands
#[derive(Args)]
pub struct LibraryArgs {
    /// Workspace directory holding angular.json and samurai.toml
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// Library root directory (overrides angular.json)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Public import prefix (overrides package.json)
    #[arg(long)]
    prefix: Option<String>,

    /// Configuration file (defaults to samurai.toml in the workspace)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Everything a command needs once configuration is settled
struct Session {
    workspace: PathBuf,
    config: AppConfig,
    layout: LibraryLayout,
    store: DiskFileStore,
    pattern: MarkerPattern,
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(normalize_path(&cwd.join(path)))
}

impl LibraryArgs {
    fn session(&self, keep_going: bool) -> Result<Session> {
        let workspace = absolute(&self.workspace)?;
        let mut config = AppConfig::load_from(&workspace, self.config.as_deref())
            .context("Failed to load configuration")?;

        if let Some(root) = &self.root {
            config.library.root = Some(absolute(root)?);
        }
        if let Some(prefix) = &self.prefix {
            config.library.public_prefix = Some(prefix.clone());
        }
        if keep_going {
            config.rewrite.error_policy = ErrorPolicy::Collect;
        }
        config.validate()?;

        logging::initialize(&config);

        let layout = LibraryLayout::discover(&config.library, &workspace)?;
        let store = DiskFileStore::new().with_excluded_dirs(config.library.exclude.clone());
        let pattern = MarkerPattern::from_config(&config.library)?;

        Ok(Session {
            workspace,
            config,
            layout,
            store,
            pattern,
        })
    }
}

impl Session {
    fn resolver(&self) -> MarkerModuleResolver<'_> {
        MarkerModuleResolver::new(&self.store, &self.layout.root, self.pattern.clone())
    }

    fn rewriter(&self) -> PathRewriter {
        PathRewriter::new(
            &self.layout.root,
            &self.layout.public_prefix,
            self.config.rewrite.quote_style,
        )
    }

    fn run(&self, write: bool) -> SamuraiResult<RunReport> {
        let mut options = EngineOptions::from_config(&self.config);
        if !write {
            options = options.dry_run();
        }

        let resolver = self.resolver();
        let engine = ImportRewriteEngine::new(&self.store, &resolver, self.rewriter(), options);
        engine.run(&self.layout.root)
    }
}

/// Run a parsed command line; the returned code is the process exit status
pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Rewrite {
            library,
            dry_run,
            keep_going,
            format,
        } => {
            let session = library.session(keep_going)?;
            let report = session.run(!dry_run)?;
            report::print_run(&report, &session.workspace, format)?;

            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Check { library, format } => {
            let session = library.session(false)?;
            let report = session.run(false)?;
            report::print_run(&report, &session.workspace, format)?;

            if report.files_changed.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                info!(files = report.files_changed.len(), "Imports need rewriting");
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Resolve {
            file,
            library,
            format,
        } => {
            let session = library.session(false)?;
            let file = absolute(&file)?;

            let module = session.resolver().owner_module(&file)?;
            let entry = session.rewriter().public_entry(&module)?;
            report::print_resolution(&file, &module, &entry, &session.workspace, format)?;

            Ok(ExitCode::SUCCESS)
        }
    }
}
