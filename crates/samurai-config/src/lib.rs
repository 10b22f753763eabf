//! Configuration and logging setup for samurai

pub mod config;
pub mod logging;

pub use config::{
    AppConfig, ErrorPolicy, LibraryConfig, LogFormat, LoggingConfig, RewriteConfig,
};
