//! The Core module serves as the central integration point for trivfold,
//! tying the IR, the identity simplifier, configuration and logging together.
//!
//! This module re-exports the public interfaces of the member crates, making it
//! easier to use trivfold's capabilities in other projects.

/// Error types for the core module
pub mod error;

use tracing::debug;
use trivfold_config::Configuration;
use trivfold_ir::Program;
use trivfold_simplify::{simplify, SimplifyArgs, SimplifyResult};
use trivfold_tracing::{FileWorkerGuard, LayerInfo, LogFormat, Tracer, TrivfoldTracer};

use crate::error::Error;

// Re-export all member crates
pub use trivfold_common;
pub use trivfold_config;
pub use trivfold_ir;
pub use trivfold_simplify;
pub use trivfold_tracing;

/// Installs a stdout subscriber at `warn`, extended by the configured
/// `log_filter` directives.
pub fn init_tracing(config: &Configuration) -> Result<Option<FileWorkerGuard>, Error> {
    let stdout = LayerInfo::new(
        LogFormat::Terminal,
        "warn".to_string(),
        config.log_filter.clone(),
        Some("auto".to_string()),
    );
    Ok(TrivfoldTracer::new().with_stdout(stdout).init()?)
}

/// Simplifies `program` using the options stored in the user's configuration.
pub fn simplify_with_config(program: &mut Program) -> Result<SimplifyResult, Error> {
    let config = Configuration::load()?;
    debug!("loaded configuration: {:?}", config);
    Ok(simplify(program, SimplifyArgs::from(&config))?)
}
