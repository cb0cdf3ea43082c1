//! The `trivfold-tracing` crate sets up the `tracing` subscriber used by every
//! trivfold crate.
//!
//! A [`TrivfoldTracer`] always logs to stdout and can additionally write to a
//! size-rotated log file. Each destination carries its own [`LogFormat`] and
//! filter directives.
// Mostly taken from [reth](https://github.com/paradigmxyz/reth)

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing crates
pub use tracing;
pub use tracing_subscriber;

// Re-export LogFormat
pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard};

mod formatter;
mod layers;

use crate::layers::Layers;

/// Tracer for application logging.
///
/// Manages the configuration and initialization of logging layers,
/// including standard output and an optional file.
#[derive(Debug, Clone)]
pub struct TrivfoldTracer {
    stdout: LayerInfo,
    file: Option<(LayerInfo, FileInfo)>,
}

impl TrivfoldTracer {
    /// Constructs a new `TrivfoldTracer` with default settings.
    ///
    /// Initializes with default stdout layer configuration.
    /// File logging is not set.
    pub fn new() -> Self {
        Self { stdout: LayerInfo::default(), file: None }
    }

    /// Sets a custom configuration for the stdout layer.
    ///
    /// # Arguments
    /// * `config` - The `LayerInfo` to use for the stdout layer.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Sets file logging configuration.
    ///
    /// # Arguments
    /// * `config` - Format and filter of the file layer.
    /// * `file_info` - Location and rotation of the log file.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Default for TrivfoldTracer {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a logging layer.
///
/// This struct holds configuration parameters for a tracing layer, including
/// the format, filtering directives, optional coloring, and directive.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    /// Constructs a new `LayerInfo`.
    ///
    /// # Arguments
    /// * `format` - Specifies the format for log messages. Possible values are:
    ///     - `LogFormat::Json` for JSON formatting.
    ///     - `LogFormat::LogFmt` for logfmt (key=value) formatting.
    ///     - `LogFormat::Terminal` for human-readable, terminal-friendly formatting.
    /// * `default_directive` - Directive for filtering log messages.
    /// * `filters` - Additional filtering parameters as a string.
    /// * `color` - Optional color configuration for the log messages.
    pub const fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    /// Provides default values for `LayerInfo`.
    ///
    /// By default, it uses terminal format, INFO level filter,
    /// no additional filters, and no color configuration.
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: LevelFilter::INFO.to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// Trait defining a general interface for logging configuration.
///
/// The `Tracer` trait provides a standardized way to initialize logging configurations
/// in an application. Implementations of this trait can specify different logging setups,
/// such as standard output logging or file logging.
pub trait Tracer {
    /// Initialize the logging configuration.
    ///
    /// # Returns
    /// An `eyre::Result` which is `Ok` with an optional `WorkerGuard` if a file layer is used,
    /// or an `Err` in case of an error during initialization.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

impl Tracer for TrivfoldTracer {
    /// Initializes the logging system based on the configured layers.
    ///
    /// This method sets up the global tracing subscriber with the specified
    /// stdout and file layers.
    ///
    /// The default layer is stdout.
    ///
    /// # Returns
    /// An `eyre::Result` which is `Ok` with an optional `WorkerGuard` if a file layer is used,
    /// or an `Err` in case of an error during initialization.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.default_directive.parse()?,
            &self.stdout.filters,
            self.stdout.color,
        )?;

        let file_guard = if let Some((config, file_info)) = self.file {
            Some(layers.file(config.format, &config.filters, file_info)?)
        } else {
            None
        };

        // The error is returned if the global default subscriber is already set,
        // so it's safe to ignore it
        let _ = tracing_subscriber::registry().with(layers.into_inner()).try_init();
        Ok(file_guard)
    }
}

/// Initializes a tracing subscriber for tests.
///
/// The filter is configurable via `RUST_LOG`.
///
/// # Note
///
/// The subscriber will silently fail if it could not be installed.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
