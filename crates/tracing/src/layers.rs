use std::path::{Path, PathBuf};

use rolling_file::{RollingConditionBasic, RollingFileAppender};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Directive, EnvFilter, Layer, Registry};

use crate::formatter::LogFormat;

/// A worker guard returned by the file layer.
///
/// When a guard is dropped, all events currently in-memory are flushed to the log file this guard
/// belongs to.
pub type FileWorkerGuard = WorkerGuard;

/// A boxed tracing [Layer].
pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

const TRIVFOLD_LOG_FILE_NAME: &str = "trivfold.log";

/// Manages the collection of layers for a tracing subscriber.
///
/// `Layers` acts as a container for different logging layers such as stdout and file, each
/// configured with its own format and filter.
pub(crate) struct Layers {
    inner: Vec<BoxedLayer<Registry>>,
}

impl Layers {
    /// Creates a new `Layers` instance.
    pub(crate) fn new() -> Self {
        Self { inner: vec![] }
    }

    /// Adds a layer to the collection of layers.
    pub(crate) fn add_layer<L>(&mut self, layer: L)
    where
        L: Layer<Registry> + Send + Sync + 'static,
    {
        self.inner.push(layer.boxed());
    }

    /// Consumes the `Layers` instance, returning the inner vector of layers.
    pub(crate) fn into_inner(self) -> Vec<BoxedLayer<Registry>> {
        self.inner
    }

    /// Adds a stdout layer with specified formatting and filtering.
    pub(crate) fn stdout(
        &mut self,
        format: LogFormat,
        default_directive: Directive,
        filters: &str,
        color: Option<String>,
    ) -> eyre::Result<()> {
        let filter = build_env_filter(Some(default_directive), filters)?;
        let layer = format.apply(filter, color, None);
        self.add_layer(layer);
        Ok(())
    }

    /// Adds a file logging layer to the layers collection.
    pub(crate) fn file(
        &mut self,
        format: LogFormat,
        filter: &str,
        file_info: FileInfo,
    ) -> eyre::Result<FileWorkerGuard> {
        let (writer, guard) = file_info.create_log_writer()?;
        let file_filter = build_env_filter(None, filter)?;
        let layer = format.apply(file_filter, None, Some(writer));
        self.add_layer(layer);
        Ok(guard)
    }
}

/// Holds configuration information for file logging.
///
/// Contains details about the log file's path, name, size, and rotation strategy.
#[derive(Debug, Clone)]
pub struct FileInfo {
    dir: PathBuf,
    file_name: String,
    max_size_bytes: u64,
    max_files: usize,
}

impl FileInfo {
    /// Creates a new `FileInfo` instance writing `trivfold.log` under `dir`.
    pub fn new(dir: PathBuf, max_size_bytes: u64, max_files: usize) -> Self {
        Self { dir, file_name: TRIVFOLD_LOG_FILE_NAME.to_string(), max_size_bytes, max_files }
    }

    /// Path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Creates the log directory if it doesn't exist.
    fn create_log_dir(&self) -> eyre::Result<&Path> {
        let log_dir: &Path = self.dir.as_ref();
        if !log_dir.exists() {
            std::fs::create_dir_all(log_dir).map_err(|e| {
                eyre::eyre!("failed to create log directory '{}': {e}", log_dir.display())
            })?;
        }
        Ok(log_dir)
    }

    /// Creates a non-blocking writer for the log file.
    fn create_log_writer(&self) -> eyre::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
        let log_dir = self.create_log_dir()?;
        let appender = RollingFileAppender::new(
            log_dir.join(&self.file_name),
            RollingConditionBasic::new().max_size(self.max_size_bytes),
            self.max_files,
        )
        .map_err(|e| eyre::eyre!("failed to create rolling file appender: {e}"))?;

        Ok(tracing_appender::non_blocking(appender))
    }
}

/// Builds an environment filter for logging.
///
/// The events are filtered by `default_directive`, unless overridden by `RUST_LOG`.
///
/// # Errors
/// Returns an error if any of the directives fail to parse.
pub(crate) fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = if let Some(default_directive) = default_directive {
        EnvFilter::builder().with_default_directive(default_directive).from_env_lossy()
    } else {
        EnvFilter::builder().from_env_lossy()
    };

    directives
        .split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .try_fold(env_filter, |env_filter, directive| {
            Ok(env_filter.add_directive(directive.parse()?))
        })
}
