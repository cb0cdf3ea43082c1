/// Error type for the Core module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error when loading or saving the configuration
    #[error("Config error: {0}")]
    Config(#[from] trivfold_config::error::Error),
    /// Error raised by the simplifier
    #[error("Simplify error: {0}")]
    Simplify(#[from] trivfold_simplify::Error),
    /// Error when setting up logging
    #[error("Tracing error: {0}")]
    Tracing(#[from] eyre::Report),
}
