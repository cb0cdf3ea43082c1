use derive_builder::Builder;
use trivfold_config::Configuration;

/// Arguments for the simplify operation
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct SimplifyArgs {
    /// Upper bound on the number of runs of the identity pass. Reaching it
    /// without a stable run is an error.
    pub max_iterations: usize,

    /// Verify the program before any rewriting.
    pub verify_before: bool,

    /// Verify the program after the last run.
    pub verify_after: bool,
}

impl SimplifyArgsBuilder {
    /// Create a new instance of the [`SimplifyArgsBuilder`]
    pub fn new() -> Self {
        Self { max_iterations: Some(8), verify_before: Some(false), verify_after: Some(false) }
    }
}

impl Default for SimplifyArgs {
    fn default() -> Self {
        Self { max_iterations: 8, verify_before: false, verify_after: false }
    }
}

impl From<&Configuration> for SimplifyArgs {
    fn from(config: &Configuration) -> Self {
        Self {
            max_iterations: config.max_iterations,
            verify_before: config.verify_before,
            verify_after: config.verify_after,
        }
    }
}
