//! Simplify Errors

/// Generic error type for the Simplify Module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The program failed verification before or after simplification
    #[error("IR error: {0}")]
    Ir(#[from] trivfold_ir::Error),
    /// Repeated runs kept changing the program
    #[error("no fixed point reached after {iterations} iterations")]
    FixedPointNotReached {
        /// How many times the pass ran
        iterations: usize,
    },
}
