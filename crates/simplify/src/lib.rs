//! The Simplify module rewrites integer arithmetic that matches a small table of
//! algebraic identities (`x + 0`, `x * 1`, `x * 0`, ...) into an operand that
//! already exists in the program.
//!
//! It never evaluates arithmetic on two literals: an instruction whose operands
//! are both constants is reported as an anomaly and left alone, since an
//! upstream constant folder is expected to have handled it.

/// Error types for the simplify module
mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use crate::core::{
    driver::{fold_program, IdentityFoldPass},
    report::{FoldReport, FoldStatistics},
    rewrite::rewrite_uses,
    rules::{classify, examine, match_identity, IdentityRule, Match, Operand, Side, Verdict},
    run_to_fixed_point, simplify, FixedPoint, SimplifyResult,
};
pub use error::Error;
pub use interfaces::{SimplifyArgs, SimplifyArgsBuilder};
