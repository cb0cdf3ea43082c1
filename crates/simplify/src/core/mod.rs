pub(crate) mod driver;
pub(crate) mod report;
pub(crate) mod rewrite;
pub(crate) mod rules;

#[cfg(test)]
pub(crate) mod test_utils;

use std::time::Instant;

use tracing::{debug, info};
use trivfold_ir::Program;

use crate::{
    core::{driver::fold, report::FoldStatistics},
    error::Error,
    interfaces::SimplifyArgs,
};

/// Result of running the identity pass to a fixed point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedPoint {
    /// Number of runs, including the final one that changed nothing
    pub iterations: usize,
    /// Whether any run changed the program
    pub changed: bool,
    /// Counters summed over every run
    pub statistics: FoldStatistics,
}

/// Re-run [`fold_program`](crate::fold_program) until a run reports no change.
///
/// A single run only sees operands as they are when it reaches each
/// instruction, so identities exposed by a later rewrite are picked up by the
/// next run. Instructions with two literal operands are warned about and
/// counted on the first run only. Fails with [`Error::FixedPointNotReached`] after
/// `max_iterations` runs that all changed the program.
pub fn run_to_fixed_point(program: &mut Program, max_iterations: usize) -> Result<FixedPoint, Error> {
    let mut fixed_point = FixedPoint::default();

    while fixed_point.iterations < max_iterations {
        fixed_point.iterations += 1;
        let report = fold(program, fixed_point.iterations == 1);
        debug!("iteration {}: {}", fixed_point.iterations, report.statistics);
        fixed_point.statistics.merge(&report.statistics);

        if !report.changed {
            return Ok(fixed_point);
        }
        fixed_point.changed = true;
    }

    Err(Error::FixedPointNotReached { iterations: fixed_point.iterations })
}

/// Result of a successful simplify operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifyResult {
    /// Number of runs of the identity pass
    pub iterations: usize,
    /// Whether the program was changed; if so, dependent analyses are stale
    pub changed: bool,
    /// Counters summed over every run
    pub statistics: FoldStatistics,
}

/// Simplifies algebraic identities in `program` until nothing more applies.
///
/// # Arguments
///
/// * `program` - The program to rewrite in place
/// * `args` - Iteration limit and verification switches
///
/// # Returns
///
/// A SimplifyResult describing how many runs were needed and what changed
pub fn simplify(program: &mut Program, args: SimplifyArgs) -> Result<SimplifyResult, Error> {
    let start_time = Instant::now();

    if args.verify_before {
        program.verify()?;
        debug!("input program verified");
    }

    let fixed_point = run_to_fixed_point(program, args.max_iterations)?;

    if args.verify_after {
        program.verify()?;
        debug!("simplified program verified");
    }

    info!(
        "simplified {} instructions in {} iterations ({} uses rewritten)",
        fixed_point.statistics.matched, fixed_point.iterations, fixed_point.statistics.uses_rewritten
    );
    debug!("simplification took {:?}", start_time.elapsed());

    Ok(SimplifyResult {
        iterations: fixed_point.iterations,
        changed: fixed_point.changed,
        statistics: fixed_point.statistics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::test_utils::capture_warnings, interfaces::SimplifyArgsBuilder};
    use trivfold_ir::{FunctionBuilder, InstKind, Opcode};

    /// `main` has two blocks laid out so that a use appears before its
    /// definition: `block0` computes `0 * y` where `y = x + 0` lives in `block1`.
    fn use_before_def() -> Program {
        let mut program = Program::new();
        let mut builder = FunctionBuilder::new(&mut program, "main", 1);
        let x = builder.params()[0];
        let zero = builder.iconst(0);
        let entry = builder.current_block();
        let late = builder.create_block();

        builder.switch_to_block(late);
        let y = builder.add(x, zero);

        builder.switch_to_block(entry);
        let z = builder.mul(zero, y);
        let w = builder.add(z, x);
        builder.ret(w);
        program
    }

    #[test]
    fn test_fixed_point_needs_a_second_run() {
        let mut program = use_before_def();

        let fixed_point = run_to_fixed_point(&mut program, 8).expect("fixed point");

        assert!(fixed_point.changed);
        assert_eq!(fixed_point.iterations, 2);
        assert_eq!(fixed_point.statistics.visited, 6);

        let ret = program.instructions().find(|inst| {
            matches!(&program.inst(*inst).kind, InstKind::Other { name, .. } if name == "ret")
        });
        let x = program.function(program.functions().next().expect("main")).params[0];
        assert_eq!(program.inst(ret.expect("ret")).kind.operands(), &[x]);
    }

    #[test]
    fn test_fixed_point_limit() {
        let mut program = use_before_def();
        assert!(matches!(
            run_to_fixed_point(&mut program, 1),
            Err(Error::FixedPointNotReached { iterations: 1 })
        ));
    }

    #[test]
    fn test_constant_pair_is_reported_once() {
        let mut program = Program::new();
        let mut builder = FunctionBuilder::new(&mut program, "main", 1);
        let x = builder.params()[0];
        let three = builder.iconst(3);
        let five = builder.iconst(5);
        let zero = builder.iconst(0);
        let sum = builder.add(three, five);
        let shifted = builder.add(x, zero);
        let call = builder.other("call @g", &[sum, shifted]);
        builder.ret(call);

        let (result, warnings) =
            capture_warnings(|| simplify(&mut program, SimplifyArgs::default()));
        let result = result.expect("simplify failed");

        assert_eq!(result.iterations, 2);
        assert_eq!(result.statistics.constant_pairs, 1);
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("'%v4 = add 3, 5' in @main"), "{}", warnings[0]);
    }

    #[test]
    fn test_simplify_unchanged_program() {
        let mut program = Program::new();
        let mut builder = FunctionBuilder::new(&mut program, "main", 2);
        let params = builder.params();
        let sum = builder.binary(Opcode::Xor, params[0], params[1]);
        builder.ret(sum);

        let args = SimplifyArgsBuilder::new()
            .verify_before(true)
            .verify_after(true)
            .build()
            .expect("failed to build args");
        let result = simplify(&mut program, args).expect("simplify failed");

        assert!(!result.changed);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.statistics.visited, 1);
    }
}
