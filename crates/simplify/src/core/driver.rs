use tracing::{debug, info, trace, warn};
use trivfold_ir::{ModulePass, PreservedAnalyses, Program};

use crate::core::{
    report::{FoldReport, FoldStatistics},
    rewrite::rewrite_uses,
    rules::{examine, Verdict},
};

/// Walk every binary instruction of `program` once, in program order, and
/// rewrite the uses of those that match an identity.
///
/// The list of instructions is captured before any rewriting, so a match never
/// causes another instruction to be skipped or revisited. Operands are read at
/// visit time, which lets a chain like `(x + 0) * 1` collapse in one run when
/// the inner instruction comes first.
///
/// Every instruction with two literal operands is reported with a warning and
/// left alone.
pub fn fold_program(program: &mut Program) -> FoldReport {
    fold(program, true)
}

/// [`fold_program`], optionally staying silent about instructions with two
/// literal operands. Repeated runs over the same program report them only on
/// the first run.
pub(crate) fn fold(program: &mut Program, report_constant_pairs: bool) -> FoldReport {
    let worklist = program.binary_instructions();
    let mut statistics = FoldStatistics::default();
    let mut changed = false;

    for inst in worklist {
        statistics.visited += 1;
        match examine(program, inst) {
            Verdict::Replace { rule, with } => {
                let rewritten = rewrite_uses(program, inst, with);
                changed |= rewritten > 0;
                statistics.record_match(rule, rewritten);
            }
            Verdict::ConstantOperands if report_constant_pairs => {
                let func = program.function(program.inst_function(inst));
                warn!(
                    "'{}' in @{} has two constant operands; it should have been folded before this pass",
                    program.display_inst(inst),
                    func.name
                );
                statistics.constant_pairs += 1;
            }
            Verdict::ConstantOperands => {}
            Verdict::NoMatch => trace!("no identity for '{}'", program.display_inst(inst)),
        }
    }

    FoldReport { changed, statistics }
}

/// The identity simplifier as a [`ModulePass`].
///
/// Holds no state between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFoldPass;

impl IdentityFoldPass {
    /// Name reported to the pass manager
    pub const NAME: &'static str = "identity-fold";

    /// Creates a new pass
    pub fn new() -> Self {
        Self
    }
}

impl ModulePass for IdentityFoldPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&mut self, program: &mut Program) -> PreservedAnalyses {
        let report = fold_program(program);
        debug!("{}: {}", Self::NAME, report.statistics);
        if report.changed {
            info!(
                "{}: simplified {} instructions ({} uses rewritten)",
                Self::NAME,
                report.statistics.matched,
                report.statistics.uses_rewritten
            );
        }
        PreservedAnalyses::from_changed(report.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{rules::IdentityRule, test_utils::capture_warnings};
    use trivfold_ir::{FunctionBuilder, PassManager, ValueRef};

    /// Builds `main(x)` returning `op(lhs, rhs)` and returns the program, the
    /// binary result and the parameter.
    fn single(
        build: impl FnOnce(&mut FunctionBuilder<'_>, ValueRef) -> ValueRef,
    ) -> (Program, ValueRef, ValueRef) {
        let mut program = Program::new();
        let mut builder = FunctionBuilder::new(&mut program, "main", 1);
        let x = builder.params()[0];
        let result = build(&mut builder, x);
        builder.ret(result);
        (program, result, x)
    }

    fn returned(program: &Program) -> ValueRef {
        let ret = program.instructions().last().expect("program has a return");
        program.inst(ret).kind.operands()[0]
    }

    #[test]
    fn test_identity_scenarios() {
        type Build = fn(&mut FunctionBuilder<'_>, ValueRef) -> ValueRef;
        let simplified_to_x: [Build; 6] = [
            |b, x| {
                let zero = b.iconst(0);
                b.add(zero, x)
            },
            |b, x| {
                let zero = b.iconst(0);
                b.add(x, zero)
            },
            |b, x| {
                let zero = b.iconst(0);
                b.sub(x, zero)
            },
            |b, x| {
                let one = b.iconst(1);
                b.mul(one, x)
            },
            |b, x| {
                let one = b.iconst(1);
                b.mul(x, one)
            },
            |b, x| {
                let one = b.iconst(1);
                b.sdiv(x, one)
            },
        ];
        for build in simplified_to_x {
            let (mut program, result, x) = single(build);
            let report = fold_program(&mut program);
            assert!(report.changed);
            assert_eq!(returned(&program), x);
            assert!(!program.has_uses(result));
        }

        let simplified_to_zero: [Build; 2] = [
            |b, x| {
                let zero = b.iconst(0);
                b.mul(zero, x)
            },
            |b, x| {
                let zero = b.iconst(0);
                b.mul(x, zero)
            },
        ];
        for build in simplified_to_zero {
            let (mut program, _, _) = single(build);
            assert!(fold_program(&mut program).changed);
            assert_eq!(program.constant(returned(&program)).map(|c| c.value()), Some(0));
        }
    }

    #[test]
    fn test_unsimplified_scenarios() {
        type Build = fn(&mut FunctionBuilder<'_>, ValueRef) -> ValueRef;
        let untouched: [Build; 3] = [
            |b, x| {
                let zero = b.iconst(0);
                b.sub(zero, x)
            },
            |b, x| {
                let one = b.iconst(1);
                b.sdiv(one, x)
            },
            |b, x| {
                let two = b.iconst(2);
                b.mul(x, two)
            },
        ];
        for build in untouched {
            let (mut program, result, _) = single(build);
            let before = program.to_string();
            let report = fold_program(&mut program);
            assert!(!report.changed);
            assert_eq!(report.statistics.matched, 0);
            assert_eq!(returned(&program), result);
            assert_eq!(program.to_string(), before);
        }
    }

    #[test]
    fn test_constant_pairs_are_reported_not_folded() {
        let mut program = Program::new();
        let mut builder = FunctionBuilder::new(&mut program, "main", 0);
        let three = builder.iconst(3);
        let five = builder.iconst(5);
        let zero = builder.iconst(0);
        let sum = builder.add(three, five);
        let also = builder.add(five, zero);
        let both = builder.add(sum, also);
        builder.ret(both);
        let before = program.to_string();

        let (report, warnings) = capture_warnings(|| fold_program(&mut program));

        assert!(!report.changed);
        assert_eq!(report.statistics.constant_pairs, 2);
        assert_eq!(report.statistics.visited, 3);
        assert_eq!(program.to_string(), before);

        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert!(warnings[0].contains("add 3, 5") && warnings[0].contains("@main"));
        assert!(warnings[1].contains("add 5, 0") && warnings[1].contains("@main"));
    }

    #[test]
    fn test_silent_fold_skips_constant_pairs() {
        let mut program = Program::new();
        let mut builder = FunctionBuilder::new(&mut program, "main", 0);
        let three = builder.iconst(3);
        let five = builder.iconst(5);
        let sum = builder.add(three, five);
        builder.ret(sum);

        let (report, warnings) = capture_warnings(|| fold(&mut program, false));

        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(report.statistics.constant_pairs, 0);
        assert_eq!(report.statistics.visited, 1);
    }

    #[test]
    fn test_chain_collapses_in_order() {
        let mut program = Program::new();
        let mut builder = FunctionBuilder::new(&mut program, "main", 1);
        let x = builder.params()[0];
        let zero = builder.iconst(0);
        let one = builder.iconst(1);
        let a = builder.add(x, zero);
        let b = builder.mul(a, one);
        let c = builder.sdiv(b, one);
        builder.ret(c);

        let report = fold_program(&mut program);

        assert!(report.changed);
        assert_eq!(report.statistics.matched, 3);
        assert_eq!(report.statistics.matches_for(IdentityRule::AddZeroRhs), 1);
        assert_eq!(report.statistics.matches_for(IdentityRule::MulOneRhs), 1);
        assert_eq!(report.statistics.matches_for(IdentityRule::SDivOneRhs), 1);
        assert_eq!(returned(&program), x);

        // every identity has been consumed; a second run is a no-op
        assert!(!fold_program(&mut program).changed);
    }

    #[test]
    fn test_unused_match_is_not_a_change() {
        let mut program = Program::new();
        let mut builder = FunctionBuilder::new(&mut program, "main", 1);
        let x = builder.params()[0];
        let zero = builder.iconst(0);
        builder.add(x, zero);
        builder.ret(x);

        let report = fold_program(&mut program);
        assert!(!report.changed);
        assert_eq!(report.statistics.matched, 1);
        assert_eq!(report.statistics.uses_rewritten, 0);
    }

    #[test]
    fn test_pass_reports_preserved_analyses() {
        let (mut program, _, _) = single(|b, x| {
            let zero = b.iconst(0);
            b.add(x, zero)
        });

        let mut manager = PassManager::new();
        manager.add_pass(IdentityFoldPass::new());

        assert_eq!(manager.run(&mut program), PreservedAnalyses::None);
        assert_eq!(manager.run(&mut program), PreservedAnalyses::All);
        assert_eq!(IdentityFoldPass.name(), "identity-fold");
    }
}
