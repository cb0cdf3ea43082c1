//! Module passes and the pass manager that sequences them.
//!
//! A pass reports back whether it left the program's analyses valid. The
//! manager intersects those reports so the host can decide what to recompute.

use std::{fmt, time::Instant};

use tracing::debug;

use crate::program::Program;

/// Which analyses are still valid after a pass ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreservedAnalyses {
    /// The program is unchanged; every analysis remains valid.
    All,
    /// The program changed; dependent analyses must be recomputed.
    None,
}

impl PreservedAnalyses {
    /// `None` if `changed`, otherwise `All`.
    pub fn from_changed(changed: bool) -> Self {
        if changed {
            PreservedAnalyses::None
        } else {
            PreservedAnalyses::All
        }
    }

    pub fn are_all_preserved(&self) -> bool {
        matches!(self, PreservedAnalyses::All)
    }

    /// Combine the results of two passes run one after the other.
    pub fn intersect(self, other: PreservedAnalyses) -> PreservedAnalyses {
        match (self, other) {
            (PreservedAnalyses::All, PreservedAnalyses::All) => PreservedAnalyses::All,
            _ => PreservedAnalyses::None,
        }
    }
}

/// A transformation over a whole [`Program`].
pub trait ModulePass {
    /// A short, stable name used in logs.
    fn name(&self) -> &'static str;

    /// Run the pass, mutating `program` in place.
    fn run(&mut self, program: &mut Program) -> PreservedAnalyses;
}

/// Runs a sequence of [`ModulePass`]es over a program.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn ModulePass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass to the end of the pipeline.
    pub fn add_pass<P: ModulePass + 'static>(&mut self, pass: P) -> &mut Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run every pass in order and return the combined preservation result.
    pub fn run(&mut self, program: &mut Program) -> PreservedAnalyses {
        let mut preserved = PreservedAnalyses::All;
        for pass in &mut self.passes {
            let start_time = Instant::now();
            let result = pass.run(program);
            debug!(
                "pass '{}' took {:?} (preserved: {:?})",
                pass.name(),
                start_time.elapsed(),
                result
            );
            preserved = preserved.intersect(result);
        }
        preserved
    }
}

impl fmt::Debug for PassManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.passes.iter().map(|pass| pass.name())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FunctionBuilder;

    struct Noop;

    impl ModulePass for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn run(&mut self, _program: &mut Program) -> PreservedAnalyses {
            PreservedAnalyses::All
        }
    }

    /// Redirects every use of the first parameter to the second.
    struct SwapParams;

    impl ModulePass for SwapParams {
        fn name(&self) -> &'static str {
            "swap-params"
        }

        fn run(&mut self, program: &mut Program) -> PreservedAnalyses {
            let funcs: Vec<_> = program.functions().collect();
            let mut changed = false;
            for func in funcs {
                let params = program.function(func).params.clone();
                if let [a, b, ..] = params[..] {
                    changed |= program.replace_all_uses(a, b) > 0;
                }
            }
            PreservedAnalyses::from_changed(changed)
        }
    }

    #[test]
    fn test_preserved_analyses_intersection() {
        use PreservedAnalyses::*;
        assert_eq!(All.intersect(All), All);
        assert_eq!(All.intersect(None), None);
        assert_eq!(None.intersect(All), None);
        assert!(PreservedAnalyses::from_changed(false).are_all_preserved());
        assert!(!PreservedAnalyses::from_changed(true).are_all_preserved());
    }

    #[test]
    fn test_pass_manager_combines_results() {
        let mut program = Program::new();
        let mut builder = FunctionBuilder::new(&mut program, "main", 2);
        let params = builder.params();
        builder.add(params[0], params[1]);

        let mut manager = PassManager::new();
        manager.add_pass(Noop).add_pass(SwapParams).add_pass(Noop);
        assert_eq!(manager.len(), 3);
        assert_eq!(format!("{manager:?}"), r#"["noop", "swap-params", "noop"]"#);

        assert_eq!(manager.run(&mut program), PreservedAnalyses::None);
        // nothing left to swap
        assert_eq!(manager.run(&mut program), PreservedAnalyses::All);
    }
}
