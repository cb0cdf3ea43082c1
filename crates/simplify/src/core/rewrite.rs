use tracing::trace;
use trivfold_ir::{InstRef, Program, ValueRef};

/// Redirect every consumer of `inst`'s result to `replacement`.
///
/// The instruction itself stays in its block; removing it is left to a later
/// dead-code pass. Returns how many operand slots now hold `replacement`.
pub fn rewrite_uses(program: &mut Program, inst: InstRef, replacement: ValueRef) -> usize {
    let Some(result) = program.inst_result(inst) else {
        return 0;
    };

    let rewritten = program.replace_all_uses(result, replacement);
    trace!("replaced {} uses of %{} with {}", rewritten, result, program.display_value(replacement));
    rewritten
}
