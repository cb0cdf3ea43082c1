use crate::entities::{BlockRef, FuncRef, InstRef, ValueRef};

/// Errors reported when a [`Program`](crate::Program) is not well formed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A handle refers to a value that does not exist in this program
    #[error("unknown value: {0}")]
    UnknownValue(ValueRef),
    /// A handle refers to an instruction that does not exist in this program
    #[error("unknown instruction: {0}")]
    UnknownInstruction(InstRef),
    /// An instruction operand refers to a value that does not exist
    #[error("operand {operand} of {inst} refers to missing value {value}")]
    DanglingOperand {
        /// The consuming instruction
        inst: InstRef,
        /// The operand slot
        operand: u32,
        /// The missing value
        value: ValueRef,
    },
    /// The use-list of a value disagrees with the operand slots of its users
    #[error("use-list of {value} is out of sync with operand {operand} of {inst}")]
    UseListMismatch {
        /// The value whose use-list is inconsistent
        value: ValueRef,
        /// The instruction named by the use
        inst: InstRef,
        /// The operand slot named by the use
        operand: u32,
    },
    /// An argument value points past the parameter list of its function
    #[error("argument {index} is out of range for {func}")]
    ArgumentOutOfRange {
        /// The function the argument belongs to
        func: FuncRef,
        /// The argument index
        index: u32,
    },
    /// An instruction is not placed in exactly one block
    #[error("{inst} is not attached to {block}")]
    DetachedInstruction {
        /// The instruction
        inst: InstRef,
        /// The block that lists it
        block: BlockRef,
    },
    /// An instruction is listed more than once across the program's blocks
    #[error("{0} appears in more than one position")]
    DuplicateInstruction(InstRef),
}
