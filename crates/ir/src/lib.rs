//! The IR module provides the arena-based program representation that trivfold
//! passes operate on.
//!
//! A [`Program`] owns every function, block, instruction and value in
//! [`cranelift_entity::PrimaryMap`] arenas. Entities are addressed by small
//! copyable handles, so passes can collect a list of instructions up front and
//! keep mutating use-lists without invalidating it.

/// Error types for the IR module
mod error;

/// Typed handles into the program arenas.
pub mod entities;

/// Opcodes, constants and the instruction / value sum types.
pub mod types;

/// The program arena and its use-def bookkeeping.
pub mod program;

/// Convenience builder for constructing functions.
pub mod builder;

/// Textual listing of programs and instructions.
pub mod printer;

/// Well-formedness checks.
pub mod verify;

/// The host pipeline collaborator: module passes and analysis preservation.
pub mod pass;

// re-export the public interface
pub use builder::FunctionBuilder;
pub use entities::{BlockRef, FuncRef, InstRef, ValueRef};
pub use error::Error;
pub use pass::{ModulePass, PassManager, PreservedAnalyses};
pub use program::{BlockData, FunctionData, InstData, Program, ValueData};
pub use types::{Constant, InstKind, Opcode, Use, ValueKind};
