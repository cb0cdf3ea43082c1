//! Each handle is a thin `u32` wrapper indexing one of the `PrimaryMap`
//! arenas owned by [`Program`](crate::Program).

use cranelift_entity::entity_impl;

/// Reference to a function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncRef(u32);
entity_impl!(FuncRef, "fn");

/// Reference to a basic block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockRef(u32);
entity_impl!(BlockRef, "block");

/// Reference to an instruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstRef(u32);
entity_impl!(InstRef, "inst");

/// Reference to an SSA value: a constant, an argument or an instruction result.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueRef(u32);
entity_impl!(ValueRef, "v");
