use std::fmt;

use smallvec::SmallVec;

use crate::entities::{FuncRef, InstRef, ValueRef};

/// Integer binary opcodes.
///
/// Only [`Opcode::Add`], [`Opcode::Sub`], [`Opcode::Mul`] and [`Opcode::SDiv`]
/// participate in identity simplification; the rest are carried through
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Add,
    Sub,
    Mul,
    SDiv,
    UDiv,
    SRem,
    URem,
    And,
    Or,
    Xor,
    Shl,
    LShr,
    AShr,
}

impl Opcode {
    /// The mnemonic used in textual listings.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::SDiv => "sdiv",
            Opcode::UDiv => "udiv",
            Opcode::SRem => "srem",
            Opcode::URem => "urem",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Shl => "shl",
            Opcode::LShr => "lshr",
            Opcode::AShr => "ashr",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A 64-bit signed integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Constant(i64);

impl Constant {
    pub fn new(value: i64) -> Self {
        Constant(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_one(&self) -> bool {
        self.0 == 1
    }
}

impl From<i64> for Constant {
    fn from(value: i64) -> Self {
        Constant(value)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// An integer literal, interned per program.
    Constant(Constant),
    /// The `index`-th parameter of `func`.
    Argument { func: FuncRef, index: u32 },
    /// The result of an instruction.
    Result(InstRef),
}

impl ValueKind {
    pub fn as_constant(&self) -> Option<Constant> {
        match self {
            ValueKind::Constant(c) => Some(*c),
            _ => None,
        }
    }
}

/// The operation an instruction performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstKind {
    /// A two-operand integer arithmetic instruction.
    Binary { opcode: Opcode, args: [ValueRef; 2] },
    /// Any other consumer of values (returns, calls, stores, compares).
    /// These are never simplified but their operands are still rewritten.
    Other { name: String, operands: SmallVec<[ValueRef; 2]> },
}

impl InstKind {
    pub fn operands(&self) -> &[ValueRef] {
        match self {
            InstKind::Binary { args, .. } => args,
            InstKind::Other { operands, .. } => operands,
        }
    }

    pub(crate) fn operands_mut(&mut self) -> &mut [ValueRef] {
        match self {
            InstKind::Binary { args, .. } => args,
            InstKind::Other { operands, .. } => operands,
        }
    }

    /// Returns the opcode and operands if this is a binary instruction.
    pub fn as_binary(&self) -> Option<(Opcode, ValueRef, ValueRef)> {
        match self {
            InstKind::Binary { opcode, args: [lhs, rhs] } => Some((*opcode, *lhs, *rhs)),
            InstKind::Other { .. } => None,
        }
    }
}

/// A single use of a value: the consuming instruction and the operand slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Use {
    pub user: InstRef,
    pub operand: u32,
}
