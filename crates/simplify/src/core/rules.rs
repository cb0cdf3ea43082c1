//! The identity table.
//!
//! Exactly one operand must be a literal for an identity to apply. The rows are
//! mutually exclusive:
//!
//! | literal side | literal | opcode | keeps          |
//! |--------------|---------|--------|----------------|
//! | lhs          | 0       | add    | rhs            |
//! | lhs          | 0       | mul    | lhs (the 0)    |
//! | lhs          | 1       | mul    | rhs            |
//! | rhs          | 0       | add    | lhs            |
//! | rhs          | 0       | sub    | lhs            |
//! | rhs          | 0       | mul    | rhs (the 0)    |
//! | rhs          | 1       | mul    | lhs            |
//! | rhs          | 1       | sdiv   | lhs            |
//!
//! `0 - x` and `1 / x` are deliberately absent.

use std::fmt;

use tracing::trace;
use trivfold_ir::{Constant, InstRef, Opcode, Program, ValueRef};

/// An operand as seen by the identity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// An integer literal.
    Literal(Constant),
    /// Anything else: an argument or the result of another instruction.
    Opaque,
}

/// One side of a binary instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Lhs,
    Rhs,
}

impl Side {
    pub fn index(&self) -> usize {
        match self {
            Side::Lhs => 0,
            Side::Rhs => 1,
        }
    }
}

/// A row of the identity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityRule {
    /// `0 + x => x`
    AddZeroLhs,
    /// `0 * x => 0`
    MulZeroLhs,
    /// `1 * x => x`
    MulOneLhs,
    /// `x + 0 => x`
    AddZeroRhs,
    /// `x - 0 => x`
    SubZeroRhs,
    /// `x * 0 => 0`
    MulZeroRhs,
    /// `x * 1 => x`
    MulOneRhs,
    /// `x / 1 => x` (signed)
    SDivOneRhs,
}

impl IdentityRule {
    /// Every rule, in table order.
    pub const ALL: [IdentityRule; 8] = [
        IdentityRule::AddZeroLhs,
        IdentityRule::MulZeroLhs,
        IdentityRule::MulOneLhs,
        IdentityRule::AddZeroRhs,
        IdentityRule::SubZeroRhs,
        IdentityRule::MulZeroRhs,
        IdentityRule::MulOneRhs,
        IdentityRule::SDivOneRhs,
    ];

    /// The operand that replaces the instruction's result.
    pub fn keeps(&self) -> Side {
        match self {
            IdentityRule::AddZeroLhs | IdentityRule::MulOneLhs | IdentityRule::MulZeroRhs => {
                Side::Rhs
            }
            IdentityRule::MulZeroLhs |
            IdentityRule::AddZeroRhs |
            IdentityRule::SubZeroRhs |
            IdentityRule::MulOneRhs |
            IdentityRule::SDivOneRhs => Side::Lhs,
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            IdentityRule::AddZeroLhs => "0 + x => x",
            IdentityRule::MulZeroLhs => "0 * x => 0",
            IdentityRule::MulOneLhs => "1 * x => x",
            IdentityRule::AddZeroRhs => "x + 0 => x",
            IdentityRule::SubZeroRhs => "x - 0 => x",
            IdentityRule::MulZeroRhs => "x * 0 => 0",
            IdentityRule::MulOneRhs => "x * 1 => x",
            IdentityRule::SDivOneRhs => "x / 1 => x",
        }
    }
}

impl fmt::Display for IdentityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

/// Outcome of looking an instruction up in the identity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    Identity(IdentityRule),
    /// Both operands are literals. Never simplified here.
    ConstantOperands,
    NoMatch,
}

/// Look `opcode` with the given operand shapes up in the identity table.
///
/// This is a pure function of its inputs; it never evaluates arithmetic.
pub fn match_identity(opcode: Opcode, lhs: Operand, rhs: Operand) -> Match {
    match (lhs, rhs) {
        (Operand::Literal(_), Operand::Literal(_)) => Match::ConstantOperands,
        (Operand::Literal(c), Operand::Opaque) => match opcode {
            Opcode::Add if c.is_zero() => Match::Identity(IdentityRule::AddZeroLhs),
            Opcode::Mul if c.is_zero() => Match::Identity(IdentityRule::MulZeroLhs),
            Opcode::Mul if c.is_one() => Match::Identity(IdentityRule::MulOneLhs),
            _ => Match::NoMatch,
        },
        (Operand::Opaque, Operand::Literal(c)) => match opcode {
            Opcode::Add if c.is_zero() => Match::Identity(IdentityRule::AddZeroRhs),
            Opcode::Sub if c.is_zero() => Match::Identity(IdentityRule::SubZeroRhs),
            Opcode::Mul if c.is_zero() => Match::Identity(IdentityRule::MulZeroRhs),
            Opcode::Mul if c.is_one() => Match::Identity(IdentityRule::MulOneRhs),
            Opcode::SDiv if c.is_one() => Match::Identity(IdentityRule::SDivOneRhs),
            _ => Match::NoMatch,
        },
        (Operand::Opaque, Operand::Opaque) => Match::NoMatch,
    }
}

/// Classify a value as a literal or an opaque operand.
pub fn classify(program: &Program, value: ValueRef) -> Operand {
    match program.constant(value) {
        Some(c) => Operand::Literal(c),
        None => Operand::Opaque,
    }
}

/// What the driver should do with an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Redirect every use of the instruction's result to `with`.
    Replace { rule: IdentityRule, with: ValueRef },
    /// Both operands were literals.
    ConstantOperands,
    NoMatch,
}

/// Examine one instruction of `program` against the identity table.
///
/// Non-binary instructions never match. An instruction whose operands are both
/// literals is returned as [`Verdict::ConstantOperands`]; reporting it is up to
/// the caller.
pub fn examine(program: &Program, inst: InstRef) -> Verdict {
    let Some((opcode, lhs, rhs)) = program.inst(inst).kind.as_binary() else {
        return Verdict::NoMatch;
    };

    match match_identity(opcode, classify(program, lhs), classify(program, rhs)) {
        Match::Identity(rule) => {
            let with = [lhs, rhs][rule.keeps().index()];
            trace!("{} matches '{}'", program.display_inst(inst), rule);
            Verdict::Replace { rule, with }
        }
        Match::ConstantOperands => Verdict::ConstantOperands,
        Match::NoMatch => Verdict::NoMatch,
    }
}
