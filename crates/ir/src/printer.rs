//! LLVM-flavoured textual listing of a [`Program`].
//!
//! ```text
//! define @main(%v0, %v1) {
//! block0:
//!   %v3 = add %v0, 0
//!   ret %v3
//! }
//! ```
//!
//! Constants are printed inline as their literal value; every other value is
//! printed as `%` followed by its handle.

use std::fmt;

use crate::{
    entities::{FuncRef, InstRef, ValueRef},
    program::Program,
    types::InstKind,
};

/// Displays a single instruction of a program.
#[derive(Debug, Clone, Copy)]
pub struct DisplayInst<'a> {
    program: &'a Program,
    inst: InstRef,
}

/// Displays a single value of a program as it appears in operand position.
#[derive(Debug, Clone, Copy)]
pub struct DisplayValue<'a> {
    program: &'a Program,
    value: ValueRef,
}

impl Program {
    /// Returns a [`fmt::Display`] adapter for `inst`.
    pub fn display_inst(&self, inst: InstRef) -> DisplayInst<'_> {
        DisplayInst { program: self, inst }
    }

    /// Returns a [`fmt::Display`] adapter for `value`.
    pub fn display_value(&self, value: ValueRef) -> DisplayValue<'_> {
        DisplayValue { program: self, value }
    }

    fn write_function(&self, f: &mut fmt::Formatter<'_>, func: FuncRef) -> fmt::Result {
        let data = self.function(func);
        let params =
            data.params.iter().map(|p| format!("%{p}")).collect::<Vec<String>>().join(", ");
        writeln!(f, "define @{}({}) {{", data.name, params)?;
        for block in &data.blocks {
            writeln!(f, "{block}:")?;
            for inst in &self.block(*block).insts {
                writeln!(f, "  {}", self.display_inst(*inst))?;
            }
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.program.constant(self.value) {
            Some(constant) => write!(f, "{constant}"),
            None => write!(f, "%{}", self.value),
        }
    }
}

impl fmt::Display for DisplayInst<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.program.inst(self.inst);
        if let Some(result) = data.result {
            write!(f, "%{result} = ")?;
        }
        let name = match &data.kind {
            InstKind::Binary { opcode, .. } => opcode.mnemonic(),
            InstKind::Other { name, .. } => name.as_str(),
        };
        f.write_str(name)?;
        for (i, operand) in data.kind.operands().iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{}", self.program.display_value(*operand))?;
        }
        Ok(())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, func) in self.functions().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            self.write_function(f, func)?;
        }
        Ok(())
    }
}
