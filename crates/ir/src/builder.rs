use smallvec::SmallVec;

use crate::{
    entities::{BlockRef, FuncRef, InstRef, ValueRef},
    program::Program,
    types::{Constant, InstKind, Opcode},
};

/// Appends instructions to one function of a [`Program`].
///
/// The builder starts positioned at a fresh entry block; every instruction is
/// appended to the end of the current block.
#[derive(Debug)]
pub struct FunctionBuilder<'a> {
    program: &'a mut Program,
    func: FuncRef,
    current: BlockRef,
}

impl<'a> FunctionBuilder<'a> {
    /// Declare a new function and position the builder at its entry block.
    pub fn new(program: &'a mut Program, name: impl Into<String>, num_params: u32) -> Self {
        let func = program.add_function(name, num_params);
        let current = program.add_block(func);
        Self { program, func, current }
    }

    pub fn func(&self) -> FuncRef {
        self.func
    }

    pub fn current_block(&self) -> BlockRef {
        self.current
    }

    /// The parameter values of the function being built.
    pub fn params(&self) -> Vec<ValueRef> {
        self.program.function(self.func).params.clone()
    }

    /// Append a new block to the function without switching to it.
    pub fn create_block(&mut self) -> BlockRef {
        self.program.add_block(self.func)
    }

    pub fn switch_to_block(&mut self, block: BlockRef) {
        debug_assert_eq!(self.program.block(block).func, self.func);
        self.current = block;
    }

    pub fn iconst(&mut self, value: impl Into<Constant>) -> ValueRef {
        self.program.iconst(value)
    }

    /// Append a binary instruction and return its result.
    pub fn binary(&mut self, opcode: Opcode, lhs: ValueRef, rhs: ValueRef) -> ValueRef {
        self.binary_inst(opcode, lhs, rhs).1
    }

    /// Append a binary instruction and return both the instruction and its result.
    pub fn binary_inst(
        &mut self,
        opcode: Opcode,
        lhs: ValueRef,
        rhs: ValueRef,
    ) -> (InstRef, ValueRef) {
        self.program.append_inst(self.current, InstKind::Binary { opcode, args: [lhs, rhs] })
    }

    pub fn add(&mut self, lhs: ValueRef, rhs: ValueRef) -> ValueRef {
        self.binary(Opcode::Add, lhs, rhs)
    }

    pub fn sub(&mut self, lhs: ValueRef, rhs: ValueRef) -> ValueRef {
        self.binary(Opcode::Sub, lhs, rhs)
    }

    pub fn mul(&mut self, lhs: ValueRef, rhs: ValueRef) -> ValueRef {
        self.binary(Opcode::Mul, lhs, rhs)
    }

    pub fn sdiv(&mut self, lhs: ValueRef, rhs: ValueRef) -> ValueRef {
        self.binary(Opcode::SDiv, lhs, rhs)
    }

    /// Append a non-arithmetic instruction that produces a value, e.g. a call.
    pub fn other(&mut self, name: impl Into<String>, operands: &[ValueRef]) -> ValueRef {
        let kind = InstKind::Other { name: name.into(), operands: SmallVec::from_slice(operands) };
        self.program.append_inst(self.current, kind).1
    }

    /// Append a non-arithmetic instruction without a result, e.g. a store.
    pub fn effect(&mut self, name: impl Into<String>, operands: &[ValueRef]) -> InstRef {
        let kind = InstKind::Other { name: name.into(), operands: SmallVec::from_slice(operands) };
        self.program.append_effect(self.current, kind)
    }

    pub fn ret(&mut self, value: ValueRef) -> InstRef {
        self.effect("ret", &[value])
    }
}
