//! [`Program`]: arena storage for functions, blocks, instructions and values.
//!
//! All entities live in `PrimaryMap`s owned by the program and are addressed by
//! the handles in [`crate::entities`]. Use-lists are maintained on insertion and
//! on every replacement, so consumers of a value can be found without scanning.

use cranelift_entity::{PrimaryMap, SecondaryMap};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::{
    entities::{BlockRef, FuncRef, InstRef, ValueRef},
    types::{Constant, InstKind, Use, ValueKind},
};

/// A function: a name, its parameter values and its blocks in layout order.
#[derive(Debug, Clone)]
pub struct FunctionData {
    pub name: String,
    pub params: Vec<ValueRef>,
    pub blocks: Vec<BlockRef>,
}

/// A basic block: the owning function and its instructions in emission order.
#[derive(Debug, Clone)]
pub struct BlockData {
    pub func: FuncRef,
    pub insts: Vec<InstRef>,
}

/// An instruction, its optional result value and the block it was placed in.
#[derive(Debug, Clone)]
pub struct InstData {
    pub kind: InstKind,
    pub result: Option<ValueRef>,
    pub block: BlockRef,
}

/// A value and where it was defined.
#[derive(Debug, Clone)]
pub struct ValueData {
    pub kind: ValueKind,
}

/// Arena-based program.
///
/// Owns every IR entity and keeps, for each value, the list of operand slots
/// that consume it.
#[derive(Debug, Default)]
pub struct Program {
    functions: PrimaryMap<FuncRef, FunctionData>,
    blocks: PrimaryMap<BlockRef, BlockData>,
    insts: PrimaryMap<InstRef, InstData>,
    values: PrimaryMap<ValueRef, ValueData>,

    /// Use-list: for each value, the operand slots that hold it.
    uses: SecondaryMap<ValueRef, SmallVec<[Use; 2]>>,

    /// Interned literals, so each constant has exactly one value.
    constants: HashMap<Constant, ValueRef>,
}

impl Program {
    /// Create a new empty program.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Declare a function with `num_params` parameters. Functions are
    /// traversed in the order they were declared.
    pub fn add_function(&mut self, name: impl Into<String>, num_params: u32) -> FuncRef {
        let func = self.functions.push(FunctionData {
            name: name.into(),
            params: Vec::with_capacity(num_params as usize),
            blocks: Vec::new(),
        });
        for index in 0..num_params {
            let value = self.values.push(ValueData { kind: ValueKind::Argument { func, index } });
            self.functions[func].params.push(value);
        }
        func
    }

    /// Append a new, empty block to `func`.
    pub fn add_block(&mut self, func: FuncRef) -> BlockRef {
        let block = self.blocks.push(BlockData { func, insts: Vec::new() });
        self.functions[func].blocks.push(block);
        block
    }

    /// Return the value for literal `value`, creating it on first request.
    pub fn iconst(&mut self, value: impl Into<Constant>) -> ValueRef {
        let constant = value.into();
        if let Some(existing) = self.constants.get(&constant) {
            return *existing;
        }
        let v = self.values.push(ValueData { kind: ValueKind::Constant(constant) });
        self.constants.insert(constant, v);
        v
    }

    /// Append a value-producing instruction to the end of `block`, registering
    /// a use for each operand.
    pub fn append_inst(&mut self, block: BlockRef, kind: InstKind) -> (InstRef, ValueRef) {
        let inst = self.append_effect(block, kind);
        let result = self.values.push(ValueData { kind: ValueKind::Result(inst) });
        self.insts[inst].result = Some(result);
        (inst, result)
    }

    /// Append an instruction without a result (a store, a return) to the end
    /// of `block`.
    pub fn append_effect(&mut self, block: BlockRef, kind: InstKind) -> InstRef {
        let operands: SmallVec<[ValueRef; 2]> = kind.operands().iter().copied().collect();
        let inst = self.insts.push(InstData { kind, result: None, block });
        for (operand, value) in operands.into_iter().enumerate() {
            self.uses[value].push(Use { user: inst, operand: operand as u32 });
        }
        self.blocks[block].insts.push(inst);
        inst
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Iterate over functions in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = FuncRef> + '_ {
        self.functions.keys()
    }

    pub fn function(&self, func: FuncRef) -> &FunctionData {
        &self.functions[func]
    }

    pub fn block(&self, block: BlockRef) -> &BlockData {
        &self.blocks[block]
    }

    pub fn inst(&self, inst: InstRef) -> &InstData {
        &self.insts[inst]
    }

    pub fn value(&self, value: ValueRef) -> &ValueData {
        &self.values[value]
    }

    /// Checked lookup of an instruction.
    pub fn get_inst(&self, inst: InstRef) -> Option<&InstData> {
        self.insts.get(inst)
    }

    /// Checked lookup of a value.
    pub fn get_value(&self, value: ValueRef) -> Option<&ValueData> {
        self.values.get(value)
    }

    pub fn num_insts(&self) -> usize {
        self.insts.len()
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn inst_refs(&self) -> impl Iterator<Item = InstRef> + '_ {
        self.insts.keys()
    }

    pub(crate) fn value_refs(&self) -> impl Iterator<Item = ValueRef> + '_ {
        self.values.keys()
    }

    /// The literal held by `value`, if it is a constant.
    pub fn constant(&self, value: ValueRef) -> Option<Constant> {
        self.values[value].kind.as_constant()
    }

    /// The result value of `inst`, if it produces one.
    pub fn inst_result(&self, inst: InstRef) -> Option<ValueRef> {
        self.insts[inst].result
    }

    /// The function containing `inst`.
    pub fn inst_function(&self, inst: InstRef) -> FuncRef {
        self.blocks[self.insts[inst].block].func
    }

    /// Find a function by name.
    pub fn function_by_name(&self, name: &str) -> Option<FuncRef> {
        self.functions.iter().find(|(_, data)| data.name == name).map(|(func, _)| func)
    }

    /// Every instruction of the program in traversal order: functions in
    /// declaration order, blocks in layout order, instructions in emission order.
    pub fn instructions(&self) -> impl Iterator<Item = InstRef> + '_ {
        self.functions.values().flat_map(move |func| {
            func.blocks.iter().flat_map(move |block| self.blocks[*block].insts.iter().copied())
        })
    }

    /// Snapshot of every binary instruction, in traversal order.
    ///
    /// The returned list is detached from the program, so callers may rewrite
    /// uses while walking it.
    pub fn binary_instructions(&self) -> Vec<InstRef> {
        self.instructions().filter(|inst| self.insts[*inst].kind.as_binary().is_some()).collect()
    }

    // ========================================================================
    // Use-def
    // ========================================================================

    /// Get all uses of a value.
    pub fn uses(&self, value: ValueRef) -> &[Use] {
        &self.uses[value]
    }

    /// Check if a value has any uses.
    pub fn has_uses(&self, value: ValueRef) -> bool {
        !self.uses[value].is_empty()
    }

    /// Replace every use of `old` with `new`, returning how many operand slots
    /// were rewritten.
    ///
    /// The definition of `old` is left in place.
    pub fn replace_all_uses(&mut self, old: ValueRef, new: ValueRef) -> usize {
        if old == new {
            return 0;
        }
        let old_uses = std::mem::take(&mut self.uses[old]);

        for u in &old_uses {
            let operands = self.insts[u.user].kind.operands_mut();
            debug_assert_eq!(operands[u.operand as usize], old);
            operands[u.operand as usize] = new;

            self.uses[new].push(*u);
        }

        old_uses.len()
    }
}
