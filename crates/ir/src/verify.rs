use hashbrown::HashSet;
use tracing::trace;

use crate::{
    entities::InstRef,
    error::Error,
    program::Program,
    types::{Use, ValueKind},
};

impl Program {
    /// Check that the program is well formed.
    ///
    /// Verifies that every instruction sits in exactly one block of its own
    /// function, that every operand refers to an existing value, that argument
    /// values are within their function's parameter list, and that use-lists
    /// agree with operand slots in both directions.
    pub fn verify(&self) -> Result<(), Error> {
        let mut placed: HashSet<InstRef> = HashSet::new();

        for func in self.functions() {
            for block in &self.function(func).blocks {
                for inst in &self.block(*block).insts {
                    let data = self.get_inst(*inst).ok_or(Error::UnknownInstruction(*inst))?;
                    if data.block != *block {
                        return Err(Error::DetachedInstruction { inst: *inst, block: *block });
                    }
                    if !placed.insert(*inst) {
                        return Err(Error::DuplicateInstruction(*inst));
                    }
                    self.verify_operands(*inst)?;
                }
            }
        }

        if let Some(inst) = self.inst_refs().find(|inst| !placed.contains(inst)) {
            return Err(Error::DetachedInstruction { inst, block: self.inst(inst).block });
        }

        for value in self.value_refs() {
            if let ValueKind::Argument { func, index } = self.value(value).kind {
                if self.function(func).params.get(index as usize) != Some(&value) {
                    return Err(Error::ArgumentOutOfRange { func, index });
                }
            }
            for u in self.uses(value) {
                let holds = self
                    .get_inst(u.user)
                    .and_then(|data| data.kind.operands().get(u.operand as usize))
                    .is_some_and(|operand| *operand == value);
                if !holds {
                    return Err(Error::UseListMismatch { value, inst: u.user, operand: u.operand });
                }
            }
        }

        trace!("verified {} instructions and {} values", placed.len(), self.num_values());
        Ok(())
    }

    fn verify_operands(&self, inst: InstRef) -> Result<(), Error> {
        for (operand, value) in self.inst(inst).kind.operands().iter().enumerate() {
            let operand = operand as u32;
            if self.get_value(*value).is_none() {
                return Err(Error::DanglingOperand { inst, operand, value: *value });
            }
            if !self.uses(*value).contains(&Use { user: inst, operand }) {
                return Err(Error::UseListMismatch { value: *value, inst, operand });
            }
        }
        Ok(())
    }
}
