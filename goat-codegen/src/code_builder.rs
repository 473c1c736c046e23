use goat_asm::Instruction;
use goat_types::InstrIndex;

use crate::config::Config;

/// An append-only sequence of instructions.
///
/// Appending is the only mutation this type exposes under normal use:
/// indices returned by [`CodeBuilder::append`] stay valid and meaningful
/// until the program is linked. The one sanctioned exception is
/// [`CodeBuilder::patch_arg1`], used to back-patch a forward reference (a
/// function body's entry index) once it becomes known.
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    instructions: Vec<Instruction>,
}

impl CodeBuilder {
    /// Create an empty builder with the configured initial capacity.
    ///
    /// `Vec`'s own growth strategy (geometric, roughly doubling on each
    /// reallocation) already satisfies the growth requirement, so this type
    /// does not reimplement chunked growth on top of it.
    pub fn new(config: &Config) -> Self {
        Self {
            instructions: Vec::with_capacity(config.code_initial_capacity),
        }
    }

    /// Append an instruction, returning the index it was stored at.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn append(&mut self, instr: Instruction) -> InstrIndex {
        let index = InstrIndex::new(self.instructions.len() as u32);
        self.instructions.push(instr);
        index
    }

    /// Number of instructions appended so far.
    pub fn len(&self) -> u32 {
        self.instructions.len() as u32
    }

    /// Whether no instructions have been appended yet.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The index the *next* [`CodeBuilder::append`] call will return.
    pub fn next_index(&self) -> InstrIndex {
        InstrIndex::new(self.instructions.len() as u32)
    }

    /// Contiguous read-only access to every instruction appended so far, in
    /// order.
    pub fn view(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Overwrite the `arg1` field of an already-appended instruction.
    ///
    /// Used exclusively to back-patch forward references such as a
    /// function's deferred body entry index. Panics if `index` is out of
    /// bounds, which would indicate a bug in the caller, not malformed
    /// input.
    pub fn patch_arg1(&mut self, index: InstrIndex, arg1: u32) {
        let slot = &mut self.instructions[index.as_usize()];
        *slot = goat_asm::patched_arg1(*slot, arg1);
    }
}

#[cfg(test)]
mod tests {
    use goat_asm::Instruction;

    use super::*;

    #[test]
    fn append_returns_monotonically_increasing_indices() {
        let mut code = CodeBuilder::new(&Config::default());
        for i in 0..5u16 {
            let index = code.append(Instruction::call(i));
            assert_eq!(index, InstrIndex::new(i as u32));
        }
        assert_eq!(code.len(), 5);
    }

    #[test]
    fn appended_instructions_read_back_unchanged() {
        let mut code = CodeBuilder::new(&Config::default());
        let instr = Instruction::iload32(-7);
        let index = code.append(instr);
        assert_eq!(code.view()[index.as_usize()], instr);
    }

    #[test]
    fn patch_arg1_only_touches_the_targeted_instruction() {
        let mut code = CodeBuilder::new(&Config::default());
        let first = code.append(Instruction::arg(0));
        let second = code.append(Instruction::func(2, 9));
        code.patch_arg1(first, 77);
        assert_eq!(code.view()[first.as_usize()].arg1(), 77);
        assert_eq!(code.view()[second.as_usize()], Instruction::func(2, 9));
    }

    #[quickcheck_macros::quickcheck]
    fn indices_are_always_dense_and_zero_based(arg0s: Vec<u16>) -> bool {
        let mut code = CodeBuilder::new(&Config::default());
        arg0s
            .iter()
            .enumerate()
            .all(|(i, &arg0)| code.append(Instruction::call(arg0)).as_u32() == i as u32)
    }
}
