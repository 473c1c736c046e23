use goat_asm::{DESCRIPTOR_LEN, HEADER_LEN, INSTRUCTION_LEN};
use goat_codegen::{CodeBuilder, DataBuilder};

use crate::{bytecode::Bytecode, header::Header};

/// Assembles a finished [`CodeBuilder`] and [`DataBuilder`] into one
/// contiguous [`Bytecode`] image.
///
/// `Linker` itself holds no state across calls; `link` takes both builders
/// by reference and produces an entirely new owned buffer, so the caller is
/// free to keep using (or drop) the builders afterwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct Linker;

impl Linker {
    /// Concatenate header, instruction segment, descriptor segment and data
    /// segment into one buffer.
    ///
    /// For a fixed pair of builders, repeated calls produce byte-identical
    /// images: every field here is computed deterministically from the
    /// builders' contents, with no non-deterministic padding or ordering.
    #[tracing::instrument(level = "debug", skip_all, fields(
        instructions = code.len(),
        descriptors = data.descriptors_count(),
    ))]
    pub fn link(code: &CodeBuilder, data: &DataBuilder) -> Bytecode {
        let instructions_len = code.len() as usize * INSTRUCTION_LEN;
        let descriptors_len = data.descriptors_count() as usize * DESCRIPTOR_LEN;
        let data_len = data.buffer().len();

        let header = Header::new(instructions_len, descriptors_len);
        let total = HEADER_LEN + instructions_len + descriptors_len + data_len;

        let mut buffer = Vec::with_capacity(total);
        buffer.extend_from_slice(&header.to_bytes());

        for instr in code.view() {
            buffer.extend_from_slice(&instr.to_bytes());
        }

        for descriptor in data.descriptors() {
            buffer.extend_from_slice(&descriptor.offset.to_le_bytes());
            buffer.extend_from_slice(&descriptor.size.to_le_bytes());
        }

        buffer.extend_from_slice(data.buffer());

        debug_assert_eq!(buffer.len(), total);

        Bytecode::new(buffer, header, code.len(), data.descriptors_count())
    }
}

#[cfg(test)]
mod tests {
    use goat_asm::Instruction;
    use goat_codegen::Config;

    use super::*;

    #[test]
    fn header_offsets_match_the_spec_formula() {
        let config = Config::default();
        let mut code = CodeBuilder::new(&config);
        let mut data = DataBuilder::new(&config);

        code.append(Instruction::iload32(2));
        code.append(Instruction::iload32(3));
        code.append(Instruction::binary_op(goat_asm::Opcode::Add));
        code.append(Instruction::pop());
        code.append(Instruction::end());
        data.intern_string("unused");

        let bytecode = Linker::link(&code, &data);
        let header = bytecode.header();

        assert_eq!(header.instructions_offset, 32);
        assert_eq!(
            header.data_descriptors_offset,
            32 + 8 * bytecode.instructions_count() as u64
        );
        assert_eq!(
            header.data_offset,
            32 + 8 * bytecode.instructions_count() as u64 + 12 * bytecode.descriptors_count() as u64
        );
        assert_eq!(bytecode.buffer_size() as u64, header.data_offset + data.buffer().len() as u64);
    }

    #[test]
    fn linking_is_deterministic() {
        let config = Config::default();
        let mut code = CodeBuilder::new(&config);
        let mut data = DataBuilder::new(&config);
        code.append(Instruction::nil());
        code.append(Instruction::end());
        data.intern_string("x");

        let first = Linker::link(&code, &data);
        let second = Linker::link(&code, &data);
        assert_eq!(first.buffer(), second.buffer());
    }

    #[test]
    fn instructions_and_descriptors_round_trip() {
        let config = Config::default();
        let mut code = CodeBuilder::new(&config);
        let mut data = DataBuilder::new(&config);
        let instr = Instruction::sload(0);
        code.append(instr);
        code.append(Instruction::end());
        data.intern_string("hello");

        let bytecode = Linker::link(&code, &data);
        let instructions: Vec<_> = bytecode.instructions().collect();
        assert_eq!(instructions[0], instr);
        assert_eq!(instructions[1], Instruction::end());

        let descriptors: Vec<_> = bytecode.descriptors().collect();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].offset % 4, 0);
    }

    #[quickcheck_macros::quickcheck]
    fn buffer_size_always_equals_the_sum_of_segment_lengths(strings: Vec<String>) -> bool {
        let config = Config::default();
        let mut code = CodeBuilder::new(&config);
        let mut data = DataBuilder::new(&config);
        code.append(Instruction::end());
        for s in &strings {
            data.intern_string(s);
        }

        let bytecode = Linker::link(&code, &data);
        bytecode.buffer_size()
            == HEADER_LEN
                + code.len() as usize * INSTRUCTION_LEN
                + data.descriptors_count() as usize * DESCRIPTOR_LEN
                + data.buffer().len()
    }
}
