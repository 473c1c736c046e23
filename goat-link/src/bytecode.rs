use goat_asm::{Instruction, DESCRIPTOR_LEN, INSTRUCTION_LEN};
use goat_codegen::Descriptor;

use crate::header::Header;

/// A fully linked bytecode image: a single owned buffer plus the header
/// metadata needed to slice it back into segments.
///
/// Dropping a `Bytecode` drops the owned buffer and, with it, every view
/// derived from it — there is nothing else to free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytecode {
    buffer: Vec<u8>,
    header: Header,
    instructions_count: u32,
    descriptors_count: u32,
}

impl Bytecode {
    pub(crate) fn new(
        buffer: Vec<u8>,
        header: Header,
        instructions_count: u32,
        descriptors_count: u32,
    ) -> Self {
        Self {
            buffer,
            header,
            instructions_count,
            descriptors_count,
        }
    }

    /// The complete linked image, ready to be written to a file.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Total length of the linked image in bytes.
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// The header this image was linked with.
    pub fn header(&self) -> Header {
        self.header
    }

    /// Number of instructions in the instruction segment.
    pub fn instructions_count(&self) -> u32 {
        self.instructions_count
    }

    /// Number of descriptors in the descriptor segment.
    pub fn descriptors_count(&self) -> u32 {
        self.descriptors_count
    }

    /// Decode the instruction segment.
    ///
    /// Panics if the buffer was not produced by [`crate::Linker::link`] (an
    /// invariant violation, not a user-facing error condition).
    pub fn instructions(&self) -> impl Iterator<Item = Instruction> + '_ {
        let start = self.header.instructions_offset as usize;
        let end = start + self.instructions_count as usize * INSTRUCTION_LEN;
        self.buffer[start..end]
            .chunks_exact(INSTRUCTION_LEN)
            .map(|chunk| {
                let mut bytes = [0u8; INSTRUCTION_LEN];
                bytes.copy_from_slice(chunk);
                Instruction::from_bytes(bytes).expect("linker only emits valid opcodes")
            })
    }

    /// Decode the descriptor segment.
    pub fn descriptors(&self) -> impl Iterator<Item = Descriptor> + '_ {
        let start = self.header.data_descriptors_offset as usize;
        let end = start + self.descriptors_count as usize * DESCRIPTOR_LEN;
        self.buffer[start..end].chunks_exact(DESCRIPTOR_LEN).map(|chunk| {
            let offset = u64::from_le_bytes(chunk[0..8].try_into().unwrap());
            let size = u32::from_le_bytes(chunk[8..12].try_into().unwrap());
            Descriptor { offset, size }
        })
    }

    /// The raw data segment.
    pub fn data(&self) -> &[u8] {
        &self.buffer[self.header.data_offset as usize..]
    }
}
