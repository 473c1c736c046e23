//! Instruction set, binary encoding and file-format constants for goat
//! bytecode.
//!
//! This crate is the contract between the compiler's linker (`goat-link`)
//! and whatever downstream VM executes the resulting image: it owns the
//! [`Opcode`] catalog, the fixed-width [`Instruction`] encoding, and the
//! handful of constants that pin the binary file format.

#![warn(missing_docs)]

mod error;
mod format;
mod instruction;
mod opcode;

pub use error::InvalidOpcode;
pub use format::{align4, DESCRIPTOR_LEN, HEADER_LEN, SIGNATURE};
pub use instruction::{index_to_arg1, patched_arg1, Instruction, INSTRUCTION_LEN};
pub use opcode::Opcode;
