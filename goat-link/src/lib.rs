//! Links a finished [`goat_codegen::CodeBuilder`]/[`goat_codegen::DataBuilder`]
//! pair into one contiguous bytecode image ready to be written to a file or
//! handed to a VM.

#![warn(missing_docs)]

mod bytecode;
mod header;
mod linker;

pub use bytecode::Bytecode;
pub use header::Header;
pub use linker::Linker;
