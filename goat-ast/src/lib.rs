//! The arena-allocated abstract syntax tree for the goat source language.
//!
//! A valid AST (built by some upstream parser, out of scope for this crate)
//! lives in an [`Arena`] and is lowered to bytecode by [`emit_program`],
//! which drives the two-builder emission protocol (`goat-codegen`'s
//! [`goat_codegen::CodeBuilder`] and [`goat_codegen::DataBuilder`]) node by
//! node, deferring function bodies until the rest of the program has been
//! emitted.

#![warn(missing_docs)]

mod arena;
mod children;
mod codegen;
mod error;
mod node;
mod source;

pub use arena::{Arena, NodeId};
pub use codegen::{emit_bytecode, emit_bytecode_assign, emit_deferred_bodies, emit_program, EmitContext};
pub use error::CompileError;
pub use node::{Node, NodeKind};
pub use source::{generate_source, generate_source_indented, SourceBuilder};
