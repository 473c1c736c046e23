//! Append-only builders that accumulate a goat bytecode program before it is
//! handed to `goat-link`.
//!
//! [`CodeBuilder`] accumulates the instruction segment; [`DataBuilder`]
//! accumulates the data segment (interned strings and raw blobs) plus its
//! descriptor table. Neither type performs any validation beyond what is
//! needed to keep its own invariants (AST emission, not these builders, is
//! responsible for rejecting malformed programs).

#![warn(missing_docs)]

mod code_builder;
mod config;
mod data_builder;

pub use code_builder::CodeBuilder;
pub use config::Config;
pub use data_builder::{DataBuilder, Descriptor};
