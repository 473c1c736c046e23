/// Recoverable failures raised while lowering an AST into bytecode.
///
/// Everything else this crate can get wrong (mixing `NodeId`s across arenas,
/// calling [`crate::codegen::emit_bytecode_assign`] on a non-assignable
/// node) stays a hard panic: those are bugs in this crate's own dispatch,
/// never something a caller's input can trigger on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A [`crate::NodeKind::FunctionCall`] was emitted with `found`
    /// arguments, at or past the `2^16` limit `CALL`'s `arg0` field can
    /// encode.
    #[error("function call has {found} arguments, which exceeds the 65535-argument limit")]
    TooManyArguments {
        /// The number of arguments the offending call actually has.
        found: usize,
    },

    /// The arena or a builder could not grow to hold a new allocation.
    ///
    /// Unreachable on a conforming host today (Rust's global allocator
    /// aborts the process on OOM rather than returning here), kept for
    /// interface completeness and so tests can inject it through a bounded
    /// test allocator.
    #[error("allocator exhausted while compiling")]
    AllocatorExhausted,
}
