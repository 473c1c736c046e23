/// Tunable capacities for the code and data builders.
///
/// These exist so callers never need to hand-tune magic numbers at the call
/// site; `Config::default()` reproduces this crate's stated defaults (initial
/// code capacity 128, doubling growth).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Initial capacity, in instructions, reserved by a new [`crate::CodeBuilder`].
    pub code_initial_capacity: usize,
    /// Initial capacity, in bytes, reserved by a new [`crate::DataBuilder`]'s
    /// data buffer.
    pub data_initial_capacity: usize,
    /// Number of AST nodes per arena chunk. The stated budget is "64 KiB";
    /// since every arena slot holds one uniformly-sized `Node`, that number
    /// is converted once here into a node count rather than threaded
    /// through as a raw byte budget.
    pub arena_chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            code_initial_capacity: 128,
            data_initial_capacity: 256,
            arena_chunk_size: 64 * 1024 / 32,
        }
    }
}
