//! Atomic types shared by every stage of the goat compiler pipeline.
//!
//! This crate mirrors how the rest of the workspace keeps its primitive
//! wire-level types (indices, word-sized values) in one small, dependency-free
//! crate rather than scattered across every consumer.

#![warn(missing_docs)]

use core::fmt;

/// A raw 64-bit machine word, as stored in an `arg1` field or a data-segment
/// slot before it is reinterpreted as a signed integer, a float, or a
/// descriptor index.
pub type Word = u64;

macro_rules! index_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Build an index from its raw zero-based value.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw zero-based value.
            pub const fn as_u32(self) -> u32 {
                self.0
            }

            /// The raw value widened to `usize`, for slice indexing.
            pub const fn as_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(index: $name) -> Self {
                index.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_type!(
    InstrIndex,
    "The ordinal position of an instruction in the emitted instruction stream.\n\nUsed as a jump/entry target (e.g. the body entry recorded by `FUNC`)."
);

index_type!(
    DescIndex,
    "The ordinal position of a descriptor in the data segment's descriptor table.\n\nInstructions embed this in their `arg1` field to reference an interned string or blob."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instr_index_round_trips_through_u32() {
        let idx = InstrIndex::new(42);
        assert_eq!(u32::from(idx), 42);
        assert_eq!(InstrIndex::from(42u32), idx);
    }

    #[test]
    fn indices_order_by_raw_value() {
        assert!(DescIndex::new(1) < DescIndex::new(2));
    }
}
