use std::collections::BTreeMap;

use goat_asm::align4;
use goat_types::DescIndex;

use crate::config::Config;

/// Locates a blob's byte range within a [`DataBuilder`]'s buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Byte offset of the blob within the data segment, always a multiple of
    /// 4.
    pub offset: u64,
    /// Logical size of the blob, *not* rounded up to the alignment unit. A
    /// reader that needs the padded size computes it with
    /// [`goat_asm::align4`].
    pub size: u32,
}

/// Accumulates constants (interned strings and raw blobs) into a data
/// segment, deduplicating strings by exact content.
#[derive(Debug, Clone, Default)]
pub struct DataBuilder {
    buffer: Vec<u8>,
    descriptors: Vec<Descriptor>,
    /// Interned string content (as Unicode scalar values, i.e. the project's
    /// "wide characters") to the descriptor that stores it.
    ///
    /// A `BTreeMap` stands in for a hand-coded balanced tree: an ordered map
    /// with deterministic iteration, which is all the dedup contract
    /// actually requires.
    strings: BTreeMap<Vec<u32>, DescIndex>,
}

impl DataBuilder {
    /// Create an empty builder with the configured initial buffer capacity.
    pub fn new(config: &Config) -> Self {
        Self {
            buffer: Vec::with_capacity(config.data_initial_capacity),
            descriptors: Vec::new(),
            strings: BTreeMap::new(),
        }
    }

    /// Copy `bytes` into the data segment, zero-padding to the next multiple
    /// of 4, and record a descriptor for it.
    #[tracing::instrument(level = "trace", skip(self, bytes), fields(len = bytes.len()))]
    pub fn append_blob(&mut self, bytes: &[u8]) -> DescIndex {
        let offset = self.buffer.len() as u64;
        let padded_len = align4(bytes.len());

        self.buffer.extend_from_slice(bytes);
        self.buffer.resize(self.buffer.len() + (padded_len - bytes.len()), 0);

        let index = DescIndex::new(self.descriptors.len() as u32);
        self.descriptors.push(Descriptor {
            offset,
            size: bytes.len() as u32,
        });
        index
    }

    /// Intern a string's content, returning the descriptor index of its
    /// (possibly pre-existing) blob.
    ///
    /// The string is stored as its Unicode scalar values followed by a
    /// terminating zero "wide" character, matching the binary format's wide
    /// string convention; each scalar is written little-endian as `u32`.
    pub fn intern_string(&mut self, s: &str) -> DescIndex {
        let content: Vec<u32> = s.chars().map(|c| c as u32).collect();
        if let Some(&existing) = self.strings.get(&content) {
            return existing;
        }

        let mut bytes = Vec::with_capacity((content.len() + 1) * 4);
        for scalar in &content {
            bytes.extend_from_slice(&scalar.to_le_bytes());
        }
        bytes.extend_from_slice(&0u32.to_le_bytes());

        let index = self.append_blob(&bytes);
        self.strings.insert(content, index);
        index
    }

    /// Intern an array of parameter names as a single blob of little-endian
    /// `u32` descriptor indices, one per name (each name itself interned and
    /// deduplicated as an ordinary string).
    ///
    /// `FUNC`'s `arg1` names a "param-names array desc index" without
    /// pinning its internal layout elsewhere; this is this implementation's
    /// resolution (see `DESIGN.md`).
    pub fn append_string_array(&mut self, names: &[String]) -> DescIndex {
        let indices: Vec<DescIndex> = names.iter().map(|name| self.intern_string(name)).collect();
        let mut bytes = Vec::with_capacity(indices.len() * 4);
        for index in indices {
            bytes.extend_from_slice(&index.as_u32().to_le_bytes());
        }
        self.append_blob(&bytes)
    }

    /// Number of descriptors recorded so far.
    pub fn descriptors_count(&self) -> u32 {
        self.descriptors.len() as u32
    }

    /// Contiguous read-only access to every descriptor, in first-insertion
    /// order.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// The raw data segment bytes accumulated so far.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_blob_pads_to_four_byte_multiple() {
        let mut data = DataBuilder::new(&Config::default());
        let index = data.append_blob(&[1, 2, 3]);
        let desc = data.descriptors()[index.as_usize()];
        assert_eq!(desc.offset % 4, 0);
        assert_eq!(desc.size, 3);
        let padded_end = desc.offset as usize + align4(desc.size as usize);
        assert_eq!(&data.buffer()[desc.offset as usize + 3..padded_end], &[0]);
    }

    #[test]
    fn interning_the_same_string_twice_returns_the_same_index() {
        let mut data = DataBuilder::new(&Config::default());
        let first = data.intern_string("hello");
        let second = data.intern_string("hello");
        assert_eq!(first, second);
        assert_eq!(data.descriptors_count(), 1);
    }

    #[test]
    fn interning_distinct_strings_returns_distinct_indices() {
        let mut data = DataBuilder::new(&Config::default());
        let a = data.intern_string("a");
        let b = data.intern_string("b");
        assert_ne!(a, b);
    }

    #[test]
    fn interning_returns_the_earliest_index_on_repeats() {
        let mut data = DataBuilder::new(&Config::default());
        let a = data.intern_string("x");
        let _ = data.intern_string("y");
        let a_again = data.intern_string("x");
        assert_eq!(a, a_again);
    }

    #[quickcheck_macros::quickcheck]
    fn every_descriptor_offset_is_four_byte_aligned(blobs: Vec<Vec<u8>>) -> bool {
        let mut data = DataBuilder::new(&Config::default());
        for blob in &blobs {
            data.append_blob(blob);
        }
        data.descriptors().iter().all(|d| d.offset % 4 == 0)
    }
}
