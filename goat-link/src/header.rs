use goat_asm::{HEADER_LEN, SIGNATURE};

/// The fixed 32-byte header every linked image begins with: an 8-byte
/// signature followed by three absolute byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Absolute offset of the first instruction.
    pub instructions_offset: u64,
    /// Absolute offset of the first descriptor.
    pub data_descriptors_offset: u64,
    /// Absolute offset of the first data-segment byte.
    pub data_offset: u64,
}

impl Header {
    /// Compute the header for a program with `instructions_len` bytes of
    /// instructions and `descriptors_len` bytes of descriptors.
    ///
    /// `instructions_offset` is always `HEADER_LEN`: the instruction segment
    /// immediately follows the header with no padding.
    pub const fn new(instructions_len: usize, descriptors_len: usize) -> Self {
        let instructions_offset = HEADER_LEN as u64;
        let data_descriptors_offset = instructions_offset + instructions_len as u64;
        let data_offset = data_descriptors_offset + descriptors_len as u64;
        Self {
            instructions_offset,
            data_descriptors_offset,
            data_offset,
        }
    }

    /// Serialize into the 32-byte on-disk layout: signature, then the three
    /// offsets as little-endian `u64`s.
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..8].copy_from_slice(&SIGNATURE);
        out[8..16].copy_from_slice(&self.instructions_offset.to_le_bytes());
        out[16..24].copy_from_slice(&self.data_descriptors_offset.to_le_bytes());
        out[24..32].copy_from_slice(&self.data_offset.to_le_bytes());
        out
    }
}
