/// A byte did not correspond to any assigned [`crate::Opcode`] discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("0x{0:02x} is not a valid opcode")]
pub struct InvalidOpcode(pub u8);
