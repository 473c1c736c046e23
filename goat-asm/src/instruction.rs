use goat_types::{InstrIndex, Word};

use crate::{error::InvalidOpcode, opcode::Opcode};

/// A single fixed-width 64-bit bytecode instruction.
///
/// | Field  | Bits  | Semantics                                               |
/// |--------|-------|----------------------------------------------------------|
/// | opcode | 0–7   | [`Opcode`] discriminant                                  |
/// | flags  | 8–15  | per-opcode flags; zero for every opcode defined today    |
/// | arg0   | 16–31 | 16-bit unsigned immediate (e.g. `CALL`'s argument count) |
/// | arg1   | 32–63 | 32-bit immediate; signed for `ILOAD32`, unsigned otherwise |
///
/// The layout is little-endian on the wire (see [`Instruction::to_bytes`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    opcode: Opcode,
    flags: u8,
    arg0: u16,
    arg1: u32,
}

/// Byte length of one packed instruction.
pub const INSTRUCTION_LEN: usize = 8;

impl Instruction {
    /// Build an instruction with no flags set.
    pub const fn new(opcode: Opcode, arg0: u16, arg1: u32) -> Self {
        Self {
            opcode,
            flags: 0,
            arg0,
            arg1,
        }
    }

    /// Build an instruction with explicit flags.
    pub const fn with_flags(opcode: Opcode, flags: u8, arg0: u16, arg1: u32) -> Self {
        Self {
            opcode,
            flags,
            arg0,
            arg1,
        }
    }

    /// The opcode discriminant.
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Per-opcode flag byte.
    pub const fn flags(&self) -> u8 {
        self.flags
    }

    /// The 16-bit unsigned immediate.
    pub const fn arg0(&self) -> u16 {
        self.arg0
    }

    /// The 32-bit immediate, interpreted as unsigned.
    pub const fn arg1(&self) -> u32 {
        self.arg1
    }

    /// The 32-bit immediate, interpreted as a sign-extended `i32` (the
    /// interpretation `ILOAD32` requires).
    pub const fn arg1_signed(&self) -> i32 {
        self.arg1 as i32
    }

    /// A word combining a preceding `ARG`'s `arg1` (as the low half) with this
    /// instruction's `arg1` (as the high half), matching how `ILOAD64` and
    /// `RLOAD` reconstruct 64-bit operands.
    pub const fn combine_with_low(&self, low: u32) -> Word {
        ((self.arg1 as Word) << 32) | (low as Word)
    }

    /// Pack into the little-endian 8-byte wire representation.
    pub fn to_bytes(self) -> [u8; INSTRUCTION_LEN] {
        let mut out = [0u8; INSTRUCTION_LEN];
        out[0] = self.opcode.into();
        out[1] = self.flags;
        out[2..4].copy_from_slice(&self.arg0.to_le_bytes());
        out[4..8].copy_from_slice(&self.arg1.to_le_bytes());
        out
    }

    /// Unpack from the little-endian 8-byte wire representation.
    pub fn from_bytes(bytes: [u8; INSTRUCTION_LEN]) -> Result<Self, InvalidOpcode> {
        let opcode = Opcode::try_from(bytes[0])?;
        let flags = bytes[1];
        let arg0 = u16::from_le_bytes([bytes[2], bytes[3]]);
        let arg1 = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(Self::with_flags(opcode, flags, arg0, arg1))
    }
}

/// Convenience constructors, one per opcode, mirroring how each instruction is
/// actually produced by the AST lowering rules.
impl Instruction {
    /// `END`.
    pub const fn end() -> Self {
        Self::new(Opcode::End, 0, 0)
    }

    /// `POP`.
    pub const fn pop() -> Self {
        Self::new(Opcode::Pop, 0, 0)
    }

    /// `NIL`.
    pub const fn nil() -> Self {
        Self::new(Opcode::Nil, 0, 0)
    }

    /// `TRUE`.
    pub const fn tru() -> Self {
        Self::new(Opcode::True, 0, 0)
    }

    /// `FALSE`.
    pub const fn fals() -> Self {
        Self::new(Opcode::False, 0, 0)
    }

    /// `ARG arg1=value`.
    pub const fn arg(value: u32) -> Self {
        Self::new(Opcode::Arg, 0, value)
    }

    /// `ILOAD32 arg1=value` (`value` sign-extended on read).
    pub const fn iload32(value: i32) -> Self {
        Self::new(Opcode::Iload32, 0, value as u32)
    }

    /// `ILOAD64 arg1=high_half`.
    pub const fn iload64(high_half: u32) -> Self {
        Self::new(Opcode::Iload64, 0, high_half)
    }

    /// `RLOAD arg1=high_bits`.
    pub const fn rload(high_bits: u32) -> Self {
        Self::new(Opcode::Rload, 0, high_bits)
    }

    /// `SLOAD arg1=desc_index`.
    pub const fn sload(desc_index: u32) -> Self {
        Self::new(Opcode::Sload, 0, desc_index)
    }

    /// `VLOAD arg1=desc_index`.
    pub const fn vload(desc_index: u32) -> Self {
        Self::new(Opcode::Vload, 0, desc_index)
    }

    /// `VAR arg1=desc_index`.
    pub const fn var(desc_index: u32) -> Self {
        Self::new(Opcode::Var, 0, desc_index)
    }

    /// `CONST arg1=desc_index`.
    pub const fn constant(desc_index: u32) -> Self {
        Self::new(Opcode::Const, 0, desc_index)
    }

    /// `STORE arg1=desc_index`.
    pub const fn store(desc_index: u32) -> Self {
        Self::new(Opcode::Store, 0, desc_index)
    }

    /// `CALL arg0=argument_count`.
    pub const fn call(argument_count: u16) -> Self {
        Self::new(Opcode::Call, argument_count, 0)
    }

    /// `RET`.
    pub const fn ret() -> Self {
        Self::new(Opcode::Ret, 0, 0)
    }

    /// `FUNC arg0=param_count, arg1=param_names_desc_index`.
    pub const fn func(param_count: u16, param_names_desc_index: u32) -> Self {
        Self::new(Opcode::Func, param_count, param_names_desc_index)
    }

    /// `ENTER`.
    pub const fn enter() -> Self {
        Self::new(Opcode::Enter, 0, 0)
    }

    /// `LEAVE`.
    pub const fn leave() -> Self {
        Self::new(Opcode::Leave, 0, 0)
    }

    /// A binary arithmetic/comparison opcode with no operands of its own
    /// (its operands are whatever the two preceding emitted expressions left
    /// on the data stack).
    pub const fn binary_op(opcode: Opcode) -> Self {
        Self::new(opcode, 0, 0)
    }
}

/// Patch the `arg1` field of an already-appended instruction with a resolved
/// forward reference (e.g. a function body's entry index, known only after
/// the body itself has been emitted).
///
/// This is the one sanctioned exception to "instructions are never mutated
/// after being appended": label back-patching, the same technique code
/// generators have used since forever to resolve forward jumps.
pub fn patched_arg1(instr: Instruction, arg1: u32) -> Instruction {
    Instruction::with_flags(instr.opcode, instr.flags, instr.arg0, arg1)
}

/// Convert an [`InstrIndex`] to the `u32` form stored in an instruction's
/// `arg1` field.
pub const fn index_to_arg1(index: InstrIndex) -> u32 {
    index.as_u32()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let instr = Instruction::with_flags(Opcode::Call, 0x7, 3, 0xdead_beef);
        let bytes = instr.to_bytes();
        assert_eq!(Instruction::from_bytes(bytes), Ok(instr));
    }

    #[test]
    fn arg1_signed_sign_extends() {
        let instr = Instruction::iload32(-1);
        assert_eq!(instr.arg1_signed(), -1);
        assert_eq!(instr.arg1(), 0xffff_ffff);
    }

    #[test]
    fn combine_with_low_matches_emission_split() {
        let value: u64 = 10_000_000_000;
        let low = value as u32;
        let high = (value >> 32) as u32;
        let instr = Instruction::iload64(high);
        assert_eq!(instr.combine_with_low(low), value);
    }

    #[test]
    fn patching_preserves_other_fields() {
        let original = Instruction::arg(0);
        let patched = patched_arg1(original, 42);
        assert_eq!(patched.opcode(), Opcode::Arg);
        assert_eq!(patched.arg1(), 42);
    }
}
