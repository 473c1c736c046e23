use core::fmt;

use crate::error::InvalidOpcode;

/// The instruction set executed by the goat stack machine.
///
/// ## Stack opcodes
///
/// `NIL`, `TRUE`, `FALSE`, `ILOAD32`, `ILOAD64`, `RLOAD` and `SLOAD` each push
/// exactly one value. `ARG` never touches the data stack itself; it stages an
/// extra 32-bit half for the *next* instruction (`ILOAD64`, `RLOAD`, `FUNC`)
/// to combine with.
///
/// ## Binding opcodes
///
/// `VLOAD`, `VAR`, `CONST` and `STORE` all carry a descriptor index naming a
/// variable or constant in the current lexical context (see `ENTER`/`LEAVE`).
///
/// ## Arithmetic / comparison opcodes
///
/// `ADD` through `POWER` and `LT` through `NE` pop two values and push one;
/// evaluation order of their operands is fixed at emission time (left, then
/// right), not by the opcode itself.
///
/// ## Control-flow opcodes
///
/// `CALL`, `RET`, `FUNC`, `ENTER`, `LEAVE` and `END` shape the call stack and
/// lexical scoping; `FUNC`'s entry point is always the first instruction of a
/// deferred function body (see the crate-level docs on deferred code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Opcode {
    /// No-op.
    Nop = 0x00,
    /// Stage the low/extra 32-bit half of the following `ILOAD64`, `RLOAD` or
    /// `FUNC` instruction.
    Arg = 0x01,
    /// Halt program execution.
    End = 0x02,
    /// Discard the top of the data stack.
    Pop = 0x03,
    /// Push the null singleton.
    Nil = 0x04,
    /// Push the boolean singleton `true`.
    True = 0x05,
    /// Push the boolean singleton `false`.
    False = 0x06,
    /// Push a sign-extended 32-bit integer immediate.
    Iload32 = 0x07,
    /// Push a 64-bit integer, combining this instruction's `arg1` (high half)
    /// with the preceding `ARG`'s `arg1` (low half).
    Iload64 = 0x08,
    /// Push a 64-bit float, combining this instruction's `arg1` (high bits)
    /// with the preceding `ARG`'s `arg1` (low bits).
    Rload = 0x09,
    /// Push a static string referencing a data-segment descriptor.
    Sload = 0x0a,
    /// Push the value bound to a name in the current context, or null if
    /// unbound.
    Vload = 0x0b,
    /// Declare a mutable variable in the current context.
    Var = 0x0c,
    /// Declare an immutable constant in the current context.
    Const = 0x0d,
    /// Store the top of the stack into an existing binding, declaring it if
    /// absent.
    Store = 0x0e,
    /// Pop two, push their sum.
    Add = 0x0f,
    /// Pop two, push their difference.
    Sub = 0x10,
    /// Pop two, push their product.
    Mul = 0x11,
    /// Pop two, push their quotient.
    Div = 0x12,
    /// Pop two, push the remainder.
    Mod = 0x13,
    /// Pop two, push the first raised to the second.
    Power = 0x14,
    /// Pop two, push whether the first is less than the second.
    Lt = 0x15,
    /// Pop two, push whether the first is less than or equal to the second.
    Le = 0x16,
    /// Pop two, push whether the first is greater than the second.
    Gt = 0x17,
    /// Pop two, push whether the first is greater than or equal to the
    /// second.
    Ge = 0x18,
    /// Pop two, push whether they are equal.
    Eq = 0x19,
    /// Pop two, push whether they are not equal.
    Ne = 0x1a,
    /// Pop the callee and `arg0` arguments, push the call's result.
    Call = 0x1b,
    /// Return from the current function with the top of stack as the result.
    Ret = 0x1c,
    /// Push a function object, combining this instruction's `arg1`
    /// (parameter-names descriptor) with the preceding `ARG`'s `arg1` (body
    /// entry index) and `arg0` (parameter count).
    Func = 0x1d,
    /// Push a new lexical context whose parent is the current one.
    Enter = 0x1e,
    /// Pop the current lexical context, restoring its parent.
    Leave = 0x1f,
}

impl Opcode {
    /// Human readable mnemonic, as used in disassembly.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Arg => "ARG",
            Opcode::End => "END",
            Opcode::Pop => "POP",
            Opcode::Nil => "NIL",
            Opcode::True => "TRUE",
            Opcode::False => "FALSE",
            Opcode::Iload32 => "ILOAD32",
            Opcode::Iload64 => "ILOAD64",
            Opcode::Rload => "RLOAD",
            Opcode::Sload => "SLOAD",
            Opcode::Vload => "VLOAD",
            Opcode::Var => "VAR",
            Opcode::Const => "CONST",
            Opcode::Store => "STORE",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Power => "POWER",
            Opcode::Lt => "LT",
            Opcode::Le => "LE",
            Opcode::Gt => "GT",
            Opcode::Ge => "GE",
            Opcode::Eq => "EQ",
            Opcode::Ne => "NE",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Func => "FUNC",
            Opcode::Enter => "ENTER",
            Opcode::Leave => "LEAVE",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = InvalidOpcode;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        use Opcode::*;
        Ok(match raw {
            0x00 => Nop,
            0x01 => Arg,
            0x02 => End,
            0x03 => Pop,
            0x04 => Nil,
            0x05 => True,
            0x06 => False,
            0x07 => Iload32,
            0x08 => Iload64,
            0x09 => Rload,
            0x0a => Sload,
            0x0b => Vload,
            0x0c => Var,
            0x0d => Const,
            0x0e => Store,
            0x0f => Add,
            0x10 => Sub,
            0x11 => Mul,
            0x12 => Div,
            0x13 => Mod,
            0x14 => Power,
            0x15 => Lt,
            0x16 => Le,
            0x17 => Gt,
            0x18 => Ge,
            0x19 => Eq,
            0x1a => Ne,
            0x1b => Call,
            0x1c => Ret,
            0x1d => Func,
            0x1e => Enter,
            0x1f => Leave,
            _ => return Err(InvalidOpcode(raw)),
        })
    }
}
