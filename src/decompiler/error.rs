use thiserror::Error;

use crate::{bytecode::DecodeError, ir::OpcodeId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecompileError {
    #[error("Malformed script: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("Undefined opcode {0} at offset 0x{1:X}")]
    UnknownOpcode(OpcodeId, usize),

    #[error("Opcode {0} uses undefined enum group '{1}'")]
    UnknownEnumGroup(OpcodeId, String),

    #[error("Instruction '{0}' at offset 0x{1:X} is cut short: {2}")]
    TruncatedInstruction(String, usize, DecodeError),
}
