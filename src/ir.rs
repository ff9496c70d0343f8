use std::fmt;

pub type IntValue = i64;

/// Numeric instruction id as stored in the instruction stream.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct OpcodeId(pub i32);

impl fmt::Display for OpcodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}", self.0)
    }
}

/// A jump-table record: a label name and the offset of the labelled instruction,
/// relative to the start of the instruction stream.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct JumpEntry {
    pub name: String,
    pub offset: u32,
}

impl JumpEntry {
    pub fn new(name: String, offset: u32) -> Self {
        Self { name, offset }
    }
}

/// A compiled script before (or after) header serialization.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct Script {
    pub jump_table: Vec<JumpEntry>,
    pub code: Vec<u8>,
}

impl Script {
    pub fn new(jump_table: Vec<JumpEntry>, code: Vec<u8>) -> Self {
        Self { jump_table, code }
    }
}
