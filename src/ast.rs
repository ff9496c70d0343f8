use std::fmt;

use crate::ir::IntValue;

/// 1-based source position of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub col: u32,
}

impl From<lexgen_util::Loc> for Location {
    fn from(loc: lexgen_util::Loc) -> Self {
        Self {
            line: loc.line + 1,
            col: loc.col + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}:{1}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrLit {
    pub value: String,

    /// Size of the fixed slot this string is written to, assigned by the validator.
    pub target_len: Option<usize>,
}

impl StrLit {
    pub fn new(value: String) -> Self {
        Self {
            value,
            target_len: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarRef {
    Named(String),
    Index(IntValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(IntValue),
    Hex(u64),
    Bool(bool),
    Str(StrLit),
    /// Bare identifier. Resolved against the enum groups, or turned into a
    /// variable reference in operand slots.
    Enum(String),
    Var(VarRef),
    Const(IntValue),
}

impl Expr {
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Int(_) => "an integer",
            Expr::Hex(_) => "a hexadecimal number",
            Expr::Bool(_) => "a boolean",
            Expr::Str(_) => "a string",
            Expr::Enum(_) => "an enum value",
            Expr::Var(_) => "a variable",
            Expr::Const(_) => "a constant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub location: Option<Location>,
}

impl InstructionCall {
    pub fn new(name: String, args: Vec<Expr>) -> Self {
        Self {
            name,
            args,
            location: None,
        }
    }
}
