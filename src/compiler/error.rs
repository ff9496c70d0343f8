use std::fmt;

use thiserror::Error;

use crate::ast::Location;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalError {
    #[error("Integer literal '{0}' is out of range")]
    IntegerOverflow(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Instruction '{0}' not found")]
    UnknownInstruction(String),

    #[error("Expected {expected} arguments but got {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("Argument {index} should be {expected}, but it was {found}")]
    ArgumentKind {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Argument {index}: string of length {length} does not fit in {capacity} bytes")]
    StringTooLong {
        index: usize,
        length: usize,
        capacity: usize,
    },

    #[error("Argument {0}: string is not ASCII")]
    NonAsciiString(usize),

    #[error("Argument {index}: {value} does not fit in 32 bits")]
    IntegerOutOfRange { index: usize, value: i64 },

    #[error("Enum value '{0}' not found")]
    UnknownEnumValue(String),

    #[error("Variable '{0}' not found")]
    UnknownVariable(String),

    #[error("Jump table entries need a string label as first argument")]
    MissingJumpLabel,

    #[error("Jump label '{0}' is longer than 31 characters")]
    JumpLabelTooLong(String),
}

/// A [`CompileError`] with the instruction it was raised for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionError {
    pub index: usize,
    pub name: String,
    pub location: Option<Location>,
    pub error: CompileError,
}

impl fmt::Display for InstructionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{location}: ")?,
            None => write!(f, "instruction #{0}: ", self.index)?,
        }

        write!(f, "{0}: {1}", self.name, self.error)
    }
}

impl std::error::Error for InstructionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[derive(Debug, Error)]
pub struct CompileErrors(pub Vec<InstructionError>);

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;

        for e in &self.0 {
            if !first {
                writeln!(f)?;
            }

            write!(f, "{}", e)?;
            first = false;
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Compile errors:\n{0}")]
    CompileErrors(CompileErrors),

    #[error("{0}: invalid token")]
    LexError(Location),

    #[error("{0}: {1}")]
    LiteralError(Location, LexicalError),

    #[error("{location}: unexpected {found}")]
    UnexpectedToken { location: Location, found: String },

    #[error("Unexpected end of script")]
    UnexpectedEnd,

    /// Raised by the generated parser, the frontend turns it into `UnexpectedToken`.
    #[error("Syntax error")]
    SyntaxError,

    #[error("Fatal syntax error")]
    ParseFail,

    #[error("Fatal parse error: stack overflow")]
    ParseStackOverflow,
}

impl From<CompileErrors> for ScriptError {
    fn from(value: CompileErrors) -> Self {
        Self::CompileErrors(value)
    }
}
