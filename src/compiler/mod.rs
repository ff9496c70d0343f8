mod emitter;
pub mod error;
mod frontend;
mod lexer;
mod parser;
mod validator;

pub use lexer::Lexer;

pub(crate) use lexer::is_identifier;

pub use parser::ParseContext;
pub use parser::Parser;

pub use emitter::compile_script;
pub use validator::{validate_call, Validated, MAX_JUMP_LABEL_LEN};

pub use error::{CompileError, CompileErrors, InstructionError, ScriptError};

pub use frontend::{compile_string, parse_string};
