use tracing::debug;

use crate::ast::{InstructionCall, Location};
use crate::bytecode::{encode_script, Endian};
use crate::compiler::parser::Token;
use crate::compiler::{compile_script, ParseContext, ScriptError};
use crate::registry::InstructionSet;

fn describe_token(token: &Token) -> String {
    match token {
        Token::Name(name) => format!("name '{name}'"),
        Token::Integer(value) => format!("integer {value}"),
        Token::Hex(value) => format!("hexadecimal 0x{value:X}"),
        Token::StringLit(value) => format!("string \"{value}\""),
        Token::KwTrue => "'true'".to_string(),
        Token::KwFalse => "'false'".to_string(),
        Token::KwConst => "'Const'".to_string(),
        Token::KwVar => "'Var'".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Semicolon => "';'".to_string(),
        Token::Minus => "'-'".to_string(),
    }
}

pub fn parse_string(code_string: &str) -> Result<Vec<InstructionCall>, ScriptError> {
    use lexgen_util::LexerErrorKind;

    use crate::compiler::Lexer;
    use crate::compiler::Parser;

    let l = Lexer::new(code_string);
    let mut p = Parser::new(ParseContext::new());

    /* every statement starts with its instruction name */
    let mut statement_starts = Vec::new();
    let mut at_statement_start = true;

    for tok in l {
        match tok {
            Ok((start, tok, _)) => {
                let location = Location::from(start);

                if at_statement_start {
                    statement_starts.push(location);
                }

                at_statement_start = matches!(tok, Token::Semicolon);

                let found = describe_token(&tok);

                match p.parse(tok) {
                    Ok(()) => {}
                    Err(ScriptError::SyntaxError | ScriptError::ParseFail) => {
                        return Err(ScriptError::UnexpectedToken { location, found })
                    }
                    Err(err) => return Err(err),
                }
            }

            Err(err) => match err.kind {
                LexerErrorKind::InvalidToken => return Err(ScriptError::LexError(err.location.into())),
                LexerErrorKind::Custom(e) => {
                    return Err(ScriptError::LiteralError(err.location.into(), e))
                }
            },
        }
    }

    match p.end_of_input() {
        Ok((_, parse_ctx)) => {
            let mut calls = parse_ctx.calls;

            for (call, location) in calls.iter_mut().zip(statement_starts) {
                call.location = Some(location);
            }

            Ok(calls)
        }

        Err(ScriptError::SyntaxError | ScriptError::ParseFail) => Err(ScriptError::UnexpectedEnd),
        Err(err) => Err(err),
    }
}

/// Parses, validates and emits `code_string`, returning the serialized binary.
pub fn compile_string(
    code_string: &str,
    instruction_set: &InstructionSet,
    endian: Endian,
) -> Result<Vec<u8>, ScriptError> {
    let mut calls = parse_string(code_string)?;
    let script = compile_script(&mut calls, instruction_set, endian)?;

    debug!(
        "compiled {0} instructions ({1} code bytes, {2} jump table entries)",
        calls.len(),
        script.code.len(),
        script.jump_table.len()
    );

    Ok(encode_script(&script, endian))
}
