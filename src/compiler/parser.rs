use pomelo::pomelo;

use super::ScriptError;
use crate::ast::{Expr, InstructionCall, StrLit, VarRef};
use crate::ir::IntValue;

#[derive(Debug, Default)]
pub struct ParseContext {
    pub calls: Vec<InstructionCall>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }
}

pomelo! {
    %include { use super::*; }

    %token #[derive(Debug, Clone, PartialEq, Eq)] pub enum Token {};

    %extra_argument ParseContext;

    // token types

    %type Integer IntValue;
    %type Hex u64;
    %type Name String;
    %type StringLit String;

    // errors

    %error ScriptError;

    %syntax_error { Err(ScriptError::SyntaxError) }

    %parse_fail { ScriptError::ParseFail }
    %stack_overflow { ScriptError::ParseStackOverflow }

    // grammar

    script ::= calls;

    calls ::= call;
    calls ::= calls call;

    call ::= Name(n) LParen RParen Semicolon {
        extra.calls.push(InstructionCall::new(n, Vec::new()));
    };

    call ::= Name(n) LParen args(a) RParen Semicolon {
        extra.calls.push(InstructionCall::new(n, a));
    };

    %type args Vec<Expr>;
    args ::= arg(e) { vec![e] };
    args ::= args(mut v) Comma arg(e) { v.push(e); v };

    %type arg Expr;
    arg ::= StringLit(s) { Expr::Str(StrLit::new(s)) };
    arg ::= Hex(h) { Expr::Hex(h) };
    arg ::= signed(i) { Expr::Int(i) };
    arg ::= KwTrue { Expr::Bool(true) };
    arg ::= KwFalse { Expr::Bool(false) };
    arg ::= Name(n) { Expr::Enum(n) };

    /* explicit operand sugar */
    arg ::= KwConst LParen signed(i) RParen { Expr::Const(i) };
    arg ::= KwConst LParen Hex(h) RParen { Expr::Const(h as u32 as i32 as IntValue) };
    arg ::= KwVar LParen Name(n) RParen { Expr::Var(VarRef::Named(n)) };
    arg ::= KwVar LParen signed(i) RParen { Expr::Var(VarRef::Index(i)) };

    %type signed IntValue;
    signed ::= Integer(i) { i };
    signed ::= Minus Integer(i) { -i };
}

pub use parser::*;
