use std::fmt;

use crate::ast::{Expr, InstructionCall, VarRef};

/// Fixed string slot contents as a script literal.
///
/// NULs are dropped. Bytes that cannot appear in a literal (non-ASCII and the quote
/// itself, there are no escapes) are written as `?`.
pub struct PrettyStringLit<'a>(&'a [u8]);

impl<'a> PrettyStringLit<'a> {
    pub fn new(string_lit: &'a [u8]) -> Self {
        Self(string_lit)
    }
}

impl<'a> fmt::Display for PrettyStringLit<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;

        for byte in self.0 {
            match byte {
                0 => {}
                b'"' | 0x80..=0xFF => write!(f, "?")?,
                _ => write!(f, "{0}", *byte as char)?,
            }
        }

        write!(f, "\"")
    }
}

/// Dump form of a parsed argument, e.g. `(INT 1)` or `(STR "x")`.
#[derive(Debug)]
pub struct PrettyExpr<'a>(&'a Expr);

impl<'a> PrettyExpr<'a> {
    pub fn new(expr: &'a Expr) -> Self {
        Self(expr)
    }
}

impl<'a> fmt::Display for PrettyExpr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Int(value) => write!(f, "(INT {value})"),
            Expr::Hex(value) => write!(f, "(HEX 0x{value:X})"),
            Expr::Bool(value) => write!(f, "(BOOL {value})"),
            Expr::Str(lit) => write!(f, "(STR \"{0}\")", lit.value),
            Expr::Enum(name) => write!(f, "(ENUM {name})"),
            Expr::Var(VarRef::Named(name)) => write!(f, "(VAR {name})"),
            Expr::Var(VarRef::Index(value)) => write!(f, "(VAR {value})"),
            Expr::Const(value) => write!(f, "(CONST {value})"),
        }
    }
}

/// Dump form of an instruction call: `(INST name [ (INT 1) (STR "x") ] )`.
#[derive(Debug)]
pub struct PrettyCall<'a>(&'a InstructionCall);

impl<'a> PrettyCall<'a> {
    pub fn new(call: &'a InstructionCall) -> Self {
        Self(call)
    }
}

impl<'a> fmt::Display for PrettyCall<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(INST {0} [ ", self.0.name)?;

        for arg in &self.0.args {
            write!(f, "{0} ", PrettyExpr::new(arg))?;
        }

        write!(f, "] )")
    }
}

#[derive(Debug)]
pub struct PrettyCalls<'a>(&'a [InstructionCall]);

impl<'a> PrettyCalls<'a> {
    pub fn new(calls: &'a [InstructionCall]) -> Self {
        Self(calls)
    }
}

impl<'a> fmt::Display for PrettyCalls<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for call in self.0 {
            writeln!(f, "{0}", PrettyCall::new(call))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::parse_string;

    #[test]
    fn test_string_lit() {
        let raw = b"ab\"c\xE9d\0\0\0";
        assert_eq!(PrettyStringLit::new(raw).to_string(), "\"ab?c?d\"");
        assert_eq!(PrettyStringLit::new(&[0; 16]).to_string(), "\"\"");
    }

    #[test]
    fn test_dump() {
        let calls = parse_string("f(1, \"x\", Left, 0x1F, Var(Timer), Const(-2), true); g();").unwrap();

        assert_eq!(
            PrettyCalls::new(&calls).to_string(),
            "(INST f [ (INT 1) (STR \"x\") (ENUM Left) (HEX 0x1F) (VAR Timer) (CONST -2) (BOOL true) ] )\n\
             (INST g [ ] )\n"
        );
    }
}
