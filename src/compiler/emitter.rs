use tracing::trace;

use crate::{
    ast::{Expr, InstructionCall, StrLit, VarRef},
    bytecode::{EncoderHelper, Endian, OPERAND_TAG_CONST, OPERAND_TAG_VAR},
    ir::{IntValue, JumpEntry, Script},
    registry::InstructionSet,
};

use super::{
    error::{CompileError, CompileErrors, InstructionError},
    validator::validate_call,
};

/// Legacy spelling of an unnamed variable, `VAR_<n>`.
const VAR_PREFIX: &str = "VAR_";

fn to_word(index: usize, value: IntValue) -> Result<i32, CompileError> {
    i32::try_from(value).map_err(|_| CompileError::IntegerOutOfRange { index, value })
}

struct Emit<'a> {
    set: &'a InstructionSet,
    endian: Endian,
    code: Vec<u8>,
    jump_table: Vec<JumpEntry>,
    errors: Vec<InstructionError>,
}

impl<'a> Emit<'a> {
    fn new(set: &'a InstructionSet, endian: Endian) -> Self {
        Self {
            set,
            endian,
            code: Vec::new(),
            jump_table: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn variable(&self, var: &VarRef, index: usize) -> Result<i32, CompileError> {
        match var {
            VarRef::Index(value) => to_word(index, *value),

            VarRef::Named(name) => {
                if let Some(value) = self.set.variable(name) {
                    return Ok(value);
                }

                let digits = name.strip_prefix(VAR_PREFIX).unwrap_or(name);

                digits
                    .parse()
                    .map_err(|_| CompileError::UnknownVariable(name.clone()))
            }
        }
    }

    fn string(&mut self, lit: &StrLit, index: usize) -> Result<(), CompileError> {
        let Some(capacity) = lit.target_len else {
            unreachable!("string argument {index} was not bound to a slot");
        };

        if !lit.value.is_ascii() {
            return Err(CompileError::NonAsciiString(index));
        }

        let length = lit.value.len();

        if length >= capacity {
            return Err(CompileError::StringTooLong {
                index,
                length,
                capacity,
            });
        }

        self.code.push_padded(lit.value.as_bytes(), capacity);

        Ok(())
    }

    fn expr(&mut self, expr: &Expr, index: usize) -> Result<(), CompileError> {
        let endian = self.endian;

        match expr {
            Expr::Int(value) => {
                let word = to_word(index, *value)?;
                self.code.push_i32(word, endian);
            }

            Expr::Hex(value) => self.code.push_u32(*value as u32, endian),
            Expr::Bool(value) => self.code.push_u32(*value as u32, endian),
            Expr::Str(lit) => self.string(lit, index)?,

            Expr::Enum(name) => {
                let value = self
                    .set
                    .enum_value(name)
                    .ok_or_else(|| CompileError::UnknownEnumValue(name.clone()))?;

                self.code.push_i32(value, endian);
            }

            Expr::Const(value) => {
                let word = to_word(index, *value)?;

                self.code.push_u32(OPERAND_TAG_CONST, endian);
                self.code.push_i32(word, endian);
            }

            Expr::Var(var) => {
                let word = self.variable(var, index)?;

                self.code.push_u32(OPERAND_TAG_VAR, endian);
                self.code.push_i32(word, endian);
            }
        }

        Ok(())
    }

    fn try_call(&mut self, call: &mut InstructionCall) -> Result<Option<String>, CompileError> {
        let validated = validate_call(call, self.set)?;

        self.code.push_i32(validated.opcode.0, self.endian);

        for (index, arg) in call.args.iter().enumerate() {
            self.expr(arg, index)?;
        }

        Ok(validated.jump_label)
    }

    fn call(&mut self, index: usize, call: &mut InstructionCall) {
        let start = self.code.len();

        match self.try_call(call) {
            Ok(label) => {
                trace!("{0} @ 0x{start:X}", call.name);

                if let Some(label) = label {
                    self.jump_table.push(JumpEntry::new(label, start as u32));
                }
            }

            Err(error) => {
                self.code.truncate(start);

                self.errors.push(InstructionError {
                    index,
                    name: call.name.clone(),
                    location: call.location,
                    error,
                });
            }
        }
    }
}

/// Validates and emits every call in source order.
///
/// Each failing instruction contributes one error; nothing is returned unless all succeed.
pub fn compile_script(
    calls: &mut [InstructionCall],
    set: &InstructionSet,
    endian: Endian,
) -> Result<Script, CompileErrors> {
    let mut emit = Emit::new(set, endian);

    for (index, call) in calls.iter_mut().enumerate() {
        emit.call(index, call);
    }

    if !emit.errors.is_empty() {
        Err(CompileErrors(emit.errors))
    } else {
        Ok(Script::new(emit.jump_table, emit.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::parse_string;

    const CONFIG: &str = r#"{
        "jumpTableEntries": ["state", "mark"],
        "variables": { "Timer": 12 },
        "enums": { "Direction": { "Left": 0, "Right": 1 } },
        "instructions": {
            "0": { "name": "state", "args": [ { "type": "c32BYTE" } ] },
            "1": { "name": "stateEnd" },
            "2": { "name": "add", "args": [ { "type": "cOperand" }, { "type": "cOperand" } ] },
            "3": { "name": "face", "args": [ { "type": "enum", "enumName": "Direction" } ] },
            "4": { "name": "sprite", "args": [ { "type": "c16BYTE" }, { "type": "s32" } ] },
            "5": { "name": "mask", "args": [ { "type": "u32" } ] },
            "6": { "name": "mark", "args": [ { "type": "s32" } ] }
        }
    }"#;

    fn compile(text: &str, endian: Endian) -> Result<Script, CompileErrors> {
        let set = InstructionSet::from_json(CONFIG).unwrap();
        let mut calls = parse_string(text).unwrap();

        compile_script(&mut calls, &set, endian)
    }

    #[test]
    fn test_emit_operands() {
        let script = compile("add(Timer, 5); add(Var(VAR_7), Const(-1));", Endian::Little).unwrap();

        assert_eq!(
            script.code,
            [
                [2, 0, 0, 0],
                [2, 0, 0, 0],
                [12, 0, 0, 0],
                [0, 0, 0, 0],
                [5, 0, 0, 0],
                [2, 0, 0, 0],
                [2, 0, 0, 0],
                [7, 0, 0, 0],
                [0, 0, 0, 0],
                [0xFF, 0xFF, 0xFF, 0xFF],
            ]
            .concat()
        );
    }

    #[test]
    fn test_emit_big_endian() {
        let script = compile("face(Right);", Endian::Big).unwrap();
        assert_eq!(script.code, [0, 0, 0, 3, 0, 0, 0, 1]);
    }

    #[test]
    fn test_jump_table_offsets() {
        let script = compile(
            "state(\"idle\"); stateEnd(); state(\"walk\"); stateEnd();",
            Endian::Little,
        )
        .unwrap();

        assert_eq!(
            script.jump_table,
            vec![
                JumpEntry::new("idle".to_string(), 0),
                JumpEntry::new("walk".to_string(), 40),
            ]
        );
        assert_eq!(script.code.len(), 80);
    }

    #[test]
    fn test_string_padding() {
        let script = compile("state(\"abcde\");", Endian::Little).unwrap();

        assert_eq!(script.code.len(), 4 + 32);
        assert_eq!(&script.code[4..9], b"abcde");
        assert_eq!(script.code[9..].iter().filter(|b| **b == 0).count(), 27);
    }

    #[test]
    fn test_collects_errors() {
        let errors = compile(
            "sprite(\"0123456789abcdef\", 1); face(Up); add(Nobody, 0); stateEnd(1); sprite(\"ok\", 3000000000);",
            Endian::Little,
        )
        .unwrap_err();

        let found: Vec<_> = errors.0.iter().map(|e| (e.index, e.error.clone())).collect();

        assert_eq!(
            found,
            vec![
                (
                    0,
                    CompileError::StringTooLong {
                        index: 0,
                        length: 16,
                        capacity: 16
                    }
                ),
                (1, CompileError::UnknownEnumValue("Up".to_string())),
                (2, CompileError::UnknownVariable("Nobody".to_string())),
                (
                    3,
                    CompileError::ArgumentCount {
                        expected: 0,
                        found: 1
                    }
                ),
                (
                    4,
                    CompileError::IntegerOutOfRange {
                        index: 1,
                        value: 3000000000
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_hex_truncated() {
        let script = compile("mask(0x1FFFFFFFF); mask(0x123456789);", Endian::Little).unwrap();

        assert_eq!(
            script.code,
            [
                [5, 0, 0, 0],
                [0xFF, 0xFF, 0xFF, 0xFF],
                [5, 0, 0, 0],
                [0x89, 0x67, 0x45, 0x23],
            ]
            .concat()
        );
    }

    #[test]
    fn test_non_ascii_strings() {
        /* the first is rejected while emitting, the second as a jump label */
        let errors = compile(
            "sprite(\"caf\u{e9}\", 1); state(\"\u{e9}t\u{e9}\");",
            Endian::Little,
        )
        .unwrap_err();

        let found: Vec<_> = errors.0.iter().map(|e| (e.index, e.error.clone())).collect();

        assert_eq!(
            found,
            vec![
                (0, CompileError::NonAsciiString(0)),
                (1, CompileError::NonAsciiString(0)),
            ]
        );
    }

    #[test]
    fn test_jump_label_must_be_string() {
        let errors = compile("stateEnd(); mark(3);", Endian::Little).unwrap_err();

        let found: Vec<_> = errors.0.iter().map(|e| (e.index, e.error.clone())).collect();

        assert_eq!(found, vec![(1, CompileError::MissingJumpLabel)]);
    }
}
