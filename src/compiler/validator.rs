use std::{borrow::Cow, mem};

use crate::{
    ast::{Expr, InstructionCall, VarRef},
    ir::{IntValue, OpcodeId},
    registry::{ArgType, Instruction, InstructionSet, UNKNOWN_PREFIX},
};

use super::error::CompileError;

/// Longest label a jump-table record can hold (the 32-byte slot keeps a NUL).
pub const MAX_JUMP_LABEL_LEN: usize = 31;

#[derive(Debug, PartialEq, Eq)]
pub struct Validated {
    pub opcode: OpcodeId,

    /// Set when the instruction is recorded in the jump table.
    pub jump_label: Option<String>,
}

fn resolve<'a>(name: &str, set: &'a InstructionSet) -> Option<Cow<'a, Instruction>> {
    if let Some(instruction) = set.instruction_by_name(name) {
        return Some(Cow::Borrowed(instruction));
    }

    let id = OpcodeId(name.strip_prefix(UNKNOWN_PREFIX)?.parse().ok()?);

    Some(match set.instruction(id) {
        Some(instruction) => Cow::Borrowed(instruction),
        None => Cow::Owned(Instruction::unknown(id)),
    })
}

fn check_arg(index: usize, expr: &mut Expr, ty: &ArgType) -> Result<(), CompileError> {
    match (ty, &mut *expr) {
        (ArgType::Bool, Expr::Bool(_)) => {}
        (ArgType::Signed(_), Expr::Int(_)) => {}
        (ArgType::Unsigned(_), Expr::Hex(_)) => {}
        (ArgType::Enum(_), Expr::Enum(_) | Expr::Int(_)) => {}

        (ArgType::FixedString(len), Expr::Str(lit)) => lit.target_len = Some(*len),

        (ArgType::Operand, Expr::Const(_) | Expr::Var(_)) => {}
        (ArgType::Operand, Expr::Int(value)) => *expr = Expr::Const(*value),
        (ArgType::Operand, Expr::Hex(value)) => *expr = Expr::Const(*value as u32 as i32 as IntValue),
        (ArgType::Operand, Expr::Enum(name)) => {
            *expr = Expr::Var(VarRef::Named(mem::take(name)));
        }

        _ => {
            return Err(CompileError::ArgumentKind {
                index,
                expected: ty.describe(),
                found: expr.kind(),
            })
        }
    }

    Ok(())
}

fn jump_label(call: &InstructionCall) -> Result<String, CompileError> {
    match call.args.first() {
        Some(Expr::Str(lit)) => {
            if !lit.value.is_ascii() {
                Err(CompileError::NonAsciiString(0))
            } else if lit.value.len() > MAX_JUMP_LABEL_LEN {
                Err(CompileError::JumpLabelTooLong(lit.value.clone()))
            } else {
                Ok(lit.value.clone())
            }
        }

        _ => Err(CompileError::MissingJumpLabel),
    }
}

/// Resolves the instruction of `call` and checks its arguments against the declared types.
///
/// Arguments are rewritten in place: operand slots receive `Const`/`Var` nodes and string
/// literals learn the size of their slot.
pub fn validate_call(
    call: &mut InstructionCall,
    set: &InstructionSet,
) -> Result<Validated, CompileError> {
    let instruction =
        resolve(&call.name, set).ok_or_else(|| CompileError::UnknownInstruction(call.name.clone()))?;

    if matches!(call.args.as_slice(), [Expr::Enum(name)] if name.is_empty()) {
        call.args.clear();
    }

    if call.args.len() != instruction.args.len() {
        return Err(CompileError::ArgumentCount {
            expected: instruction.args.len(),
            found: call.args.len(),
        });
    }

    for (index, (expr, spec)) in call.args.iter_mut().zip(&instruction.args).enumerate() {
        check_arg(index, expr, &spec.ty)?;
    }

    let is_jump_entry = instruction
        .name
        .as_deref()
        .map_or(false, |name| set.is_jump_table_entry(name));

    let jump_label = if is_jump_entry {
        Some(jump_label(call)?)
    } else {
        None
    };

    Ok(Validated {
        opcode: instruction.id,
        jump_label,
    })
}
