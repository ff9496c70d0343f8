mod error;
mod indent;

use std::borrow::Cow;

pub use error::DecompileError;
use indent::Indenter;
use tracing::{debug, warn};

use crate::{
    bytecode::{
        decode_script, CodeReader, Endian, JUMP_ENTRY_SIZE, OPERAND_TAG_CONST, OPERAND_TAG_VAR,
    },
    compiler::is_identifier,
    ir::OpcodeId,
    pretty_print::PrettyStringLit,
    registry::{ArgType, Instruction, InstructionSet},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct DecompileOptions {
    pub endian: Endian,

    /// Render undefined opcodes as `Unknown<id>()` instead of failing.
    pub permissive: bool,
}

fn render_enum(
    set: &InstructionSet,
    instruction: &Instruction,
    group: &str,
    value: i32,
) -> Result<String, DecompileError> {
    let values = set
        .enum_group(group)
        .ok_or_else(|| DecompileError::UnknownEnumGroup(instruction.id, group.to_string()))?;

    /* the name has to read back as this very value */
    let name = InstructionSet::enum_name(values, value)
        .filter(|name| is_identifier(name) && set.enum_value(name) == Some(value));

    Ok(match name {
        Some(name) => name.to_string(),
        None => value.to_string(),
    })
}

fn render_operand(set: &InstructionSet, tag: u32, value: i32) -> String {
    if tag == OPERAND_TAG_CONST {
        return format!("Const({value})");
    }

    if tag != OPERAND_TAG_VAR {
        warn!("unexpected operand tag {tag}, read as a variable");
    }

    match set.variable_name(value).filter(|name| is_identifier(name)) {
        Some(name) => format!("Var({name})"),
        None => format!("Var({value})"),
    }
}

fn render_arg(
    reader: &mut CodeReader,
    set: &InstructionSet,
    instruction: &Instruction,
    ty: &ArgType,
) -> Result<String, DecompileError> {
    Ok(match ty {
        ArgType::Bool => {
            if reader.read_i32()? > 0 {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }

        ArgType::Signed(_) => reader.read_i32()?.to_string(),
        ArgType::Unsigned(_) => format!("0x{0:X}", reader.read_u32()?),

        ArgType::Enum(group) => {
            let value = reader.read_i32()?;
            render_enum(set, instruction, group, value)?
        }

        ArgType::FixedString(len) => PrettyStringLit::new(reader.read_bytes(*len)?).to_string(),

        ArgType::Operand => {
            let tag = reader.read_u32()?;
            let value = reader.read_i32()?;

            render_operand(set, tag, value)
        }
    })
}

/// Reconstructs script source from a compiled binary, one instruction per line.
pub fn decompile_script(
    data: &[u8],
    set: &InstructionSet,
    options: &DecompileOptions,
) -> Result<String, DecompileError> {
    let mut reader = CodeReader::new(data, options.endian);

    let count = reader.read_u32()? as usize;
    reader.skip(count.saturating_mul(JUMP_ENTRY_SIZE))?;

    let mut indenter = Indenter::default();
    let mut text = String::new();
    let mut instruction_count = 0;

    while !reader.is_at_end() {
        let start = reader.offset();
        let id = OpcodeId(reader.read_i32()?);

        let instruction = match set.instruction(id) {
            Some(instruction) => Cow::Borrowed(instruction),

            None if options.permissive => {
                warn!("undefined opcode {id} at offset 0x{start:X}");
                Cow::Owned(Instruction::unknown(id))
            }

            None => return Err(DecompileError::UnknownOpcode(id, start)),
        };

        let name = instruction.display_name();
        let mut args = Vec::with_capacity(instruction.args.len());

        for spec in &instruction.args {
            match render_arg(&mut reader, set, &instruction, &spec.ty) {
                Ok(arg) => args.push(arg),
                Err(DecompileError::DecodeError(err)) => {
                    return Err(DecompileError::TruncatedInstruction(name, start, err))
                }
                Err(err) => return Err(err),
            }
        }

        let depth = indenter.before(instruction.indent);

        text.push_str(&"\t".repeat(depth));
        text.push_str(&format!("{name}({0});\n", args.join(", ")));

        if indenter.after(instruction.indent) {
            text.push('\n');
        }

        instruction_count += 1;
    }

    debug!("decompiled {instruction_count} instructions");

    Ok(text)
}

/// Lists the jump table as `name<TAB>0xOFFSET` lines.
pub fn list_labels(data: &[u8], endian: Endian) -> Result<String, DecompileError> {
    let script = decode_script(data, endian)?;

    let mut text = String::new();

    for entry in &script.jump_table {
        if entry.offset as usize >= script.code.len() {
            warn!(
                "label '{0}' points at 0x{1:X}, past the end of the code (0x{2:X} bytes)",
                entry.name,
                entry.offset,
                script.code.len()
            );
        }

        text.push_str(&format!("{0}\t0x{1:X}\n", entry.name, entry.offset));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::DecodeError;

    const CONFIG: &str = r#"{
        "jumpTableEntries": ["state"],
        "variables": { "Timer": 12, "bad name": 13 },
        "enums": {
            "Direction": { "Left": 0, "Right": 1, "true": 2 },
            "Side": { "Right": 5, "Back": 6 }
        },
        "instructions": {
            "0": { "name": "state", "indent": "scopeBegin", "args": [ { "type": "c16BYTE" } ] },
            "1": { "name": "stateEnd", "indent": "scopeEnd" },
            "2": { "name": "if", "indent": "begin", "args": [ { "type": "cOperand" } ] },
            "3": { "name": "endIf", "indent": "end" },
            "4": { "name": "flags", "args": [ { "type": "bool" }, { "type": "s32" }, { "type": "u32" } ] },
            "5": { "name": "side", "args": [ { "type": "enum", "enumName": "Side" } ] },
            "6": { "name": "face", "args": [ { "type": "enum", "enumName": "Direction" } ] },
            "7": { "name": "broken", "args": [ { "type": "enum", "enumName": "Missing" } ] },
            "8": { "args": [ { "type": "s32" } ] },
            "9": { "name": "set", "args": [ { "type": "cOperand" } ] }
        }
    }"#;

    fn words(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn decompile(code: &[u8], permissive: bool) -> Result<String, DecompileError> {
        let set = InstructionSet::from_json(CONFIG).unwrap();

        let mut data = words(&[0]);
        data.extend_from_slice(code);

        let options = DecompileOptions {
            endian: Endian::Little,
            permissive,
        };

        decompile_script(&data, &set, &options)
    }

    #[test]
    fn test_indented_blocks() {
        let mut code = words(&[0]);
        code.extend_from_slice(b"idle\0\0\0\0\0\0\0\0\0\0\0\0");
        code.extend(words(&[2, 2, 12, 4, 1, -3, 255, 3, 1]));

        assert_eq!(
            decompile(&code, false).unwrap(),
            "state(\"idle\");\n\tif(Var(Timer));\n\t\tflags(true, -3, 0xFF);\n\tendIf();\nstateEnd();\n\n"
        );
    }

    #[test]
    fn test_recompile_safe_names() {
        let code = words(&[
            5, 5, // Right in Side, but Direction wins on lookup
            5, 6, // Back
            6, 2, // not an identifier
            6, 9, // no name
            9, 2, 13, // variable name with a space
            9, 0, 7, // constant
            8, 4, // configured without a name
        ]);

        assert_eq!(
            decompile(&code, false).unwrap(),
            "side(5);\nside(Back);\nface(2);\nface(9);\nset(Var(13));\nset(Const(7));\nUnknown8(4);\n"
        );
    }

    #[test]
    fn test_unknown_opcode() {
        let code = words(&[99, 1]);

        assert_eq!(
            decompile(&code, false),
            Err(DecompileError::UnknownOpcode(OpcodeId(99), 4))
        );

        assert_eq!(
            decompile(&code, true).unwrap(),
            "Unknown99();\nstateEnd();\n\n"
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            decompile(&words(&[7, 0]), false),
            Err(DecompileError::UnknownEnumGroup(OpcodeId(7), "Missing".to_string()))
        );

        assert_eq!(
            decompile(&words(&[4, 1]), false),
            Err(DecompileError::TruncatedInstruction(
                "flags".to_string(),
                4,
                DecodeError::Truncated {
                    offset: 12,
                    needed: 4,
                    available: 0
                }
            ))
        );

        /* header claims more records than there are bytes */
        let set = InstructionSet::from_json(CONFIG).unwrap();
        assert!(matches!(
            decompile_script(&words(&[3, 0]), &set, &DecompileOptions::default()),
            Err(DecompileError::DecodeError(_))
        ));
    }

    #[test]
    fn test_list_labels() {
        let mut data = words(&[1]);
        data.extend_from_slice(b"walk");
        data.extend_from_slice(&[0; 28]);
        data.extend(words(&[4, 1, 1]));

        assert_eq!(list_labels(&data, Endian::Little).unwrap(), "walk\t0x4\n");
    }
}
