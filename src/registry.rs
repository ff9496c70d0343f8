use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs, io,
    path::Path,
};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    compiler::is_identifier,
    config::{ArgTypeDef, Config, IndentDef},
    ir::OpcodeId,
};

/// Size of every opcode and of every integer-like argument on the wire.
pub const WORD_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    IoError(#[from] io::Error),

    #[error("Malformed configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Duplicate instruction name '{0}' (opcodes {1} and {2})")]
    DuplicateName(String, OpcodeId, OpcodeId),

    #[error("Argument {1} of opcode {0} is an enum but names no enum group")]
    MissingEnumName(OpcodeId, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W8,
    W16,
    W32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    Bool,
    Signed(IntWidth),
    Unsigned(IntWidth),
    /// Bound to the named enum group, used when rendering.
    Enum(String),
    /// Fixed-size NUL-padded string slot.
    FixedString(usize),
    /// Tagged constant-or-variable operand.
    Operand,
}

impl ArgType {
    /// Number of bytes this argument occupies in the instruction stream.
    pub fn encoded_size(&self) -> usize {
        match self {
            ArgType::Bool | ArgType::Signed(_) | ArgType::Unsigned(_) | ArgType::Enum(_) => {
                WORD_SIZE
            }
            ArgType::FixedString(len) => *len,
            ArgType::Operand => 2 * WORD_SIZE,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ArgType::Bool => "a boolean",
            ArgType::Signed(_) => "an integer",
            ArgType::Unsigned(_) => "a hexadecimal number",
            ArgType::Enum(_) => "an enum value or an integer",
            ArgType::FixedString(_) => "a string",
            ArgType::Operand => "a constant or a variable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    pub ty: ArgType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentRole {
    #[default]
    None,
    Begin,
    End,
    ScopeBegin,
    ScopeEnd,
    Cell,
    CellEnd,
}

impl From<IndentDef> for IndentRole {
    fn from(value: IndentDef) -> Self {
        match value {
            IndentDef::None => Self::None,
            IndentDef::Begin => Self::Begin,
            IndentDef::End => Self::End,
            IndentDef::ScopeBegin => Self::ScopeBegin,
            IndentDef::ScopeEnd => Self::ScopeEnd,
            IndentDef::Cell => Self::Cell,
            IndentDef::CellEnd => Self::CellEnd,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub id: OpcodeId,
    pub name: Option<String>,
    pub args: Vec<ArgSpec>,
    pub indent: IndentRole,
}

impl Instruction {
    /// An instruction the configuration knows nothing about.
    pub fn unknown(id: OpcodeId) -> Self {
        Self {
            id,
            name: None,
            args: Vec::new(),
            indent: IndentRole::None,
        }
    }

    pub fn encoded_size(&self) -> usize {
        WORD_SIZE + self.args.iter().map(|a| a.ty.encoded_size()).sum::<usize>()
    }

    /// Name as written in scripts.
    ///
    /// `Unknown<id>` when the configuration has no name, or one that would not
    /// read back as a single identifier.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().filter(|name| is_identifier(name)) {
            Some(name) => name.to_string(),
            None => format!("{UNKNOWN_PREFIX}{0}", self.id),
        }
    }
}

/// Escape spelling for instructions without a configured name.
pub const UNKNOWN_PREFIX: &str = "Unknown";

/// The instruction set and symbol tables for one game/version.
///
/// Built once from a [`Config`] and only read afterwards.
#[derive(Debug, Default)]
pub struct InstructionSet {
    instructions: BTreeMap<OpcodeId, Instruction>,
    by_name: HashMap<String, OpcodeId>,
    variables: IndexMap<String, i32>,
    variable_names: HashMap<i32, String>,
    enums: IndexMap<String, IndexMap<String, i32>>,
    jump_table_entries: HashSet<String>,
}

fn arg_type(
    def: ArgTypeDef,
    enum_name: Option<String>,
    id: OpcodeId,
    index: usize,
) -> Result<ArgType, ConfigError> {
    Ok(match def {
        ArgTypeDef::Bool => ArgType::Bool,
        ArgTypeDef::S8 => ArgType::Signed(IntWidth::W8),
        ArgTypeDef::S16 => ArgType::Signed(IntWidth::W16),
        ArgTypeDef::S32 => ArgType::Signed(IntWidth::W32),
        ArgTypeDef::U8 => ArgType::Unsigned(IntWidth::W8),
        ArgTypeDef::U16 => ArgType::Unsigned(IntWidth::W16),
        ArgTypeDef::U32 => ArgType::Unsigned(IntWidth::W32),
        ArgTypeDef::Enum => match enum_name {
            Some(group) => ArgType::Enum(group),
            None => return Err(ConfigError::MissingEnumName(id, index)),
        },
        ArgTypeDef::C16Byte => ArgType::FixedString(16),
        ArgTypeDef::C32Byte => ArgType::FixedString(32),
        ArgTypeDef::C64Byte => ArgType::FixedString(64),
        ArgTypeDef::C128Byte => ArgType::FixedString(128),
        ArgTypeDef::C256Byte => ArgType::FixedString(256),
        ArgTypeDef::COperand => ArgType::Operand,
    })
}

impl InstructionSet {
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let mut instructions = BTreeMap::new();
        let mut by_name: HashMap<String, OpcodeId> = HashMap::new();

        for (raw_id, def) in config.instructions.unwrap_or_default() {
            let id = OpcodeId(raw_id);

            let mut args = Vec::new();

            for (i, arg) in def.args.unwrap_or_default().into_iter().enumerate() {
                let ty = arg_type(arg.ty, arg.enum_name, id, i)?;
                args.push(ArgSpec { ty });
            }

            let instruction = Instruction {
                id,
                name: def.name,
                args,
                indent: def.indent.into(),
            };

            if let Some(size) = def.size {
                let expected = instruction.encoded_size();

                if size as usize != expected {
                    warn!(
                        "opcode {id} ({0}) declares size {size} but its arguments encode to {expected} bytes",
                        instruction.display_name()
                    );
                }
            }

            if let Some(name) = &instruction.name {
                if let Some(previous) = by_name.insert(name.clone(), id) {
                    return Err(ConfigError::DuplicateName(name.clone(), previous, id));
                }
            }

            instructions.insert(id, instruction);
        }

        let variables = config.variables.unwrap_or_default();
        let mut variable_names = HashMap::new();

        for (name, value) in &variables {
            /* first declared name wins the reverse lookup */
            variable_names.entry(*value).or_insert_with(|| name.clone());
        }

        let enums: IndexMap<_, _> = config
            .enums
            .unwrap_or_default()
            .into_iter()
            .map(|(group, values)| (group, values.unwrap_or_default()))
            .collect();

        let jump_table_entries = config
            .jump_table_entries
            .unwrap_or_default()
            .into_iter()
            .collect();

        debug!(
            "loaded {0} instructions, {1} variables, {2} enum groups",
            instructions.len(),
            variables.len(),
            enums.len()
        );

        Ok(Self {
            instructions,
            by_name,
            variables,
            variable_names,
            enums,
            jump_table_entries,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::from_config(Config::from_json(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn instruction(&self, id: OpcodeId) -> Option<&Instruction> {
        self.instructions.get(&id)
    }

    pub fn instruction_by_name(&self, name: &str) -> Option<&Instruction> {
        self.by_name.get(name).and_then(|id| self.instructions.get(id))
    }

    pub fn is_jump_table_entry(&self, name: &str) -> bool {
        self.jump_table_entries.contains(name)
    }

    pub fn variable(&self, name: &str) -> Option<i32> {
        self.variables.get(name).copied()
    }

    pub fn variable_name(&self, value: i32) -> Option<&str> {
        self.variable_names.get(&value).map(String::as_str)
    }

    /// Resolves an enum value name against every group, in declaration order.
    pub fn enum_value(&self, name: &str) -> Option<i32> {
        self.enums.values().find_map(|group| group.get(name).copied())
    }

    /// `None` when the group itself is not configured.
    pub fn enum_group(&self, group: &str) -> Option<&IndexMap<String, i32>> {
        self.enums.get(group)
    }

    /// First name in `group` that maps to `value`.
    pub fn enum_name<'a>(group: &'a IndexMap<String, i32>, value: i32) -> Option<&'a str> {
        group.iter().find(|(_, v)| **v == value).map(|(k, _)| k.as_str())
    }
}
