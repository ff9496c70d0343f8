//! Raw JSON configuration, as written by hand or exported by other tools.
//!
//! Nothing here is validated beyond what serde enforces. See
//! [`crate::registry::InstructionSet`] for the checked, indexed form.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub jump_table_entries: Option<Vec<String>>,

    #[serde(default)]
    pub variables: Option<IndexMap<String, i32>>,

    /// Enum groups, in declaration order. A `null` group is treated as empty.
    #[serde(default)]
    pub enums: Option<IndexMap<String, Option<IndexMap<String, i32>>>>,

    #[serde(default)]
    pub instructions: Option<BTreeMap<i32, InstructionDef>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionDef {
    #[serde(default)]
    pub name: Option<String>,

    /// Total encoded size in bytes, opcode included. Informational only.
    #[serde(default)]
    pub size: Option<u32>,

    #[serde(default)]
    pub indent: IndentDef,

    #[serde(default)]
    pub args: Option<Vec<ArgDef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgDef {
    #[serde(rename = "type")]
    pub ty: ArgTypeDef,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub enum_name: Option<String>,
}

/// Argument type spelling, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ArgTypeDef {
    Bool,
    S8,
    S16,
    S32,
    U8,
    U16,
    U32,
    Enum,
    C16Byte,
    C32Byte,
    C64Byte,
    C128Byte,
    C256Byte,
    COperand,
}

impl TryFrom<String> for ArgTypeDef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(match value.to_ascii_lowercase().as_str() {
            "bool" => Self::Bool,
            "s8" => Self::S8,
            "s16" => Self::S16,
            "s32" => Self::S32,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "enum" => Self::Enum,
            "c16byte" => Self::C16Byte,
            "c32byte" => Self::C32Byte,
            "c64byte" => Self::C64Byte,
            "c128byte" => Self::C128Byte,
            "c256byte" => Self::C256Byte,
            "coperand" => Self::COperand,
            _ => return Err(format!("unknown argument type `{value}`")),
        })
    }
}

/// Indent role spelling, matched case-insensitively.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum IndentDef {
    #[default]
    None,
    Begin,
    End,
    ScopeBegin,
    ScopeEnd,
    Cell,
    CellEnd,
}

impl TryFrom<String> for IndentDef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(match value.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "begin" => Self::Begin,
            "end" => Self::End,
            "scopebegin" => Self::ScopeBegin,
            "scopeend" => Self::ScopeEnd,
            "cell" => Self::Cell,
            "cellend" => Self::CellEnd,
            _ => return Err(format!("unknown indent `{value}`")),
        })
    }
}

impl Config {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
