//! The Interface Description emitted for downstream packaging.
//!
//! This is a plain snapshot: every cross reference between types is a
//! `TypeIndex` into `types`, so it serialises and deserialises without fixups.

use crate::compiler_messages::compiler_errors::CompilerError;
use crate::metadata::type_registry::{TypeEntry, TypeIndex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescription {
    pub contract: ContractInfo,
    pub spec: ContractSpec,
    pub types: Vec<TypeEntry>,
    pub storage: StorageLayout,
}

impl InterfaceDescription {
    pub fn to_json(&self) -> Result<String, CompilerError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CompilerError::compiler_error(format!("Failed to serialise the interface description: {e}"))
        })
    }

    pub fn from_json(source: &str) -> Result<Self, CompilerError> {
        serde_json::from_str(source).map_err(|e| {
            CompilerError::compiler_error(format!("Not a valid interface description: {e}"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub language: String,
    pub compiler: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub name: String,
    pub version: String,
    pub source: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSpec {
    pub constructors: Vec<ConstructorSpec>,
    pub messages: Vec<MessageSpec>,
    pub events: Vec<EventSpec>,
    pub docs: Vec<String>,
}

/// A reference into the type table plus the name the source used for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpec {
    #[serde(rename = "type")]
    pub ty: TypeIndex,
    pub display_name: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub label: String,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorSpec {
    pub label: String,
    pub selector: String,
    pub payable: bool,
    pub args: Vec<ParamSpec>,
    pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSpec {
    pub label: String,
    pub selector: String,
    pub mutates: bool,
    pub payable: bool,
    pub args: Vec<ParamSpec>,
    pub return_type: Option<TypeSpec>,
    pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpec {
    pub label: String,
    pub args: Vec<EventParamSpec>,
    pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParamSpec {
    pub label: String,
    pub indexed: bool,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageLayout {
    pub fields: Vec<FieldLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    pub name: String,

    // 1-based position of the persistent field this entry belongs to
    pub selector: u32,

    // Member position inside a spread composite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    pub cell: CellLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLayout {
    #[serde(rename = "type")]
    pub ty: TypeIndex,
    pub lazy: bool,
    pub dynamic: bool,
}
