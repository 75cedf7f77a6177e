//! The declaration tree handed over by the host program analysis.
//!
//! Everything here is produced by the host parser and type checker
//! and is read-only for the rest of the generator.

use crate::compiler_messages::compiler_errors::{CompilerError, ErrorType};
use crate::program::declared_types::DeclaredType;
use crate::program::locations::TextLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationOrigin {
    // Written by the contract author and subject to the contract annotation rules
    #[default]
    Custom,

    // Built into the host language (inline, global, operator...)
    Native,
}

/// One argument expression of an annotation, as the host parser saw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationArg {
    /// A `key: value` shaped expression
    Pair { key: String, value: String },

    /// Any other expression, kept as its source text
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,

    #[serde(default)]
    pub args: Vec<AnnotationArg>,

    #[serde(default)]
    pub origin: AnnotationOrigin,

    #[serde(default)]
    pub location: TextLocation,
}

impl Annotation {
    pub fn new(name: &str, args: Vec<AnnotationArg>, location: TextLocation) -> Self {
        Self {
            name: name.to_owned(),
            args,
            origin: AnnotationOrigin::Custom,
            location,
        }
    }

    pub fn native(name: &str, location: TextLocation) -> Self {
        Self {
            name: name.to_owned(),
            args: Vec::new(),
            origin: AnnotationOrigin::Native,
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub ty: DeclaredType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: DeclaredType,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,

    #[serde(default)]
    pub params: Vec<ParamDecl>,

    #[serde(default)]
    pub return_type: Option<DeclaredType>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub location: TextLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub fields: Vec<FieldDecl>,

    #[serde(default)]
    pub methods: Vec<MethodDecl>,

    #[serde(default)]
    pub location: TextLocation,
}

/// Every class declared by the program, in source order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceProgram {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

impl SourceProgram {
    pub fn from_json(source: &str) -> Result<SourceProgram, CompilerError> {
        serde_json::from_str(source).map_err(|e| {
            CompilerError::new(
                format!("Program description is not valid: {e}"),
                TextLocation::new_just_line(e.line() as i32),
                ErrorType::File,
            )
        })
    }

    pub fn find_class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.iter().find(|class| class.name == name)
    }
}
