// ============================================================
// ABI Type Table
// ============================================================
//
// Every value type reachable from the contract's public surface gets
// exactly one entry, keyed by its canonical type key.
// Entries only ever reference each other by TypeIndex.
//
// Index order is discovery order and is part of the published ABI.
//
// ============================================================

use crate::compiler_messages::compiler_errors::CompilerError;
use crate::program::declarations::{ClassDecl, SourceProgram};
use crate::program::declared_types::{DeclaredType, TypeKind, abi_primitive_name};
use crate::program::locations::TextLocation;
use crate::settings::{
    Config, MAP_KEY_FIELD_NAME, MAP_VALUE_FIELD_NAME, TYPE_TABLE_CAPACITY,
};
use crate::{return_compiler_error, return_type_error, types_log};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Position of an entry in the type table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeIndex(pub u32);

impl TypeIndex {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    // Positional members have no name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub ty: TypeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTableEntry {
    Primitive(String),

    /// Structs, and maps as a `key_index`/`value` pair
    Composite { fields: Vec<Field> },

    /// Exactly `len` elements
    Array {
        len: u32,
        #[serde(rename = "type")]
        element: TypeIndex,
    },

    /// Any number of elements
    Sequence {
        #[serde(rename = "type")]
        element: TypeIndex,
    },
}

/// One row of the published type table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub id: TypeIndex,
    pub def: TypeTableEntry,
}

/// Arena of type table entries for a single generation run.
///
/// A slot is reserved as soon as a type is discovered and filled once its
/// members are resolved, so parents come before the types they introduce
/// and self-referencing composites terminate.
#[derive(Debug)]
pub struct TypeRegistry<'a> {
    declarations: FxHashMap<&'a str, &'a ClassDecl>,
    config: &'a Config,
    entries: Vec<Option<TypeTableEntry>>,
    index_by_key: FxHashMap<String, TypeIndex>,
}

impl<'a> TypeRegistry<'a> {
    pub fn new(program: &'a SourceProgram, config: &'a Config) -> Self {
        let declarations = program
            .classes
            .iter()
            .map(|class| (class.name.as_str(), class))
            .collect();

        Self {
            declarations,
            config,
            entries: Vec::with_capacity(TYPE_TABLE_CAPACITY),
            index_by_key: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `None` while the entry is still being resolved or if the index is out of range
    pub fn entry(&self, index: TypeIndex) -> Option<&TypeTableEntry> {
        self.entries.get(index.as_usize()).and_then(Option::as_ref)
    }

    /// Members of a resolved composite, with the well-known override already applied
    pub fn composite_fields(&self, index: TypeIndex) -> Option<&[Field]> {
        match self.entry(index) {
            Some(TypeTableEntry::Composite { fields }) => Some(fields),
            _ => None,
        }
    }

    pub fn index_of(&self, declared: &DeclaredType) -> Option<TypeIndex> {
        self.index_by_key.get(&declared.type_key()).copied()
    }

    pub fn composite_declaration(&self, name: &str) -> Option<&'a ClassDecl> {
        self.declarations.get(name).copied()
    }

    /// Returns the index of `declared`, registering it and everything it references when new.
    /// Resolving the same type key again always returns the same index.
    pub fn resolve(
        &mut self,
        declared: &DeclaredType,
        location: &TextLocation,
    ) -> Result<TypeIndex, CompilerError> {
        let key = declared.type_key();
        if let Some(&index) = self.index_by_key.get(&key) {
            return Ok(index);
        }

        match declared.kind {
            TypeKind::Primitive => {
                let Some(abi_name) = abi_primitive_name(&declared.name) else {
                    return_type_error!(
                        format!("'{}' is not a primitive type the ABI can describe", declared.name),
                        location.to_owned(),
                        { TypeKey => key }
                    )
                };

                let index = self.reserve(key);
                self.fill(index, TypeTableEntry::Primitive(abi_name.to_owned()));
                Ok(index)
            }

            TypeKind::UserComposite => self.resolve_composite(declared, key, location),

            TypeKind::Array => {
                let element = expect_arguments(declared, 1, &key, location)?;
                let index = self.reserve(key);
                let element = self.resolve(&element[0], location)?;

                let entry = if declared.capacity > 0 {
                    TypeTableEntry::Array {
                        len: declared.capacity,
                        element,
                    }
                } else {
                    TypeTableEntry::Sequence { element }
                };

                self.fill(index, entry);
                Ok(index)
            }

            // The wire format has no map primitive, so a map is described by its entry type
            TypeKind::Map => {
                let arguments = expect_arguments(declared, 2, &key, location)?;
                let index = self.reserve(key);
                let key_index = self.resolve(&arguments[0], location)?;
                let value_index = self.resolve(&arguments[1], location)?;

                self.fill(
                    index,
                    TypeTableEntry::Composite {
                        fields: vec![
                            Field {
                                name: Some(String::from(MAP_KEY_FIELD_NAME)),
                                ty: key_index,
                            },
                            Field {
                                name: Some(String::from(MAP_VALUE_FIELD_NAME)),
                                ty: value_index,
                            },
                        ],
                    },
                );
                Ok(index)
            }
        }
    }

    fn resolve_composite(
        &mut self,
        declared: &DeclaredType,
        key: String,
        location: &TextLocation,
    ) -> Result<TypeIndex, CompilerError> {
        let Some(class) = self.composite_declaration(&declared.name) else {
            return_type_error!(
                format!("Can't find a declaration for the type '{}'", declared.name),
                location.to_owned(),
                { TypeKey => key }
            )
        };

        let config = self.config;
        let well_known = config.well_known_composite(&class.name);

        let index = self.reserve(key);
        let mut fields = Vec::with_capacity(class.fields.len());

        for member in &class.fields {
            let member_type = match well_known {
                Some(composite) if member.ty.kind == TypeKind::Array => {
                    let mut fixed = member.ty.to_owned();
                    fixed.capacity = composite.array_capacity;
                    Cow::Owned(fixed)
                }
                _ => Cow::Borrowed(&member.ty),
            };

            let ty = self.resolve(&member_type, &member.location)?;
            let name = match well_known {
                Some(composite) if composite.positional => None,
                _ => Some(member.name.to_owned()),
            };

            fields.push(Field { name, ty });
        }

        self.fill(index, TypeTableEntry::Composite { fields });
        Ok(index)
    }

    fn reserve(&mut self, key: String) -> TypeIndex {
        let index = TypeIndex(self.entries.len() as u32);
        types_log!(format!("Type {} => {key}", index.0));

        self.entries.push(None);
        self.index_by_key.insert(key, index);
        index
    }

    fn fill(&mut self, index: TypeIndex, entry: TypeTableEntry) {
        self.entries[index.as_usize()] = Some(entry);
    }

    /// Freezes the registry into the published type table
    pub fn seal(self) -> Result<Vec<TypeEntry>, CompilerError> {
        let mut table = Vec::with_capacity(self.entries.len());

        for (position, entry) in self.entries.into_iter().enumerate() {
            let Some(def) = entry else {
                return_compiler_error!(
                    "Type table slot {} was reserved but never filled",
                    position
                )
            };

            table.push(TypeEntry {
                id: TypeIndex(position as u32),
                def,
            });
        }

        Ok(table)
    }
}

fn expect_arguments<'t>(
    declared: &'t DeclaredType,
    expected: usize,
    key: &str,
    location: &TextLocation,
) -> Result<&'t [DeclaredType], CompilerError> {
    if declared.arguments.len() != expected {
        return_type_error!(
            format!(
                "'{}' should have {expected} type argument(s), found {}",
                declared.name,
                declared.arguments.len()
            ),
            location.to_owned(),
            { TypeKey => key }
        )
    }

    Ok(&declared.arguments)
}
