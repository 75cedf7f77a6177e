//! Per-declaration metadata contributed by each annotated element of the contract.

use crate::annotations::annotation_defs::MessageAnnotationDef;
use crate::annotations::selectors::derive_selector;
use crate::compiler_messages::compiler_errors::CompilerError;
use crate::metadata::abi::{
    CellLayout, ConstructorSpec, EventParamSpec, EventSpec, FieldLayout, MessageSpec, ParamSpec,
    TypeSpec,
};
use crate::metadata::type_registry::{TypeIndex, TypeRegistry};
use crate::program::declarations::{ClassDecl, FieldDecl, MethodDecl};
use crate::program::declared_types::DeclaredType;
use crate::program::locations::TextLocation;
use crate::return_compiler_error;
use crate::settings::DEFAULT_CONSTRUCTOR_NAME;

fn type_spec(
    registry: &mut TypeRegistry,
    declared: &DeclaredType,
    location: &TextLocation,
) -> Result<TypeSpec, CompilerError> {
    Ok(TypeSpec {
        ty: registry.resolve(declared, location)?,
        display_name: declared.display_name(),
    })
}

fn param_specs(
    registry: &mut TypeRegistry,
    method: &MethodDecl,
) -> Result<Vec<ParamSpec>, CompilerError> {
    let mut args = Vec::with_capacity(method.params.len());
    for param in &method.params {
        args.push(ParamSpec {
            label: param.name.to_owned(),
            ty: type_spec(registry, &param.ty, &method.location)?,
        });
    }
    Ok(args)
}

#[derive(Debug, Clone)]
pub struct ConstructorDef<'a> {
    pub method: &'a MethodDecl,
    pub payable: bool,
    pub docs: Vec<String>,
}

impl ConstructorDef<'_> {
    pub fn create_metadata(&self, registry: &mut TypeRegistry) -> Result<ConstructorSpec, CompilerError> {
        Ok(ConstructorSpec {
            label: self.method.name.to_owned(),
            selector: derive_selector(&self.method.name),
            payable: self.payable,
            args: param_specs(registry, self.method)?,
            docs: self.docs.to_owned(),
        })
    }
}

/// Appended when the contract doesn't declare a constructor of its own
pub fn create_default_constructor() -> ConstructorSpec {
    ConstructorSpec {
        label: String::from(DEFAULT_CONSTRUCTOR_NAME),
        selector: derive_selector(DEFAULT_CONSTRUCTOR_NAME),
        payable: false,
        args: Vec::new(),
        docs: Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct MessageFunctionDef<'a> {
    pub method: &'a MethodDecl,
    pub message: MessageAnnotationDef,
    pub docs: Vec<String>,
}

impl MessageFunctionDef<'_> {
    pub fn create_metadata(&self, registry: &mut TypeRegistry) -> Result<MessageSpec, CompilerError> {
        let selector = match &self.message.selector {
            Some(selector) => selector.to_owned(),
            None => derive_selector(&self.method.name),
        };

        let return_type = match &self.method.return_type {
            Some(declared) if !declared.is_void() => {
                Some(type_spec(registry, declared, &self.method.location)?)
            }
            _ => None,
        };

        Ok(MessageSpec {
            label: self.method.name.to_owned(),
            selector,
            mutates: self.message.mutates,
            payable: self.message.payable,
            args: param_specs(registry, self.method)?,
            return_type,
            docs: self.docs.to_owned(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct EventFieldDef<'a> {
    pub field: &'a FieldDecl,
    pub indexed: bool,
    pub docs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EventDef<'a> {
    pub class: &'a ClassDecl,
    pub fields: Vec<EventFieldDef<'a>>,
    pub docs: Vec<String>,
}

impl EventDef<'_> {
    pub fn create_metadata(&self, registry: &mut TypeRegistry) -> Result<EventSpec, CompilerError> {
        let mut args = Vec::with_capacity(self.fields.len());
        for event_field in &self.fields {
            args.push(EventParamSpec {
                label: event_field.field.name.to_owned(),
                indexed: event_field.indexed,
                ty: type_spec(registry, &event_field.field.ty, &event_field.field.location)?,
                docs: event_field.docs.to_owned(),
            });
        }

        Ok(EventSpec {
            label: self.class.name.to_owned(),
            args,
            docs: self.docs.to_owned(),
        })
    }
}

/// A persistent field of the contract state
#[derive(Debug, Clone)]
pub struct StorageFieldDef<'a> {
    pub field: &'a FieldDecl,
    pub lazy: bool,
    pub dynamic: bool,

    // Set when the field is `@spread`, holds the composite being expanded
    pub spread: Option<&'a ClassDecl>,
}

impl StorageFieldDef<'_> {
    /// One layout entry for a plain field, one per member for a spread composite.
    pub fn create_metadata(
        &self,
        selector: u32,
        registry: &mut TypeRegistry,
    ) -> Result<Vec<FieldLayout>, CompilerError> {
        if self.spread.is_none() {
            return Ok(vec![FieldLayout {
                name: self.field.name.to_owned(),
                selector,
                offset: None,
                cell: self.cell(registry.resolve(&self.field.ty, &self.field.location)?),
            }]);
        }

        // Member cells point at the types the composite entry already holds,
        // so overridden members match the type table
        let composite_index = registry.resolve(&self.field.ty, &self.field.location)?;
        let Some(members) = registry.composite_fields(composite_index) else {
            return_compiler_error!(
                "Spread field '{}' did not resolve to a composite entry",
                self.field.name
            )
        };

        let mut layouts = Vec::with_capacity(members.len());
        for (offset, member) in members.iter().enumerate() {
            // Positional members are named by their offset
            let member_name = match &member.name {
                Some(name) => name.to_owned(),
                None => offset.to_string(),
            };

            layouts.push(FieldLayout {
                name: format!("{}.{member_name}", self.field.name),
                selector,
                offset: Some(offset as u32),
                cell: self.cell(member.ty),
            });
        }

        Ok(layouts)
    }

    fn cell(&self, ty: TypeIndex) -> CellLayout {
        CellLayout {
            ty,
            lazy: self.lazy,
            dynamic: self.dynamic,
        }
    }
}
