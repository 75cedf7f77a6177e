//! Walks the program's classes and pulls out everything the ABI is built from.
//!
//! Every custom annotation in the program is classified and validated here,
//! even on declarations that end up ignored, so a typo anywhere in the
//! program is reported. Annotations that are valid but have no meaning
//! where they were placed only produce a warning.

use crate::annotations::annotation_defs::{
    AnnotationDef, GenericAnnotationDef, MESSAGE_PAYABLE_KEY, MessageAnnotationDef,
    StateAnnotationDef, get_annotation_def,
};
use crate::annotations::annotation_args::to_pairs;
use crate::annotations::annotation_kind::{AnnotationKind, get_annotation_kind};
use crate::compiler_messages::compiler_errors::{CompilerError, CompilerMessages};
use crate::compiler_messages::compiler_warnings::{CompilerWarning, WarningKind};
use crate::contract::element_defs::{
    ConstructorDef, EventDef, EventFieldDef, MessageFunctionDef, StorageFieldDef,
};
use crate::program::declarations::{
    Annotation, AnnotationOrigin, ClassDecl, FieldDecl, MethodDecl, SourceProgram,
};
use crate::program::declared_types::{DeclaredType, TypeKind};
use crate::program::locations::TextLocation;
use crate::settings::EXPORTED_TYPES_CAPACITY;
use crate::{annotation_log, return_annotation_error, return_rule_error, return_type_error};

/// A type that appears on the contract's public surface
#[derive(Debug, Clone, Copy)]
pub struct ExportedType<'a> {
    pub ty: &'a DeclaredType,
    pub location: &'a TextLocation,
}

#[derive(Debug, Clone)]
pub struct ContractDef<'a> {
    pub class: &'a ClassDecl,
    pub name: String,
    pub docs: Vec<String>,
    pub constructors: Vec<ConstructorDef<'a>>,
    pub messages: Vec<MessageFunctionDef<'a>>,
    pub storage_fields: Vec<StorageFieldDef<'a>>,

    // Constructors and messages together, in declaration order
    pub callable_methods: Vec<&'a MethodDecl>,
}

#[derive(Debug)]
pub struct ContractProgram<'a> {
    pub program: &'a SourceProgram,
    pub contract: ContractDef<'a>,
    pub events: Vec<EventDef<'a>>,

    // In discovery order, which becomes the order of the type table
    pub exported_types: Vec<ExportedType<'a>>,
    pub warnings: Vec<CompilerWarning>,
}

impl<'a> ContractProgram<'a> {
    pub fn new(program: &'a SourceProgram) -> Result<Self, CompilerMessages> {
        let mut analyser = ContractAnalyser {
            program,
            warnings: Vec::new(),
        };

        match analyser.analyse() {
            Ok((contract, events)) => {
                let exported_types = collect_exported_types(&contract, &events);
                Ok(ContractProgram {
                    program,
                    contract,
                    events,
                    exported_types,
                    warnings: analyser.warnings,
                })
            }
            Err(e) => Err(CompilerMessages::from_error(e, analyser.warnings)),
        }
    }
}

/// An annotation that passed validation, with its typed definition
#[derive(Debug)]
struct ValidatedAnnotation<'a> {
    annotation: &'a Annotation,
    def: AnnotationDef,
}

/// All the validated annotations of one declaration
#[derive(Debug)]
struct AnnotationSet<'a> {
    annotations: Vec<ValidatedAnnotation<'a>>,
}

impl AnnotationSet<'_> {
    fn has(&self, kind: AnnotationKind) -> bool {
        self.annotations.iter().any(|validated| validated.def.kind() == kind)
    }

    fn find(&self, kind: AnnotationKind) -> Option<&ValidatedAnnotation<'_>> {
        self.annotations.iter().find(|validated| validated.def.kind() == kind)
    }

    fn docs(&self) -> Vec<String> {
        self.annotations
            .iter()
            .filter_map(|validated| match &validated.def {
                AnnotationDef::Doc(doc) => Some(doc.description.to_owned()),
                _ => None,
            })
            .collect()
    }

    fn state(&self) -> Option<&StateAnnotationDef> {
        self.annotations.iter().find_map(|validated| match &validated.def {
            AnnotationDef::State(state) => Some(state),
            _ => None,
        })
    }

    fn message(&self) -> Option<&MessageAnnotationDef> {
        self.annotations.iter().find_map(|validated| match &validated.def {
            AnnotationDef::Message(message) => Some(message),
            _ => None,
        })
    }

    fn generic(&self, kind: AnnotationKind) -> Option<&GenericAnnotationDef> {
        self.annotations.iter().find_map(|validated| match &validated.def {
            AnnotationDef::Generic(generic) if generic.kind == kind => Some(generic),
            _ => None,
        })
    }
}

struct ContractAnalyser<'a> {
    program: &'a SourceProgram,
    warnings: Vec<CompilerWarning>,
}

impl<'a> ContractAnalyser<'a> {
    fn analyse(&mut self) -> Result<(ContractDef<'a>, Vec<EventDef<'a>>), CompilerError> {
        let program = self.program;
        let mut contract: Option<ContractDef<'a>> = None;
        let mut events = Vec::new();

        for class in &program.classes {
            let class_annotations = self.validate(&class.annotations)?;
            let is_contract = class_annotations.has(AnnotationKind::Contract);
            let is_event = class_annotations.has(AnnotationKind::Event);

            if is_contract && is_event {
                return_annotation_error!(
                    ConflictingModifiers,
                    format!("Class '{}' can't be both a '@contract' and an '@event'", class.name),
                    class.location.to_owned(),
                    {
                        DeclarationName => class.name,
                        PrimarySuggestion => "Declare the event as its own class",
                    }
                )
            }

            if is_contract {
                if let Some(existing) = &contract {
                    return_rule_error!(
                        format!(
                            "Only one class can be marked with '@contract', found '{}' and '{}'",
                            existing.class.name, class.name
                        ),
                        class.location.to_owned(),
                        {
                            DeclarationName => class.name,
                            CompilationStage => "Contract Analysis",
                        }
                    )
                }

                self.ignore_unless(
                    &class_annotations,
                    &[AnnotationKind::Contract, AnnotationKind::Doc],
                    &format!("contract class '{}'", class.name),
                );
                contract = Some(self.contract_def(class, class_annotations.docs())?);
            } else if is_event {
                self.ignore_unless(
                    &class_annotations,
                    &[AnnotationKind::Event, AnnotationKind::Doc],
                    &format!("event class '{}'", class.name),
                );
                events.push(self.event_def(class, class_annotations.docs())?);
            } else {
                self.ignore_unless(
                    &class_annotations,
                    &[AnnotationKind::Packed],
                    &format!("class '{}'", class.name),
                );
                self.plain_class(class)?;
            }
        }

        let Some(contract) = contract else {
            return_rule_error!(
                "No class is marked with '@contract'",
                TextLocation::default(),
                {
                    PrimarySuggestion => "Add '@contract' to the class that holds the contract state",
                    CompilationStage => "Contract Analysis",
                }
            )
        };

        annotation_log!(format!(
            "Contract '{}' with {} persistent fields and {} events",
            contract.name,
            contract.storage_fields.len(),
            events.len()
        ));

        Ok((contract, events))
    }

    /// Classifies and validates every annotation of one declaration
    fn validate(&mut self, annotations: &'a [Annotation]) -> Result<AnnotationSet<'a>, CompilerError> {
        let mut validated = Vec::with_capacity(annotations.len());

        for annotation in annotations {
            let def = get_annotation_def(annotation)?;

            if annotation.origin == AnnotationOrigin::Custom {
                let duplicate_keys = match &def {
                    AnnotationDef::Generic(generic) => generic.pairs.duplicate_keys().to_vec(),
                    _ => to_pairs(annotation)?.duplicate_keys().to_vec(),
                };

                for key in duplicate_keys {
                    self.warnings.push(CompilerWarning::new(
                        &key,
                        annotation.location.to_owned(),
                        WarningKind::DuplicateAnnotationKey,
                    ));
                }
            }

            validated.push(ValidatedAnnotation { annotation, def });
        }

        Ok(AnnotationSet {
            annotations: validated,
        })
    }

    /// Warns about every contract annotation whose kind isn't in `allowed`
    fn ignore_unless(&mut self, set: &AnnotationSet, allowed: &[AnnotationKind], declaration: &str) {
        for validated in &set.annotations {
            let kind = validated.def.kind();
            if kind == AnnotationKind::Internal || allowed.contains(&kind) {
                continue;
            }

            self.warnings.push(CompilerWarning::new(
                &format!("'@{}' on {declaration}", validated.annotation.name),
                validated.annotation.location.to_owned(),
                WarningKind::IgnoredAnnotation,
            ));
        }
    }

    fn contract_def(
        &mut self,
        class: &'a ClassDecl,
        docs: Vec<String>,
    ) -> Result<ContractDef<'a>, CompilerError> {
        let mut storage_fields = Vec::new();
        for field in &class.fields {
            let annotations = self.validate(&field.annotations)?;
            if let Some(storage_field) = self.storage_field(field, &annotations)? {
                storage_fields.push(storage_field);
            }
        }

        let mut constructors = Vec::new();
        let mut messages = Vec::new();
        let mut callable_methods = Vec::new();

        for method in &class.methods {
            let annotations = self.validate(&method.annotations)?;
            self.ignore_unless(
                &annotations,
                &[
                    AnnotationKind::Constructor,
                    AnnotationKind::Message,
                    AnnotationKind::Doc,
                ],
                &format!("method '{}'", method.name),
            );

            match (annotations.generic(AnnotationKind::Constructor), annotations.message()) {
                (Some(_), Some(_)) => {
                    return_annotation_error!(
                        ConflictingModifiers,
                        format!(
                            "Method '{}' can't be both a '@constructor' and a '@message'",
                            method.name
                        ),
                        method.location.to_owned(),
                        {
                            DeclarationName => method.name,
                            PrimarySuggestion => "Remove one of the two annotations",
                        }
                    )
                }
                (Some(constructor), None) => {
                    constructors.push(ConstructorDef {
                        method,
                        payable: constructor.is_flag_set(MESSAGE_PAYABLE_KEY),
                        docs: annotations.docs(),
                    });
                    callable_methods.push(method);
                }
                (None, Some(message)) => {
                    messages.push(MessageFunctionDef {
                        method,
                        message: message.to_owned(),
                        docs: annotations.docs(),
                    });
                    callable_methods.push(method);
                }
                (None, None) => {}
            }
        }

        Ok(ContractDef {
            class,
            name: contract_name(&class.name),
            docs,
            constructors,
            messages,
            storage_fields,
            callable_methods,
        })
    }

    fn storage_field(
        &mut self,
        field: &'a FieldDecl,
        annotations: &AnnotationSet<'a>,
    ) -> Result<Option<StorageFieldDef<'a>>, CompilerError> {
        let Some(state) = annotations.state() else {
            self.ignore_unless(
                annotations,
                &[],
                &format!("field '{}' without '@state'", field.name),
            );
            return Ok(None);
        };

        self.ignore_unless(
            annotations,
            &[
                AnnotationKind::State,
                AnnotationKind::Dynamic,
                AnnotationKind::Spread,
            ],
            &format!("persistent field '{}'", field.name),
        );

        let spread = match annotations.find(AnnotationKind::Spread) {
            Some(validated) => Some(self.spread_composite(field, &validated.annotation.location)?),
            None => None,
        };

        Ok(Some(StorageFieldDef {
            field,
            lazy: state.lazy,
            dynamic: annotations.has(AnnotationKind::Dynamic),
            spread,
        }))
    }

    /// The composite a `@spread` field expands into
    fn spread_composite(
        &self,
        field: &'a FieldDecl,
        location: &TextLocation,
    ) -> Result<&'a ClassDecl, CompilerError> {
        if field.ty.kind != TypeKind::UserComposite {
            return_rule_error!(
                format!(
                    "'@spread' only works on composite types, field '{}' is '{}'",
                    field.name,
                    field.ty.type_key()
                ),
                location.to_owned(),
                {
                    DeclarationName => field.name,
                    TypeKey => field.ty.type_key(),
                }
            )
        }

        let program = self.program;
        let Some(composite) = program.find_class(&field.ty.name) else {
            return_type_error!(
                format!("Can't find a declaration for the type '{}'", field.ty.name),
                field.location.to_owned(),
                { TypeKey => field.ty.name }
            )
        };

        let is_packed = composite.annotations.iter().any(|annotation| {
            matches!(get_annotation_kind(annotation), Ok(AnnotationKind::Packed))
        });

        if is_packed {
            return_annotation_error!(
                ConflictingModifiers,
                format!(
                    "Field '{}' can't spread the '@packed' composite '{}'",
                    field.name, composite.name
                ),
                location.to_owned(),
                {
                    AnnotationName => "spread",
                    DeclarationName => field.name,
                    PrimarySuggestion => "Remove '@spread' to store the composite as one packed cell",
                }
            )
        }

        Ok(composite)
    }

    fn event_def(&mut self, class: &'a ClassDecl, docs: Vec<String>) -> Result<EventDef<'a>, CompilerError> {
        let mut fields = Vec::with_capacity(class.fields.len());

        for field in &class.fields {
            let annotations = self.validate(&field.annotations)?;
            self.ignore_unless(
                &annotations,
                &[AnnotationKind::Topic, AnnotationKind::Doc],
                &format!("event field '{}'", field.name),
            );

            fields.push(EventFieldDef {
                field,
                indexed: annotations.has(AnnotationKind::Topic),
                docs: annotations.docs(),
            });
        }

        for method in &class.methods {
            let annotations = self.validate(&method.annotations)?;
            self.ignore_unless(&annotations, &[], &format!("event method '{}'", method.name));
        }

        Ok(EventDef {
            class,
            fields,
            docs,
        })
    }

    // Composites and helpers, their annotations are still checked
    fn plain_class(&mut self, class: &'a ClassDecl) -> Result<(), CompilerError> {
        for field in &class.fields {
            let annotations = self.validate(&field.annotations)?;
            self.ignore_unless(
                &annotations,
                &[],
                &format!("field '{}' of '{}'", field.name, class.name),
            );
        }

        for method in &class.methods {
            let annotations = self.validate(&method.annotations)?;
            self.ignore_unless(
                &annotations,
                &[],
                &format!("method '{}' of '{}'", method.name, class.name),
            );
        }

        Ok(())
    }
}

/// Persistent fields, then constructor and message signatures (message returns only), then event fields
fn collect_exported_types<'a>(
    contract: &ContractDef<'a>,
    events: &[EventDef<'a>],
) -> Vec<ExportedType<'a>> {
    let mut exported = Vec::with_capacity(EXPORTED_TYPES_CAPACITY);

    for storage_field in &contract.storage_fields {
        exported.push(ExportedType {
            ty: &storage_field.field.ty,
            location: &storage_field.field.location,
        });
    }

    for &method in &contract.callable_methods {
        for param in &method.params {
            exported.push(ExportedType {
                ty: &param.ty,
                location: &method.location,
            });
        }

        // Constructors publish no return type
        let is_message = contract
            .messages
            .iter()
            .any(|message| std::ptr::eq(message.method, method));

        if let Some(return_type) = &method.return_type {
            if is_message && !return_type.is_void() {
                exported.push(ExportedType {
                    ty: return_type,
                    location: &method.location,
                });
            }
        }
    }

    for event in events {
        for event_field in &event.fields {
            exported.push(ExportedType {
                ty: &event_field.field.ty,
                location: &event_field.field.location,
            });
        }
    }

    exported
}

/// `MyToken` becomes `myToken`
pub fn contract_name(class_name: &str) -> String {
    let mut chars = class_name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
