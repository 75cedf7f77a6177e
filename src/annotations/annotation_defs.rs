//! Typed views over the raw arguments of each annotation kind.
//!
//! `to_pairs` only ever produces raw strings. Each definition here declares
//! which keys it needs, which are optional and their defaults, and coerces
//! the raw values into real types. Only the generic view skips validation.

use crate::annotations::annotation_args::{AnnotationPairs, to_pairs};
use crate::annotations::annotation_kind::{AnnotationKind, get_annotation_kind};
use crate::annotations::selectors::is_valid_selector;
use crate::compiler_messages::compiler_errors::CompilerError;
use crate::program::declarations::Annotation;
use crate::{return_annotation_error, return_compiler_error};

pub const DOC_DESCRIPTION_KEY: &str = "desc";
pub const MESSAGE_PAYABLE_KEY: &str = "payable";
pub const MESSAGE_MUTATES_KEY: &str = "mutates";
pub const MESSAGE_SELECTOR_KEY: &str = "selector";
pub const STATE_LAZY_KEY: &str = "lazy";

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationDef {
    Doc(DocAnnotationDef),
    Message(MessageAnnotationDef),
    State(StateAnnotationDef),
    Generic(GenericAnnotationDef),
}

impl AnnotationDef {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            AnnotationDef::Doc(_) => AnnotationKind::Doc,
            AnnotationDef::Message(_) => AnnotationKind::Message,
            AnnotationDef::State(_) => AnnotationKind::State,
            AnnotationDef::Generic(def) => def.kind,
        }
    }
}

/// `@doc({desc: "..."})`
#[derive(Debug, Clone, PartialEq)]
pub struct DocAnnotationDef {
    pub description: String,
}

impl DocAnnotationDef {
    pub fn new(annotation: &Annotation) -> Result<Self, CompilerError> {
        let fields = AnnotationFields::parse(annotation)?;
        Ok(DocAnnotationDef {
            description: fields.required_string(DOC_DESCRIPTION_KEY)?,
        })
    }
}

/// `@message({payable: bool, mutates: bool, selector: "0x........"})`
#[derive(Debug, Clone, PartialEq)]
pub struct MessageAnnotationDef {
    pub payable: bool,
    pub mutates: bool,
    pub selector: Option<String>,
}

impl MessageAnnotationDef {
    pub fn new(annotation: &Annotation) -> Result<Self, CompilerError> {
        let fields = AnnotationFields::parse(annotation)?;
        let payable = fields.optional_bool(MESSAGE_PAYABLE_KEY, false)?;
        let mutates = fields.optional_bool(MESSAGE_MUTATES_KEY, true)?;
        let selector = fields.optional_string(MESSAGE_SELECTOR_KEY)?;

        if let Some(selector) = &selector {
            if !is_valid_selector(selector) {
                return_annotation_error!(
                    InvalidSelectorFormat,
                    format!(
                        "Selector '{selector}' of '@{}' should be 0x followed by 8 hex digits, e.g. \"0x12345678\"",
                        annotation.name
                    ),
                    annotation.location.to_owned(),
                    {
                        AnnotationName => annotation.name,
                        FieldName => MESSAGE_SELECTOR_KEY,
                        FoundValue => selector,
                    }
                )
            }
        }

        // payable implies mutates
        if payable && !mutates {
            return_annotation_error!(
                ConflictingModifiers,
                format!(
                    "Arguments 'payable' and 'mutates: false' of '@{}' can't be used together",
                    annotation.name
                ),
                annotation.location.to_owned(),
                {
                    AnnotationName => annotation.name,
                    PrimarySuggestion => "Remove 'mutates: false' or 'payable: true'",
                }
            )
        }

        Ok(MessageAnnotationDef {
            payable,
            mutates,
            selector,
        })
    }
}

/// `@state({lazy: bool})`
#[derive(Debug, Clone, PartialEq)]
pub struct StateAnnotationDef {
    pub lazy: bool,
}

impl StateAnnotationDef {
    pub fn new(annotation: &Annotation) -> Result<Self, CompilerError> {
        let fields = AnnotationFields::parse(annotation)?;
        Ok(StateAnnotationDef {
            lazy: fields.optional_bool(STATE_LAZY_KEY, true)?,
        })
    }
}

/// Raw view for kinds without a dedicated definition
#[derive(Debug, Clone, PartialEq)]
pub struct GenericAnnotationDef {
    pub kind: AnnotationKind,
    pub pairs: AnnotationPairs,
}

impl GenericAnnotationDef {
    pub fn has_property(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.pairs.get(key)
    }

    /// `true` only for an explicit `key: true`
    pub fn is_flag_set(&self, key: &str) -> bool {
        self.pairs.get(key) == Some("true")
    }
}

/// Builds the typed definition matching the annotation's kind
pub fn get_annotation_def(annotation: &Annotation) -> Result<AnnotationDef, CompilerError> {
    let kind = get_annotation_kind(annotation)?;

    let def = match kind {
        AnnotationKind::Doc => AnnotationDef::Doc(DocAnnotationDef::new(annotation)?),
        AnnotationKind::Message => AnnotationDef::Message(MessageAnnotationDef::new(annotation)?),
        AnnotationKind::State => AnnotationDef::State(StateAnnotationDef::new(annotation)?),

        AnnotationKind::Contract
        | AnnotationKind::Constructor
        | AnnotationKind::Dynamic
        | AnnotationKind::Event
        | AnnotationKind::Packed
        | AnnotationKind::Spread
        | AnnotationKind::Topic => AnnotationDef::Generic(GenericAnnotationDef {
            kind,
            pairs: to_pairs(annotation)?,
        }),

        // Native arguments follow the host language's own rules
        AnnotationKind::Internal => AnnotationDef::Generic(GenericAnnotationDef {
            kind,
            pairs: AnnotationPairs::new(),
        }),

        AnnotationKind::Other => {
            return_compiler_error!(
                "Annotation '@{}' was classified as Other without raising an error",
                annotation.name
            )
        }
    };

    Ok(def)
}

/// Required/optional field access with coercion, shared by the typed definitions
struct AnnotationFields<'a> {
    annotation: &'a Annotation,
    pairs: AnnotationPairs,
}

impl<'a> AnnotationFields<'a> {
    fn parse(annotation: &'a Annotation) -> Result<Self, CompilerError> {
        Ok(AnnotationFields {
            annotation,
            pairs: to_pairs(annotation)?,
        })
    }

    fn required_string(&self, key: &str) -> Result<String, CompilerError> {
        match self.optional_string(key)? {
            Some(value) => Ok(value),
            None => {
                return_annotation_error!(
                    MissingRequiredField,
                    format!(
                        "Annotation '@{}' requires the argument '{key}'",
                        self.annotation.name
                    ),
                    self.annotation.location.to_owned(),
                    {
                        AnnotationName => self.annotation.name,
                        FieldName => key,
                        ExpectedType => "string",
                    }
                )
            }
        }
    }

    fn optional_string(&self, key: &str) -> Result<Option<String>, CompilerError> {
        let Some(raw) = self.pairs.get(key) else {
            return Ok(None);
        };

        match coerce_string(raw) {
            Some(value) => Ok(Some(value)),
            None => self.type_mismatch(key, "string", raw),
        }
    }

    fn optional_bool(&self, key: &str, default: bool) -> Result<bool, CompilerError> {
        match self.pairs.get(key) {
            None => Ok(default),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(raw) => self.type_mismatch(key, "boolean", raw),
        }
    }

    fn type_mismatch<T>(&self, key: &str, expected: &str, found: &str) -> Result<T, CompilerError> {
        return_annotation_error!(
            FieldTypeMismatch,
            format!(
                "Argument '{key}' of '@{}' should be a {expected}, found '{found}'",
                self.annotation.name
            ),
            self.annotation.location.to_owned(),
            {
                AnnotationName => self.annotation.name,
                FieldName => key,
                ExpectedType => expected,
                FoundValue => found,
            }
        )
    }
}

/// Strings are written quoted, either JSON style or with single quotes
fn coerce_string(raw: &str) -> Option<String> {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return serde_json::from_str::<String>(raw).ok();
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return Some(raw[1..raw.len() - 1].to_owned());
    }

    None
}
