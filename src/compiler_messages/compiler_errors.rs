use crate::compiler_messages::compiler_warnings::CompilerWarning;
use crate::program::locations::TextLocation;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::Path;

// The final set of errors and warnings emitted from one generation run
#[derive(Debug, Default)]
pub struct CompilerMessages {
    pub errors: Vec<CompilerError>,
    pub warnings: Vec<CompilerWarning>,
}

impl CompilerMessages {
    pub fn new() -> Self {
        CompilerMessages {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Generation is fail-fast, so a failed run carries exactly one error
    /// plus whatever warnings were gathered before it.
    pub fn from_error(error: CompilerError, warnings: Vec<CompilerWarning>) -> Self {
        CompilerMessages {
            errors: vec![error],
            warnings,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum ErrorMetaDataKey {
    AnnotationName,
    DeclarationName,
    CompilationStage,

    // Optional suggestions
    PrimarySuggestion, // The closest known name or a one-line fix

    // Annotation argument information
    FieldName,
    ExpectedType,
    FoundValue,

    // Type table information
    TypeKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompilerError {
    pub msg: String,

    // Location of the offending declaration or annotation in the host program
    pub location: TextLocation,
    pub error_type: ErrorType,

    // Structured details so tools can act on the error without parsing the message
    pub metadata: HashMap<ErrorMetaDataKey, String>,
}

impl CompilerError {
    pub fn new(
        msg: impl Into<String>,
        location: TextLocation,
        error_type: ErrorType,
    ) -> CompilerError {
        CompilerError {
            msg: msg.into(),
            location,
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_location(mut self, location: TextLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = error_type;
        self
    }

    pub fn new_metadata_entry(&mut self, key: ErrorMetaDataKey, value: impl Into<String>) {
        self.metadata.insert(key, value.into());
    }

    pub fn metadata_value(&self, key: ErrorMetaDataKey) -> Option<&str> {
        self.metadata.get(&key).map(String::as_str)
    }

    /// The "did you mean" suggestion attached to this error, if any
    pub fn suggestion(&self) -> Option<&str> {
        self.metadata_value(ErrorMetaDataKey::PrimarySuggestion)
    }

    /// Create a compiler error (internal bug, not the user's fault)
    pub fn compiler_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, TextLocation::default(), ErrorType::Compiler)
    }

    /// Create a file system error for the given path
    pub fn file_error(path: &Path, msg: impl Into<String>) -> Self {
        CompilerError::new(msg, TextLocation::from_path(path), ErrorType::File)
    }
}

impl Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (at {})",
            error_type_to_str(&self.error_type),
            self.msg,
            self.location
        )
    }
}

impl std::error::Error for CompilerError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    // Annotation validation
    UnsupportedAnnotation,
    MalformedArguments,
    MissingRequiredField,
    FieldTypeMismatch,
    InvalidSelectorFormat,
    ConflictingModifiers,

    // Program shape
    Type,
    Rule,

    // Environment
    Config,
    File,
    Compiler,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::UnsupportedAnnotation => "Unsupported Annotation",
        ErrorType::MalformedArguments => "Malformed Annotation Arguments",
        ErrorType::MissingRequiredField => "Missing Required Field",
        ErrorType::FieldTypeMismatch => "Field Type Mismatch",
        ErrorType::InvalidSelectorFormat => "Invalid Selector",
        ErrorType::ConflictingModifiers => "Conflicting Modifiers",
        ErrorType::Type => "Type Error",
        ErrorType::Rule => "Contract Rule Violation",
        ErrorType::Config => "Malformed Config",
        ErrorType::File => "File Error",
        ErrorType::Compiler => "Compiler Bug",
    }
}

/// Returns a new CompilerError for an annotation that failed validation.
///
/// The first argument names the `ErrorType` variant, so every annotation
/// failure goes through the same path.
///
/// Usage:
/// `return_annotation_error!(MissingRequiredField, "field 'desc' is missing", location, {
///     AnnotationName => "doc",
///     FieldName => "desc",
/// })`;
#[macro_export]
macro_rules! return_annotation_error {
    ($kind:ident, $msg:expr, $location:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_messages::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_messages::compiler_errors::ErrorType::$kind,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $(
                    map.insert(
                        $crate::compiler_messages::compiler_errors::ErrorMetaDataKey::$key,
                        ($value).to_string(),
                    );
                )*
                map
            },
        })
    };
    ($kind:ident, $msg:expr, $location:expr) => {
        return Err($crate::compiler_messages::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_messages::compiler_errors::ErrorType::$kind,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new CompilerError for declared types that can't be resolved into the type table.
///
/// Usage:
/// `return_type_error!("Unknown composite type 'Foo'", location, { TypeKey => "Foo" })`;
#[macro_export]
macro_rules! return_type_error {
    ($msg:expr, $location:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_messages::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_messages::compiler_errors::ErrorType::Type,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $(
                    map.insert(
                        $crate::compiler_messages::compiler_errors::ErrorMetaDataKey::$key,
                        ($value).to_string(),
                    );
                )*
                map
            },
        })
    };
    ($msg:expr, $location:expr) => {
        return Err($crate::compiler_messages::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_messages::compiler_errors::ErrorType::Type,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new CompilerError for contract structure violations,
/// like a program with no `@contract` class.
///
/// Usage: `return_rule_error!("No class is marked with @contract", location)`;
#[macro_export]
macro_rules! return_rule_error {
    ($msg:expr, $location:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_messages::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_messages::compiler_errors::ErrorType::Rule,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $(
                    map.insert(
                        $crate::compiler_messages::compiler_errors::ErrorMetaDataKey::$key,
                        ($value).to_string(),
                    );
                )*
                map
            },
        })
    };
    ($msg:expr, $location:expr) => {
        return Err($crate::compiler_messages::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_messages::compiler_errors::ErrorType::Rule,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new CompilerError for a config file that doesn't make sense
///
/// Usage: `return_config_error!("message", location)`;
#[macro_export]
macro_rules! return_config_error {
    ($msg:expr, $location:expr) => {
        return Err($crate::compiler_messages::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_messages::compiler_errors::ErrorType::Config,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new CompilerError for internal bugs.
///
/// These indicate a broken invariant inside the generator itself, not a problem with user code.
#[macro_export]
macro_rules! return_compiler_error {
    ($fmt:expr, $($arg:expr),+ $(,)?) => {{
        return Err($crate::compiler_messages::compiler_errors::CompilerError::compiler_error(
            format!($fmt, $($arg),+),
        ));
    }};
    ($msg:expr) => {{
        return Err($crate::compiler_messages::compiler_errors::CompilerError::compiler_error(
            $msg,
        ));
    }};
}
