use crate::program::locations::TextLocation;
use saying::say;

#[derive(Clone, Debug, PartialEq)]
pub struct CompilerWarning {
    pub msg: String,
    pub location: TextLocation,
    pub warning_kind: WarningKind,
}

impl CompilerWarning {
    pub fn new(msg: &str, location: TextLocation, warning_kind: WarningKind) -> CompilerWarning {
        CompilerWarning {
            msg: msg.to_owned(),
            location,
            warning_kind,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningKind {
    // The same key was given twice to one annotation, the later value wins
    DuplicateAnnotationKey,

    // A recognised annotation was placed where it has no effect
    IgnoredAnnotation,
}

pub fn print_formatted_warning(w: CompilerWarning) {
    let location = w.location.to_string();
    say!(Yellow "WARNING: ", Dark Magenta location);
    match w.warning_kind {
        WarningKind::DuplicateAnnotationKey => {
            say!("Duplicate annotation argument '", w.msg, "', the last value is used");
        }
        WarningKind::IgnoredAnnotation => {
            say!("Ignored annotation ", w.msg);
        }
    }
}
