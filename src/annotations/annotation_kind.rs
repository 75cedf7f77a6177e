use crate::annotation_log;
use crate::compiler_messages::compiler_errors::CompilerError;
use crate::program::declarations::{Annotation, AnnotationOrigin};
use crate::program::locations::TextLocation;
use crate::return_annotation_error;

/// Every annotation name the generator recognises, in enumeration order.
/// Suggestion ties are resolved by this order.
pub const CONTRACT_ANNOTATIONS: [&str; 10] = [
    "contract",
    "constructor",
    "doc",
    "dynamic",
    "event",
    "message",
    "packed",
    "spread",
    "state",
    "topic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Contract,
    Constructor,
    Doc,
    Dynamic,
    Event,
    Message,
    Packed,
    State,
    Spread,
    Topic,

    // Native to the host language, never checked by the contract rules
    Internal,

    // Unrecognised. Only ever produced on the way to an UnsupportedAnnotation error.
    Other,
}

impl AnnotationKind {
    pub fn source_name(self) -> &'static str {
        match self {
            AnnotationKind::Contract => "contract",
            AnnotationKind::Constructor => "constructor",
            AnnotationKind::Doc => "doc",
            AnnotationKind::Dynamic => "dynamic",
            AnnotationKind::Event => "event",
            AnnotationKind::Message => "message",
            AnnotationKind::Packed => "packed",
            AnnotationKind::State => "state",
            AnnotationKind::Spread => "spread",
            AnnotationKind::Topic => "topic",
            AnnotationKind::Internal => "internal",
            AnnotationKind::Other => "other",
        }
    }
}

/// Buckets on the first character, then matches exactly inside the bucket.
/// Matching is case-sensitive.
fn kind_from_name(name: &str) -> AnnotationKind {
    match name.chars().next() {
        Some('c') => match name {
            "contract" => AnnotationKind::Contract,
            "constructor" => AnnotationKind::Constructor,
            _ => AnnotationKind::Other,
        },
        Some('d') => match name {
            "doc" => AnnotationKind::Doc,
            "dynamic" => AnnotationKind::Dynamic,
            _ => AnnotationKind::Other,
        },
        Some('e') if name == "event" => AnnotationKind::Event,
        Some('m') if name == "message" => AnnotationKind::Message,
        Some('p') if name == "packed" => AnnotationKind::Packed,
        Some('s') => match name {
            "spread" => AnnotationKind::Spread,
            "state" => AnnotationKind::State,
            _ => AnnotationKind::Other,
        },
        Some('t') if name == "topic" => AnnotationKind::Topic,
        _ => AnnotationKind::Other,
    }
}

/// Classifies a custom annotation name.
///
/// Unknown names fail with an `UnsupportedAnnotation` error carrying the
/// closest known name as a suggestion. The suggestion is never applied.
pub fn classify(name: &str, location: &TextLocation) -> Result<AnnotationKind, CompilerError> {
    let kind = kind_from_name(name);
    if kind != AnnotationKind::Other {
        annotation_log!(format!("Classified @{name} as {}", kind.source_name()));
        return Ok(kind);
    }

    let suggestion = closest_annotation_name(name);
    return_annotation_error!(
        UnsupportedAnnotation,
        format!("Unsupported contract annotation '@{name}', did you mean '@{suggestion}'?"),
        location.to_owned(),
        {
            AnnotationName => name,
            PrimarySuggestion => suggestion,
            CompilationStage => "Annotation Classification",
        }
    )
}

/// Native annotations classify as `Internal` whatever their name
pub fn get_annotation_kind(annotation: &Annotation) -> Result<AnnotationKind, CompilerError> {
    match annotation.origin {
        AnnotationOrigin::Native => Ok(AnnotationKind::Internal),
        AnnotationOrigin::Custom => classify(&annotation.name, &annotation.location),
    }
}

/// The recognised name most similar to `name`.
/// Always returns one of `CONTRACT_ANNOTATIONS`, the first one wins ties.
pub fn closest_annotation_name(name: &str) -> &'static str {
    let mut best = CONTRACT_ANNOTATIONS[0];
    let mut best_score = similarity(best, name);

    for &candidate in &CONTRACT_ANNOTATIONS[1..] {
        let score = similarity(candidate, name);
        if score > best_score {
            best = candidate;
            best_score = score;
        }
    }

    best
}

/// Normalised similarity in `0.0..=1.0`, 1.0 meaning identical
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }

    1.0 - edit_distance(a, b) as f64 / longest as f64
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
