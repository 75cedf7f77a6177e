use crate::compiler_messages::compiler_errors::CompilerError;
use crate::program::declarations::{Annotation, AnnotationArg};
use crate::program::locations::TextLocation;
use crate::return_annotation_error;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;

/// The raw arguments of one annotation as an ordered key/value mapping.
///
/// Values are kept as source text, so string values still carry their quotes.
/// Typed coercion happens in the annotation definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationPairs {
    pairs: Vec<(String, String)>,

    // Keys that were written more than once, the last value is kept
    duplicate_keys: Vec<String>,
}

impl AnnotationPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a value. An overwritten key keeps its first position.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.pairs.iter_mut().find(|(existing, _)| existing == key) {
            Some(pair) => {
                pair.1 = value.to_owned();
                self.duplicate_keys.push(key.to_owned());
            }
            None => self.pairs.push((key.to_owned(), value.to_owned())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn duplicate_keys(&self) -> &[String] {
        &self.duplicate_keys
    }

    /// Formats the mapping back into `key: value` pair arguments
    pub fn to_pair_args(&self) -> Vec<AnnotationArg> {
        self.iter()
            .map(|(key, value)| AnnotationArg::Pair {
                key: key.to_owned(),
                value: value.to_owned(),
            })
            .collect()
    }

    /// Formats the mapping back into a single object literal argument
    pub fn to_object_literal(&self) -> String {
        let body = self
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!("{{{body}}}")
    }
}

/// Flattens the arguments of an annotation into raw key/value pairs.
///
/// Accepts either a list of `key: value` arguments or exactly one object literal.
/// Anything else, including a mix of both, is a `MalformedArguments` error.
pub fn to_pairs(annotation: &Annotation) -> Result<AnnotationPairs, CompilerError> {
    let mut pairs = AnnotationPairs::new();
    if annotation.args.is_empty() {
        return Ok(pairs);
    }

    let literal_count = annotation
        .args
        .iter()
        .filter(|arg| matches!(arg, AnnotationArg::Literal(_)))
        .count();

    if literal_count == 0 {
        for arg in &annotation.args {
            if let AnnotationArg::Pair { key, value } = arg {
                let key = key.trim();
                if key.is_empty() {
                    return_annotation_error!(
                        MalformedArguments,
                        format!("Annotation '@{}' has an argument with an empty key", annotation.name),
                        annotation.location.to_owned(),
                        { AnnotationName => annotation.name }
                    )
                }
                pairs.insert(key, value.trim());
            }
        }
        return Ok(pairs);
    }

    if literal_count != annotation.args.len() {
        return_annotation_error!(
            MalformedArguments,
            format!(
                "Annotation '@{}' mixes 'key: value' arguments with an object literal. Use only one form.",
                annotation.name
            ),
            annotation.location.to_owned(),
            { AnnotationName => annotation.name }
        )
    }

    if literal_count > 1 {
        return_annotation_error!(
            MalformedArguments,
            format!(
                "Annotation '@{}' takes a single object literal, found {} arguments",
                annotation.name, literal_count
            ),
            annotation.location.to_owned(),
            { AnnotationName => annotation.name }
        )
    }

    match &annotation.args[0] {
        AnnotationArg::Literal(text) => {
            parse_object_literal(text, &annotation.name, &annotation.location)
        }
        AnnotationArg::Pair { .. } => {
            crate::return_compiler_error!("Pair argument counted as a literal while parsing annotation arguments")
        }
    }
}

fn parse_object_literal(
    text: &str,
    annotation_name: &str,
    location: &TextLocation,
) -> Result<AnnotationPairs, CompilerError> {
    let trimmed = text.trim();
    if trimmed.len() < 2 || !trimmed.starts_with('{') || !trimmed.ends_with('}') {
        return_annotation_error!(
            MalformedArguments,
            format!(
                "The argument of '@{annotation_name}' isn't an object literal. Expected something like {{key: value}}"
            ),
            location.to_owned(),
            {
                AnnotationName => annotation_name,
                FoundValue => trimmed,
            }
        )
    }

    // Strict JSON first, it copes with commas and colons inside strings
    if let Ok(JsonEntries(entries)) = serde_json::from_str::<JsonEntries>(trimmed) {
        let mut pairs = AnnotationPairs::new();
        for (key, value) in &entries {
            if key.trim().is_empty() {
                return_annotation_error!(
                    MalformedArguments,
                    format!("The object literal of '@{annotation_name}' has an empty key"),
                    location.to_owned(),
                    { AnnotationName => annotation_name }
                )
            }
            pairs.insert(key, &value.to_string());
        }
        return Ok(pairs);
    }

    let mut pairs = AnnotationPairs::new();
    let body = &trimmed[1..trimmed.len() - 1];

    for item in split_top_level_commas(body) {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        let Some((key, value)) = item.split_once(':') else {
            return_annotation_error!(
                MalformedArguments,
                format!("Argument '{item}' of '@{annotation_name}' is not a 'key: value' pair"),
                location.to_owned(),
                {
                    AnnotationName => annotation_name,
                    FoundValue => item,
                }
            )
        };

        let key = strip_key_quotes(key.trim());
        if key.is_empty() {
            return_annotation_error!(
                MalformedArguments,
                format!("Argument '{item}' of '@{annotation_name}' has an empty key"),
                location.to_owned(),
                { AnnotationName => annotation_name }
            )
        }

        pairs.insert(key, value.trim());
    }

    Ok(pairs)
}

/// Entries of a JSON object in source order, repeated keys included
struct JsonEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for JsonEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = JsonEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(JsonEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

// Commas inside quoted strings are part of the value
fn split_top_level_commas(body: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (index, ch) in body.char_indices() {
        match quote {
            Some(open) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == open {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                ',' => {
                    items.push(&body[start..index]);
                    start = index + 1;
                }
                _ => {}
            },
        }
    }

    items.push(&body[start..]);
    items
}

fn strip_key_quotes(key: &str) -> &str {
    for quote in ['"', '\''] {
        if key.len() >= 2 && key.starts_with(quote) && key.ends_with(quote) {
            return &key[1..key.len() - 1];
        }
    }
    key
}
