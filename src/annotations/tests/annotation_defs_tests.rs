use crate::annotations::annotation_defs::{
    AnnotationDef, DocAnnotationDef, MessageAnnotationDef, StateAnnotationDef, get_annotation_def,
};
use crate::annotations::annotation_kind::AnnotationKind;
use crate::compiler_messages::compiler_errors::{ErrorMetaDataKey, ErrorType};
use crate::program::declarations::{Annotation, AnnotationArg};
use crate::program::tests::test_support::{
    annotation, annotation_with_literal, annotation_with_pairs, test_location,
};

#[test]
fn doc_reads_double_and_single_quoted_strings() {
    let doc = DocAnnotationDef::new(&annotation_with_literal(
        "doc",
        r#"{"desc": "Line one\nLine \"two\""}"#,
    ))
    .expect("json doc should parse");
    assert_eq!(doc.description, "Line one\nLine \"two\"");

    let doc = DocAnnotationDef::new(&annotation_with_pairs("doc", &[("desc", "'plain'")]))
        .expect("single quoted doc should parse");
    assert_eq!(doc.description, "plain");
}

#[test]
fn doc_without_desc_is_missing_a_field() {
    let err = DocAnnotationDef::new(&annotation("doc")).expect_err("desc is required");

    assert_eq!(err.error_type, ErrorType::MissingRequiredField);
    assert_eq!(err.metadata_value(ErrorMetaDataKey::FieldName), Some("desc"));
}

#[test]
fn doc_with_unquoted_desc_is_a_type_mismatch() {
    let err = DocAnnotationDef::new(&annotation_with_literal("doc", "{desc: 42}"))
        .expect_err("a number is not a string");

    assert_eq!(err.error_type, ErrorType::FieldTypeMismatch);
    assert_eq!(err.metadata_value(ErrorMetaDataKey::ExpectedType), Some("string"));
    assert_eq!(err.metadata_value(ErrorMetaDataKey::FoundValue), Some("42"));
}

#[test]
fn message_defaults() {
    let message = MessageAnnotationDef::new(&annotation("message")).expect("defaults apply");

    assert_eq!(
        message,
        MessageAnnotationDef {
            payable: false,
            mutates: true,
            selector: None,
        }
    );
}

#[test]
fn payable_message_that_mutates_is_fine() {
    let message = MessageAnnotationDef::new(&annotation_with_literal(
        "message",
        "{payable: true, mutates: true}",
    ))
    .expect("payable and mutating is allowed");

    assert!(message.payable);
    assert!(message.mutates);
}

#[test]
fn payable_message_that_doesnt_mutate_conflicts() {
    for message in [
        annotation_with_literal("message", "{payable: true, mutates: false}"),
        annotation_with_pairs("message", &[("mutates", "false"), ("payable", "true")]),
    ] {
        let err = MessageAnnotationDef::new(&message).expect_err("payable implies mutates");
        assert_eq!(err.error_type, ErrorType::ConflictingModifiers);
        assert!(err.suggestion().is_some());
    }
}

#[test]
fn message_flags_must_be_boolean_literals() {
    let err = MessageAnnotationDef::new(&annotation_with_pairs("message", &[("payable", "yes")]))
        .expect_err("'yes' is not a boolean");

    assert_eq!(err.error_type, ErrorType::FieldTypeMismatch);
    assert_eq!(err.metadata_value(ErrorMetaDataKey::FieldName), Some("payable"));
    assert_eq!(err.metadata_value(ErrorMetaDataKey::ExpectedType), Some("boolean"));
}

#[test]
fn message_selector_is_validated() {
    let message = MessageAnnotationDef::new(&annotation_with_literal(
        "message",
        r#"{"selector": "0xCAFEbabe"}"#,
    ))
    .expect("valid selector");
    assert_eq!(message.selector.as_deref(), Some("0xCAFEbabe"));

    for selector in ["\"0x1234\"", "\"12345678\"", "\"0x1234567g\"", "\"0x123456789\""] {
        let err = MessageAnnotationDef::new(&annotation_with_pairs(
            "message",
            &[("selector", selector)],
        ))
        .expect_err("bad selector should fail");
        assert_eq!(err.error_type, ErrorType::InvalidSelectorFormat, "{selector}");
    }
}

#[test]
fn state_lazy_defaults_to_true() {
    let state = StateAnnotationDef::new(&annotation("state")).expect("bare state");
    assert!(state.lazy);

    let state = StateAnnotationDef::new(&annotation_with_literal("state", "{lazy: false}"))
        .expect("explicit lazy");
    assert!(!state.lazy);
}

#[test]
fn get_annotation_def_dispatches_on_kind() {
    let def = get_annotation_def(&annotation_with_literal("state", "{lazy: false}"))
        .expect("state should build");
    assert_eq!(def, AnnotationDef::State(StateAnnotationDef { lazy: false }));

    let def = get_annotation_def(&annotation_with_pairs("constructor", &[("payable", "true")]))
        .expect("constructor should build");
    let AnnotationDef::Generic(generic) = def else {
        panic!("constructor should use the generic view");
    };
    assert_eq!(generic.kind, AnnotationKind::Constructor);
    assert!(generic.has_property("payable"));
    assert!(generic.is_flag_set("payable"));
    assert_eq!(generic.get_property("missing"), None);
}

#[test]
fn generic_view_skips_validation() {
    let def = get_annotation_def(&annotation_with_pairs("topic", &[("anything", "goes")]))
        .expect("generic kinds accept any keys");

    assert_eq!(def.kind(), AnnotationKind::Topic);
}

#[test]
fn native_annotations_are_not_parsed() {
    let mut native = Annotation::native("operator", test_location(1));
    native.args.push(AnnotationArg::Literal(String::from("\"+\"")));

    let def = get_annotation_def(&native).expect("native arguments are never parsed");
    let AnnotationDef::Generic(generic) = def else {
        panic!("native annotations use the generic view");
    };
    assert_eq!(generic.kind, AnnotationKind::Internal);
    assert!(generic.pairs.is_empty());
}

#[test]
fn unknown_annotations_fail_before_definition() {
    let err = get_annotation_def(&annotation("contrat")).expect_err("unknown name");
    assert_eq!(err.error_type, ErrorType::UnsupportedAnnotation);
    assert_eq!(err.suggestion(), Some("contract"));
}
