use crate::compiler_messages::compiler_errors::{CompilerMessages, ErrorMetaDataKey, ErrorType};
use crate::compiler_messages::compiler_warnings::WarningKind;
use crate::contract::contract_program::{ContractProgram, contract_name};
use crate::program::declarations::{Annotation, ClassDecl, FieldDecl, SourceProgram};
use crate::program::declared_types::DeclaredType;
use crate::program::tests::test_support::{
    annotation, annotation_with_literal, annotation_with_pairs, class, field, method,
    test_location, token_program,
};

fn contract_class(fields: Vec<FieldDecl>) -> ClassDecl {
    class("Vault", vec![annotation("contract")], fields, vec![])
}

fn analysis_error(program: &SourceProgram) -> CompilerMessages {
    match ContractProgram::new(program) {
        Ok(_) => panic!("analysis should fail"),
        Err(messages) => messages,
    }
}

#[test]
fn contract_names_start_lowercase() {
    assert_eq!(contract_name("MyToken"), "myToken");
    assert_eq!(contract_name("erc20"), "erc20");
    assert_eq!(contract_name(""), "");
}

#[test]
fn token_program_analysis() {
    let program = token_program();
    let contract_program = match ContractProgram::new(&program) {
        Ok(contract_program) => contract_program,
        Err(messages) => panic!("analysis failed: {:?}", messages.errors),
    };

    let contract = &contract_program.contract;
    assert_eq!(contract.name, "myToken");
    assert_eq!(contract.constructors.len(), 1);
    assert_eq!(contract.messages.len(), 2);
    assert_eq!(contract.storage_fields.len(), 2);
    assert!(contract.storage_fields[0].lazy);
    assert!(!contract.storage_fields[1].lazy);
    assert!(contract.storage_fields[1].dynamic);

    assert_eq!(contract_program.events.len(), 1);
    assert!(contract_program.events[0].fields[0].indexed);
    assert!(!contract_program.events[0].fields[2].indexed);
    assert!(contract_program.warnings.is_empty());

    let keys: Vec<String> = contract_program
        .exported_types
        .iter()
        .map(|exported| exported.ty.type_key())
        .collect();
    assert_eq!(
        keys,
        vec![
            "u128",
            "Map<AccountId,u128>",
            "u128",
            "AccountId",
            "u128",
            "bool",
            "u128",
            "AccountId",
            "AccountId",
            "u128",
        ]
    );
}

#[test]
fn constructor_return_types_are_not_exported() {
    let program = SourceProgram {
        classes: vec![class(
            "Vault",
            vec![annotation("contract")],
            vec![],
            vec![
                method(
                    "open",
                    vec![("owner", DeclaredType::composite("AccountId"))],
                    Some(DeclaredType::primitive("u64")),
                    vec![annotation("constructor")],
                ),
                method(
                    "balance",
                    vec![],
                    Some(DeclaredType::primitive("u128")),
                    vec![annotation_with_literal("message", "{mutates: false}")],
                ),
            ],
        )],
    };

    let contract_program = match ContractProgram::new(&program) {
        Ok(contract_program) => contract_program,
        Err(messages) => panic!("analysis failed: {:?}", messages.errors),
    };

    let keys: Vec<String> = contract_program
        .exported_types
        .iter()
        .map(|exported| exported.ty.type_key())
        .collect();
    assert_eq!(keys, vec!["AccountId", "u128"]);
}

#[test]
fn missing_contract_is_a_rule_error() {
    let program = SourceProgram {
        classes: vec![class("Plain", vec![], vec![], vec![])],
    };

    let messages = analysis_error(&program);
    assert_eq!(messages.errors.len(), 1);
    assert_eq!(messages.errors[0].error_type, ErrorType::Rule);
}

#[test]
fn two_contracts_are_a_rule_error() {
    let program = SourceProgram {
        classes: vec![
            class("First", vec![annotation("contract")], vec![], vec![]),
            class("Second", vec![annotation("contract")], vec![], vec![]),
        ],
    };

    let err = &analysis_error(&program).errors[0];
    assert_eq!(err.error_type, ErrorType::Rule);
    assert_eq!(err.metadata_value(ErrorMetaDataKey::DeclarationName), Some("Second"));
}

#[test]
fn contract_and_event_on_one_class_conflict() {
    let program = SourceProgram {
        classes: vec![class(
            "Both",
            vec![annotation("contract"), annotation("event")],
            vec![],
            vec![],
        )],
    };

    let err = &analysis_error(&program).errors[0];
    assert_eq!(err.error_type, ErrorType::ConflictingModifiers);
}

#[test]
fn constructor_and_message_on_one_method_conflict() {
    let program = SourceProgram {
        classes: vec![class(
            "Vault",
            vec![annotation("contract")],
            vec![],
            vec![method(
                "init",
                vec![],
                None,
                vec![annotation("constructor"), annotation("message")],
            )],
        )],
    };

    let err = &analysis_error(&program).errors[0];
    assert_eq!(err.error_type, ErrorType::ConflictingModifiers);
    assert_eq!(err.metadata_value(ErrorMetaDataKey::DeclarationName), Some("init"));
}

#[test]
fn payable_constructor() {
    let program = SourceProgram {
        classes: vec![class(
            "Vault",
            vec![annotation("contract")],
            vec![],
            vec![method(
                "init",
                vec![],
                None,
                vec![annotation_with_literal("constructor", "{payable: true}")],
            )],
        )],
    };

    let contract_program = ContractProgram::new(&program).expect("payable constructor is fine");
    assert!(contract_program.contract.constructors[0].payable);
}

#[test]
fn spreading_a_packed_composite_conflicts() {
    let program = SourceProgram {
        classes: vec![
            class(
                "Point",
                vec![annotation("packed")],
                vec![field("x", DeclaredType::primitive("u8"), vec![])],
                vec![],
            ),
            contract_class(vec![field(
                "origin",
                DeclaredType::composite("Point"),
                vec![annotation("state"), annotation("spread")],
            )]),
        ],
    };

    let err = &analysis_error(&program).errors[0];
    assert_eq!(err.error_type, ErrorType::ConflictingModifiers);
    assert_eq!(err.metadata_value(ErrorMetaDataKey::AnnotationName), Some("spread"));
}

#[test]
fn spreading_a_primitive_is_a_rule_error() {
    let program = SourceProgram {
        classes: vec![contract_class(vec![field(
            "count",
            DeclaredType::primitive("u32"),
            vec![annotation("state"), annotation("spread")],
        )])],
    };

    let err = &analysis_error(&program).errors[0];
    assert_eq!(err.error_type, ErrorType::Rule);
}

#[test]
fn misplaced_annotations_are_ignored_with_a_warning() {
    let program = SourceProgram {
        classes: vec![class(
            "Vault",
            vec![annotation("contract"), annotation("topic")],
            vec![
                field(
                    "cache",
                    DeclaredType::primitive("u32"),
                    vec![annotation("dynamic")],
                ),
                field(
                    "owner",
                    DeclaredType::primitive("u32"),
                    vec![annotation("state"), annotation("topic")],
                ),
            ],
            vec![method(
                "get",
                vec![],
                None,
                vec![
                    annotation("message"),
                    annotation("state"),
                    Annotation::native("inline", test_location(9)),
                ],
            )],
        )],
    };

    let contract_program = ContractProgram::new(&program).expect("warnings don't fail the run");
    let warnings = &contract_program.warnings;

    assert_eq!(warnings.len(), 4);
    assert!(warnings
        .iter()
        .all(|warning| warning.warning_kind == WarningKind::IgnoredAnnotation));
    assert!(warnings[0].msg.contains("'@topic'"));
    assert!(warnings[1].msg.contains("'@dynamic'"));
    assert!(warnings[1].msg.contains("without '@state'"));

    // The ignored field doesn't become storage
    assert_eq!(contract_program.contract.storage_fields.len(), 1);
    assert_eq!(contract_program.contract.storage_fields[0].field.name, "owner");
}

#[test]
fn duplicate_keys_warn() {
    let program = SourceProgram {
        classes: vec![contract_class(vec![field(
            "value",
            DeclaredType::primitive("bool"),
            vec![annotation_with_pairs(
                "state",
                &[("lazy", "true"), ("lazy", "false")],
            )],
        )])],
    };

    let contract_program = ContractProgram::new(&program).expect("duplicates only warn");
    assert_eq!(contract_program.warnings.len(), 1);
    assert_eq!(
        contract_program.warnings[0].warning_kind,
        WarningKind::DuplicateAnnotationKey
    );
    assert_eq!(contract_program.warnings[0].msg, "lazy");
    assert!(!contract_program.contract.storage_fields[0].lazy);
}

#[test]
fn typo_anywhere_in_the_program_fails_and_keeps_earlier_warnings() {
    let program = SourceProgram {
        classes: vec![
            class("Vault", vec![annotation("contract"), annotation("topic")], vec![], vec![]),
            class(
                "Helper",
                vec![],
                vec![field("flag", DeclaredType::primitive("bool"), vec![annotation("sate")])],
                vec![],
            ),
        ],
    };

    let messages = analysis_error(&program);
    assert_eq!(messages.errors[0].error_type, ErrorType::UnsupportedAnnotation);
    assert_eq!(messages.errors[0].suggestion(), Some("state"));
    assert_eq!(messages.warnings.len(), 1);
}
