use crate::compiler_messages::compiler_errors::{ErrorMetaDataKey, ErrorType};
use crate::metadata::type_registry::{Field, TypeEntry, TypeIndex, TypeRegistry, TypeTableEntry};
use crate::program::declarations::SourceProgram;
use crate::program::declared_types::DeclaredType;
use crate::program::tests::test_support::{class, field, my_data_program, test_location};
use crate::settings::{Config, WellKnownComposite};

fn named(name: &str, ty: u32) -> Field {
    Field {
        name: Some(name.to_owned()),
        ty: TypeIndex(ty),
    }
}

fn account_program() -> SourceProgram {
    SourceProgram {
        classes: vec![class(
            "AccountId",
            vec![],
            vec![field(
                "bytes",
                DeclaredType::sequence(DeclaredType::primitive("u8")),
                vec![],
            )],
            vec![],
        )],
    }
}

#[test]
fn composite_with_sequence_of_composites() {
    let program = my_data_program();
    let config = Config::default();
    let mut registry = TypeRegistry::new(&program, &config);

    let index = registry
        .resolve(&DeclaredType::composite("MyData"), &test_location(1))
        .expect("MyData should resolve");
    assert_eq!(index, TypeIndex(0));

    let Some(TypeTableEntry::Composite { fields }) = registry.entry(index) else {
        panic!("MyData should be a composite");
    };
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0], named("a", 1));
    assert_eq!(fields[1].ty, fields[0].ty);
    assert_eq!(fields[2].ty, fields[0].ty);

    let Some(TypeTableEntry::Sequence { element }) = registry.entry(fields[3].ty) else {
        panic!("d should be a sequence");
    };
    let Some(TypeTableEntry::Composite { fields: asset_fields }) = registry.entry(*element) else {
        panic!("the sequence element should be the Asset composite");
    };
    assert_eq!(asset_fields.len(), 2);

    let table = registry.seal().expect("every slot should be filled");
    assert_eq!(
        table,
        vec![
            TypeEntry {
                id: TypeIndex(0),
                def: TypeTableEntry::Composite {
                    fields: vec![named("a", 1), named("b", 1), named("c", 1), named("d", 2)],
                },
            },
            TypeEntry {
                id: TypeIndex(1),
                def: TypeTableEntry::Primitive(String::from("u64")),
            },
            TypeEntry {
                id: TypeIndex(2),
                def: TypeTableEntry::Sequence {
                    element: TypeIndex(3)
                },
            },
            TypeEntry {
                id: TypeIndex(3),
                def: TypeTableEntry::Composite {
                    fields: vec![named("id", 4), named("owner", 5)],
                },
            },
            TypeEntry {
                id: TypeIndex(4),
                def: TypeTableEntry::Primitive(String::from("u32")),
            },
            TypeEntry {
                id: TypeIndex(5),
                def: TypeTableEntry::Primitive(String::from("str")),
            },
        ]
    );
}

#[test]
fn same_key_resolves_to_same_index() {
    let program = SourceProgram::default();
    let config = Config::default();
    let mut registry = TypeRegistry::new(&program, &config);

    let first = registry
        .resolve(&DeclaredType::primitive("string"), &test_location(1))
        .expect("string resolves");
    let second = registry
        .resolve(&DeclaredType::primitive("String"), &test_location(2))
        .expect("String resolves");
    let other = registry
        .resolve(&DeclaredType::primitive("u8"), &test_location(3))
        .expect("u8 resolves");

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.index_of(&DeclaredType::primitive("str")),
        Some(first)
    );
}

#[test]
fn fixed_arrays_and_sequences_are_distinct() {
    let program = SourceProgram::default();
    let config = Config::default();
    let mut registry = TypeRegistry::new(&program, &config);

    let fixed = registry
        .resolve(
            &DeclaredType::fixed_array(DeclaredType::primitive("u8"), 4),
            &test_location(1),
        )
        .expect("fixed array resolves");
    let sequence = registry
        .resolve(
            &DeclaredType::sequence(DeclaredType::primitive("u8")),
            &test_location(1),
        )
        .expect("sequence resolves");

    assert_ne!(fixed, sequence);
    assert_eq!(
        registry.entry(fixed),
        Some(&TypeTableEntry::Array {
            len: 4,
            element: TypeIndex(1)
        })
    );
    assert_eq!(
        registry.entry(sequence),
        Some(&TypeTableEntry::Sequence {
            element: TypeIndex(1)
        })
    );
}

#[test]
fn account_id_arrays_are_fixed_and_positional() {
    let program = account_program();
    let config = Config::default();
    let mut registry = TypeRegistry::new(&program, &config);

    let index = registry
        .resolve(&DeclaredType::composite("AccountId"), &test_location(1))
        .expect("AccountId resolves");

    assert_eq!(
        registry.entry(index),
        Some(&TypeTableEntry::Composite {
            fields: vec![Field {
                name: None,
                ty: TypeIndex(1)
            }],
        })
    );
    assert_eq!(
        registry.entry(TypeIndex(1)),
        Some(&TypeTableEntry::Array {
            len: 32,
            element: TypeIndex(2)
        })
    );

    let members = registry.composite_fields(index).expect("AccountId is a composite");
    assert_eq!(members[0].ty, TypeIndex(1));
    assert_eq!(registry.composite_fields(TypeIndex(1)), None);
}

#[test]
fn well_known_table_comes_from_config() {
    let program = account_program();
    let config = Config {
        well_known: vec![WellKnownComposite {
            name: String::from("AccountId"),
            array_capacity: 20,
            positional: false,
        }],
        ..Config::default()
    };
    let mut registry = TypeRegistry::new(&program, &config);

    registry
        .resolve(&DeclaredType::composite("AccountId"), &test_location(1))
        .expect("AccountId resolves");

    assert_eq!(
        registry.entry(TypeIndex(0)),
        Some(&TypeTableEntry::Composite {
            fields: vec![named("bytes", 1)],
        })
    );
    assert_eq!(
        registry.entry(TypeIndex(1)),
        Some(&TypeTableEntry::Array {
            len: 20,
            element: TypeIndex(2)
        })
    );

    // Without an override the same declaration is a plain sequence
    let no_overrides = Config {
        well_known: Vec::new(),
        ..Config::default()
    };
    let mut registry = TypeRegistry::new(&program, &no_overrides);
    registry
        .resolve(&DeclaredType::composite("AccountId"), &test_location(1))
        .expect("AccountId resolves");
    assert_eq!(
        registry.entry(TypeIndex(1)),
        Some(&TypeTableEntry::Sequence {
            element: TypeIndex(2)
        })
    );
}

#[test]
fn maps_become_key_value_composites() {
    let program = account_program();
    let config = Config::default();
    let mut registry = TypeRegistry::new(&program, &config);

    let index = registry
        .resolve(
            &DeclaredType::map(
                DeclaredType::composite("AccountId"),
                DeclaredType::primitive("u128"),
            ),
            &test_location(1),
        )
        .expect("map resolves");

    assert_eq!(index, TypeIndex(0));
    assert_eq!(
        registry.entry(index),
        Some(&TypeTableEntry::Composite {
            fields: vec![named("key_index", 1), named("value", 4)],
        })
    );
    assert_eq!(
        registry.entry(TypeIndex(4)),
        Some(&TypeTableEntry::Primitive(String::from("u128")))
    );
}

#[test]
fn self_referencing_composite_terminates() {
    let program = SourceProgram {
        classes: vec![class(
            "Node",
            vec![],
            vec![
                field("value", DeclaredType::primitive("u32"), vec![]),
                field(
                    "children",
                    DeclaredType::sequence(DeclaredType::composite("Node")),
                    vec![],
                ),
            ],
            vec![],
        )],
    };
    let config = Config::default();
    let mut registry = TypeRegistry::new(&program, &config);

    let index = registry
        .resolve(&DeclaredType::composite("Node"), &test_location(1))
        .expect("recursive composite resolves");

    assert_eq!(
        registry.entry(TypeIndex(2)),
        Some(&TypeTableEntry::Sequence { element: index })
    );
    assert_eq!(registry.seal().map(|table| table.len()), Ok(3));
}

#[test]
fn unresolvable_types_are_type_errors() {
    let program = SourceProgram::default();
    let config = Config::default();
    let mut registry = TypeRegistry::new(&program, &config);

    let err = registry
        .resolve(&DeclaredType::composite("Missing"), &test_location(1))
        .expect_err("no declaration for Missing");
    assert_eq!(err.error_type, ErrorType::Type);
    assert_eq!(err.metadata_value(ErrorMetaDataKey::TypeKey), Some("Missing"));

    let err = registry
        .resolve(&DeclaredType::primitive("u256"), &test_location(1))
        .expect_err("u256 is not an ABI primitive");
    assert_eq!(err.error_type, ErrorType::Type);

    let mut broken_map = DeclaredType::map(
        DeclaredType::primitive("u8"),
        DeclaredType::primitive("u8"),
    );
    broken_map.arguments.pop();
    let err = registry
        .resolve(&broken_map, &test_location(1))
        .expect_err("a map needs two type arguments");
    assert_eq!(err.error_type, ErrorType::Type);

    assert!(registry.is_empty());
}
