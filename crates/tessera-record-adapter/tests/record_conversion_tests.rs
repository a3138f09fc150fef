use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tessera_core::{TesseraError, TimestampPrecision, Type, Value};
use tessera_record_adapter::*;

fn my_model() -> RecordClass {
    RecordClass::builder("MyModel")
        .field("x", FieldType::Int)
        .field("y", FieldType::Str)
        .field("tags", FieldType::Sequence(Box::new(FieldType::Str)))
        .build()
}

// ====== Forward Conversion ======

#[test]
fn test_struct_field_set_equivalence() {
    let converted = record_to_canonical(&my_model()).unwrap();

    let Type::Struct { name, fields } = &converted else {
        panic!("expected a Struct");
    };
    assert_eq!(name.as_deref(), Some("MyModel"));

    let names: Vec<&str> = fields.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["x", "y", "tags"]);
    assert_eq!(fields["x"], Type::Int64);
    assert_eq!(fields["y"], Type::String);
    assert_eq!(fields["tags"], Type::list(Type::String));
}

#[test]
fn test_literal_enum_named_after_field() {
    let class = RecordClass::builder("Clock")
        .field(
            "precision",
            FieldType::Literal(vec![
                "second".to_string(),
                "millisecond".to_string(),
                "microsecond".to_string(),
            ]),
        )
        .build();

    let converted = record_to_canonical(&class).unwrap();
    let Type::Struct { fields, .. } = &converted else {
        panic!("expected a Struct");
    };
    let Type::Enum {
        name,
        value_type,
        items,
    } = &fields["precision"]
    else {
        panic!("expected an Enum");
    };
    assert_eq!(name.as_deref(), Some("precision"));
    assert_eq!(**value_type, Type::String);
    assert_eq!(
        *items,
        vec![
            Value::String(Arc::from("second")),
            Value::String(Arc::from("millisecond")),
            Value::String(Arc::from("microsecond")),
        ],
    );
}

#[test]
fn test_nested_record_conversion() {
    let class = RecordClass::builder("NestedModel")
        .field("name", FieldType::Str)
        .field("value", FieldType::Record(Arc::new(my_model())))
        .field(
            "stamped_at",
            FieldType::DateTime {
                precision: TimestampPrecision::Millisecond,
            },
        )
        .build();

    let converted = record_to_canonical(&class).unwrap();
    let Type::Struct { fields, .. } = &converted else {
        panic!("expected a Struct");
    };
    assert_eq!(
        fields["stamped_at"],
        Type::timestamp(TimestampPrecision::Millisecond),
    );

    let Type::Struct { name, fields } = &fields["value"] else {
        panic!("expected a nested Struct");
    };
    assert_eq!(name.as_deref(), Some("MyModel"));
    assert_eq!(fields["x"], Type::Int64);
}

#[test]
fn test_mapping_conversion() {
    let class = RecordClass::builder("Lookup")
        .field(
            "scores",
            FieldType::Mapping(Box::new(FieldType::Str), Box::new(FieldType::Float)),
        )
        .build();

    let converted = record_to_canonical(&class).unwrap();
    let Type::Struct { fields, .. } = &converted else {
        panic!("expected a Struct");
    };
    assert_eq!(fields["scores"], Type::map(Type::String, Type::Float64));
}

#[test]
fn test_optional_is_stripped() {
    let class = RecordClass::builder("WithOptional")
        .field("x", FieldType::Optional(Box::new(FieldType::Int)))
        .field("y", FieldType::Int)
        .build();

    let converted = record_to_canonical(&class).unwrap();
    let Type::Struct { fields, .. } = &converted else {
        panic!("expected a Struct");
    };
    // Optionality is stripped before structural matching
    assert_eq!(fields["x"], Type::Int64);
    assert_eq!(fields["y"], Type::Int64);
}

#[test]
fn test_nested_optional_rejected() {
    let class = RecordClass::builder("Bad")
        .field(
            "xs",
            FieldType::Sequence(Box::new(FieldType::Optional(Box::new(FieldType::Int)))),
        )
        .build();

    let err = record_to_canonical(&class).unwrap_err();
    assert!(matches!(err, TesseraError::NotSupported(_)));
    assert!(err.to_string().contains("'xs'"));
}

// ====== Capability Hooks ======

struct IgnoreFields(BTreeSet<String>);

impl IgnoredFieldsProvider for IgnoreFields {
    fn ignored_fields(&self) -> BTreeSet<String> {
        self.0.clone()
    }
}

struct RenameToFieldName;

impl PostConversionHook for RenameToFieldName {
    fn post_field_conversion(&self, ty: Type, name: &str, _required: bool) -> Type {
        ty.with_name(Some(name.to_string()))
    }
}

#[test]
fn test_ignored_fields_excluded_both_ways() {
    let class = RecordClass::builder("WithIgnored")
        .field("i", FieldType::Int)
        .field("kept", FieldType::Str)
        .ignored_fields_hook(Arc::new(IgnoreFields(BTreeSet::from(["i".to_string()]))))
        .build();

    let converted = record_to_canonical(&class).unwrap();
    let Type::Struct { fields, .. } = &converted else {
        panic!("expected a Struct");
    };
    assert!(!fields.contains_key("i"));
    assert!(fields.contains_key("kept"));

    // The freshly generated external class lacks the field too
    let generated = canonical_to_record(&converted).unwrap();
    assert!(!generated.fields().contains_key("i"));
    assert!(generated.fields().contains_key("kept"));
}

#[test]
fn test_post_conversion_hook_renames() {
    let nested = RecordClass::builder("Inner").field("x", FieldType::Str).build();
    let class = RecordClass::builder("WithHook")
        .field("first", FieldType::Record(Arc::new(nested.clone())))
        .field("second", FieldType::Record(Arc::new(nested)))
        .post_conversion_hook(Arc::new(RenameToFieldName))
        .build();

    let converted = record_to_canonical(&class).unwrap();
    let Type::Struct { fields, .. } = &converted else {
        panic!("expected a Struct");
    };
    // The hook stamps each field's name onto the produced sub-type,
    // independent of declaration order
    assert_eq!(fields["first"].name(), Some("first"));
    assert_eq!(fields["second"].name(), Some("second"));
}

struct RecordRequiredFlag;

impl PostConversionHook for RecordRequiredFlag {
    fn post_field_conversion(&self, ty: Type, name: &str, required: bool) -> Type {
        ty.with_name(Some(format!("{}:{}", name, required)))
    }
}

#[test]
fn test_hook_receives_required_flag() {
    let inner = RecordClass::builder("Inner").field("x", FieldType::Str).build();
    let class = RecordClass::builder("WithHook")
        .field("req", FieldType::Record(Arc::new(inner.clone())))
        .field(
            "opt",
            FieldType::Optional(Box::new(FieldType::Record(Arc::new(inner)))),
        )
        .post_conversion_hook(Arc::new(RecordRequiredFlag))
        .build();

    let converted = record_to_canonical(&class).unwrap();
    let Type::Struct { fields, .. } = &converted else {
        panic!("expected a Struct");
    };
    assert_eq!(fields["req"].name(), Some("req:true"));
    assert_eq!(fields["opt"].name(), Some("opt:false"));
}

// ====== Reverse Conversion and Round Trips ======

#[test]
fn test_generated_class_round_trip() {
    let class = RecordClass::builder("Full")
        .field("flag", FieldType::Bool)
        .field("count", FieldType::Int)
        .field("ratio", FieldType::Float)
        .field("label", FieldType::Str)
        .field("day", FieldType::Date)
        .field(
            "at",
            FieldType::DateTime {
                precision: TimestampPrecision::Second,
            },
        )
        .field(
            "choice",
            FieldType::Literal(vec!["a".to_string(), "b".to_string()]),
        )
        .field("tags", FieldType::Sequence(Box::new(FieldType::Str)))
        .field(
            "scores",
            FieldType::Mapping(Box::new(FieldType::Str), Box::new(FieldType::Int)),
        )
        .field("value", FieldType::Record(Arc::new(my_model())))
        .build();

    let canonical = record_to_canonical(&class).unwrap();
    let generated = canonical_to_record(&canonical).unwrap();

    // Hooks aside, the generated class is structurally the original
    assert_eq!(generated, class);

    // And converting the generated class reproduces the canonical type
    assert_eq!(record_to_canonical(&generated).unwrap(), canonical);
}

#[test]
fn test_timestamp_precision_round_trips_exactly() {
    for precision in [
        TimestampPrecision::Second,
        TimestampPrecision::Millisecond,
        TimestampPrecision::Microsecond,
    ] {
        let class = RecordClass::builder("Stamped")
            .field("at", FieldType::DateTime { precision })
            .build();
        let canonical = record_to_canonical(&class).unwrap();
        let generated = canonical_to_record(&canonical).unwrap();
        assert_eq!(generated.fields()["at"], FieldType::DateTime { precision });
    }
}

#[test]
fn test_unmapped_canonical_types_rejected() {
    for ty in [Type::Int32, Type::Int8, Type::Float16, Type::Null] {
        let canonical = Type::Struct {
            name: Some("Narrow".to_string()),
            fields: IndexMap::from([("x".to_string(), ty.clone())]),
        };
        let err = canonical_to_record(&canonical).unwrap_err();
        assert!(matches!(err, TesseraError::NotSupported(_)));
        assert!(err.to_string().contains(ty.type_name()));
    }
}

#[test]
fn test_non_string_enum_rejected() {
    let canonical = Type::Struct {
        name: Some("Rated".to_string()),
        fields: IndexMap::from([(
            "rating".to_string(),
            Type::Enum {
                name: Some("rating".to_string()),
                value_type: Box::new(Type::Int64),
                items: vec![Value::Int64(1), Value::Int64(2)],
            },
        )]),
    };

    let err = canonical_to_record(&canonical).unwrap_err();
    assert!(matches!(err, TesseraError::NotSupported(_)));
    assert!(err.to_string().contains("Int64"));
}

#[test]
fn test_partitioned_list_rejected() {
    let canonical = Type::Struct {
        name: Some("Partitioned".to_string()),
        fields: IndexMap::from([(
            "rows".to_string(),
            Type::List {
                value_type: Box::new(Type::Date),
                partition_fields: IndexMap::from([("day".to_string(), Type::Date)]),
            },
        )]),
    };

    let err = canonical_to_record(&canonical).unwrap_err();
    assert!(matches!(err, TesseraError::NotSupported(_)));
    assert!(err.to_string().contains("partition fields"));
}

#[test]
fn test_anonymous_struct_rejected() {
    let err = canonical_to_record(&Type::Struct {
        name: None,
        fields: IndexMap::from([("x".to_string(), Type::Int64)]),
    })
    .unwrap_err();
    assert!(matches!(err, TesseraError::NotSupported(_)));
    assert!(err.to_string().contains("anonymous"));
}

// ====== Type System Integration ======

#[test]
fn test_record_type_system() {
    let system = record_type_system();
    let canonical = system.to_canonical(&my_model()).unwrap();
    assert!(matches!(canonical, Type::Struct { .. }));

    let generated = system.to_external(&canonical).unwrap();
    assert_eq!(generated, my_model());
}

#[test]
fn test_record_type_system_rejects_non_struct() {
    let err = record_type_system().to_external(&Type::Int64).unwrap_err();
    assert!(matches!(err, TesseraError::MissingRegistration(_)));
}
