use std::sync::Arc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tessera_core::{TesseraError, TimestampPrecision, Type, Value};
use tessera_record_adapter::*;

fn row_type() -> Type {
    Type::Struct {
        name: Some("Row".to_string()),
        fields: IndexMap::from([
            ("id".to_string(), Type::Int64),
            ("name".to_string(), Type::String),
            ("score".to_string(), Type::Float64),
            ("tags".to_string(), Type::list(Type::String)),
        ]),
    }
}

fn row_value() -> RecordValue {
    RecordValue::Record(IndexMap::from([
        ("id".to_string(), RecordValue::Int(7)),
        ("name".to_string(), RecordValue::Str("seven".to_string())),
        ("score".to_string(), RecordValue::Float(0.5)),
        (
            "tags".to_string(),
            RecordValue::Seq(vec![
                RecordValue::Str("a".to_string()),
                RecordValue::Str("b".to_string()),
            ]),
        ),
    ]))
}

#[test]
fn test_record_value_to_canonical() {
    let converted = to_canonical_value(&row_type(), &row_value()).unwrap();

    let Value::Struct(entries) = &converted else {
        panic!("expected a Struct value");
    };
    assert_eq!(entries["id"], Value::Int64(7));
    assert_eq!(entries["name"], Value::String(Arc::from("seven")));
    assert_eq!(entries["score"], Value::Float64(OrderedFloat(0.5)));
    assert_eq!(
        entries["tags"],
        Value::List(vec![
            Value::String(Arc::from("a")),
            Value::String(Arc::from("b")),
        ]),
    );
}

#[test]
fn test_value_round_trip() {
    let ty = row_type();
    let original = row_value();

    let canonical = to_canonical_value(&ty, &original).unwrap();
    let external = to_external_value(&ty, &canonical).unwrap();
    assert_eq!(external, original);
}

#[test]
fn test_temporal_value_conversion() {
    let day: jiff::civil::Date = "2024-01-02".parse().unwrap();
    assert_eq!(
        to_canonical_value(&Type::Date, &RecordValue::Date(day)).unwrap(),
        Value::Date(day),
    );

    let at: jiff::Timestamp = "2024-01-02T03:04:05Z".parse().unwrap();
    let ty = Type::timestamp(TimestampPrecision::Millisecond);
    assert_eq!(
        to_canonical_value(&ty, &RecordValue::DateTime(at)).unwrap(),
        Value::Timestamp(at, TimestampPrecision::Millisecond),
    );
    assert_eq!(
        to_external_value(&ty, &Value::Timestamp(at, TimestampPrecision::Millisecond)).unwrap(),
        RecordValue::DateTime(at),
    );
}

#[test]
fn test_narrowing_is_range_checked() {
    assert_eq!(
        to_canonical_value(&Type::Int8, &RecordValue::Int(100)).unwrap(),
        Value::Int8(100),
    );

    let err = to_canonical_value(&Type::Int8, &RecordValue::Int(300)).unwrap_err();
    assert!(matches!(err, TesseraError::NotSupported(_)));
    assert!(err.to_string().contains("300"));
}

#[test]
fn test_type_mismatch_rejected() {
    let err = to_canonical_value(&Type::Int64, &RecordValue::Str("7".to_string())).unwrap_err();
    assert!(matches!(err, TesseraError::NotSupported(_)));
    assert!(err.to_string().contains("Str"));
    assert!(err.to_string().contains("Int64"));
}

#[test]
fn test_null_values() {
    assert_eq!(
        to_canonical_value(&Type::Null, &RecordValue::None).unwrap(),
        Value::Null,
    );
    assert_eq!(
        to_external_value(&Type::Null, &Value::Null).unwrap(),
        RecordValue::None,
    );
    assert!(to_canonical_value(&Type::Null, &RecordValue::Int(0)).is_err());
}

#[test]
fn test_enum_values_convert_through_element_type() {
    let ty = Type::Enum {
        name: Some("choice".to_string()),
        value_type: Box::new(Type::String),
        items: vec![Value::String(Arc::from("a")), Value::String(Arc::from("b"))],
    };

    // Membership is not validated here, only the element type shape
    assert_eq!(
        to_canonical_value(&ty, &RecordValue::Str("c".to_string())).unwrap(),
        Value::String(Arc::from("c")),
    );
    assert!(to_canonical_value(&ty, &RecordValue::Int(1)).is_err());
}

#[test]
fn test_missing_and_undeclared_fields_rejected() {
    let ty = row_type();

    let missing = RecordValue::Record(IndexMap::from([(
        "id".to_string(),
        RecordValue::Int(7),
    )]));
    let err = to_canonical_value(&ty, &missing).unwrap_err();
    assert!(err.to_string().contains("missing field 'name'"));

    let RecordValue::Record(mut entries) = row_value() else {
        panic!("expected a Record value");
    };
    entries.insert("undeclared".to_string(), RecordValue::Bool(true));
    let err = to_canonical_value(&ty, &RecordValue::Record(entries)).unwrap_err();
    assert!(err.to_string().contains("undeclared"));
}

#[test]
fn test_map_value_conversion() {
    let ty = Type::map(Type::String, Type::Int64);
    let external = RecordValue::Map(vec![
        (RecordValue::Str("a".to_string()), RecordValue::Int(1)),
        (RecordValue::Str("b".to_string()), RecordValue::Int(2)),
    ]);

    let canonical = to_canonical_value(&ty, &external).unwrap();
    assert_eq!(
        canonical,
        Value::Map(vec![
            (Value::String(Arc::from("a")), Value::Int64(1)),
            (Value::String(Arc::from("b")), Value::Int64(2)),
        ]),
    );
    assert_eq!(to_external_value(&ty, &canonical).unwrap(), external);
}
