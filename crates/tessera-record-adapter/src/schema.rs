//! Bidirectional conversion between record classes and canonical types
//!
//! The forward walk strips one `Optional` wrapper per field (the stripped
//! flag reaches the post-conversion hook as `required`), recurses into
//! mappings, sequences, literals and nested records, and resolves scalars
//! through a fixed lookup table. The reverse walk synthesizes a fresh
//! record class from a `Struct` using the strict inverse of that table:
//! canonical constructs the record world cannot express (narrow integers and
//! floats, `Null`, non-string enums, partitioned lists, anonymous structs)
//! are errors, never silently coerced.

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tessera_core::{Result, TesseraError, Type, TypeAdapter, TypeSystem, Value};

use crate::descriptor::{FieldType, RecordClass};

/// Convert a record class into a canonical `Struct` named after it
pub fn record_to_canonical(class: &RecordClass) -> Result<Type> {
    let ignored = class.ignored_fields();
    let mut fields = IndexMap::with_capacity(class.fields().len());
    for (name, declared) in class.fields() {
        if ignored.contains(name) {
            continue;
        }
        let (inner, required) = strip_optional(declared);
        let converted = field_to_canonical(name, inner)?;
        let converted = class.post_field_conversion(converted, name, required);
        fields.insert(name.clone(), converted);
    }
    Ok(Type::Struct {
        name: Some(class.name().to_string()),
        fields,
    })
}

fn strip_optional(declared: &FieldType) -> (&FieldType, bool) {
    match declared {
        FieldType::Optional(inner) => (inner, false),
        other => (other, true),
    }
}

fn field_to_canonical(name: &str, declared: &FieldType) -> Result<Type> {
    match declared {
        FieldType::Bool => Ok(Type::Boolean),
        FieldType::Int => Ok(Type::Int64),
        FieldType::Float => Ok(Type::Float64),
        FieldType::Str => Ok(Type::String),
        FieldType::Date => Ok(Type::Date),
        FieldType::DateTime { precision } => Ok(Type::Timestamp {
            precision: *precision,
        }),
        FieldType::Literal(items) => Ok(Type::Enum {
            name: Some(name.to_string()),
            value_type: Box::new(Type::String),
            items: items
                .iter()
                .map(|item| Value::String(Arc::from(item.as_str())))
                .collect(),
        }),
        FieldType::Sequence(item) => Ok(Type::List {
            value_type: Box::new(field_to_canonical(name, item)?),
            partition_fields: IndexMap::new(),
        }),
        FieldType::Mapping(key, value) => Ok(Type::Map {
            key_type: Box::new(field_to_canonical(name, key)?),
            value_type: Box::new(field_to_canonical(name, value)?),
        }),
        FieldType::Record(class) => record_to_canonical(class),
        FieldType::Optional(_) => Err(TesseraError::not_supported(format!(
            "field '{}': Optional is only supported at the top of a field declaration",
            name,
        ))),
    }
}

/// Synthesize a fresh record class from a canonical `Struct`
pub fn canonical_to_record(ty: &Type) -> Result<RecordClass> {
    let Type::Struct { name, fields } = ty else {
        return Err(TesseraError::not_supported(format!(
            "only a Struct can be lowered to a record class, got {}",
            ty.type_name(),
        )));
    };
    let name = name.clone().ok_or_else(|| {
        TesseraError::not_supported(
            "anonymous Struct cannot be lowered to a record class".to_string(),
        )
    })?;
    let mut builder = RecordClass::builder(name);
    for (field_name, field_type) in fields {
        builder = builder.field(field_name.clone(), canonical_to_field(field_name, field_type)?);
    }
    Ok(builder.build())
}

fn canonical_to_field(name: &str, ty: &Type) -> Result<FieldType> {
    match ty {
        Type::Boolean => Ok(FieldType::Bool),
        Type::Int64 => Ok(FieldType::Int),
        Type::Float64 => Ok(FieldType::Float),
        Type::String => Ok(FieldType::Str),
        Type::Date => Ok(FieldType::Date),
        Type::Timestamp { precision } => Ok(FieldType::DateTime {
            precision: *precision,
        }),
        Type::Enum {
            value_type, items, ..
        } => {
            if **value_type != Type::String {
                return Err(TesseraError::not_supported(format!(
                    "field '{}': only a String enum can be lowered to a literal choice, got an enum over {}",
                    name,
                    value_type.type_name(),
                )));
            }
            let literals = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.to_string()),
                    other => Err(TesseraError::not_supported(format!(
                        "field '{}': enum item of type {} cannot be lowered to a string literal",
                        name,
                        other.type_name(),
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(FieldType::Literal(literals))
        }
        Type::List {
            value_type,
            partition_fields,
        } => {
            if !partition_fields.is_empty() {
                return Err(TesseraError::not_supported(format!(
                    "field '{}': a List with partition fields cannot be represented in a record class",
                    name,
                )));
            }
            Ok(FieldType::Sequence(Box::new(canonical_to_field(
                name, value_type,
            )?)))
        }
        Type::Map {
            key_type,
            value_type,
        } => Ok(FieldType::Mapping(
            Box::new(canonical_to_field(name, key_type)?),
            Box::new(canonical_to_field(name, value_type)?),
        )),
        Type::Struct { .. } => Ok(FieldType::Record(Arc::new(canonical_to_record(ty)?))),
        other => Err(TesseraError::not_supported(format!(
            "field '{}': {} has no record class counterpart",
            name,
            other.type_name(),
        ))),
    }
}

/// The single adapter of the record type system: any record class converts,
/// and only a `Struct` lowers
#[derive(Debug, Default)]
pub struct RecordTypeAdapter;

impl TypeAdapter<RecordClass> for RecordTypeAdapter {
    fn key(&self) -> &'static str {
        "record"
    }

    fn matches_external(&self, _external: &RecordClass) -> bool {
        true
    }

    fn matches_canonical(&self, ty: &Type) -> bool {
        matches!(ty, Type::Struct { .. })
    }

    fn to_canonical(&self, _system: &TypeSystem<RecordClass>, external: &RecordClass) -> Result<Type> {
        record_to_canonical(external)
    }

    fn to_external(&self, _system: &TypeSystem<RecordClass>, ty: &Type) -> Result<RecordClass> {
        canonical_to_record(ty)
    }
}

static RECORD_TYPE_SYSTEM: Lazy<TypeSystem<RecordClass>> = Lazy::new(|| {
    let mut system = TypeSystem::new("record");
    system
        .register_adapter(Arc::new(RecordTypeAdapter))
        .expect("fresh type system");
    system
});

/// The process-wide record type system, populated once at first use
pub fn record_type_system() -> &'static TypeSystem<RecordClass> {
    &RECORD_TYPE_SYSTEM
}
