//! Schema-guided conversion between record instances and canonical values
//!
//! Both directions walk the canonical [`Type`] and check the value against
//! the declared shape as they go. Width narrowing is range-checked; a value
//! that does not fit its declared type is an error, not a coercion.

use std::sync::Arc;

use indexmap::IndexMap;
use jiff::civil::Date;
use jiff::Timestamp;
use ordered_float::OrderedFloat;
use tessera_core::{Result, TesseraError, Type, Value};

/// An external record instance: the value-level counterpart of a
/// `RecordClass` declaration
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(Date),
    DateTime(Timestamp),
    Seq(Vec<RecordValue>),
    Map(Vec<(RecordValue, RecordValue)>),
    Record(IndexMap<String, RecordValue>),
    None,
}

impl RecordValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            RecordValue::Bool(_) => "Bool",
            RecordValue::Int(_) => "Int",
            RecordValue::Float(_) => "Float",
            RecordValue::Str(_) => "Str",
            RecordValue::Date(_) => "Date",
            RecordValue::DateTime(_) => "DateTime",
            RecordValue::Seq(_) => "Seq",
            RecordValue::Map(_) => "Map",
            RecordValue::Record(_) => "Record",
            RecordValue::None => "None",
        }
    }
}

fn mismatch(ty: &Type, value: &RecordValue) -> TesseraError {
    TesseraError::not_supported(format!(
        "cannot convert {} value to {}",
        value.type_name(),
        ty.type_name(),
    ))
}

fn narrow<T>(value: i64, ty: &Type) -> Result<T>
where
    T: TryFrom<i64>,
{
    T::try_from(value).map_err(|_| {
        TesseraError::not_supported(format!(
            "integer {} is out of range for {}",
            value,
            ty.type_name(),
        ))
    })
}

/// Convert an external instance to a canonical value under a declared type
pub fn to_canonical_value(ty: &Type, value: &RecordValue) -> Result<Value> {
    match (ty, value) {
        (Type::Boolean, RecordValue::Bool(b)) => Ok(Value::Boolean(*b)),
        (Type::Int8, RecordValue::Int(i)) => Ok(Value::Int8(narrow(*i, ty)?)),
        (Type::Int16, RecordValue::Int(i)) => Ok(Value::Int16(narrow(*i, ty)?)),
        (Type::Int32, RecordValue::Int(i)) => Ok(Value::Int32(narrow(*i, ty)?)),
        (Type::Int64, RecordValue::Int(i)) => Ok(Value::Int64(*i)),
        (Type::Float16, RecordValue::Float(f)) => Ok(Value::Float16(OrderedFloat(*f as f32))),
        (Type::Float32, RecordValue::Float(f)) => Ok(Value::Float32(OrderedFloat(*f as f32))),
        (Type::Float64, RecordValue::Float(f)) => Ok(Value::Float64(OrderedFloat(*f))),
        (Type::String, RecordValue::Str(s)) => Ok(Value::String(Arc::from(s.as_str()))),
        (Type::Date, RecordValue::Date(d)) => Ok(Value::Date(*d)),
        (Type::Timestamp { precision }, RecordValue::DateTime(ts)) => {
            Ok(Value::Timestamp(*ts, *precision))
        }
        (Type::Null, RecordValue::None) => Ok(Value::Null),
        // Enum values convert through the element type; membership in the
        // item set is data validation and out of scope here
        (Type::Enum { value_type, .. }, _) => to_canonical_value(value_type, value),
        (Type::List { value_type, .. }, RecordValue::Seq(items)) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(to_canonical_value(value_type, item)?);
            }
            Ok(Value::List(converted))
        }
        (
            Type::Map {
                key_type,
                value_type,
            },
            RecordValue::Map(pairs),
        ) => {
            let mut converted = Vec::with_capacity(pairs.len());
            for (key, val) in pairs {
                converted.push((
                    to_canonical_value(key_type, key)?,
                    to_canonical_value(value_type, val)?,
                ));
            }
            Ok(Value::Map(converted))
        }
        (Type::Struct { fields, .. }, RecordValue::Record(entries)) => {
            let mut converted = IndexMap::with_capacity(fields.len());
            for (name, field_type) in fields {
                let field_value = entries.get(name).ok_or_else(|| {
                    TesseraError::not_supported(format!(
                        "record value is missing field '{}'",
                        name,
                    ))
                })?;
                converted.insert(
                    Arc::<str>::from(name.as_str()),
                    to_canonical_value(field_type, field_value)?,
                );
            }
            if let Some(extra) = entries.keys().find(|name| !fields.contains_key(*name)) {
                return Err(TesseraError::not_supported(format!(
                    "record value carries undeclared field '{}'",
                    extra,
                )));
            }
            Ok(Value::Struct(converted))
        }
        (ty, value) => Err(mismatch(ty, value)),
    }
}

/// Convert a canonical value to an external instance under a declared type
pub fn to_external_value(ty: &Type, value: &Value) -> Result<RecordValue> {
    match (ty, value) {
        (Type::Boolean, Value::Boolean(b)) => Ok(RecordValue::Bool(*b)),
        (Type::Int8, Value::Int8(i)) => Ok(RecordValue::Int(i64::from(*i))),
        (Type::Int16, Value::Int16(i)) => Ok(RecordValue::Int(i64::from(*i))),
        (Type::Int32, Value::Int32(i)) => Ok(RecordValue::Int(i64::from(*i))),
        (Type::Int64, Value::Int64(i)) => Ok(RecordValue::Int(*i)),
        (Type::Float16, Value::Float16(f)) => Ok(RecordValue::Float(f64::from(f.into_inner()))),
        (Type::Float32, Value::Float32(f)) => Ok(RecordValue::Float(f64::from(f.into_inner()))),
        (Type::Float64, Value::Float64(f)) => Ok(RecordValue::Float(f.into_inner())),
        (Type::String, Value::String(s)) => Ok(RecordValue::Str(s.to_string())),
        (Type::Date, Value::Date(d)) => Ok(RecordValue::Date(*d)),
        (Type::Timestamp { .. }, Value::Timestamp(ts, _)) => Ok(RecordValue::DateTime(*ts)),
        (Type::Null, Value::Null) => Ok(RecordValue::None),
        (Type::Enum { value_type, .. }, _) => to_external_value(value_type, value),
        (Type::List { value_type, .. }, Value::List(items)) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(to_external_value(value_type, item)?);
            }
            Ok(RecordValue::Seq(converted))
        }
        (
            Type::Map {
                key_type,
                value_type,
            },
            Value::Map(pairs),
        ) => {
            let mut converted = Vec::with_capacity(pairs.len());
            for (key, val) in pairs {
                converted.push((
                    to_external_value(key_type, key)?,
                    to_external_value(value_type, val)?,
                ));
            }
            Ok(RecordValue::Map(converted))
        }
        (Type::Struct { fields, .. }, Value::Struct(entries)) => {
            let mut converted = IndexMap::with_capacity(fields.len());
            for (name, field_type) in fields {
                let field_value = entries.get(name.as_str()).ok_or_else(|| {
                    TesseraError::not_supported(format!(
                        "struct value is missing field '{}'",
                        name,
                    ))
                })?;
                converted.insert(name.clone(), to_external_value(field_type, field_value)?);
            }
            Ok(RecordValue::Record(converted))
        }
        (ty, value) => Err(TesseraError::not_supported(format!(
            "cannot convert {} value to {}",
            value.type_name(),
            ty.type_name(),
        ))),
    }
}
