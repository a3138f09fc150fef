use std::sync::Arc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::types::{TimestampPrecision, TypeKind};

/// Canonical in-memory value, the instance counterpart of [`crate::Type`]
///
/// Adapters produce and consume these when converting external instances
/// (`to_canonical_value` / `to_external_value`); `Enum` items are also held
/// as values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    // Numeric types
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float16(OrderedFloat<f32>), // f16 carried as f32
    Float32(OrderedFloat<f32>),
    Float64(OrderedFloat<f64>),

    // Basic types
    Boolean(bool),
    String(Arc<str>),

    // Temporal types
    Date(jiff::civil::Date),
    Timestamp(jiff::Timestamp, TimestampPrecision),

    // Complex types
    List(Vec<Value>),
    Map(Vec<(Value, Value)>), // Vec of pairs for deterministic ordering
    Struct(IndexMap<Arc<str>, Value>), // preserves field order

    // Null value
    Null,
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int8(i) => i.hash(state),
            Value::Int16(i) => i.hash(state),
            Value::Int32(i) => i.hash(state),
            Value::Int64(i) => i.hash(state),
            Value::Float16(f) => f.hash(state),
            Value::Float32(f) => f.hash(state),
            Value::Float64(f) => f.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::String(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Timestamp(ts, precision) => {
                ts.hash(state);
                precision.hash(state);
            }
            Value::List(l) => l.hash(state),
            Value::Map(m) => m.hash(state),
            Value::Struct(r) => {
                // IndexMap preserves insertion order, so hash is deterministic
                for (k, v) in r {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Value::Null => 0_i32.hash(state),
        }
    }
}

impl Value {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The [`TypeKind`] this value inhabits
    pub fn kind(&self) -> TypeKind {
        match self {
            Value::Int8(_) => TypeKind::Int8,
            Value::Int16(_) => TypeKind::Int16,
            Value::Int32(_) => TypeKind::Int32,
            Value::Int64(_) => TypeKind::Int64,
            Value::Float16(_) => TypeKind::Float16,
            Value::Float32(_) => TypeKind::Float32,
            Value::Float64(_) => TypeKind::Float64,
            Value::Boolean(_) => TypeKind::Boolean,
            Value::String(_) => TypeKind::String,
            Value::Date(_) => TypeKind::Date,
            Value::Timestamp(_, _) => TypeKind::Timestamp,
            Value::List(_) => TypeKind::List,
            Value::Map(_) => TypeKind::Map,
            Value::Struct(_) => TypeKind::Struct,
            Value::Null => TypeKind::Null,
        }
    }

    /// Get the type name of the value
    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }
}
