//! The built-in "native" type system: the host runtime's type universe
//!
//! This system models what a runtime type-hint would describe: plain `bool`,
//! machine integers, `f64`, strings, calendar dates, wall-clock datetimes and
//! the usual generic containers. Width information does not survive in the
//! native world, so the scalar adapters collapse on the way in (`Int` becomes
//! `Int64`) while every canonical width lowers on the way out (`Int8` through
//! `Int64` all become `Int`). Priorities make the collapse deterministic.

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::error::{Result, TesseraError};
use crate::system::{TypeAdapter, TypeSystem};
use crate::types::{TimestampPrecision, Type};

/// Schema representation of the native type system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeType {
    Bool,
    Int,
    Float,
    Str,
    NoneType,
    Date,
    DateTime,
    List(Box<NativeType>),
    Dict(Box<NativeType>, Box<NativeType>),
    Record {
        name: String,
        fields: IndexMap<String, NativeType>,
    },
}

/// A single entry of the scalar lookup table
///
/// One adapter per (native scalar, canonical scalar) pair; the priority
/// ranks adapters sharing a native scalar so `to_canonical` picks the
/// widest width.
struct ScalarAdapter {
    key: &'static str,
    priority: u32,
    external: NativeType,
    canonical: Type,
}

impl TypeAdapter<NativeType> for ScalarAdapter {
    fn key(&self) -> &'static str {
        self.key
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn matches_external(&self, external: &NativeType) -> bool {
        *external == self.external
    }

    fn matches_canonical(&self, ty: &Type) -> bool {
        ty.kind() == self.canonical.kind()
    }

    fn to_canonical(&self, _system: &TypeSystem<NativeType>, _external: &NativeType) -> Result<Type> {
        Ok(self.canonical.clone())
    }

    fn to_external(&self, _system: &TypeSystem<NativeType>, _ty: &Type) -> Result<NativeType> {
        Ok(self.external.clone())
    }
}

/// Native datetimes resolve to microseconds; every canonical precision
/// lowers to the same `DateTime`
struct DateTimeAdapter;

impl TypeAdapter<NativeType> for DateTimeAdapter {
    fn key(&self) -> &'static str {
        "datetime"
    }

    fn matches_external(&self, external: &NativeType) -> bool {
        *external == NativeType::DateTime
    }

    fn matches_canonical(&self, ty: &Type) -> bool {
        matches!(ty, Type::Timestamp { .. })
    }

    fn to_canonical(&self, _system: &TypeSystem<NativeType>, _external: &NativeType) -> Result<Type> {
        Ok(Type::Timestamp {
            precision: TimestampPrecision::Microsecond,
        })
    }

    fn to_external(&self, _system: &TypeSystem<NativeType>, _ty: &Type) -> Result<NativeType> {
        Ok(NativeType::DateTime)
    }
}

struct ListAdapter;

impl TypeAdapter<NativeType> for ListAdapter {
    fn key(&self) -> &'static str {
        "list"
    }

    fn matches_external(&self, external: &NativeType) -> bool {
        matches!(external, NativeType::List(_))
    }

    fn matches_canonical(&self, ty: &Type) -> bool {
        matches!(ty, Type::List { .. })
    }

    fn to_canonical(&self, system: &TypeSystem<NativeType>, external: &NativeType) -> Result<Type> {
        match external {
            NativeType::List(item) => Ok(Type::List {
                value_type: Box::new(system.to_canonical(item)?),
                partition_fields: IndexMap::new(),
            }),
            other => Err(TesseraError::not_supported(format!(
                "list adapter cannot convert {:?}",
                other,
            ))),
        }
    }

    fn to_external(&self, system: &TypeSystem<NativeType>, ty: &Type) -> Result<NativeType> {
        match ty {
            Type::List { value_type, .. } => {
                Ok(NativeType::List(Box::new(system.to_external(value_type)?)))
            }
            other => Err(TesseraError::not_supported(format!(
                "list adapter cannot convert {}",
                other.type_name(),
            ))),
        }
    }
}

struct DictAdapter;

impl TypeAdapter<NativeType> for DictAdapter {
    fn key(&self) -> &'static str {
        "dict"
    }

    fn matches_external(&self, external: &NativeType) -> bool {
        matches!(external, NativeType::Dict(_, _))
    }

    fn matches_canonical(&self, ty: &Type) -> bool {
        matches!(ty, Type::Map { .. })
    }

    fn to_canonical(&self, system: &TypeSystem<NativeType>, external: &NativeType) -> Result<Type> {
        match external {
            NativeType::Dict(key, value) => Ok(Type::Map {
                key_type: Box::new(system.to_canonical(key)?),
                value_type: Box::new(system.to_canonical(value)?),
            }),
            other => Err(TesseraError::not_supported(format!(
                "dict adapter cannot convert {:?}",
                other,
            ))),
        }
    }

    fn to_external(&self, system: &TypeSystem<NativeType>, ty: &Type) -> Result<NativeType> {
        match ty {
            Type::Map {
                key_type,
                value_type,
            } => Ok(NativeType::Dict(
                Box::new(system.to_external(key_type)?),
                Box::new(system.to_external(value_type)?),
            )),
            other => Err(TesseraError::not_supported(format!(
                "dict adapter cannot convert {}",
                other.type_name(),
            ))),
        }
    }
}

struct RecordAdapter;

impl TypeAdapter<NativeType> for RecordAdapter {
    fn key(&self) -> &'static str {
        "record"
    }

    fn matches_external(&self, external: &NativeType) -> bool {
        matches!(external, NativeType::Record { .. })
    }

    fn matches_canonical(&self, ty: &Type) -> bool {
        matches!(ty, Type::Struct { .. })
    }

    fn to_canonical(&self, system: &TypeSystem<NativeType>, external: &NativeType) -> Result<Type> {
        match external {
            NativeType::Record { name, fields } => {
                let mut converted = IndexMap::with_capacity(fields.len());
                for (field_name, field_type) in fields {
                    converted.insert(field_name.clone(), system.to_canonical(field_type)?);
                }
                Ok(Type::Struct {
                    name: Some(name.clone()),
                    fields: converted,
                })
            }
            other => Err(TesseraError::not_supported(format!(
                "record adapter cannot convert {:?}",
                other,
            ))),
        }
    }

    fn to_external(&self, system: &TypeSystem<NativeType>, ty: &Type) -> Result<NativeType> {
        match ty {
            Type::Struct { name, fields } => {
                let name = name.clone().ok_or_else(|| {
                    TesseraError::not_supported(
                        "anonymous Struct cannot be lowered to a native record".to_string(),
                    )
                })?;
                let mut converted = IndexMap::with_capacity(fields.len());
                for (field_name, field_type) in fields {
                    converted.insert(field_name.clone(), system.to_external(field_type)?);
                }
                Ok(NativeType::Record {
                    name,
                    fields: converted,
                })
            }
            other => Err(TesseraError::not_supported(format!(
                "record adapter cannot convert {}",
                other.type_name(),
            ))),
        }
    }
}

fn scalar(key: &'static str, priority: u32, external: NativeType, canonical: Type) -> Arc<ScalarAdapter> {
    Arc::new(ScalarAdapter {
        key,
        priority,
        external,
        canonical,
    })
}

static NATIVE_TYPE_SYSTEM: Lazy<TypeSystem<NativeType>> = Lazy::new(|| {
    let mut system = TypeSystem::new("native");
    let adapters: Vec<Arc<dyn TypeAdapter<NativeType>>> = vec![
        scalar("bool", 0, NativeType::Bool, Type::Boolean),
        scalar("int8", 8, NativeType::Int, Type::Int8),
        scalar("int16", 16, NativeType::Int, Type::Int16),
        scalar("int32", 32, NativeType::Int, Type::Int32),
        scalar("int64", 64, NativeType::Int, Type::Int64),
        scalar("float16", 16, NativeType::Float, Type::Float16),
        scalar("float32", 32, NativeType::Float, Type::Float32),
        scalar("float64", 64, NativeType::Float, Type::Float64),
        scalar("str", 0, NativeType::Str, Type::String),
        scalar("none", 0, NativeType::NoneType, Type::Null),
        scalar("date", 0, NativeType::Date, Type::Date),
        Arc::new(DateTimeAdapter),
        Arc::new(ListAdapter),
        Arc::new(DictAdapter),
        Arc::new(RecordAdapter),
    ];
    for adapter in adapters {
        // keys are distinct literals, a conflict here is unreachable
        system
            .register_adapter(adapter)
            .expect("native adapter keys are distinct");
    }
    system
});

/// The process-wide native type system, populated once at first use
pub fn native_type_system() -> &'static TypeSystem<NativeType> {
    &NATIVE_TYPE_SYSTEM
}
