use std::fmt;

use indexmap::IndexMap;

use crate::value::Value;

/// Precision carried by a [`Type::Timestamp`]
///
/// Precisions are distinct types for conversion purposes: adapters must
/// round-trip them exactly, never merge them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampPrecision {
    Second,
    Millisecond,
    Microsecond,
}

impl TimestampPrecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampPrecision::Second => "second",
            TimestampPrecision::Millisecond => "millisecond",
            TimestampPrecision::Microsecond => "microsecond",
        }
    }
}

impl fmt::Display for TimestampPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical schema representation, independent of any external type system
///
/// A `Type` is an immutable, recursively composed description of a dataset
/// schema. Construction never fails for well-formed field sets and the model
/// does not self-validate semantic constraints (an Enum with duplicate items
/// or items mismatching its element type is representable); validation is a
/// collaborator's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    // Scalars
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float16,
    Float32,
    Float64,
    String,
    Null,

    // Temporal
    Date,
    Timestamp {
        precision: TimestampPrecision,
    },

    /// A named value set over a declared element type
    Enum {
        name: Option<String>,
        value_type: Box<Type>,
        items: Vec<Value>,
    },

    /// A sequence of a single value type
    ///
    /// `partition_fields` declares which nested scalar fields double as
    /// partition components. The names are not cross-validated against
    /// `value_type`: a declared partition field may reference a field the
    /// value struct does not carry, and derivation only reads this mapping.
    List {
        value_type: Box<Type>,
        partition_fields: IndexMap<String, Type>,
    },

    Map {
        key_type: Box<Type>,
        value_type: Box<Type>,
    },

    /// Named fields in declaration order; names are unique within a struct
    Struct {
        name: Option<String>,
        fields: IndexMap<String, Type>,
    },
}

/// Fieldless discriminant of a [`Type`], used as a registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float16,
    Float32,
    Float64,
    String,
    Null,
    Date,
    Timestamp,
    Enum,
    List,
    Map,
    Struct,
}

impl TypeKind {
    /// Get the logical type name for display
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeKind::Boolean => "Boolean",
            TypeKind::Int8 => "Int8",
            TypeKind::Int16 => "Int16",
            TypeKind::Int32 => "Int32",
            TypeKind::Int64 => "Int64",
            TypeKind::Float16 => "Float16",
            TypeKind::Float32 => "Float32",
            TypeKind::Float64 => "Float64",
            TypeKind::String => "String",
            TypeKind::Null => "Null",
            TypeKind::Date => "Date",
            TypeKind::Timestamp => "Timestamp",
            TypeKind::Enum => "Enum",
            TypeKind::List => "List",
            TypeKind::Map => "Map",
            TypeKind::Struct => "Struct",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl Type {
    /// The discriminant of this type
    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Boolean => TypeKind::Boolean,
            Type::Int8 => TypeKind::Int8,
            Type::Int16 => TypeKind::Int16,
            Type::Int32 => TypeKind::Int32,
            Type::Int64 => TypeKind::Int64,
            Type::Float16 => TypeKind::Float16,
            Type::Float32 => TypeKind::Float32,
            Type::Float64 => TypeKind::Float64,
            Type::String => TypeKind::String,
            Type::Null => TypeKind::Null,
            Type::Date => TypeKind::Date,
            Type::Timestamp { .. } => TypeKind::Timestamp,
            Type::Enum { .. } => TypeKind::Enum,
            Type::List { .. } => TypeKind::List,
            Type::Map { .. } => TypeKind::Map,
            Type::Struct { .. } => TypeKind::Struct,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// A timestamp of the given precision
    pub fn timestamp(precision: TimestampPrecision) -> Type {
        Type::Timestamp { precision }
    }

    /// A list without partition fields
    pub fn list(value_type: Type) -> Type {
        Type::List {
            value_type: Box::new(value_type),
            partition_fields: IndexMap::new(),
        }
    }

    pub fn map(key_type: Type, value_type: Type) -> Type {
        Type::Map {
            key_type: Box::new(key_type),
            value_type: Box::new(value_type),
        }
    }

    /// The declared name, if this variant carries one
    pub fn name(&self) -> Option<&str> {
        match self {
            Type::Enum { name, .. } | Type::Struct { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    /// Copy-with-override of the declared name
    ///
    /// Renames `Enum` and `Struct` variants; every other variant is returned
    /// unchanged since it carries no name.
    pub fn with_name(self, new_name: Option<String>) -> Type {
        match self {
            Type::Enum {
                value_type, items, ..
            } => Type::Enum {
                name: new_name,
                value_type,
                items,
            },
            Type::Struct { fields, .. } => Type::Struct {
                name: new_name,
                fields,
            },
            other => other,
        }
    }
}
