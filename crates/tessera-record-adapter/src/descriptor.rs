use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tessera_core::{TimestampPrecision, Type};

use crate::hooks::{IgnoredFieldsProvider, PostConversionHook};

/// The declared type of one record field
///
/// This is the external system's view of a field: what a structured-object
/// modeling library would record from a declaration. Optionality is part of
/// the declaration (`Optional`), not of the inner type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Str,
    Date,
    DateTime { precision: TimestampPrecision },
    /// A closed choice over string literals
    Literal(Vec<String>),
    Sequence(Box<FieldType>),
    Mapping(Box<FieldType>, Box<FieldType>),
    Record(Arc<RecordClass>),
    Optional(Box<FieldType>),
}

/// An external structured-object description: a named class with declared,
/// ordered fields
///
/// The two conversion hooks are optional capabilities; a class that does not
/// carry them gets the documented defaults (no ignored fields, identity
/// post-conversion). Hooks do not participate in equality: two classes are
/// equal when their names and field declarations match.
#[derive(Clone)]
pub struct RecordClass {
    name: String,
    fields: IndexMap<String, FieldType>,
    ignored_fields_hook: Option<Arc<dyn IgnoredFieldsProvider>>,
    post_conversion_hook: Option<Arc<dyn PostConversionHook>>,
}

impl RecordClass {
    pub fn builder(name: impl Into<String>) -> RecordClassBuilder {
        RecordClassBuilder {
            name: name.into(),
            fields: IndexMap::new(),
            ignored_fields_hook: None,
            post_conversion_hook: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &IndexMap<String, FieldType> {
        &self.fields
    }

    /// Field names excluded from conversion; empty without the capability
    pub fn ignored_fields(&self) -> BTreeSet<String> {
        match &self.ignored_fields_hook {
            Some(hook) => hook.ignored_fields(),
            None => BTreeSet::new(),
        }
    }

    /// Apply the post-conversion capability; identity without it
    pub fn post_field_conversion(&self, ty: Type, name: &str, required: bool) -> Type {
        match &self.post_conversion_hook {
            Some(hook) => hook.post_field_conversion(ty, name, required),
            None => ty,
        }
    }
}

impl fmt::Debug for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordClass")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("ignored_fields_hook", &self.ignored_fields_hook.is_some())
            .field("post_conversion_hook", &self.post_conversion_hook.is_some())
            .finish()
    }
}

impl PartialEq for RecordClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

/// Builder for record classes
pub struct RecordClassBuilder {
    name: String,
    fields: IndexMap<String, FieldType>,
    ignored_fields_hook: Option<Arc<dyn IgnoredFieldsProvider>>,
    post_conversion_hook: Option<Arc<dyn PostConversionHook>>,
}

impl RecordClassBuilder {
    /// Declare a field; redeclaring a name replaces the earlier declaration
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    pub fn ignored_fields_hook(mut self, hook: Arc<dyn IgnoredFieldsProvider>) -> Self {
        self.ignored_fields_hook = Some(hook);
        self
    }

    pub fn post_conversion_hook(mut self, hook: Arc<dyn PostConversionHook>) -> Self {
        self.post_conversion_hook = Some(hook);
        self
    }

    pub fn build(self) -> RecordClass {
        RecordClass {
            name: self.name,
            fields: self.fields,
            ignored_fields_hook: self.ignored_fields_hook,
            post_conversion_hook: self.post_conversion_hook,
        }
    }
}
