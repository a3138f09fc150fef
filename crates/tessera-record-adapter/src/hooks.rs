use std::collections::BTreeSet;

use tessera_core::Type;

/// Optional capability: a record class may declare fields to exclude
/// entirely from conversion
///
/// Absence of the capability means the empty set.
pub trait IgnoredFieldsProvider: Send + Sync {
    fn ignored_fields(&self) -> BTreeSet<String>;
}

/// Optional capability: a record class may rewrite each field's converted
/// type
///
/// Invoked after each field's conversion with the produced sub-type, the
/// field name and whether the field was required (not wrapped in
/// `Optional`). Absence of the capability means identity.
pub trait PostConversionHook: Send + Sync {
    fn post_field_conversion(&self, ty: Type, name: &str, required: bool) -> Type;
}
