//! Composite key derivation from a dataset's declared partition fields

use indexmap::IndexMap;

use crate::error::Result;
use crate::partition::{default_registry, PartitionKey, PartitionKeyClass, PartitionKeyRegistry};
use crate::types::Type;

/// The named set of concrete keys identifying one partition of a dataset
pub type CompositeKey = IndexMap<String, PartitionKey>;

/// The named set of key classes describing a dataset's partitioning scheme
pub type CompositeKeyTypes = IndexMap<String, PartitionKeyClass>;

impl PartitionKeyRegistry {
    /// Resolve a type's declared partition fields into key classes
    ///
    /// Types other than `List`, and `List`s declaring no partition fields,
    /// yield an empty mapping; absence of partitioning is a valid, common
    /// case. Field names are taken from the declaration as-is; they are not
    /// cross-checked against the List's value struct.
    pub fn composite_types_from(&self, ty: &Type) -> Result<CompositeKeyTypes> {
        let Type::List {
            partition_fields, ..
        } = ty
        else {
            return Ok(CompositeKeyTypes::new());
        };
        let mut resolved = CompositeKeyTypes::with_capacity(partition_fields.len());
        for (name, field_type) in partition_fields {
            resolved.insert(name.clone(), self.get_class_for(field_type)?);
        }
        tracing::debug!(fields = resolved.len(), "derived composite key classes");
        Ok(resolved)
    }
}

/// [`PartitionKeyRegistry::composite_types_from`] over the default registry
pub fn composite_types_from(ty: &Type) -> Result<CompositeKeyTypes> {
    default_registry().composite_types_from(ty)
}
