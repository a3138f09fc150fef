use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TesseraError};
use crate::types::Type;

/// One bidirectional conversion rule for an external type system
///
/// `S` is the external system's schema representation. An adapter converts
/// both directions through the [`TypeSystem`] it is registered in, so
/// container adapters can recurse into sub-types via the registry.
pub trait TypeAdapter<S>: Send + Sync {
    /// Unique key identifying this adapter within its type system
    fn key(&self) -> &'static str;

    /// Among several matching adapters the highest priority wins
    fn priority(&self) -> u32 {
        0
    }

    fn matches_external(&self, external: &S) -> bool;

    fn matches_canonical(&self, ty: &Type) -> bool;

    fn to_canonical(&self, system: &TypeSystem<S>, external: &S) -> Result<Type>;

    fn to_external(&self, system: &TypeSystem<S>, ty: &Type) -> Result<S>;
}

/// Registry of conversion rules for one external type system
///
/// Registration happens during program initialization through `&mut self`
/// and is append-only and conflict-checked; afterwards the system is shared
/// immutably and every read is lock-free, safe for unrestricted concurrent
/// access.
pub struct TypeSystem<S> {
    key: &'static str,
    adapters: Vec<Arc<dyn TypeAdapter<S>>>,
}

impl<S> TypeSystem<S> {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            adapters: Vec::new(),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Register an adapter, erroring if its key is already taken
    ///
    /// Several adapters may legitimately match the same external or canonical
    /// type at different priorities; only re-registering the same adapter key
    /// is a conflict.
    pub fn register_adapter(&mut self, adapter: Arc<dyn TypeAdapter<S>>) -> Result<()> {
        if self.adapters.iter().any(|a| a.key() == adapter.key()) {
            return Err(TesseraError::registration_conflict(format!(
                "adapter '{}' is already registered in type system '{}'",
                adapter.key(),
                self.key,
            )));
        }
        tracing::debug!(
            system = self.key,
            adapter = adapter.key(),
            "registered type adapter"
        );
        self.adapters.push(adapter);
        Ok(())
    }
}

impl<S: fmt::Debug> TypeSystem<S> {
    /// Convert an external schema into the canonical model
    ///
    /// Probes every adapter's `matches_external` and delegates to the highest
    /// priority match (ties go to the latest registration). No match is a
    /// [`TesseraError::MissingRegistration`].
    pub fn to_canonical(&self, external: &S) -> Result<Type> {
        let adapter = self
            .adapters
            .iter()
            .filter(|a| a.matches_external(external))
            .max_by_key(|a| a.priority())
            .ok_or_else(|| {
                TesseraError::missing_registration(format!(
                    "no adapter in type system '{}' matches external construct {:?}",
                    self.key, external,
                ))
            })?;
        adapter.to_canonical(self, external)
    }

    /// Convert a canonical type into the external system's representation
    pub fn to_external(&self, ty: &Type) -> Result<S> {
        let adapter = self
            .adapters
            .iter()
            .filter(|a| a.matches_canonical(ty))
            .max_by_key(|a| a.priority())
            .ok_or_else(|| {
                TesseraError::missing_registration(format!(
                    "no adapter in type system '{}' is registered for type {}",
                    self.key,
                    ty.type_name(),
                ))
            })?;
        adapter.to_external(self, ty)
    }
}

impl<S> fmt::Debug for TypeSystem<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSystem")
            .field("key", &self.key)
            .field("adapters", &self.adapters.len())
            .finish()
    }
}
