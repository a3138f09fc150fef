//! Canonical type model and partition key derivation for dataset catalogs
//!
//! `tessera-core` describes dataset schemas in one internal representation
//! and translates that representation to and from external schema systems,
//! while deriving stable, parseable partition identifiers from typed field
//! values.
//!
//! # Key Components
//!
//! - **Types**: the closed, recursive canonical schema model
//!   - Scalars, temporal types, Enum, List, Map and Struct through [`Type`]
//!   - Structural equality and copy-with-override
//!   - Introspection through the [`traits::TypeInspector`] trait
//!
//! - **Type Systems**: per external system adapter registries
//!   - Bidirectional conversion via [`TypeAdapter`] implementations
//!   - Priority resolution between adapters binding the same construct
//!   - The built-in host-runtime system in [`native`]
//!
//! - **Values**: canonical in-memory instances
//!   - Every scalar and temporal kind plus lists, maps and records
//!   - [`Value`] is the target of adapter value conversion
//!
//! - **Partition Keys**: typed, string-parseable partition identifiers
//!   - One key class per scalar/temporal type, with fixed component tables
//!   - Exact component-set parsing through `from_key_components`
//!   - Composite key derivation from a List's declared partition fields
//!
//! # Design Philosophy
//!
//! The core performs no I/O and owns no serialized form; it is a pure,
//! synchronous translation layer. External system specifics (how a field is
//! classified as mapping, sequence, choice or record) live in adapter crates
//! such as `tessera-record-adapter`; the core only defines the contracts.
//!
//! All registries are populated during single-threaded initialization and
//! afterwards read concurrently without locking.

pub mod composite;
pub mod error;
pub mod format;
pub mod native;
pub mod partition;
pub mod system;
pub mod traits;
pub mod types;
pub mod value;

pub use composite::{composite_types_from, CompositeKey, CompositeKeyTypes};
pub use error::{Result, TesseraError};
pub use format::Format;
pub use native::{native_type_system, NativeType};
pub use partition::{
    default_registry, DateKey, Int16Key, Int32Key, Int64Key, Int8Key, NullKey, PartitionKey,
    PartitionKeyClass, PartitionKeyRegistry,
};
pub use system::{TypeAdapter, TypeSystem};
pub use types::{TimestampPrecision, Type, TypeKind};
pub use value::Value;
