//! Record-descriptor adapter for tessera-core
//!
//! This crate implements the canonical conversion contract for an external
//! structured-object modeling system: named record classes with declared,
//! ordered, possibly-optional fields, the shape a data-modeling library or
//! derive macro would produce.
//!
//! # Overview
//!
//! The adapter implements three main components:
//!
//! ## Schema Description
//!
//! [`RecordClass`] and [`FieldType`] describe an external record: scalar
//! declarations, literal choices, generic sequences and mappings, nested
//! records and `Optional` wrappers. Classes are assembled through
//! [`RecordClassBuilder`].
//!
//! ## Schema Conversion
//!
//! [`record_to_canonical`] converts a class into a canonical `Struct` and
//! [`canonical_to_record`] synthesizes a fresh class from one. Two optional
//! capabilities customize the forward walk:
//!
//! - [`IgnoredFieldsProvider`] excludes declared fields from conversion
//! - [`PostConversionHook`] rewrites each converted field's sub-type
//!
//! A class carrying neither gets the defaults: nothing ignored, identity.
//!
//! ## Value Conversion
//!
//! [`to_canonical_value`] and [`to_external_value`] convert concrete record
//! instances under a declared canonical type, range-checking width
//! narrowing as they go.

pub mod converter;
pub use converter::{to_canonical_value, to_external_value, RecordValue};

pub mod descriptor;
pub use descriptor::{FieldType, RecordClass, RecordClassBuilder};

pub mod hooks;
pub use hooks::{IgnoredFieldsProvider, PostConversionHook};

pub mod schema;
pub use schema::{canonical_to_record, record_to_canonical, record_type_system, RecordTypeAdapter};
