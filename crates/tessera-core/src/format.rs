use crate::error::Result;
use crate::types::Type;

/// Format represents file formats such as CSV, Parquet, native (eg: databases), etc.
///
/// Formats are associated with a type system that provides a bridge between
/// the canonical types and any external type information.
pub trait Format {
    /// Identifier of the format (eg: "csv", "parquet")
    fn key(&self) -> &'static str;

    /// Confirm the format's bound type system can represent `ty`
    fn validate_artifact(&self, _ty: Option<&Type>) -> Result<()> {
        // TODO: Check the bound type system supports the type. We can likely
        // add a TypeSystem method that will check for matching TypeAdapters.
        Ok(())
    }
}
