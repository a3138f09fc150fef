use thiserror::Error;

/// Core error type for type model and partition key operations
#[derive(Error, Debug)]
pub enum TesseraError {
    /// A Type variant or external construct with no conversion rule
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A partition key class or adapter was registered for an already-bound target
    #[error("registration conflict: {0}")]
    RegistrationConflict(String),

    /// Lookup of a partition key class or adapter that was never registered
    #[error("missing registration: {0}")]
    MissingRegistration(String),

    /// A component set or component value that cannot be parsed into a partition key
    #[error("malformed key components: {0}")]
    MalformedComponents(String),
}

/// Result type alias for tessera operations
pub type Result<T> = std::result::Result<T, TesseraError>;

impl TesseraError {
    /// Create a new not-supported error
    pub fn not_supported<S: Into<String>>(msg: S) -> Self {
        TesseraError::NotSupported(msg.into())
    }

    /// Create a new registration conflict error
    pub fn registration_conflict<S: Into<String>>(msg: S) -> Self {
        TesseraError::RegistrationConflict(msg.into())
    }

    /// Create a new missing registration error
    pub fn missing_registration<S: Into<String>>(msg: S) -> Self {
        TesseraError::MissingRegistration(msg.into())
    }

    /// Create a new malformed components error
    pub fn malformed_components<S: Into<String>>(msg: S) -> Self {
        TesseraError::MalformedComponents(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TesseraError::not_supported("Enum over Float32");
        assert_eq!(err.to_string(), "not supported: Enum over Float32");

        let err = TesseraError::missing_registration("no adapter for Int32");
        assert_eq!(err.to_string(), "missing registration: no adapter for Int32");
    }

    #[test]
    fn test_error_messages_name_offender() {
        let err = TesseraError::malformed_components("IntKey: 'abc' is not a decimal integer");
        assert!(err.to_string().contains("'abc'"));

        let err = TesseraError::registration_conflict("Date is already bound to DateKey");
        assert!(err.to_string().contains("DateKey"));
    }
}
