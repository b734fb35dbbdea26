use thiserror::Error;

/// Result type for decaf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the decaf transform layer
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid type descriptor: {descriptor}")]
    TypeDescriptor { descriptor: String },

    #[error("Invalid method descriptor: {descriptor}")]
    MethodDescriptor { descriptor: String },
}

impl Error {
    /// Create a type descriptor error
    pub fn type_descriptor(descriptor: impl Into<String>) -> Self {
        Self::TypeDescriptor { descriptor: descriptor.into() }
    }

    /// Create a method descriptor error
    pub fn method_descriptor(descriptor: impl Into<String>) -> Self {
        Self::MethodDescriptor { descriptor: descriptor.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_descriptor() {
        assert_eq!(
            Error::type_descriptor("[V").to_string(),
            "Invalid type descriptor: [V"
        );
        assert_eq!(
            Error::method_descriptor("(I").to_string(),
            "Invalid method descriptor: (I"
        );
    }
}
