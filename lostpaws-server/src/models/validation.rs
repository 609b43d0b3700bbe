//! Validation error types

use std::fmt;

/// Validation error raised when mapping request input to domain types
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is missing or empty when it shouldn't be
    Empty { field: &'static str },

    /// Value is not one of the enumerated variants
    InvalidVariant { field: &'static str, value: String },

    /// String doesn't match the required format (e.g., date)
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::InvalidVariant {
            field: "especie",
            value: "Dinossauro".into(),
        };
        assert_eq!(err.to_string(), "invalid especie value: 'Dinossauro'");
    }
}
