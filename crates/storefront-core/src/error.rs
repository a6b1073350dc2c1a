//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                     │
//! │  ├── CoreError        - Checkout rule violations                        │
//! │  └── ValidationError  - Form/input validation failures                  │
//! │                                                                         │
//! │  storefront-checkout errors (separate crate)                            │
//! │  └── CheckoutError    - Config, serialization, session failures         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → caller/UI toast    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolver, the tax assigner and the payload builder never return
//! errors. These types exist for the optional pre-submit checks.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Checkout rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The order/quote has more lines than the backend accepts.
    #[error("Order cannot have more than {max} lines, got {actual}")]
    TooManyLines { max: usize, actual: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparsable quantity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A discount tier whose bounds are inverted.
    #[error("discount range {min_qty}..={max_qty} is inverted")]
    InvertedRange { min_qty: f64, max_qty: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TooManyLines {
            max: 200,
            actual: 250,
        };
        assert_eq!(err.to_string(), "Order cannot have more than 200 lines, got 250");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sellerCompanyId".to_string(),
        };
        assert_eq!(err.to_string(), "sellerCompanyId is required");

        let err = ValidationError::InvertedRange {
            min_qty: 50.0,
            max_qty: 10.0,
        };
        assert_eq!(err.to_string(), "discount range 50..=10 is inverted");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
