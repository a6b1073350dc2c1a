//! # Checkout Error Types
//!
//! Error types for checkout sessions and their configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CheckoutError                                    │
//! │                                                                         │
//! │  Configuration                                                          │
//! │  ├── InvalidConfig      - a setting failed validation                   │
//! │  ├── ConfigSaveFailed   - no path to save to                            │
//! │  ├── Io                 - reading/writing storefront.toml               │
//! │  ├── TomlDe / TomlSer   - malformed or unserializable TOML              │
//! │                                                                         │
//! │  Session                                                                │
//! │  ├── LineNotFound       - no cart line with that product id             │
//! │  ├── Core               - storefront-core rule/validation failure       │
//! │  └── Json               - payload serialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::CoreError;
use thiserror::Error;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Checkout error type.
#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid checkout configuration.
    #[error("Invalid checkout configuration: {0}")]
    InvalidConfig(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Config file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`crate::CheckoutConfig`].
    #[error("Failed to parse config: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// No cart line carries the requested product id.
    #[error("Cart line not found for product: {0}")]
    LineNotFound(String),

    /// Pricing rule or validation failure from storefront-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Payload could not be serialized.
    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ValidationError;

    #[test]
    fn test_core_errors_convert_transparently() {
        let core = CoreError::from(ValidationError::Required {
            field: "products".to_string(),
        });
        let err: CheckoutError = core.into();
        assert_eq!(err.to_string(), "Validation error: products is required");
    }

    #[test]
    fn test_line_not_found_message() {
        let err = CheckoutError::LineNotFound("P-404".to_string());
        assert_eq!(err.to_string(), "Cart line not found for product: P-404");
    }
}
