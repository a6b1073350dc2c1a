//! # Validation Module
//!
//! Pre-submit checks for the checkout form.
//!
//! ## Where These Run
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Frontend form                                                 │
//! │  └── field-level hints while typing                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization                                               │
//! │  └── required fields (seller company, buyer ids) via the types          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                   │
//! │  └── business rules before the payload is built                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payload builder itself never calls these; the checkout session does.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::form::{SprDetails, SummaryFormData};
use crate::types::DiscountRange;
use crate::{MAX_CART_LINES, MAX_PERCENT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_quantity;
///
/// assert!(validate_quantity(2.5).is_ok());
/// assert!(validate_quantity(0.0).is_err());
/// assert!(validate_quantity(f64::NAN).is_err());
/// ```
pub fn validate_quantity(quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage in `0..=100`.
fn validate_percentage(field: &str, value: f64) -> ValidationResult<()> {
    if !(0.0..=MAX_PERCENT).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: MAX_PERCENT,
        });
    }
    Ok(())
}

/// Validates one volume discount tier.
///
/// ## Rules
/// - `min_qty <= max_qty`
/// - `value` is a percentage in `0..=100`
pub fn validate_discount_range(range: &DiscountRange) -> ValidationResult<()> {
    if range.min_qty.is_nan() || range.max_qty.is_nan() || range.min_qty > range.max_qty {
        return Err(ValidationError::InvertedRange {
            min_qty: range.min_qty,
            max_qty: range.max_qty,
        });
    }
    validate_percentage("discount", range.value)
}

// =============================================================================
// Form Validators
// =============================================================================

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_some(field: &str, value: Option<&str>) -> ValidationResult<()> {
    require(field, value.unwrap_or_default())
}

fn validate_spr(spr: &SprDetails) -> ValidationResult<()> {
    require_some("sprDetails.companyName", spr.company_name.as_deref())?;
    require_some("sprDetails.projectName", spr.project_name.as_deref())?;

    match spr.spr_requested_discount {
        Some(discount) => validate_percentage("sprDetails.sprRequestedDiscount", discount),
        None => Err(ValidationError::Required {
            field: "sprDetails.sprRequestedDiscount".to_string(),
        }),
    }
}

/// Validates the form before the request is built.
///
/// ## Rules
/// - 1 to [`MAX_CART_LINES`] lines, each with a positive quantity
/// - seller company id present
/// - billing and shipping pin codes present
/// - quotes asking for SPR carry a company, a project and a requested
///   discount in `0..=100`
pub fn validate_summary_form(form: &SummaryFormData) -> CoreResult<()> {
    if form.products.is_empty() {
        return Err(ValidationError::Required {
            field: "products".to_string(),
        }
        .into());
    }

    if form.products.len() > MAX_CART_LINES {
        return Err(CoreError::TooManyLines {
            max: MAX_CART_LINES,
            actual: form.products.len(),
        });
    }

    for line in &form.products {
        validate_quantity(line.quantity)?;
    }

    require("setSellerAddress.companyId", &form.set_seller_address.company_id.id)?;
    require("setBillingAddress.pinCode", &form.set_billing_address.pin_code)?;
    require("setShippingAddress.pinCode", &form.set_shipping_address.pin_code)?;

    if !form.is_order {
        if let Some(spr) = form.spr_details.as_ref().filter(|spr| spr.spr) {
            validate_spr(spr)?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
