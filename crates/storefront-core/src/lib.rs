//! # storefront-core: Pure Pricing Logic for the B2B Storefront
//!
//! This crate holds the pricing pipeline that runs between the checkout
//! screen and the order/quote creation API. Everything here is a pure
//! function over in-memory data.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pricing & Tax Resolution                           │
//! │                                                                         │
//! │   Discount rules (JSON)         HSN reference (JSON)                    │
//! │          │                             │                                │
//! │          ▼                             ▼                                │
//! │  ┌────────────────┐           ┌────────────────┐                        │
//! │  │   discount     │           │      tax       │                        │
//! │  │ resolve tiers  │           │ assign breakup │                        │
//! │  └───────┬────────┘           └───────┬────────┘                        │
//! │          │  mutates CartLine.discount │ mutates CartLine.*Tax*          │
//! │          └─────────────┬──────────────┘                                 │
//! │                        ▼                                                │
//! │                ┌───────────────┐      ┌───────────────┐                 │
//! │                │    totals     │─────►│    summary    │──► JSON body    │
//! │                │  CartValue    │      │ Order | Quote │                 │
//! │                └───────────────┘      └───────────────┘                 │
//! │                                                                         │
//! │   NO I/O • NO NETWORK • NO LOGGING SINKS • PURE FUNCTIONS               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types for discount tiers, HSN records and cart lines
//! - [`form`] - Checkout form snapshot (addresses, preferences, SPR)
//! - [`money`] - Integer money and tax rates
//! - [`discount`] - Volume discount tier resolution
//! - [`tax`] - HSN tax breakup assignment
//! - [`totals`] - Cart value calculation
//! - [`summary`] - Order/quote request payload builder
//! - [`validation`] - Pre-submit checks for callers
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::discount::resolve;
//! use storefront_core::types::DiscountRange;
//!
//! let ranges = vec![
//!     DiscountRange::new(1.0, 10.0, 5.0),
//!     DiscountRange::new(11.0, 50.0, 10.0),
//!     DiscountRange::new(51.0, 100.0, 15.0),
//! ];
//!
//! let found = resolve(25, &ranges);
//! assert_eq!(found.suitable.map(|r| r.value), Some(10.0));
//! assert_eq!(found.next.map(|r| r.min_qty), Some(51.0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod form;
pub mod money;
pub mod summary;
pub mod tax;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use form::SummaryFormData;
pub use money::{Money, TaxRate};
pub use summary::SummaryPayload;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines the backend accepts in a single order or quote.
pub const MAX_CART_LINES: usize = 200;

/// Upper bound for any percentage entered by a buyer (discounts, SPR).
pub const MAX_PERCENT: f64 = 100.0;
