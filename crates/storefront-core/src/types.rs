//! # Domain Types
//!
//! Wire types shared with the storefront backend and the web frontend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pricing Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │ DiscountRange   │   │  HsnReference   │   │    CartLine     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  minQty         │   │  productId      │   │  productId      │        │
//! │  │  maxQty         │   │  hsnDetails ──┐ │   │  quantity       │        │
//! │  │  value (%)      │   └───────────────┼─┘   │  discount       │        │
//! │  └─────────────────┘                   │     │  *TaxBreakup    │        │
//! │                                        ▼     │  extensions {}  │        │
//! │                     ┌─────────────────────┐  └─────────────────┘        │
//! │                     │     HsnDetails      │                             │
//! │                     │  tax                │                             │
//! │                     │  interTax ─► HsnTaxGroup { totalTax, taxReqLs }   │
//! │                     │  intraTax ─► HsnTaxGroup { totalTax, taxReqLs }   │
//! │                     └─────────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the backend's camelCase JSON. Unknown keys on a cart
//! line are kept in [`CartLine::extensions`] and sent back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

// =============================================================================
// Discount Range
// =============================================================================

/// A volume discount tier: buy between `min_qty` and `max_qty` units
/// (both inclusive) and get `value` percent off.
///
/// Tiers of one product may overlap or leave gaps between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountRange {
    pub min_qty: f64,
    pub max_qty: f64,
    /// Discount percentage.
    pub value: f64,
}

impl DiscountRange {
    /// Creates a tier.
    pub const fn new(min_qty: f64, max_qty: f64, value: f64) -> Self {
        DiscountRange {
            min_qty,
            max_qty,
            value,
        }
    }

    /// Whether `quantity` falls inside this tier (inclusive on both ends).
    #[inline]
    pub fn contains(&self, quantity: f64) -> bool {
        self.min_qty <= quantity && quantity <= self.max_qty
    }
}

// =============================================================================
// Quantity Input
// =============================================================================

/// A quantity as the buyer typed it: either a JSON number or the raw text
/// of an input box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(f64),
    Text(String),
}

impl QuantityInput {
    /// Coerces the input to a number.
    ///
    /// Text is trimmed and parsed; empty, non-numeric and non-finite input
    /// has no value.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::types::QuantityInput;
    ///
    /// assert_eq!(QuantityInput::from(" 12 ").value(), Some(12.0));
    /// assert_eq!(QuantityInput::from("").value(), None);
    /// assert_eq!(QuantityInput::from("12 boxes").value(), None);
    /// ```
    pub fn value(&self) -> Option<f64> {
        let parsed = match self {
            QuantityInput::Number(n) => *n,
            QuantityInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        parsed.is_finite().then_some(parsed)
    }
}

impl From<f64> for QuantityInput {
    fn from(value: f64) -> Self {
        QuantityInput::Number(value)
    }
}

impl From<i32> for QuantityInput {
    fn from(value: i32) -> Self {
        QuantityInput::Number(value as f64)
    }
}

impl From<i64> for QuantityInput {
    fn from(value: i64) -> Self {
        QuantityInput::Number(value as f64)
    }
}

impl From<u32> for QuantityInput {
    fn from(value: u32) -> Self {
        QuantityInput::Number(value as f64)
    }
}

impl From<&str> for QuantityInput {
    fn from(value: &str) -> Self {
        QuantityInput::Text(value.to_string())
    }
}

impl From<String> for QuantityInput {
    fn from(value: String) -> Self {
        QuantityInput::Text(value)
    }
}

// =============================================================================
// HSN Tax Data
// =============================================================================

/// One tax levied under an HSN code, e.g. `CGST 9%`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxRequirement {
    pub tax_name: String,
    /// Rate in percent.
    #[serde(default)]
    pub rate: f64,
    /// Computed on top of the other taxes rather than on the base price.
    #[serde(default)]
    pub compound: bool,
}

/// Taxes for one direction of trade (inter-state or intra-state).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HsnTaxGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub total_tax: Option<f64>,
    #[serde(default, rename = "taxReqLs")]
    #[serde(alias = "taxRequirements")]
    pub tax_requirements: Vec<TaxRequirement>,
}

/// Tax classification of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HsnDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub hsn_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    /// Aggregate tax percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub inter_tax: Option<HsnTaxGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub intra_tax: Option<HsnTaxGroup>,
}

/// An entry of the HSN reference array fetched for the current cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HsnReference {
    pub product_id: String,
    #[serde(default)]
    pub hsn_details: HsnDetails,
}

/// One tax line attached to a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxBreakup {
    pub tax_name: String,
    pub compound: bool,
    /// Rate in percent; zero when the buyer is tax exempt.
    pub rate: f64,
}

// =============================================================================
// Cart Line
// =============================================================================

/// A line item of the checkout.
///
/// ## Field Groups
/// - Identity & price: `product_id`, `quantity`, `unit_list_price`
/// - Discount: `discount`, `base_discount`, `volume_discount_applied`,
///   `applied_volume_discount`, `next_volume_discount`
/// - Tax (written by [`crate::tax`]): `hsn_details`, `tax`,
///   `total_inter_tax`, `total_intra_tax`, `*_tax_breakup`, `product_taxes`
/// - Everything else the backend sent: `extensions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,

    #[serde(default)]
    pub quantity: f64,

    /// Price per unit before any discount.
    #[serde(default)]
    pub unit_list_price: f64,

    /// Discount percentage currently in effect.
    #[serde(default)]
    pub discount: f64,

    /// Discount percentage before any volume discount was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_discount: Option<f64>,

    #[serde(default)]
    pub volume_discount_applied: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_volume_discount: Option<DiscountRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_volume_discount: Option<DiscountRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_details: Option<HsnDetails>,

    #[serde(default)]
    pub tax: f64,

    #[serde(default)]
    pub total_inter_tax: f64,

    #[serde(default)]
    pub total_intra_tax: f64,

    #[serde(default)]
    pub inter_tax_breakup: Vec<TaxBreakup>,

    #[serde(default)]
    pub intra_tax_breakup: Vec<TaxBreakup>,

    /// The breakup that applies to this checkout (inter or intra).
    #[serde(default)]
    pub product_taxes: Vec<TaxBreakup>,

    /// Backend keys this crate does not model.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl CartLine {
    /// Creates a line with the given product, quantity and list price.
    pub fn new(product_id: impl Into<String>, quantity: f64, unit_list_price: f64) -> Self {
        CartLine {
            product_id: product_id.into(),
            quantity,
            unit_list_price,
            ..Default::default()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discount_range_contains_is_inclusive() {
        let range = DiscountRange::new(11.0, 50.0, 10.0);
        assert!(range.contains(11.0));
        assert!(range.contains(50.0));
        assert!(!range.contains(10.0));
        assert!(!range.contains(50.5));
    }

    #[test]
    fn test_quantity_input_coercion() {
        assert_eq!(QuantityInput::from(7).value(), Some(7.0));
        assert_eq!(QuantityInput::from("2.5").value(), Some(2.5));
        assert_eq!(QuantityInput::from("abc").value(), None);
        assert_eq!(QuantityInput::from("NaN").value(), None);
        assert_eq!(QuantityInput::from(f64::INFINITY).value(), None);
    }

    #[test]
    fn test_quantity_input_deserializes_number_or_text() {
        let n: QuantityInput = serde_json::from_value(json!(12)).unwrap();
        let t: QuantityInput = serde_json::from_value(json!("12")).unwrap();
        assert_eq!(n.value(), t.value());
    }

    #[test]
    fn test_hsn_group_accepts_both_requirement_keys() {
        let wire: HsnTaxGroup = serde_json::from_value(json!({
            "totalTax": 18,
            "taxReqLs": [{ "taxName": "IGST", "rate": 18, "compound": false }]
        }))
        .unwrap();
        let alias: HsnTaxGroup = serde_json::from_value(json!({
            "totalTax": 18,
            "taxRequirements": [{ "taxName": "IGST", "rate": 18, "compound": false }]
        }))
        .unwrap();
        assert_eq!(wire, alias);

        let out = serde_json::to_value(&wire).unwrap();
        assert!(out.get("taxReqLs").is_some());
    }

    #[test]
    fn test_cart_line_keeps_unknown_backend_keys() {
        let line: CartLine = serde_json::from_value(json!({
            "productId": "P-1",
            "quantity": 4,
            "unitListPrice": 250.0,
            "brandName": "Acme",
            "packagingQty": 12
        }))
        .unwrap();

        assert_eq!(line.product_id, "P-1");
        assert_eq!(line.extensions.get("brandName"), Some(&json!("Acme")));

        let back = serde_json::to_value(&line).unwrap();
        assert_eq!(back["packagingQty"], json!(12));
        assert_eq!(back["productId"], json!("P-1"));
    }
}
