//! # Checkout Form
//!
//! Snapshot of the checkout form at the moment the buyer presses
//! "Place order" or "Request quote".
//!
//! ## Form Sections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SummaryFormData                                                        │
//! │                                                                         │
//! │  isOrder ─────────────── order vs quote                                 │
//! │  setBillingAddress ─┐                                                   │
//! │  setShippingAddress ├─── FormAddress (nested refs: state, pinCodeId..)  │
//! │  setRegisterAddress ┘                                                   │
//! │  setSellerAddress ────── FormAddress + companyId (REQUIRED)             │
//! │  buyer ───────────────── who is buying                                  │
//! │  products ────────────── CartLine[]                                     │
//! │  cartValue / VDDetails ─ plain totals / volume-discounted totals        │
//! │  preferences ─────────── freight, insurance, payment terms, warranty..  │
//! │  sprDetails ──────────── special price request (quotes only)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Required fields are non-optional here, so a form missing e.g. the seller
//! company fails at deserialization instead of half-way through a build.

use serde::{Deserialize, Serialize};

use crate::totals::{CartValue, VolumeDiscountDetails};
use crate::types::CartLine;

// =============================================================================
// References
// =============================================================================

/// A `{ id, name }` reference as used by dropdowns in the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The company owning an address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

// =============================================================================
// Addresses
// =============================================================================

/// An address as held by the form's address pickers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormAddress {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub address_line: String,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<NamedRef>,
    #[serde(default)]
    pub state: Option<NamedRef>,
    #[serde(default)]
    pub country: Option<NamedRef>,
    #[serde(default)]
    pub pin_code: String,
    #[serde(default)]
    pub pin_code_id: Option<NamedRef>,
    #[serde(default)]
    pub gst: Option<String>,
    #[serde(default)]
    pub bill_to_code: Option<String>,
    #[serde(default)]
    pub ship_to_code: Option<String>,
    #[serde(default)]
    pub sold_to_code: Option<String>,
    #[serde(default)]
    pub primary_contact: Option<String>,
    #[serde(default)]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl FormAddress {
    /// State name, trimmed and lowercased for comparisons.
    fn state_key(&self) -> Option<String> {
        self.state
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
    }
}

/// The seller's dispatching branch. Always carries the seller company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerAddress {
    #[serde(flatten)]
    pub address: FormAddress,
    pub company_id: CompanyRef,
}

// =============================================================================
// Buyer, Preferences, SPR
// =============================================================================

/// The logged-in buyer placing the order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDetails {
    pub user_id: String,
    pub company_id: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// A selected commercial preference (freight, insurance, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceOption {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Charge or rate attached to the option, when it carries one.
    #[serde(default)]
    pub value: Option<f64>,
}

/// Commercial terms picked on the checkout screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub freight: Option<PreferenceOption>,
    #[serde(default)]
    pub insurance: Option<PreferenceOption>,
    #[serde(default)]
    pub payment_terms: Option<PreferenceOption>,
    #[serde(default)]
    pub warranty: Option<PreferenceOption>,
    #[serde(default)]
    pub delivery_terms: Option<PreferenceOption>,
    /// Packing & forwarding.
    #[serde(default)]
    pub pkg_forward: Option<PreferenceOption>,
}

/// Special price request entered on the quote screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprDetails {
    #[serde(default)]
    pub spr: bool,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub competitor_names: Vec<String>,
    #[serde(default)]
    pub price_justification: Option<String>,
    /// Requested discount percentage.
    #[serde(default)]
    pub spr_requested_discount: Option<f64>,
    #[serde(default)]
    pub target_price: Option<f64>,
}

// =============================================================================
// Summary Form
// =============================================================================

/// The whole checkout form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryFormData {
    /// `true` for "Place order", `false` for "Request quote".
    #[serde(default)]
    pub is_order: bool,

    pub set_billing_address: FormAddress,
    pub set_shipping_address: FormAddress,
    #[serde(default)]
    pub set_register_address: Option<FormAddress>,
    pub set_seller_address: SellerAddress,

    pub buyer: BuyerDetails,

    #[serde(default)]
    pub products: Vec<CartLine>,

    #[serde(default)]
    pub cart_value: CartValue,

    /// Totals after volume discount, when one was requested.
    #[serde(default, rename = "VDDetails")]
    pub vd_details: Option<VolumeDiscountDetails>,

    #[serde(default)]
    pub preferences: Preferences,

    #[serde(default)]
    pub spr_details: Option<SprDetails>,

    #[serde(default)]
    pub division: Option<NamedRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub buyer_reference_number: Option<String>,

    /// Raw date input; normalized by the builder.
    #[serde(default)]
    pub customer_required_date: Option<String>,
    #[serde(default)]
    pub required_date: Option<String>,

    #[serde(default)]
    pub tax_exempted: bool,

    /// Explicit override of the inter-state decision.
    #[serde(default)]
    pub is_inter_state: Option<bool>,
}

impl SummaryFormData {
    /// Whether this checkout crosses a state boundary.
    ///
    /// Uses the explicit `isInterState` flag when the form carries one.
    /// Otherwise compares the seller's state with the shipping state; when
    /// either is unknown the trade is treated as intra-state.
    pub fn is_inter_state(&self) -> bool {
        if let Some(flag) = self.is_inter_state {
            return flag;
        }
        match (
            self.set_seller_address.address.state_key(),
            self.set_shipping_address.state_key(),
        ) {
            (Some(seller), Some(shipping)) => seller != shipping,
            _ => false,
        }
    }

    /// Whether any line has a volume discount applied.
    pub fn has_volume_discount(&self) -> bool {
        self.products.iter().any(|line| line.volume_discount_applied)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// A valid quote form used across the crate's tests.
    pub(crate) fn sample_form() -> SummaryFormData {
        serde_json::from_value(json!({
            "isOrder": false,
            "setBillingAddress": {
                "id": "addr-bill",
                "branchName": "Head Office",
                "addressLine": "12 MG Road",
                "city": "Bengaluru",
                "state": { "id": "KA", "name": "Karnataka" },
                "country": { "id": "IN", "name": "India" },
                "pinCode": "560001",
                "pinCodeId": { "id": "pin-560001" },
                "gst": "29ABCDE1234F1Z5"
            },
            "setShippingAddress": {
                "id": "addr-ship",
                "addressLine": "Plot 4, Peenya",
                "city": "Bengaluru",
                "state": { "id": "KA", "name": "Karnataka" },
                "pinCode": "560058",
                "pinCodeId": { "id": "pin-560058" }
            },
            "setSellerAddress": {
                "id": "seller-branch-1",
                "addressLine": "Industrial Estate",
                "state": { "id": "KA", "name": " karnataka " },
                "pinCode": "560100",
                "companyId": { "id": "seller-co", "companyName": "Acme Industrial" }
            },
            "buyer": {
                "userId": "user-7",
                "companyId": "buyer-co",
                "companyName": "Buyer Pvt Ltd",
                "branchId": "buyer-branch"
            },
            "products": [
                { "productId": "P-1", "quantity": 10, "unitListPrice": 100.0 },
                { "productId": "P-2", "quantity": 2, "unitListPrice": 450.0, "discount": 5 }
            ],
            "cartValue": {
                "totalLP": 1900.0,
                "totalValue": 1855.0,
                "totalTax": 333.9,
                "taxableAmount": 1855.0,
                "calculatedTotal": 2188.9,
                "grandTotal": 2189.0
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_seller_company_is_rejected() {
        let mut raw = serde_json::to_value(sample_form()).unwrap();
        raw["setSellerAddress"]
            .as_object_mut()
            .unwrap()
            .remove("companyId");

        let parsed: Result<SummaryFormData, _> = serde_json::from_value(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_inter_state_compares_seller_and_shipping_state() {
        let mut form = sample_form();
        assert!(!form.is_inter_state());

        form.set_shipping_address.state = Some(NamedRef {
            id: "MH".to_string(),
            name: Some("Maharashtra".to_string()),
        });
        assert!(form.is_inter_state());

        form.is_inter_state = Some(false);
        assert!(!form.is_inter_state());
    }

    #[test]
    fn test_unknown_state_defaults_to_intra_state() {
        let mut form = sample_form();
        form.set_shipping_address.state = None;
        assert!(!form.is_inter_state());
    }

    #[test]
    fn test_has_volume_discount() {
        let mut form = sample_form();
        assert!(!form.has_volume_discount());
        form.products[1].volume_discount_applied = true;
        assert!(form.has_volume_discount());
    }
}
