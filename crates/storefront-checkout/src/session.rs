//! # Checkout Session
//!
//! One buyer's pass through the summary screen.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutSession::new(config, form)                                     │
//! │       │                                                                 │
//! │       ├── request_volume_discount(productId, ranges)   (per line, opt.) │
//! │       ├── apply_taxes(hsnReference)                                     │
//! │       ├── recalculate_totals()                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  summary_payload() ── validate ──► build ──► SummaryPayload             │
//! │  payload_json()    ────────────────────────► serde_json::Value          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step runs inside a `checkout` span carrying the session id, so the
//! log lines of one buyer can be pulled out of a shared log.

use serde_json::Value;
use storefront_core::discount::{apply_volume_discount, OwnedVolumeDiscountMatch};
use storefront_core::summary::{self, SummaryPayload};
use storefront_core::tax::assign_in_place;
use storefront_core::totals::{calculate_totals, CartValue, TotalsOptions};
use storefront_core::validation::validate_summary_form;
use storefront_core::{CoreError, DiscountRange, HsnReference, Money, SummaryFormData};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};

/// The checkout form plus the settings it is priced under.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    session_id: Uuid,
    config: CheckoutConfig,
    form: SummaryFormData,
}

impl CheckoutSession {
    /// Starts a session for `form`.
    ///
    /// Fills the buyer's currency from the config when the form has none,
    /// and marks the form tax-exempt when the storefront is exempt by
    /// default.
    pub fn new(config: CheckoutConfig, mut form: SummaryFormData) -> Self {
        let session_id = Uuid::new_v4();

        if form.buyer.currency_code.is_none() {
            form.buyer.currency_code = Some(config.pricing.currency_code.clone());
        }
        if config.tax.default_tax_exempt {
            form.tax_exempted = true;
        }

        info!(
            session_id = %session_id,
            is_order = form.is_order,
            lines = form.products.len(),
            "Checkout session started"
        );

        CheckoutSession {
            session_id,
            config,
            form,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn form(&self) -> &SummaryFormData {
        &self.form
    }

    /// Mutable access for edits made on the summary screen.
    pub fn form_mut(&mut self) -> &mut SummaryFormData {
        &mut self.form
    }

    pub fn into_form(self) -> SummaryFormData {
        self.form
    }

    /// Applies the volume discount tiers of one product to its line.
    ///
    /// Totals are not refreshed; call [`Self::recalculate_totals`] after.
    pub fn request_volume_discount(
        &mut self,
        product_id: &str,
        ranges: &[DiscountRange],
    ) -> CheckoutResult<OwnedVolumeDiscountMatch> {
        let _span = info_span!("checkout", session_id = %self.session_id).entered();

        let line = self
            .form
            .products
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .ok_or_else(|| CheckoutError::LineNotFound(product_id.to_string()))?;

        let found = apply_volume_discount(line, ranges);
        debug!(
            product_id,
            quantity = line.quantity,
            applied = found.suitable.is_some(),
            discount = line.discount,
            "Volume discount resolved"
        );
        Ok(found)
    }

    /// Assigns tax breakups to every line from `hsn_reference`.
    pub fn apply_taxes(&mut self, hsn_reference: &[HsnReference]) {
        let _span = info_span!("checkout", session_id = %self.session_id).entered();

        let is_inter_state = self.form.is_inter_state();
        assign_in_place(
            &mut self.form.products,
            hsn_reference,
            is_inter_state,
            self.form.tax_exempted,
        );
        debug!(
            is_inter_state,
            tax_exempted = self.form.tax_exempted,
            references = hsn_reference.len(),
            "Tax breakups assigned"
        );
    }

    /// Refreshes `cartValue` and `VDDetails` from the current lines.
    pub fn recalculate_totals(&mut self) -> &CartValue {
        let _span = info_span!("checkout", session_id = %self.session_id).entered();

        let options = TotalsOptions::from_preferences(
            &self.form.preferences,
            self.config.pricing.round_off_totals,
        );
        let (cart_value, vd_details) = calculate_totals(&self.form.products, &options);
        debug!(
            grand_total = %Money::from_decimal(cart_value.grand_total),
            volume_discount = vd_details.is_some(),
            "Totals recalculated"
        );

        self.form.cart_value = cart_value;
        self.form.vd_details = vd_details;
        &self.form.cart_value
    }

    /// Validates the form and builds the order/quote request body.
    pub fn summary_payload(&self) -> CheckoutResult<SummaryPayload> {
        let _span = info_span!("checkout", session_id = %self.session_id).entered();

        let max = self.config.pricing.max_line_items;
        if self.form.products.len() > max {
            return Err(CoreError::TooManyLines {
                max,
                actual: self.form.products.len(),
            }
            .into());
        }
        validate_summary_form(&self.form)?;

        let payload = summary::build(&self.form);
        info!(
            is_order = payload.is_order(),
            lines = payload.base().products_count,
            grand_total = %Money::from_decimal(payload.base().grand_total),
            "Summary payload built"
        );
        Ok(payload)
    }

    /// The request body as JSON.
    pub fn payload_json(&self) -> CheckoutResult<Value> {
        Ok(self.summary_payload()?.to_json()?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_core::{HsnDetails, HsnTaxGroup, TaxRequirement};

    fn form() -> SummaryFormData {
        serde_json::from_value(json!({
            "isOrder": true,
            "setBillingAddress": {
                "addressLine": "12 MG Road",
                "state": { "id": "KA", "name": "Karnataka" },
                "pinCode": "560001"
            },
            "setShippingAddress": {
                "addressLine": "Andheri East",
                "state": { "id": "MH", "name": "Maharashtra" },
                "pinCode": "400069"
            },
            "setSellerAddress": {
                "id": "seller-branch-1",
                "state": { "id": "KA", "name": "Karnataka" },
                "pinCode": "560100",
                "companyId": { "id": "seller-co", "companyName": "Acme Industrial" }
            },
            "buyer": { "userId": "user-7", "companyId": "buyer-co" },
            "products": [
                { "productId": "P-1", "quantity": 30, "unitListPrice": 100.0 },
                { "productId": "P-2", "quantity": 1, "unitListPrice": 99.99 }
            ]
        }))
        .unwrap()
    }

    fn hsn_reference() -> Vec<HsnReference> {
        let group = |name: &str, rate: f64| HsnTaxGroup {
            total_tax: Some(rate),
            tax_requirements: vec![TaxRequirement {
                tax_name: name.to_string(),
                rate,
                compound: false,
            }],
        };
        ["P-1", "P-2"]
            .into_iter()
            .map(|id| HsnReference {
                product_id: id.to_string(),
                hsn_details: HsnDetails {
                    tax: Some(18.0),
                    inter_tax: Some(group("IGST", 18.0)),
                    intra_tax: Some(group("CGST+SGST", 18.0)),
                    ..Default::default()
                },
            })
            .collect()
    }

    fn tiers() -> Vec<DiscountRange> {
        vec![
            DiscountRange::new(1.0, 10.0, 5.0),
            DiscountRange::new(11.0, 50.0, 10.0),
        ]
    }

    #[test]
    fn test_new_fills_currency_and_exemption() {
        let mut config = CheckoutConfig::default();
        config.tax.default_tax_exempt = true;

        let session = CheckoutSession::new(config, form());
        assert_eq!(session.form().buyer.currency_code.as_deref(), Some("INR"));
        assert!(session.form().tax_exempted);
    }

    #[test]
    fn test_full_pipeline_order() {
        let mut session = CheckoutSession::new(CheckoutConfig::default(), form());

        let found = session.request_volume_discount("P-1", &tiers()).unwrap();
        assert_eq!(found.suitable.map(|r| r.value), Some(10.0));

        session.apply_taxes(&hsn_reference());
        // Karnataka seller shipping to Maharashtra
        assert_eq!(session.form().products[0].product_taxes[0].tax_name, "IGST");

        let cart = session.recalculate_totals().clone();
        // plain: 3000 + 99.99 = 3099.99, tax 18% = 558.00 (rounded per line)
        assert_eq!(cart.total_value, 3099.99);
        assert_eq!(cart.grand_total, 3658.0);

        let body = session.payload_json().unwrap();
        assert_eq!(body["versionLevelVolumeDisscount"], true);
        // volume-discounted: 2700 + 99.99
        assert_eq!(body["subTotal"], 2799.99);
        assert_eq!(body["isInterState"], true);
        assert_eq!(body["productsCount"], 2);
        assert!(body.get("orderDivisionId").is_some());
    }

    #[test]
    fn test_unknown_product_is_an_error() {
        let mut session = CheckoutSession::new(CheckoutConfig::default(), form());
        let err = session.request_volume_discount("P-404", &tiers()).unwrap_err();
        assert!(matches!(err, CheckoutError::LineNotFound(id) if id == "P-404"));
    }

    #[test]
    fn test_config_line_cap_is_enforced() {
        let mut config = CheckoutConfig::default();
        config.pricing.max_line_items = 1;

        let session = CheckoutSession::new(config, form());
        let err = session.summary_payload().unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::TooManyLines { max: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_invalid_form_is_rejected_before_build() {
        let mut session = CheckoutSession::new(CheckoutConfig::default(), form());
        session.form_mut().set_billing_address.pin_code.clear();
        assert!(matches!(session.summary_payload(), Err(CheckoutError::Core(_))));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = CheckoutSession::new(CheckoutConfig::default(), form());
        let b = CheckoutSession::new(CheckoutConfig::default(), form());
        assert_ne!(a.session_id(), b.session_id());
    }
}
