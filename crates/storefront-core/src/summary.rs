//! # Summary Request Builder
//!
//! Turns the checkout form into the body of the order/quote creation call.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SummaryFormData ──build()──► SummaryPayload                            │
//! │                                 ├── Order(OrderPayload)                 │
//! │                                 │     base + orderDivisionId            │
//! │                                 │            orderDescription           │
//! │                                 │            orderTerms                 │
//! │                                 └── Quote(QuotePayload)                 │
//! │                                       base + quoteDivisionId            │
//! │                                              quoteDescription           │
//! │                                              quoteTerms                 │
//! │                                              sprDetails                 │
//! │                                                                         │
//! │  base (PayloadBase), both variants:                                     │
//! │    flattened addresses, seller/buyer ids, totals (VD first), prefs,     │
//! │    ISO dates, isSPRRequested, versionLevelVolumeDisscount, lines        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both variants serialize to one flat JSON object. `build` has no error
//! path: required form fields are enforced by [`SummaryFormData`]'s types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::form::{FormAddress, NamedRef, PreferenceOption, SprDetails, SummaryFormData};
use crate::types::CartLine;

// =============================================================================
// Address Details
// =============================================================================

/// An address in the flat shape the backend stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDetails {
    pub id: Option<String>,
    pub branch_name: Option<String>,
    pub address_line: String,
    pub locality: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub district_id: Option<String>,
    pub state: Option<String>,
    pub state_id: Option<String>,
    pub country: Option<String>,
    pub country_id: Option<String>,
    pub pin_code: String,
    pub pin_code_id: Option<String>,
    pub gstin: Option<String>,
    pub bill_to_code: Option<String>,
    pub ship_to_code: Option<String>,
    pub sold_to_code: Option<String>,
    pub primary_contact: Option<String>,
    pub mobile_no: Option<String>,
    pub email: Option<String>,
}

fn ref_id(r: &Option<NamedRef>) -> Option<String> {
    r.as_ref().map(|r| r.id.clone())
}

fn ref_name(r: &Option<NamedRef>) -> Option<String> {
    r.as_ref().and_then(|r| r.name.clone())
}

impl From<&FormAddress> for AddressDetails {
    fn from(address: &FormAddress) -> Self {
        AddressDetails {
            id: address.id.clone(),
            branch_name: address.branch_name.clone(),
            address_line: address.address_line.clone(),
            locality: address.locality.clone(),
            city: address.city.clone(),
            district: ref_name(&address.district),
            district_id: ref_id(&address.district),
            state: ref_name(&address.state),
            state_id: ref_id(&address.state),
            country: ref_name(&address.country),
            country_id: ref_id(&address.country),
            pin_code: address.pin_code.clone(),
            pin_code_id: ref_id(&address.pin_code_id),
            gstin: address.gst.clone(),
            bill_to_code: address.bill_to_code.clone(),
            ship_to_code: address.ship_to_code.clone(),
            sold_to_code: address.sold_to_code.clone(),
            primary_contact: address.primary_contact.clone(),
            mobile_no: address.mobile_no.clone(),
            email: address.email.clone(),
        }
    }
}

// =============================================================================
// Payload Types
// =============================================================================

/// Fields shared by order and quote requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadBase {
    // Buyer
    pub user_id: String,
    pub buyer_company_id: String,
    pub buyer_company_name: Option<String>,
    pub buyer_branch_id: Option<String>,
    pub currency_code: Option<String>,

    // Seller
    pub seller_company_id: String,
    pub seller_company_name: Option<String>,
    pub seller_branch_id: Option<String>,

    // Addresses
    pub billing_address_details: AddressDetails,
    pub shipping_address_details: AddressDetails,
    pub register_address_details: Option<AddressDetails>,
    pub seller_address_detail: AddressDetails,

    // Lines
    pub db_product_details: Vec<CartLine>,
    pub products_count: usize,

    // Totals
    pub calculated_total: f64,
    pub grand_total: f64,
    pub taxable_amount: f64,
    pub sub_total: f64,
    pub overall_tax: f64,
    #[serde(rename = "totalLP")]
    pub total_lp: f64,
    pub rounding_adjustment: f64,
    pub total_shipping: f64,
    pub pf_rate: f64,
    pub insurance_charges: f64,

    // Preferences
    pub freight_id: Option<String>,
    pub insurance_id: Option<String>,
    pub pmt_term_id: Option<String>,
    pub warranty_id: Option<String>,
    pub delivery_terms_id: Option<String>,
    pub pf_id: Option<String>,

    // Free text & dates
    pub buyer_reference_number: Option<String>,
    pub comment: Option<String>,
    pub customer_required_date: Option<String>,
    pub required_date: Option<String>,

    // Flags
    pub tax_exempted: bool,
    pub is_inter_state: bool,
    #[serde(rename = "isSPRRequested")]
    pub is_spr_requested: bool,
    /// The receiving API expects this exact (misspelled) key.
    #[serde(rename = "versionLevelVolumeDisscount")]
    pub version_level_volume_discount: bool,
}

/// Body of the order creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    #[serde(flatten)]
    pub base: PayloadBase,
    pub order_division_id: Option<String>,
    pub order_description: Option<String>,
    pub order_terms: Option<String>,
}

/// Body of the quote creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[serde(flatten)]
    pub base: PayloadBase,
    pub quote_division_id: Option<String>,
    pub quote_description: Option<String>,
    pub quote_terms: Option<String>,
    pub spr_details: Option<SprDetails>,
}

/// The outbound request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryPayload {
    Order(OrderPayload),
    Quote(QuotePayload),
}

impl SummaryPayload {
    /// Shared fields of either variant.
    pub fn base(&self) -> &PayloadBase {
        match self {
            SummaryPayload::Order(order) => &order.base,
            SummaryPayload::Quote(quote) => &quote.base,
        }
    }

    pub fn is_order(&self) -> bool {
        matches!(self, SummaryPayload::Order(_))
    }

    /// Serializes to the flat JSON object posted to the backend.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds the order or quote request body from the form.
///
/// ## Rules
/// - totals take `VDDetails.*` when present, finite and non-zero, else
///   `cartValue.*`, field by field
/// - orders never request SPR
/// - dates become ISO-8601 UTC strings or `null`
///
/// ## Example
/// ```rust
/// use storefront_core::summary::build;
/// use storefront_core::SummaryFormData;
/// use serde_json::json;
///
/// let form: SummaryFormData = serde_json::from_value(json!({
///     "isOrder": true,
///     "setBillingAddress": { "pinCode": "560001" },
///     "setShippingAddress": { "pinCode": "560001" },
///     "setSellerAddress": { "pinCode": "110001", "companyId": { "id": "seller-co" } },
///     "buyer": { "userId": "u-1", "companyId": "buyer-co" },
///     "division": { "id": "div-9" },
///     "sprDetails": { "spr": true }
/// })).unwrap();
///
/// let body = build(&form).to_json().unwrap();
/// assert_eq!(body["orderDivisionId"], "div-9");
/// assert_eq!(body["isSPRRequested"], false);
/// assert_eq!(body["sellerCompanyId"], "seller-co");
/// assert!(body.get("quoteDivisionId").is_none());
/// ```
pub fn build(form: &SummaryFormData) -> SummaryPayload {
    let base = build_base(form);
    let division_id = ref_id(&form.division);

    if form.is_order {
        SummaryPayload::Order(OrderPayload {
            base,
            order_division_id: division_id,
            order_description: form.description.clone(),
            order_terms: form.terms.clone(),
        })
    } else {
        SummaryPayload::Quote(QuotePayload {
            base,
            quote_division_id: division_id,
            quote_description: form.description.clone(),
            quote_terms: form.terms.clone(),
            spr_details: form.spr_details.clone(),
        })
    }
}

fn build_base(form: &SummaryFormData) -> PayloadBase {
    let seller = &form.set_seller_address;
    let cart = &form.cart_value;
    let vd = form.vd_details.clone().unwrap_or_default();
    let prefs = &form.preferences;

    let is_spr_requested =
        !form.is_order && form.spr_details.as_ref().map_or(false, |spr| spr.spr);

    PayloadBase {
        user_id: form.buyer.user_id.clone(),
        buyer_company_id: form.buyer.company_id.clone(),
        buyer_company_name: form.buyer.company_name.clone(),
        buyer_branch_id: form.buyer.branch_id.clone(),
        currency_code: form.buyer.currency_code.clone(),

        seller_company_id: seller.company_id.id.clone(),
        seller_company_name: seller.company_id.company_name.clone(),
        seller_branch_id: seller.address.id.clone(),

        billing_address_details: AddressDetails::from(&form.set_billing_address),
        shipping_address_details: AddressDetails::from(&form.set_shipping_address),
        register_address_details: form.set_register_address.as_ref().map(AddressDetails::from),
        seller_address_detail: AddressDetails::from(&seller.address),

        db_product_details: form.products.iter().map(outbound_line).collect(),
        products_count: form.products.len(),

        calculated_total: prefer_volume(vd.calculated_total, cart.calculated_total),
        grand_total: prefer_volume(vd.grand_total, cart.grand_total),
        taxable_amount: prefer_volume(vd.taxable_amount, cart.taxable_amount),
        sub_total: prefer_volume(vd.sub_total, cart.total_value),
        overall_tax: prefer_volume(vd.overall_tax, cart.total_tax),
        total_lp: cart.total_lp,
        rounding_adjustment: cart.rounding_adjustment,
        total_shipping: cart.total_shipping,
        pf_rate: cart.pf_rate,
        insurance_charges: cart.insurance_charges,

        freight_id: pref_id(&prefs.freight),
        insurance_id: pref_id(&prefs.insurance),
        pmt_term_id: pref_id(&prefs.payment_terms),
        warranty_id: pref_id(&prefs.warranty),
        delivery_terms_id: pref_id(&prefs.delivery_terms),
        pf_id: pref_id(&prefs.pkg_forward),

        buyer_reference_number: form.buyer_reference_number.clone(),
        comment: form.comment.clone(),
        customer_required_date: normalize_date(form.customer_required_date.as_deref()),
        required_date: normalize_date(form.required_date.as_deref()),

        tax_exempted: form.tax_exempted,
        is_inter_state: form.is_inter_state(),
        is_spr_requested,
        version_level_volume_discount: form.has_volume_discount(),
    }
}

/// A line as the backend stores it, without session bookkeeping.
fn outbound_line(line: &CartLine) -> CartLine {
    CartLine {
        base_discount: None,
        ..line.clone()
    }
}

fn pref_id(option: &Option<PreferenceOption>) -> Option<String> {
    option.as_ref().map(|o| o.id.clone())
}

/// Volume-discounted figure when it is usable, otherwise the plain one.
fn prefer_volume(volume: Option<f64>, plain: f64) -> f64 {
    match volume {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => plain,
    }
}

// =============================================================================
// Dates
// =============================================================================

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Zone-less date-times, taken as UTC. The second is `datetime-local` input.
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Date-only formats the date pickers and manual entry produce.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Normalizes a user-entered date to `YYYY-MM-DDTHH:MM:SS.sssZ` (UTC).
///
/// Accepts RFC 3339 timestamps, zone-less `YYYY-MM-DDTHH:MM[:SS]` (taken
/// as UTC) and the date-only formats `YYYY-MM-DD`, `DD/MM/YYYY`, `DD-MM-YYYY`
/// (midnight UTC). Anything else, including blank input, yields `None`.
///
/// ## Example
/// ```rust
/// use storefront_core::summary::normalize_date;
///
/// assert_eq!(
///     normalize_date(Some("2024-03-15")).as_deref(),
///     Some("2024-03-15T00:00:00.000Z")
/// );
/// assert_eq!(
///     normalize_date(Some("2024-03-15T10:30:00+05:30")).as_deref(),
///     Some("2024-03-15T05:00:00.000Z")
/// );
/// assert_eq!(normalize_date(Some("next tuesday")), None);
/// ```
pub fn normalize_date(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).format(ISO_FORMAT).to_string());
    }

    if let Some(naive) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc().format(ISO_FORMAT).to_string());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().format(ISO_FORMAT).to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::tests::sample_form;
    use crate::totals::VolumeDiscountDetails;

    #[test]
    fn test_quote_emits_quote_keys_only() {
        let mut form = sample_form();
        form.division = Some(NamedRef {
            id: "div-1".to_string(),
            name: Some("Valves".to_string()),
        });
        form.description = Some("Q3 valve order".to_string());
        form.terms = Some("Net 30".to_string());

        let payload = build(&form);
        assert!(!payload.is_order());

        let body = payload.to_json().unwrap();
        assert_eq!(body["quoteDivisionId"], "div-1");
        assert_eq!(body["quoteDescription"], "Q3 valve order");
        assert_eq!(body["quoteTerms"], "Net 30");
        assert!(body.get("orderDivisionId").is_none());
        assert!(body.get("orderDescription").is_none());
        assert!(body.get("orderTerms").is_none());
    }

    #[test]
    fn test_order_emits_order_keys_only() {
        let mut form = sample_form();
        form.is_order = true;
        form.division = Some(NamedRef {
            id: "div-2".to_string(),
            name: None,
        });

        let body = build(&form).to_json().unwrap();
        assert_eq!(body["orderDivisionId"], "div-2");
        assert!(body.get("quoteDivisionId").is_none());
        assert!(body.get("sprDetails").is_none());
    }

    #[test]
    fn test_order_never_requests_spr() {
        let mut form = sample_form();
        form.spr_details = Some(SprDetails {
            spr: true,
            company_name: Some("End Customer".to_string()),
            project_name: Some("Metro Line 3".to_string()),
            ..Default::default()
        });

        assert!(build(&form).base().is_spr_requested);

        form.is_order = true;
        assert!(!build(&form).base().is_spr_requested);
    }

    #[test]
    fn test_addresses_are_flattened() {
        let form = sample_form();
        let base = build(&form).base().clone();

        assert_eq!(base.seller_company_id, "seller-co");
        assert_eq!(base.seller_company_name.as_deref(), Some("Acme Industrial"));
        assert_eq!(base.seller_branch_id.as_deref(), Some("seller-branch-1"));
        assert_eq!(base.billing_address_details.pin_code_id.as_deref(), Some("pin-560001"));
        assert_eq!(base.billing_address_details.state.as_deref(), Some("Karnataka"));
        assert_eq!(base.billing_address_details.state_id.as_deref(), Some("KA"));
        assert_eq!(base.billing_address_details.gstin.as_deref(), Some("29ABCDE1234F1Z5"));
        assert!(base.register_address_details.is_none());
    }

    #[test]
    fn test_totals_fall_back_field_by_field() {
        let mut form = sample_form();
        form.vd_details = Some(VolumeDiscountDetails {
            sub_total: Some(1700.0),
            overall_tax: Some(0.0),
            taxable_amount: None,
            calculated_total: Some(f64::NAN),
            grand_total: Some(2006.0),
        });

        let base = build(&form).base().clone();
        assert_eq!(base.sub_total, 1700.0);
        assert_eq!(base.grand_total, 2006.0);
        // zero, missing and NaN fall back to cartValue
        assert_eq!(base.overall_tax, 333.9);
        assert_eq!(base.taxable_amount, 1855.0);
        assert_eq!(base.calculated_total, 2188.9);
    }

    #[test]
    fn test_totals_without_volume_discount() {
        let base = build(&sample_form()).base().clone();
        assert_eq!(base.sub_total, 1855.0);
        assert_eq!(base.overall_tax, 333.9);
        assert_eq!(base.grand_total, 2189.0);
    }

    #[test]
    fn test_version_level_volume_discount_flag() {
        let mut form = sample_form();
        let body = build(&form).to_json().unwrap();
        assert_eq!(body["versionLevelVolumeDisscount"], false);

        form.products[0].volume_discount_applied = true;
        let body = build(&form).to_json().unwrap();
        assert_eq!(body["versionLevelVolumeDisscount"], true);
    }

    #[test]
    fn test_dates_are_normalized_or_null() {
        let mut form = sample_form();
        form.customer_required_date = Some("15/03/2024".to_string());
        form.required_date = Some("soon".to_string());

        let body = build(&form).to_json().unwrap();
        assert_eq!(body["customerRequiredDate"], "2024-03-15T00:00:00.000Z");
        assert!(body["requiredDate"].is_null());
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(
            normalize_date(Some("15-03-2024")).as_deref(),
            Some("2024-03-15T00:00:00.000Z")
        );
        assert_eq!(
            normalize_date(Some("2024-03-15T08:00:00")).as_deref(),
            Some("2024-03-15T08:00:00.000Z")
        );
        assert_eq!(
            normalize_date(Some("2024-03-15T08:00:00.250Z")).as_deref(),
            Some("2024-03-15T08:00:00.250Z")
        );
        assert_eq!(
            normalize_date(Some("2024-03-15T14:45")).as_deref(),
            Some("2024-03-15T14:45:00.000Z")
        );
        assert_eq!(normalize_date(Some("   ")), None);
        assert_eq!(normalize_date(Some("31/02/2024")), None);
        assert_eq!(normalize_date(None), None);
    }

    #[test]
    fn test_lines_pass_through_with_extensions() {
        let mut form = sample_form();
        form.products[0]
            .extensions
            .insert("brandName".to_string(), Value::from("Acme"));

        let body = build(&form).to_json().unwrap();
        assert_eq!(body["productsCount"], 2);
        assert_eq!(body["dbProductDetails"][0]["brandName"], "Acme");
        assert_eq!(body["dbProductDetails"][1]["productId"], "P-2");
    }

    #[test]
    fn test_base_discount_stays_out_of_the_payload() {
        let mut form = sample_form();
        form.products[0].base_discount = Some(2.0);
        form.products[0].discount = 10.0;

        let body = build(&form).to_json().unwrap();
        assert!(body["dbProductDetails"][0].get("baseDiscount").is_none());
        assert_eq!(body["dbProductDetails"][0]["discount"], 10.0);
        assert_eq!(form.products[0].base_discount, Some(2.0));
    }
}
