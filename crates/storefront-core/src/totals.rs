//! # Cart Totals
//!
//! Computes the cart value shown on the summary screen and the
//! volume-discount variant of it.
//!
//! ## Calculation
//! ```text
//! per line:
//!   listTotal = unitListPrice × qty
//!   netTotal  = unitListPrice × (1 − discount%) × qty
//!   lineTax   = compound_tax_amount(netTotal, productTaxes)
//!
//! cart:
//!   taxableAmount   = Σ netTotal + shipping + packing & forwarding + insurance
//!   calculatedTotal = taxableAmount + Σ lineTax
//!   grandTotal      = round(calculatedTotal)   (when round-off is on)
//! ```
//!
//! All sums run on [`Money`]; only the final figures go back to `f64`.

use serde::{Deserialize, Serialize};

use crate::form::{PreferenceOption, Preferences};
use crate::money::{Money, TaxRate};
use crate::tax::compound_tax_amount;
use crate::types::CartLine;
use crate::MAX_PERCENT;

// =============================================================================
// Cart Value
// =============================================================================

/// Plain cart totals, as sent under `cartValue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartValue {
    /// Sum of list prices before discount.
    #[serde(default, rename = "totalLP")]
    pub total_lp: f64,
    /// Sum of discounted line totals.
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub total_tax: f64,
    #[serde(default)]
    pub taxable_amount: f64,
    #[serde(default)]
    pub calculated_total: f64,
    #[serde(default)]
    pub grand_total: f64,
    #[serde(default)]
    pub rounding_adjustment: f64,
    #[serde(default)]
    pub total_shipping: f64,
    #[serde(default)]
    pub pf_rate: f64,
    #[serde(default)]
    pub insurance_charges: f64,
}

/// Totals after a volume discount, as sent under `VDDetails`.
///
/// Every field is optional: the UI only fills the ones it recalculated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDiscountDetails {
    #[serde(default)]
    pub sub_total: Option<f64>,
    #[serde(default)]
    pub overall_tax: Option<f64>,
    #[serde(default)]
    pub taxable_amount: Option<f64>,
    #[serde(default)]
    pub calculated_total: Option<f64>,
    #[serde(default)]
    pub grand_total: Option<f64>,
}

impl From<&CartValue> for VolumeDiscountDetails {
    fn from(value: &CartValue) -> Self {
        VolumeDiscountDetails {
            sub_total: Some(value.total_value),
            overall_tax: Some(value.total_tax),
            taxable_amount: Some(value.taxable_amount),
            calculated_total: Some(value.calculated_total),
            grand_total: Some(value.grand_total),
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Cart-level charges and rounding policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TotalsOptions {
    /// Round the grand total to a whole currency unit.
    pub round_off: bool,
    pub shipping: f64,
    pub pf_charges: f64,
    pub insurance_charges: f64,
}

impl TotalsOptions {
    /// Takes the charges from the selected preferences.
    ///
    /// Freight gives shipping, packing & forwarding gives the P&F charge,
    /// and insurance gives the insurance charge.
    pub fn from_preferences(preferences: &Preferences, round_off: bool) -> Self {
        let charge = |opt: &Option<PreferenceOption>| {
            opt.as_ref().and_then(|o| o.value).unwrap_or(0.0)
        };
        TotalsOptions {
            round_off,
            shipping: charge(&preferences.freight),
            pf_charges: charge(&preferences.pkg_forward),
            insurance_charges: charge(&preferences.insurance),
        }
    }
}

// =============================================================================
// Line Amounts
// =============================================================================

/// Money figures of one cart line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineAmounts {
    pub list_total: Money,
    pub net_total: Money,
    pub tax: Money,
}

/// Computes the list total, discounted total and tax of a line.
///
/// Negative or non-finite quantities count as zero. The discount is
/// clamped to 0–100%.
///
/// ## Example
/// ```rust
/// use storefront_core::totals::line_amounts;
/// use storefront_core::types::{CartLine, TaxBreakup};
///
/// let mut line = CartLine::new("P-1", 4.0, 250.0);
/// line.discount = 10.0;
/// line.product_taxes = vec![TaxBreakup {
///     tax_name: "IGST".to_string(),
///     compound: false,
///     rate: 18.0,
/// }];
///
/// let amounts = line_amounts(&line);
/// assert_eq!(amounts.list_total.to_decimal(), 1000.0);
/// assert_eq!(amounts.net_total.to_decimal(), 900.0);
/// assert_eq!(amounts.tax.to_decimal(), 162.0);
/// ```
pub fn line_amounts(line: &CartLine) -> LineAmounts {
    let quantity = if line.quantity.is_finite() {
        line.quantity.max(0.0)
    } else {
        0.0
    };
    let unit_list = Money::from_decimal(line.unit_list_price);
    let discount = TaxRate::from_percentage(line.discount.min(MAX_PERCENT));
    let unit_net = unit_list.apply_percentage_discount(discount.bps());

    let net_total = unit_net.multiply_quantity(quantity);
    LineAmounts {
        list_total: unit_list.multiply_quantity(quantity),
        net_total,
        tax: compound_tax_amount(net_total, &line.product_taxes),
    }
}

// =============================================================================
// Cart Calculation
// =============================================================================

/// Computes the cart value of `lines`.
///
/// Taxes are read from each line's `product_taxes`, so run the tax
/// assigner first.
pub fn calculate_cart_value(lines: &[CartLine], options: &TotalsOptions) -> CartValue {
    let mut total_lp = Money::zero();
    let mut total_value = Money::zero();
    let mut total_tax = Money::zero();

    for line in lines {
        let amounts = line_amounts(line);
        total_lp += amounts.list_total;
        total_value += amounts.net_total;
        total_tax += amounts.tax;
    }

    let shipping = Money::from_decimal(options.shipping);
    let pf = Money::from_decimal(options.pf_charges);
    let insurance = Money::from_decimal(options.insurance_charges);

    let taxable_amount = total_value + shipping + pf + insurance;
    let calculated_total = taxable_amount + total_tax;
    let grand_total = if options.round_off {
        calculated_total.round_to_major()
    } else {
        calculated_total
    };

    CartValue {
        total_lp: total_lp.to_decimal(),
        total_value: total_value.to_decimal(),
        total_tax: total_tax.to_decimal(),
        taxable_amount: taxable_amount.to_decimal(),
        calculated_total: calculated_total.to_decimal(),
        grand_total: grand_total.to_decimal(),
        rounding_adjustment: (grand_total - calculated_total).to_decimal(),
        total_shipping: shipping.to_decimal(),
        pf_rate: pf.to_decimal(),
        insurance_charges: insurance.to_decimal(),
    }
}

/// Volume-discounted totals, or `None` when no line carries a volume
/// discount.
pub fn volume_discount_details(
    lines: &[CartLine],
    options: &TotalsOptions,
) -> Option<VolumeDiscountDetails> {
    if !lines.iter().any(|line| line.volume_discount_applied) {
        return None;
    }
    Some(VolumeDiscountDetails::from(&calculate_cart_value(lines, options)))
}

/// Plain totals with every volume discount taken back out, paired with the
/// volume-discounted totals when any line carries one.
///
/// Lines with a volume discount count at their `base_discount` in the
/// plain figure.
pub fn calculate_totals(
    lines: &[CartLine],
    options: &TotalsOptions,
) -> (CartValue, Option<VolumeDiscountDetails>) {
    let details = volume_discount_details(lines, options);
    if details.is_none() {
        return (calculate_cart_value(lines, options), None);
    }

    let plain: Vec<CartLine> = lines
        .iter()
        .map(|line| {
            let mut line = line.clone();
            if line.volume_discount_applied {
                line.discount = line.base_discount.unwrap_or(0.0);
            }
            line
        })
        .collect();
    (calculate_cart_value(&plain, options), details)
}

// =============================================================================
// Unit Tests
// =============================================================================
