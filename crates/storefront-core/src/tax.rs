//! # HSN Tax Breakup Assignment
//!
//! Attaches the applicable tax lines to each cart line from the HSN
//! reference data.
//!
//! ## Per-Line Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartLine { productId: "P-1" }                                          │
//! │       │                                                                 │
//! │       ▼  lookup by productId in HsnReference[]                          │
//! │  hsnDetails ── found? copy onto line : keep line's own                  │
//! │       │                                                                 │
//! │       ├── interTax.taxReqLs ─► move first compound last ─► interTaxBreakup│
//! │       ├── intraTax.taxReqLs ─► move first compound last ─► intraTaxBreakup│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  productTaxes = isInterState ? interTaxBreakup : intraTaxBreakup        │
//! │                                                                         │
//! │  taxExempt → every rate/total is 0, entries are still listed            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Breakups are rebuilt from scratch on every call.

use std::collections::HashMap;

use crate::money::{Money, TaxRate};
use crate::types::{CartLine, HsnDetails, HsnReference, HsnTaxGroup, TaxBreakup, TaxRequirement};

/// Assigns tax fields to `lines` in place.
///
/// Never fails: lines without HSN data end up with zero totals and empty
/// breakups.
///
/// ## Example
/// ```rust
/// use storefront_core::tax::assign_in_place;
/// use storefront_core::types::{CartLine, HsnDetails, HsnReference, HsnTaxGroup, TaxRequirement};
///
/// let cgst_sgst = HsnTaxGroup {
///     total_tax: Some(18.0),
///     tax_requirements: vec![
///         TaxRequirement { tax_name: "CGST".into(), rate: 9.0, compound: false },
///         TaxRequirement { tax_name: "SGST".into(), rate: 9.0, compound: false },
///     ],
/// };
/// let reference = vec![HsnReference {
///     product_id: "P-1".into(),
///     hsn_details: HsnDetails { intra_tax: Some(cgst_sgst), ..Default::default() },
/// }];
///
/// let mut lines = vec![CartLine::new("P-1", 1.0, 100.0)];
/// assign_in_place(&mut lines, &reference, false, false);
///
/// assert_eq!(lines[0].product_taxes, lines[0].intra_tax_breakup);
/// assert_eq!(lines[0].product_taxes.len(), 2);
/// assert_eq!(lines[0].total_intra_tax, 18.0);
/// ```
pub fn assign_in_place(
    lines: &mut [CartLine],
    hsn_reference: &[HsnReference],
    is_inter_state: bool,
    tax_exempt: bool,
) {
    let by_product: HashMap<&str, &HsnDetails> = hsn_reference
        .iter()
        .rev() // first entry wins on duplicate product ids
        .map(|entry| (entry.product_id.as_str(), &entry.hsn_details))
        .collect();

    for line in lines.iter_mut() {
        if let Some(details) = by_product.get(line.product_id.as_str()) {
            line.hsn_details = Some((*details).clone());
        }
        assign_line(line, is_inter_state, tax_exempt);
    }
}

/// Pure variant of [`assign_in_place`]: returns updated copies and leaves
/// `lines` untouched.
pub fn assign(
    lines: &[CartLine],
    hsn_reference: &[HsnReference],
    is_inter_state: bool,
    tax_exempt: bool,
) -> Vec<CartLine> {
    let mut assigned = lines.to_vec();
    assign_in_place(&mut assigned, hsn_reference, is_inter_state, tax_exempt);
    assigned
}

fn assign_line(line: &mut CartLine, is_inter_state: bool, tax_exempt: bool) {
    let details = line.hsn_details.as_ref();
    let inter = details.and_then(|d| d.inter_tax.as_ref());
    let intra = details.and_then(|d| d.intra_tax.as_ref());

    let amount = |value: Option<f64>| if tax_exempt { 0.0 } else { finite_or_zero(value) };

    line.tax = amount(details.and_then(|d| d.tax));
    line.total_inter_tax = amount(inter.and_then(|g| g.total_tax));
    line.total_intra_tax = amount(intra.and_then(|g| g.total_tax));

    line.inter_tax_breakup = build_breakup(inter, tax_exempt);
    line.intra_tax_breakup = build_breakup(intra, tax_exempt);

    line.product_taxes = if is_inter_state {
        line.inter_tax_breakup.clone()
    } else {
        line.intra_tax_breakup.clone()
    };
}

/// Builds the breakup of one direction with the first compound tax last.
fn build_breakup(group: Option<&HsnTaxGroup>, tax_exempt: bool) -> Vec<TaxBreakup> {
    let Some(group) = group else {
        return Vec::new();
    };

    let mut ordered: Vec<&TaxRequirement> = group.tax_requirements.iter().collect();
    if let Some(pos) = ordered.iter().position(|req| req.compound) {
        let compound = ordered.remove(pos);
        ordered.push(compound);
    }

    ordered
        .into_iter()
        .map(|req| TaxBreakup {
            tax_name: req.tax_name.clone(),
            compound: req.compound,
            rate: if tax_exempt { 0.0 } else { finite_or_zero(Some(req.rate)) },
        })
        .collect()
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Total tax on `taxable` for a breakup.
///
/// Non-compound taxes apply to `taxable`. A compound tax applies to
/// `taxable` plus every tax accumulated before it in the list.
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::tax::compound_tax_amount;
/// use storefront_core::types::TaxBreakup;
///
/// let breakup = vec![
///     TaxBreakup { tax_name: "IGST".into(), compound: false, rate: 28.0 },
///     TaxBreakup { tax_name: "CESS".into(), compound: true, rate: 10.0 },
/// ];
/// // 1000 × 28% = 280, then (1000 + 280) × 10% = 128
/// let tax = compound_tax_amount(Money::from_decimal(1000.0), &breakup);
/// assert_eq!(tax.to_decimal(), 408.0);
/// ```
pub fn compound_tax_amount(taxable: Money, breakup: &[TaxBreakup]) -> Money {
    breakup.iter().fold(Money::zero(), |accumulated, entry| {
        let base = if entry.compound {
            taxable + accumulated
        } else {
            taxable
        };
        accumulated + base.calculate_tax(TaxRate::from_percentage(entry.rate))
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
