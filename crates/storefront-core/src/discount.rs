//! # Volume Discount Resolution
//!
//! Picks the discount tier a buyer qualifies for and the next tier they
//! could reach by ordering more.
//!
//! ## Tier Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ranges:  [1..10 → 5%]   [11..50 → 10%]            [61..100 → 15%]      │
//! │                                          (gap 51..60)                   │
//! │                                                                         │
//! │  qty 25  ─► suitable = 11..50 (10%)   next = 61..100                    │
//! │  qty 55  ─► suitable = none           next = 61..100   (in the gap)     │
//! │  qty 500 ─► suitable = none           next = none      (past the top)   │
//! │  qty 0   ─► suitable = none           next = none                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Overlapping tiers resolve to the highest `value`; among equal values the
//! tier listed first wins.

use crate::types::{CartLine, DiscountRange, QuantityInput};

/// Result of resolving a quantity against a set of tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeDiscountMatch<'a> {
    /// Best tier containing the quantity.
    pub suitable: Option<&'a DiscountRange>,
    /// Nearest tier starting above the quantity.
    pub next: Option<&'a DiscountRange>,
}

impl VolumeDiscountMatch<'_> {
    /// Detaches the match from the borrowed range slice.
    pub fn to_owned_match(&self) -> OwnedVolumeDiscountMatch {
        OwnedVolumeDiscountMatch {
            suitable: self.suitable.copied(),
            next: self.next.copied(),
        }
    }
}

/// [`VolumeDiscountMatch`] without the borrow, for storing on a session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OwnedVolumeDiscountMatch {
    pub suitable: Option<DiscountRange>,
    pub next: Option<DiscountRange>,
}

/// Resolves `quantity` against `ranges`.
///
/// ## Rules
/// - Missing, non-numeric or non-positive quantity → no match
/// - `suitable`: tier with `min_qty <= q <= max_qty` and the highest value
/// - `next`: tier with `min_qty > q` and the smallest `min_qty`
/// - quantity above every tier's `max_qty` → no match at all
///
/// ## Example
/// ```rust
/// use storefront_core::discount::resolve;
/// use storefront_core::types::DiscountRange;
///
/// let ranges = [
///     DiscountRange::new(1.0, 10.0, 5.0),
///     DiscountRange::new(11.0, 50.0, 10.0),
///     DiscountRange::new(51.0, 100.0, 15.0),
/// ];
///
/// let found = resolve("25", &ranges);
/// assert_eq!(found.suitable, Some(&ranges[1]));
/// assert_eq!(found.next, Some(&ranges[2]));
///
/// let none = resolve(1000, &ranges);
/// assert!(none.suitable.is_none() && none.next.is_none());
/// ```
pub fn resolve(quantity: impl Into<QuantityInput>, ranges: &[DiscountRange]) -> VolumeDiscountMatch<'_> {
    let Some(quantity) = quantity.into().value() else {
        return VolumeDiscountMatch::default();
    };
    resolve_quantity(quantity, ranges)
}

/// [`resolve`] for an already numeric quantity.
pub fn resolve_quantity(quantity: f64, ranges: &[DiscountRange]) -> VolumeDiscountMatch<'_> {
    if quantity.is_nan() || quantity <= 0.0 || ranges.is_empty() {
        return VolumeDiscountMatch::default();
    }

    // No extrapolation past the highest tier
    if ranges.iter().all(|range| quantity > range.max_qty) {
        return VolumeDiscountMatch::default();
    }

    let mut suitable: Option<&DiscountRange> = None;
    let mut next: Option<&DiscountRange> = None;

    for range in ranges {
        if range.contains(quantity) && suitable.map_or(true, |best| range.value > best.value) {
            suitable = Some(range);
        }
        if range.min_qty > quantity && next.map_or(true, |best| range.min_qty < best.min_qty) {
            next = Some(range);
        }
    }

    VolumeDiscountMatch { suitable, next }
}

/// Resolves the line's quantity against `ranges` and writes the outcome
/// onto the line.
///
/// ## Effects on the line
/// - match: `discount = suitable.value`, `volume_discount_applied = true`,
///   `applied_volume_discount = suitable`; the pre-existing discount is kept
///   in `base_discount` the first time
/// - no match: the volume discount is withdrawn and `discount` goes back to
///   `base_discount`; a line flagged as discounted with no recorded base
///   goes back to 0
/// - always: `next_volume_discount = next`
pub fn apply_volume_discount(line: &mut CartLine, ranges: &[DiscountRange]) -> OwnedVolumeDiscountMatch {
    let found = resolve_quantity(line.quantity, ranges).to_owned_match();

    match found.suitable {
        Some(tier) => {
            if line.base_discount.is_none() {
                line.base_discount = Some(line.discount);
            }
            line.discount = tier.value;
            line.volume_discount_applied = true;
            line.applied_volume_discount = Some(tier);
        }
        None => {
            match line.base_discount.take() {
                Some(base) => line.discount = base,
                None if line.volume_discount_applied => line.discount = 0.0,
                None => {}
            }
            line.volume_discount_applied = false;
            line.applied_volume_discount = None;
        }
    }
    line.next_volume_discount = found.next;

    found
}

// =============================================================================
// Unit Tests
// =============================================================================
