use holdex_core::amount::sum_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Absolute difference allowed between a reported and a computed total.
pub fn default_tolerance() -> Decimal {
    Decimal::new(5, 2)
}

/// Outcome of comparing a statement's reported total against its holdings.
///
/// A mismatch is not an error; the parsed holdings are returned either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub reported_total: Decimal,
    /// Sum of committed values, rounded to two decimal places.
    pub computed_total: Decimal,
    /// `|reported - computed|`.
    pub difference: Decimal,
    pub is_valid: bool,
}

/// Compare `reported` with the rounded sum of `values`.
pub fn reconcile<I>(values: I, reported: Decimal, tolerance: Decimal) -> Reconciliation
where
    I: IntoIterator<Item = Decimal>,
{
    let computed_total = sum_money(values);
    let difference = reported.saturating_sub(computed_total).abs();
    Reconciliation {
        reported_total: reported,
        computed_total,
        difference,
        is_valid: difference <= tolerance,
    }
}
