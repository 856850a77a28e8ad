use std::cmp::Ordering;

/// Absolute tolerance for every money comparison in the ledger.
/// Amounts closer than this are considered equal.
pub const PENNY_TOLERANCE: f64 = 0.005;

/// Credits fuzzily above this value are reported by the money-laundering scan.
pub const MONEY_LAUNDERING_LIMIT: f64 = 10000.0;

/// `true` when `a` and `b` are within `tolerance` of each other.
pub fn fuzzy_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance || a == b
}

/// Orders `a` against `b`, treating values within `tolerance` as equal.
/// NaN sorts above everything else.
pub fn fuzzy_cmp(a: f64, b: f64, tolerance: f64) -> Ordering {
    if fuzzy_eq(a, b, tolerance) {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}
