//! Cost normalization and comparison.
//!
//! The portal renders costs as locale currency strings (`"$1,234.50"`). We
//! strip the symbol and thousands separators, parse as [`Decimal`], and
//! compare for exact equality against the expected cost. There is no epsilon:
//! both values originate from the same currency unit at cent precision, and
//! relaxing the comparison would change acceptance outcomes.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::format::format_currency;

/// Result of comparing an extracted cost against the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub matches: bool,
    /// The normalized cost rendered back to currency form, for reporting
    /// regardless of match outcome.
    pub formatted: String,
}

/// A row has no usable cost when the cell is empty or textually zero.
pub fn is_no_data(cost_text: &str) -> bool {
    let t = cost_text.trim();
    t.is_empty() || t == "$0.00" || t == "$0"
}

/// Strip currency formatting and parse the remainder as a decimal.
///
/// Returns `None` when nothing numeric is left after stripping.
pub fn normalize_cost(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Compare the portal's reported cost against the expected cost.
///
/// An unparseable cost never matches; its raw text is carried through so the
/// caller still reports what the portal showed.
pub fn reconcile(extracted: &str, expected: Decimal) -> Reconciliation {
    match normalize_cost(extracted) {
        Some(value) => Reconciliation {
            matches: value == expected,
            formatted: format_currency(value),
        },
        None => Reconciliation {
            matches: false,
            formatted: extracted.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn formatted_cost_matches_equal_expected() {
        let r = reconcile("$1,000.00", dec("1000"));
        assert!(r.matches);
        assert_eq!(r.formatted, "$1,000.00");
    }

    #[test]
    fn near_miss_does_not_match() {
        let r = reconcile("$1,000.00", dec("999.99"));
        assert!(!r.matches);
        assert_eq!(r.formatted, "$1,000.00");
    }

    #[test]
    fn trailing_zeros_are_irrelevant() {
        assert!(reconcile("$250.50", dec("250.5")).matches);
        assert!(reconcile("$250", dec("250.00")).matches);
    }

    #[test]
    fn unparseable_cost_never_matches() {
        let r = reconcile("pendiente", dec("100"));
        assert!(!r.matches);
        assert_eq!(r.formatted, "pendiente");
    }

    #[test]
    fn no_data_detection() {
        assert!(is_no_data(""));
        assert!(is_no_data("  "));
        assert!(is_no_data("$0.00"));
        assert!(is_no_data("$0"));
        assert!(!is_no_data("$0.01"));
        assert!(!is_no_data("$100.00"));
    }

    #[test]
    fn normalize_strips_symbol_and_separators() {
        assert_eq!(normalize_cost("$1,234.50"), Some(dec("1234.50")));
        assert_eq!(normalize_cost(" $12 "), Some(dec("12")));
        assert_eq!(normalize_cost("MXN"), None);
        assert_eq!(normalize_cost(""), None);
    }
}
