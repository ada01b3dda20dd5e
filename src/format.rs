use rust_decimal::{Decimal, RoundingStrategy};

fn group_int_digits(int_part: &str) -> String {
    // Insert commas every 3 digits, preserving any leading zeros.
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

fn pad_fraction_to_dp(s: &str, dp: usize) -> String {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };

    let mut out = String::with_capacity(int_part.len() + 1 + dp);
    out.push_str(int_part);
    out.push('.');

    let mut written = 0usize;
    for ch in frac_part.chars().take(dp) {
        out.push(ch);
        written += 1;
    }
    while written < dp {
        out.push('0');
        written += 1;
    }

    out
}

/// Render a cost the way the portal displays it: dollar symbol, thousands
/// separators, exactly two decimal places.
///
/// This is the reporting form written back to the spreadsheet; comparison
/// happens on [`Decimal`] values, never on these strings.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();

    let padded = pad_fraction_to_dp(&abs.normalize().to_string(), 2);
    let (int_part, frac_part) = padded.split_once('.').unwrap_or((padded.as_str(), "00"));
    let grouped = group_int_digits(int_part);

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&grouped);
    out.push('.');
    out.push_str(frac_part);
    out
}
