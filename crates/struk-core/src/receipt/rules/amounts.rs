//! Amount normalization for Indonesian-formatted receipts.
//!
//! Receipts print rupiah with `.` as the thousands separator and `,` as the
//! decimal separator (`Rp 15.000,50`).

use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert a digit group such as `15.000,50` into a decimal.
///
/// Periods are dropped, the (single) comma becomes the decimal point and
/// `negative` flips the sign. Anything that does not parse yields `None`.
pub fn normalize_amount(digits: &str, negative: bool) -> Option<Decimal> {
    let cleaned = digits.trim().trim_end_matches(['.', ',']);

    if cleaned.is_empty()
        || !cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
    {
        return None;
    }

    if cleaned.matches(',').count() > 1 {
        return None;
    }

    let normalized = cleaned.replace('.', "").replace(',', ".");
    let amount = Decimal::from_str(&normalized).ok()?;

    Some(if negative { -amount } else { amount })
}

/// Parse a full amount string such as `Rp 15.000,50` or `-Rp. 5.000,00`.
///
/// A minus sign anywhere before the first digit marks the amount negative.
pub fn parse_rupiah_amount(s: &str) -> Option<Decimal> {
    let first_digit = s.find(|c: char| c.is_ascii_digit())?;
    let (prefix, rest) = s.split_at(first_digit);
    let negative = prefix.contains('-');

    let mut digits = String::new();
    for c in rest.chars() {
        match c {
            '0'..='9' | '.' | ',' => digits.push(c),
            // A space only continues the amount right after a separator ("15. 000").
            ' ' if digits.ends_with(['.', ',']) => {}
            _ => break,
        }
    }

    normalize_amount(&digits, negative)
}

/// Voided sales are recorded as negative regardless of how the slip printed them.
pub fn apply_void_sign(amount: Decimal, is_void: bool) -> Decimal {
    if is_void && amount > Decimal::ZERO {
        -amount
    } else {
        amount
    }
}

/// Format amount in receipt style (`Rp 15.000,50`, `-Rp 5.000,00`).
pub fn format_rupiah(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}Rp {},{}", sign, grouped, decimal_part)
}
