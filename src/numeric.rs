//! Strict decimal text parsing shared by chart loading and request input.
//!
//! `Decimal::from_str` is lenient (it accepts `_` separators, for one), so
//! text is checked against a plain numeric grammar before it is converted:
//!
//! ```text
//! [+|-] digits [. digits] [(e|E) [+|-] digits]
//! ```
//!
//! where at least one mantissa digit is required on either side of the point.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parses `text` as a decimal number, or returns `None` if it is not one.
///
/// Surrounding whitespace is not accepted; callers trim first.
///
/// # Example
///
/// ```
/// use milk_rate_engine::numeric::parse_decimal;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_decimal("4.5"), Some(Decimal::new(45, 1)));
/// assert_eq!(parse_decimal("45e-1"), Some(Decimal::new(45, 1)));
/// assert_eq!(parse_decimal("4_5"), None);
/// assert_eq!(parse_decimal(""), None);
/// ```
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let negative = text.starts_with('-');
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);

    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let plain = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    };

    let value = match exponent {
        None => Decimal::from_str(&plain).ok()?,
        Some(exponent) => {
            let exponent_negative = exponent.starts_with('-');
            let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            if digits.is_empty() || !all_digits(digits) {
                return None;
            }
            let sign = if exponent_negative { "-" } else { "" };
            Decimal::from_scientific(&format!("{}e{}{}", plain, sign, digits)).ok()?
        }
    };

    Some(if negative { -value } else { value })
}

fn all_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}
