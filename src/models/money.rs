//! Display formatting for monetary amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as dollars with two decimals and thousands separators.
///
/// Amounts are rounded half away from zero to the cent.
///
/// # Example
///
/// ```
/// use freight_quote::models::format_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_money(Decimal::from_str("1234.5").unwrap()), "$1,234.50");
/// assert_eq!(format_money(Decimal::from_str("0.005").unwrap()), "$0.01");
/// ```
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{}", sign, grouped, cents)
}
