//! Amount helpers and display formatting.
//!
//! All amounts are dollar values held as [`Decimal`]. The ledger only ever
//! adds and divides them, so no currency type is carried around.

use rust_decimal::Decimal;

/// Currency prefix used when rendering amounts.
pub const CURRENCY_SYMBOL: &str = "$";

/// Largest amount a single buy-in or the initial buy-in may carry.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Most decimal places an amount may carry.
///
/// Together with [`MAX_AMOUNT`] this keeps every amount within 13
/// significant digits, which the JSON number encoding reproduces exactly.
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Check if an amount is strictly positive.
pub fn is_positive(amount: Decimal) -> bool {
    amount > Decimal::ZERO
}

/// Check if a non-negative amount fits the recordable range and precision.
pub fn within_limits(amount: Decimal) -> bool {
    amount >= Decimal::ZERO
        && amount <= MAX_AMOUNT
        && amount.normalize().scale() <= MAX_AMOUNT_SCALE
}

/// Check if an amount may be recorded as a buy-in.
pub fn is_recordable(amount: Decimal) -> bool {
    is_positive(amount) && within_limits(amount)
}

/// Sum amounts, saturating at [`Decimal::MAX`] instead of overflowing.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, |total, amount| {
        total.checked_add(amount).unwrap_or(Decimal::MAX)
    })
}

/// Render an amount the way a running total is shown: `$50.00`.
pub fn format_money(amount: Decimal) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

/// Render an amount without trailing zeros: `50`, `20.5`, `0.25`.
pub fn format_plain(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// Render a suggested big blind: whole values as integers, anything else
/// with two decimals (`1`, `12`, `0.25`, `0.10`).
pub fn format_big_blind(value: Decimal) -> String {
    if value.fract().is_zero() {
        value.trunc().normalize().to_string()
    } else {
        format!("{:.2}", value)
    }
}
