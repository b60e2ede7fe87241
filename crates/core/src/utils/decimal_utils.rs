use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{MONEY_SCALE, PERCENT_SCALE};

/// Rounds to two decimals, half-up (midpoint away from zero).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Percentage of `numerator` over `denominator`.
///
/// The ratio is rounded half-up to four decimals before scaling by 100.
/// Returns zero when the denominator is not positive.
pub fn percentage_of(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match numerator.checked_div(denominator) {
        Some(ratio) => {
            ratio.round_dp_with_strategy(PERCENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
                * Decimal::ONE_HUNDRED
        }
        None => Decimal::ZERO,
    }
}

/// Relative change from `previous` to `current`, in percent.
pub fn percent_change(previous: Decimal, current: Decimal) -> Decimal {
    percentage_of(current - previous, previous)
}
