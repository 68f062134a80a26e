//! Zero-safe whole-percentage arithmetic shared by the analytics modules.
//!
//! Every rate in this crate is defined as 0 when its denominator is zero;
//! callers never see a division fault, NaN, or infinity.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Planned-to-actual hour ratio as a whole percentage. 0 when no actual
/// hours were logged.
pub(crate) fn efficiency_pct(planned: Decimal, actual: Decimal) -> i64 {
    if actual.is_zero() {
        return 0;
    }
    round_pct(planned * Decimal::ONE_HUNDRED / actual)
}

/// Relative budget overrun `(actual - planned) / planned` as a whole
/// percentage. 0 when there is no plan to deviate from.
pub(crate) fn deviation_pct(planned: Decimal, actual: Decimal) -> i64 {
    if planned.is_zero() {
        return 0;
    }
    round_pct((actual - planned) * Decimal::ONE_HUNDRED / planned)
}

/// `part / whole` count ratio as a whole percentage. 0 when `whole` is 0.
pub(crate) fn count_rate_pct(part: usize, whole: usize) -> i64 {
    if whole == 0 {
        return 0;
    }
    round_pct(Decimal::from(part as u64) * Decimal::ONE_HUNDRED / Decimal::from(whole as u64))
}

/// Mean of an integer sum over a count, rounded; 0 for an empty group.
pub(crate) fn mean_pct(sum: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    round_pct(Decimal::from(sum) / Decimal::from(count as u64))
}

// Round-half-up matches how the upstream reports have always rounded.
fn round_pct(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}
