use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on the `(current - previous) / previous` ratio.
pub const RATIO_SCALE: u32 = 4;

/// Relative change from `previous` to `current`, in percent.
///
/// The ratio is rounded to [`RATIO_SCALE`] places half-up (ties away from
/// zero) *before* scaling by 100, so results carry at most two decimals of
/// percent: `percent_change(1, 3) == -66.67`.
/// A zero `previous` yields 0.0 instead of dividing by zero.
pub fn percent_change(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return 0.0;
    }
    let ratio = match current.checked_sub(previous).and_then(|d| d.checked_div(previous)) {
        Some(r) => r.round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointAwayFromZero),
        None => return 0.0,
    };
    (ratio * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)
}
