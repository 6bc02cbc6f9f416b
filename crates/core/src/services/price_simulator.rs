use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::models::asset::Asset;
use crate::models::chart::{ChartDataPoint, ChartSeries, ChartTimeframe};
use crate::providers::traits::RandomSource;

/// Maximum relative deviation of a simulated chart point from the base price.
pub const CHART_VARIATION: f64 = 0.025;

/// Decimal places kept on simulated prices.
pub const PRICE_SCALE: u32 = 8;

/// Generates historical-looking price series for charting.
///
/// Stateless: every call draws fresh samples and nothing is remembered
/// between calls. Each point is `base * (1 + u)` with `u` uniform in
/// `±CHART_VARIATION`, so points scatter around the base price rather than
/// walking away from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceSimulator;

impl PriceSimulator {
    pub fn new() -> Self {
        Self
    }

    /// Simulate `timeframe.point_count()` points for `asset`, ending at `now`
    /// and spaced `timeframe.step()` apart, oldest first.
    pub fn generate(
        &self,
        asset: &Asset,
        timeframe: ChartTimeframe,
        now: DateTime<Utc>,
        random: &mut dyn RandomSource,
    ) -> ChartSeries {
        let base = asset.current_price;
        let step = timeframe.step();
        let count = timeframe.point_count();

        // Generated newest-first, then flipped.
        let mut points: Vec<ChartDataPoint> = (0..count)
            .map(|index| {
                let variation = random.next_symmetric(CHART_VARIATION);
                ChartDataPoint {
                    timestamp: now - step * index as i32,
                    price: scale_price(base, variation).unwrap_or(base),
                }
            })
            .collect();
        points.reverse();

        ChartSeries {
            asset: asset.clone(),
            timeframe,
            points,
        }
    }
}

/// `price * (1 + delta)`, rounded to [`PRICE_SCALE`] places.
/// Returns `None` when the factor is not representable or the product overflows.
pub fn scale_price(price: Decimal, delta: f64) -> Option<Decimal> {
    let factor = Decimal::from_f64(1.0 + delta)?;
    price
        .checked_mul(factor)
        .map(|p| p.round_dp(PRICE_SCALE))
}
