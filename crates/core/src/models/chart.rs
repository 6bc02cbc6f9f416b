use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// Chart window selectable in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartTimeframe {
    Hour1,
    Hour8,
    Day1,
    Week1,
    Month1,
    Month6,
    Year1,
}

impl ChartTimeframe {
    pub const ALL: [ChartTimeframe; 7] = [
        ChartTimeframe::Hour1,
        ChartTimeframe::Hour8,
        ChartTimeframe::Day1,
        ChartTimeframe::Week1,
        ChartTimeframe::Month1,
        ChartTimeframe::Month6,
        ChartTimeframe::Year1,
    ];

    /// Number of points generated for this window.
    pub fn point_count(self) -> usize {
        match self {
            ChartTimeframe::Hour1 => 60,
            ChartTimeframe::Hour8 => 48,
            ChartTimeframe::Day1 => 24,
            ChartTimeframe::Week1 => 7,
            ChartTimeframe::Month1 => 30,
            ChartTimeframe::Month6 => 180,
            ChartTimeframe::Year1 => 365,
        }
    }

    /// Spacing between consecutive points.
    pub fn step(self) -> Duration {
        match self {
            ChartTimeframe::Hour1 => Duration::minutes(1),
            ChartTimeframe::Hour8 => Duration::minutes(10),
            ChartTimeframe::Day1 => Duration::hours(1),
            ChartTimeframe::Week1
            | ChartTimeframe::Month1
            | ChartTimeframe::Month6
            | ChartTimeframe::Year1 => Duration::days(1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartTimeframe::Hour1 => "1h",
            ChartTimeframe::Hour8 => "8h",
            ChartTimeframe::Day1 => "1d",
            ChartTimeframe::Week1 => "1w",
            ChartTimeframe::Month1 => "1m",
            ChartTimeframe::Month6 => "6m",
            ChartTimeframe::Year1 => "1y",
        }
    }
}

impl std::fmt::Display for ChartTimeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single (timestamp, price) sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// Price history for one asset over one timeframe, oldest point first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub asset: Asset,
    pub timeframe: ChartTimeframe,
    pub points: Vec<ChartDataPoint>,
}
