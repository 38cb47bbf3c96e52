use serde::{Deserialize, Serialize};

/// Totals plus a per-day series for one domain over the queried window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_views: i64,
    pub unique_visitors: i64,
    pub views_per_day: Vec<DailyStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStat {
    /// UTC day, `YYYY-MM-DD`.
    pub date: String,
    pub views: i64,
    pub visitors: i64,
}

/// One row of a top-N breakdown (pages, referrers, locations, sizes,
/// browsers, systems). `value` carries the dimension value — a path, a
/// referrer URL, a country code, and so on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionStat {
    pub value: String,
    pub views: i64,
    pub visitors: i64,
}

/// Reporting window accepted by the stats endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Days7,
    Days30,
    Months12,
}

impl Period {
    /// Parse the `period` query parameter; anything unknown falls back to
    /// the 30-day default.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "today" => Period::Today,
            "7d" => Period::Days7,
            "12m" => Period::Months12,
            _ => Period::Days30,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Period::Today => 1,
            Period::Days7 => 7,
            Period::Days30 => 30,
            Period::Months12 => 365,
        }
    }
}
