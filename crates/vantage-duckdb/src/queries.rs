use anyhow::Result;
use chrono::{Duration, Utc};
use duckdb::Connection;

use vantage_core::stats::{DailyStat, DimensionStat, SummaryStats};

use crate::DuckDbBackend;

const TOP_N: usize = 20;

/// First UTC day (inclusive, `YYYY-MM-DD`) of a window ending today.
fn window_start(days: i64) -> String {
    (Utc::now().date_naive() - Duration::days(days.max(1) - 1))
        .format("%Y-%m-%d")
        .to_string()
}

impl DuckDbBackend {
    /// Totals plus per-day views/visitors for `domain` over the last `days`
    /// UTC days (today inclusive).
    pub async fn summary(&self, domain: &str, days: i64) -> Result<SummaryStats> {
        let conn = self.conn.lock().await;
        let start = window_start(days);

        let mut stats = SummaryStats::default();
        let mut stmt = conn.prepare(
            "SELECT COUNT(*), COUNT(DISTINCT visitor_hash) \
             FROM page_views WHERE domain = ?1 AND day >= ?2",
        )?;
        let (views, visitors): (i64, i64) =
            stmt.query_row(duckdb::params![domain, start], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
        stats.total_views = views;
        stats.unique_visitors = visitors;

        let mut stmt = conn.prepare(
            "SELECT day, COUNT(*) AS views, COUNT(DISTINCT visitor_hash) AS visitors \
             FROM page_views WHERE domain = ?1 AND day >= ?2 \
             GROUP BY day ORDER BY day",
        )?;
        let rows = stmt.query_map(duckdb::params![domain, start], |row| {
            Ok(DailyStat {
                date: row.get(0)?,
                views: row.get(1)?,
                visitors: row.get(2)?,
            })
        })?;
        for row in rows {
            stats.views_per_day.push(row?);
        }

        Ok(stats)
    }

    pub async fn top_pages(&self, domain: &str, days: i64) -> Result<Vec<DimensionStat>> {
        let conn = self.conn.lock().await;
        top_by(&conn, "path", domain, days, false)
    }

    pub async fn top_referrers(&self, domain: &str, days: i64) -> Result<Vec<DimensionStat>> {
        let conn = self.conn.lock().await;
        top_by(&conn, "referrer", domain, days, true)
    }

    pub async fn top_locations(&self, domain: &str, days: i64) -> Result<Vec<DimensionStat>> {
        let conn = self.conn.lock().await;
        top_by(&conn, "country_code", domain, days, true)
    }

    pub async fn top_screen_sizes(&self, domain: &str, days: i64) -> Result<Vec<DimensionStat>> {
        let conn = self.conn.lock().await;
        top_by(&conn, "screen_size", domain, days, true)
    }

    pub async fn top_browsers(&self, domain: &str, days: i64) -> Result<Vec<DimensionStat>> {
        let conn = self.conn.lock().await;
        top_by(&conn, "browser", domain, days, true)
    }

    pub async fn top_systems(&self, domain: &str, days: i64) -> Result<Vec<DimensionStat>> {
        let conn = self.conn.lock().await;
        top_by(&conn, "os", domain, days, true)
    }
}

/// Top-N breakdown over one column. `column` is a fixed identifier chosen by
/// the typed wrappers above, never caller input; everything else is bound as
/// a parameter.
fn top_by(
    conn: &Connection,
    column: &'static str,
    domain: &str,
    days: i64,
    exclude_empty: bool,
) -> Result<Vec<DimensionStat>> {
    let empty_filter = if exclude_empty {
        format!("AND {column} != ''")
    } else {
        String::new()
    };
    let sql = format!(
        "SELECT {column}, COUNT(*) AS views, COUNT(DISTINCT visitor_hash) AS visitors \
         FROM page_views \
         WHERE domain = ?1 AND day >= ?2 {empty_filter} \
         GROUP BY {column} ORDER BY views DESC LIMIT {TOP_N}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(duckdb::params![domain, window_start(days)], |row| {
        Ok(DimensionStat {
            value: row.get(0)?,
            views: row.get(1)?,
            visitors: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
