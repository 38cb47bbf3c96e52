use anyhow::Result;

use vantage_core::event::PageView;

use crate::DuckDbBackend;

impl DuckDbBackend {
    /// Persist one page view, absorbing same-day duplicates.
    ///
    /// `INSERT OR IGNORE` against the UNIQUE (domain, path, visitor_hash,
    /// day) constraint makes a repeat submission within the same UTC day a
    /// silent no-op, so client-side retries never double-count. No retry on
    /// storage failure — the error surfaces to the handler.
    pub async fn insert_page_view(&self, pv: &PageView) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            r#"INSERT OR IGNORE INTO page_views (
                id, domain, path, referrer, screen_size,
                country_code, browser, os, visitor_hash, day, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#,
            duckdb::params![
                uuid::Uuid::new_v4().to_string(),
                pv.domain,
                pv.path,
                pv.referrer,
                pv.screen_size,
                pv.country_code,
                pv.browser,
                pv.os,
                pv.visitor_hash,
                pv.day(),
                pv.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Count stored views for a domain. Test/diagnostic helper.
    pub async fn count_page_views(&self, domain: &str) -> Result<i64> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT COUNT(*) FROM page_views WHERE domain = ?1")?;
        let count: i64 = stmt.query_row(duckdb::params![domain], |row| row.get(0))?;
        Ok(count)
    }
}
