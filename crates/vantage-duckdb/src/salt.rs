use anyhow::{bail, Result};
use duckdb::Connection;

use crate::backend::rand_hex;
use crate::DuckDbBackend;

impl DuckDbBackend {
    /// Fetch the salt for `date` (UTC, `YYYY-MM-DD`), creating it if absent.
    ///
    /// Creation is conflict-tolerant: generate 32 random bytes, attempt an
    /// `INSERT OR IGNORE`, then read back unconditionally. If another task
    /// (or another statement racing on the primary key) inserted first, the
    /// local value is discarded and the winner's salt is returned, so a date
    /// has exactly one salt no matter how many first-requests race.
    ///
    /// A genuine store failure propagates as an error — absence is the only
    /// condition that triggers creation, so hashing fails closed rather than
    /// inventing an insecure fallback salt.
    pub async fn get_or_create_salt(&self, date: &str) -> Result<String> {
        let conn = self.conn.lock().await;

        if let Some(salt) = select_salt(&conn, date)? {
            return Ok(salt);
        }

        let candidate = rand_hex(32);
        conn.execute(
            "INSERT OR IGNORE INTO daily_salts (date, salt) VALUES (?1, ?2)",
            duckdb::params![date, candidate],
        )?;

        // Read back the persisted value; on conflict this is the winner's,
        // not ours.
        match select_salt(&conn, date)? {
            Some(salt) => Ok(salt),
            None => bail!("daily salt for {date} missing after insert"),
        }
    }

    /// Delete salts strictly older than `cutoff_date` (`YYYY-MM-DD`).
    ///
    /// Run by the retention sweep. A salt already read by an in-flight
    /// fingerprint computation stays valid for that computation — salts are
    /// read once and used, never re-fetched mid-request.
    pub async fn delete_salts_before(&self, cutoff_date: &str) -> Result<usize> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute(
            "DELETE FROM daily_salts WHERE date < ?1",
            duckdb::params![cutoff_date],
        )?;
        Ok(deleted)
    }
}

/// Absence (`Ok(None)`) is distinct from a store failure (`Err`): only the
/// former may proceed to salt creation.
fn select_salt(conn: &Connection, date: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT salt FROM daily_salts WHERE date = ?1")?;
    match stmt.query_row(duckdb::params![date], |row| row.get::<_, String>(0)) {
        Ok(salt) => Ok(Some(salt)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
