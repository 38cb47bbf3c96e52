use chrono::Utc;
use sha2::{Digest, Sha256};

/// Compute a pseudonymous visitor fingerprint.
///
/// Formula: `sha256(salt ":" domain ":" ip ":" user_agent)` encoded as
/// 64 lowercase hex chars.
///
/// The salt rotates per UTC calendar day (see the daily-salt store), so the
/// fingerprint is deterministic within a day, one-way, and unlinkable across
/// days — the same visitor hashes to unrelated values once the salt changes.
pub fn fingerprint(salt: &str, domain: &str, ip: &str, user_agent: &str) -> String {
    let input = format!("{salt}:{domain}:{ip}:{user_agent}");
    let hash = Sha256::digest(input.as_bytes());
    hex::encode(hash)
}

/// Today's UTC date formatted `YYYY-MM-DD` — the key of the current salt.
pub fn today_utc() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
