/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup (idempotent).
///
/// The `day` column on `page_views` is the UTC calendar day of `created_at`,
/// materialized at write time as `YYYY-MM-DD`. The UNIQUE constraint on
/// (domain, path, visitor_hash, day) is what makes `INSERT OR IGNORE`
/// absorb same-day duplicate submissions — DuckDB cannot express a unique
/// constraint over an expression like `created_at::date`, so the day is a
/// real column instead.
///
/// `daily_salts.date` uses the same `YYYY-MM-DD` format; lexicographic
/// comparison on it is also chronological, which the retention sweep
/// relies on (`WHERE date < ?`).
pub const INIT_SQL: &str = r#"
SET threads = 2;

CREATE TABLE IF NOT EXISTS page_views (
    id              VARCHAR NOT NULL,              -- UUID v4
    domain          VARCHAR NOT NULL,
    path            VARCHAR NOT NULL,
    referrer        VARCHAR NOT NULL DEFAULT '',
    screen_size     VARCHAR NOT NULL DEFAULT '',
    country_code    VARCHAR NOT NULL DEFAULT '',   -- ISO 3166-1 alpha-2, '' when unknown
    browser         VARCHAR NOT NULL DEFAULT '',
    os              VARCHAR NOT NULL DEFAULT '',
    visitor_hash    VARCHAR NOT NULL,              -- sha256(salt:domain:ip:ua), 64 hex chars
    day             VARCHAR NOT NULL,              -- UTC date of created_at, 'YYYY-MM-DD'
    created_at      TIMESTAMP NOT NULL,
    UNIQUE (domain, path, visitor_hash, day)
);

CREATE INDEX IF NOT EXISTS idx_page_views_domain_day
    ON page_views(domain, day);
CREATE INDEX IF NOT EXISTS idx_page_views_path
    ON page_views(domain, path, day);
CREATE INDEX IF NOT EXISTS idx_page_views_visitor
    ON page_views(domain, visitor_hash, day);

CREATE TABLE IF NOT EXISTS daily_salts (
    date    VARCHAR PRIMARY KEY,                   -- UTC date, 'YYYY-MM-DD'
    salt    VARCHAR NOT NULL                       -- 32 random bytes, hex-encoded
);
"#;
