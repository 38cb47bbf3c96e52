use std::time::Duration;

/// Runtime configuration, read once at startup from environment variables.
///
/// Lives in `vantage-core` so integration tests can build a `Config` by
/// hand without going through the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen address, e.g. "0.0.0.0:8080".
    pub addr: String,
    /// Directory holding the DuckDB database file.
    pub data_dir: String,
    /// Shared stats-API password. Empty string disables auth entirely.
    pub password: String,
    /// Domains allowed to submit events. Empty = allow all.
    pub allowed_domains: Vec<String>,
    /// Path to a MaxMind country database. Missing file disables GeoIP.
    pub geoip_path: String,
    /// Token-bucket refill rate, tokens per second per source IP.
    pub rate_per_sec: f64,
    /// Token-bucket burst capacity per source IP.
    pub rate_burst: f64,
    /// Idle time after which a rate bucket is evicted.
    pub limiter_idle_secs: u64,
    /// Interval between limiter eviction sweeps.
    pub limiter_sweep_secs: u64,
    /// Salts older than this many days are deleted by the retention sweep.
    pub salt_retention_days: i64,
    /// Interval between salt retention sweeps.
    pub salt_sweep_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            addr: std::env::var("VANTAGE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            data_dir: std::env::var("VANTAGE_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            password: std::env::var("VANTAGE_PASSWORD").unwrap_or_default(),
            allowed_domains: std::env::var("VANTAGE_ALLOWED_DOMAINS")
                .map(|v| parse_domain_list(&v))
                .unwrap_or_default(),
            geoip_path: std::env::var("VANTAGE_GEOIP_PATH")
                .unwrap_or_else(|_| "./GeoLite2-Country.mmdb".to_string()),
            rate_per_sec: std::env::var("VANTAGE_RATE_PER_SEC")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|e| format!("invalid VANTAGE_RATE_PER_SEC: {e}"))?,
            rate_burst: std::env::var("VANTAGE_RATE_BURST")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|e| format!("invalid VANTAGE_RATE_BURST: {e}"))?,
            limiter_idle_secs: std::env::var("VANTAGE_LIMITER_IDLE_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),
            limiter_sweep_secs: std::env::var("VANTAGE_LIMITER_SWEEP_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            salt_retention_days: std::env::var("VANTAGE_SALT_RETENTION_DAYS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
            salt_sweep_secs: std::env::var("VANTAGE_SALT_SWEEP_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),
        })
    }

    pub fn limiter_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.limiter_sweep_secs)
    }

    pub fn salt_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.salt_sweep_secs)
    }

    /// True when the stats API requires Basic auth.
    pub fn auth_enabled(&self) -> bool {
        !self.password.is_empty()
    }
}

/// Split a comma-separated domain list, trimming whitespace and dropping
/// empty entries, so `"a.com, b.com,"` parses to `["a.com", "b.com"]`.
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
