use std::net::IpAddr;
use std::str::FromStr;

use tracing::{info, warn};

/// IP → ISO 3166-1 alpha-2 country code, via a MaxMind country database.
///
/// Strictly best-effort: a missing database file, an unparseable IP, or a
/// failed lookup all degrade to an empty string and never fail the request.
pub struct CountryResolver {
    reader: Option<maxminddb::Reader<Vec<u8>>>,
}

impl CountryResolver {
    /// Open the database at `path`. Failure to open disables country
    /// detection for the process lifetime (logged, not fatal).
    pub fn new(path: &str) -> Self {
        if path.is_empty() {
            info!("GeoIP: no database path configured, country detection disabled");
            return Self { reader: None };
        }
        match maxminddb::Reader::open_readfile(path) {
            Ok(reader) => {
                info!(path, "GeoIP database loaded");
                Self {
                    reader: Some(reader),
                }
            }
            Err(e) => {
                warn!(path, error = %e, "GeoIP database unavailable, country detection disabled");
                Self { reader: None }
            }
        }
    }

    /// Country code for `ip`, or `""` when unknown.
    pub fn country(&self, ip: &str) -> String {
        self.lookup(ip).unwrap_or_default()
    }

    fn lookup(&self, ip: &str) -> Option<String> {
        let reader = self.reader.as_ref()?;
        let addr = IpAddr::from_str(ip).ok()?;
        let record: maxminddb::geoip2::Country = reader.lookup(addr).ok()?;
        record
            .country
            .as_ref()
            .and_then(|c| c.iso_code)
            .map(str::to_string)
    }
}
