use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Per-source token-bucket admission control.
///
/// One bucket per source IP, created lazily on first sight. Tokens refill at
/// `rate` per second up to `burst`; an admission check spends one token or
/// denies immediately — no queuing. All state lives in a single
/// mutex-guarded map; every operation is O(1) and holds the lock only for
/// the duration of the arithmetic, so concurrent admission checks and the
/// eviction sweep never corrupt the table.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    rate: f64,
    burst: f64,
    idle: Duration,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl RateLimiter {
    /// `rate` tokens per second, up to `burst` capacity; buckets idle for
    /// `idle` or longer are removed by [`RateLimiter::sweep`].
    pub fn new(rate: f64, burst: f64, idle: Duration) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            rate,
            burst,
            idle,
        }
    }

    /// Non-blocking admission check for `key`. `true` = proceed, `false` =
    /// reject with 429. Touches the bucket's last-seen time either way.
    pub fn admit(&self, key: &str) -> bool {
        self.admit_at(key, Instant::now())
    }

    /// Evict buckets idle for at least the configured threshold. Returns the
    /// number of evicted buckets. Run periodically by a background task.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Number of live buckets.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Time is an explicit parameter so refill and eviction are testable
    // without sleeping.
    fn admit_at(&self, key: &str, now: Instant) -> bool {
        let mut buckets = self.lock();
        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: self.burst,
            last_refill: now,
            last_seen: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate).min(self.burst);
        bucket.last_refill = now;
        bucket.last_seen = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let mut buckets = self.lock();
        let before = buckets.len();
        buckets.retain(|_, b| now.duration_since(b.last_seen) < self.idle);
        before - buckets.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Bucket>> {
        // A poisoned mutex only means another thread panicked mid-admission;
        // the map itself is still consistent (single-step mutations).
        self.buckets.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Duration = Duration::from_secs(300);

    #[test]
    fn burst_admits_exactly_burst_then_denies() {
        let rl = RateLimiter::new(5.0, 10.0, IDLE);
        let now = Instant::now();
        let admitted = (0..11).filter(|_| rl.admit_at("1.2.3.4", now)).count();
        assert_eq!(admitted, 10);
        assert!(!rl.admit_at("1.2.3.4", now));
    }

    #[test]
    fn one_refill_interval_admits_exactly_one_more() {
        let rl = RateLimiter::new(5.0, 10.0, IDLE);
        let now = Instant::now();
        for _ in 0..10 {
            assert!(rl.admit_at("1.2.3.4", now));
        }
        assert!(!rl.admit_at("1.2.3.4", now));

        // 200ms at 5 tokens/sec refills exactly one token.
        let later = now + Duration::from_millis(200);
        assert!(rl.admit_at("1.2.3.4", later));
        assert!(!rl.admit_at("1.2.3.4", later));
    }

    #[test]
    fn keys_are_limited_independently() {
        let rl = RateLimiter::new(5.0, 1.0, IDLE);
        let now = Instant::now();
        assert!(rl.admit_at("1.2.3.4", now));
        assert!(!rl.admit_at("1.2.3.4", now));
        assert!(rl.admit_at("5.6.7.8", now));
    }

    #[test]
    fn sweep_evicts_idle_buckets_only() {
        let rl = RateLimiter::new(5.0, 10.0, IDLE);
        let now = Instant::now();
        rl.admit_at("stale", now);
        rl.admit_at("fresh", now + Duration::from_secs(200));
        assert_eq!(rl.len(), 2);

        let evicted = rl.sweep_at(now + Duration::from_secs(301));
        assert_eq!(evicted, 1);
        assert_eq!(rl.len(), 1);

        // The surviving key is still usable after the sweep.
        assert!(rl.admit_at("fresh", now + Duration::from_secs(302)));
    }

    #[test]
    fn a_denied_check_still_counts_as_activity() {
        let rl = RateLimiter::new(5.0, 1.0, IDLE);
        let now = Instant::now();
        assert!(rl.admit_at("1.2.3.4", now));
        // Denied at t+299s, but the touch renews the idle clock.
        assert!(!rl.admit_at("1.2.3.4", now + Duration::from_millis(10)));
        rl.admit_at("1.2.3.4", now + Duration::from_secs(299));
        assert_eq!(rl.sweep_at(now + Duration::from_secs(301)), 0);
    }
}
