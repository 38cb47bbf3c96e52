use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use vantage_core::event::PageView;
use vantage_duckdb::DuckDbBackend;

fn page_view(domain: &str, path: &str, visitor_hash: &str) -> PageView {
    PageView {
        domain: domain.to_string(),
        path: path.to_string(),
        referrer: "https://news.ycombinator.com/".to_string(),
        screen_size: "1920x1080".to_string(),
        country_code: "DE".to_string(),
        browser: "Chrome".to_string(),
        os: "Linux".to_string(),
        visitor_hash: visitor_hash.to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn concurrent_salt_creation_persists_exactly_one_value() {
    let db = Arc::new(DuckDbBackend::open_in_memory().expect("in-memory DuckDB"));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let db = Arc::clone(&db);
        handles.push(tokio::spawn(async move {
            db.get_or_create_salt("2026-03-09").await.expect("salt")
        }));
    }

    let mut salts = Vec::new();
    for h in handles {
        salts.push(h.await.expect("task"));
    }

    // All callers observe the same winner.
    assert!(salts.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(salts[0].len(), 64, "32 random bytes hex-encoded");

    // Exactly one row persisted for the date.
    let conn = db.conn_for_test().await;
    let count: i64 = conn
        .prepare("SELECT COUNT(*) FROM daily_salts WHERE date = '2026-03-09'")
        .expect("prepare")
        .query_row([], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn salt_is_stable_across_lookups_but_differs_per_date() {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    let a1 = db.get_or_create_salt("2026-03-09").await.expect("salt");
    let a2 = db.get_or_create_salt("2026-03-09").await.expect("salt");
    let b = db.get_or_create_salt("2026-03-10").await.expect("salt");
    assert_eq!(a1, a2);
    assert_ne!(a1, b);
}

#[tokio::test]
async fn retention_deletes_only_salts_older_than_cutoff() {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    db.get_or_create_salt("2026-03-07").await.expect("salt");
    db.get_or_create_salt("2026-03-08").await.expect("salt");
    db.get_or_create_salt("2026-03-09").await.expect("salt");

    let deleted = db.delete_salts_before("2026-03-08").await.expect("sweep");
    assert_eq!(deleted, 1);

    // The cutoff day itself and newer days survive.
    assert!(db.get_or_create_salt("2026-03-08").await.is_ok());
    let conn = db.conn_for_test().await;
    let count: i64 = conn
        .prepare("SELECT COUNT(*) FROM daily_salts")
        .expect("prepare")
        .query_row([], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 2);
}

#[tokio::test]
async fn same_day_duplicate_is_silently_absorbed() {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    let pv = page_view("a.com", "/x", "deadbeef");

    db.insert_page_view(&pv).await.expect("first insert");
    db.insert_page_view(&pv).await.expect("duplicate insert");

    assert_eq!(db.count_page_views("a.com").await.expect("count"), 1);
}

#[tokio::test]
async fn next_day_same_tuple_is_a_new_row() {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");

    let mut pv = page_view("a.com", "/x", "deadbeef");
    pv.created_at = Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 0).unwrap();
    db.insert_page_view(&pv).await.expect("day one");

    pv.created_at = pv.created_at + Duration::minutes(2); // crosses UTC midnight
    db.insert_page_view(&pv).await.expect("day two");

    assert_eq!(db.count_page_views("a.com").await.expect("count"), 2);
}

#[tokio::test]
async fn summary_counts_views_and_distinct_visitors() {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    db.insert_page_view(&page_view("a.com", "/x", "v1"))
        .await
        .expect("insert");
    db.insert_page_view(&page_view("a.com", "/y", "v1"))
        .await
        .expect("insert");
    db.insert_page_view(&page_view("a.com", "/x", "v2"))
        .await
        .expect("insert");
    // Different domain must not leak into the summary.
    db.insert_page_view(&page_view("b.com", "/x", "v3"))
        .await
        .expect("insert");

    let stats = db.summary("a.com", 30).await.expect("summary");
    assert_eq!(stats.total_views, 3);
    assert_eq!(stats.unique_visitors, 2);
    assert_eq!(stats.views_per_day.len(), 1);
    assert_eq!(stats.views_per_day[0].views, 3);
    assert_eq!(stats.views_per_day[0].visitors, 2);
}

#[tokio::test]
async fn top_pages_ranked_by_views_and_referrers_skip_empty() {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    for visitor in ["v1", "v2", "v3"] {
        db.insert_page_view(&page_view("a.com", "/popular", visitor))
            .await
            .expect("insert");
    }
    let mut direct = page_view("a.com", "/quiet", "v1");
    direct.referrer = String::new();
    db.insert_page_view(&direct).await.expect("insert");

    let pages = db.top_pages("a.com", 30).await.expect("pages");
    assert_eq!(pages[0].value, "/popular");
    assert_eq!(pages[0].views, 3);
    assert_eq!(pages.len(), 2);

    let referrers = db.top_referrers("a.com", 30).await.expect("referrers");
    assert_eq!(referrers.len(), 1, "empty referrer is excluded");
    assert_eq!(referrers[0].views, 3);
}
