use chrono::{DateTime, TimeZone, Utc};
use refgroup::{prepare_ref, HitStats, RefScheme, SqliteStore, TimeRange};

const SITE: i64 = 1;
const PATH: i64 = 42;

fn hour(day: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, h, 0, 0).unwrap()
}

fn may() -> TimeRange {
    TimeRange {
        start: hour(1, 0),
        end: hour(31, 23),
    }
}

fn store_with(n: usize) -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    for i in 0..n {
        store
            .record(
                SITE,
                PATH,
                hour(1 + (i % 28) as u32, 12),
                &format!("example{i}.com"),
                Some(RefScheme::Http),
                (i + 1) as i64,
            )
            .unwrap();
    }
    store
}

#[test]
fn more_is_set_when_rows_remain() {
    let store = store_with(15);
    let mut hs = HitStats::default();
    hs.list_refs_by_path_id(&store, SITE, PATH, may(), 10, 0).unwrap();

    assert_eq!(hs.stats.len(), 10);
    assert!(hs.more);
    assert_eq!(hs.stats[0].name, "example14.com");
    assert_eq!(hs.stats[0].count, 15);
}

#[test]
fn more_is_unset_at_exact_limit() {
    let store = store_with(10);
    let mut hs = HitStats::default();
    hs.list_refs_by_path_id(&store, SITE, PATH, may(), 10, 0).unwrap();

    assert_eq!(hs.stats.len(), 10);
    assert!(!hs.more);
}

#[test]
fn pages_do_not_overlap() {
    let store = store_with(25);
    let mut names = Vec::new();
    let mut offset = 0;
    loop {
        let mut hs = HitStats::default();
        hs.list_refs_by_path_id(&store, SITE, PATH, may(), 10, offset).unwrap();
        names.extend(hs.stats.into_iter().map(|s| s.name));
        if !hs.more {
            break;
        }
        offset += 10;
    }

    assert_eq!(names.len(), 25);
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 25);
}

#[test]
fn range_is_inclusive() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .record(SITE, PATH, hour(3, 0), "start.com", Some(RefScheme::Http), 1)
        .unwrap();
    store
        .record(SITE, PATH, hour(4, 0), "end.com", Some(RefScheme::Http), 1)
        .unwrap();
    store
        .record(SITE, PATH, hour(5, 0), "after.com", Some(RefScheme::Http), 1)
        .unwrap();

    let mut hs = HitStats::default();
    let range = TimeRange {
        start: hour(3, 0),
        end: hour(4, 0),
    };
    hs.list_refs_by_path_id(&store, SITE, PATH, range, 10, 0).unwrap();

    let mut names: Vec<_> = hs.stats.into_iter().map(|s| s.name).collect();
    names.sort();
    assert_eq!(names, vec!["end.com", "start.com"]);
}

#[test]
fn ingested_referrers_are_grouped() {
    let store = SqliteStore::open_in_memory().unwrap();
    let headers = [
        "https://www.google.com/",
        "https://www.google.co.uk/search?q=rust",
        "https://news.ycombinator.com/",
        "https://old.reddit.com/r/programming/top?utm_source=x",
        "https://www.reddit.com/r/programming",
        "https://t.co/abc123",
    ];
    for header in headers {
        let r = prepare_ref(header, None).unwrap();
        store
            .record(SITE, PATH, hour(2, 9), &r.display, Some(r.scheme), 1)
            .unwrap();
    }

    let mut hs = HitStats::default();
    hs.list_refs_by_path_id(&store, SITE, PATH, may(), 2, 0).unwrap();
    assert!(hs.more);

    let top: Vec<_> = hs
        .stats
        .iter()
        .map(|s| (s.name.as_str(), s.ref_scheme, s.count))
        .collect();
    assert_eq!(
        top,
        vec![
            ("www.reddit.com/r/programming", Some(RefScheme::Http), 2),
            ("Google", Some(RefScheme::Generated), 2),
        ]
    );
}
