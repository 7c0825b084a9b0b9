use anyhow::{Context, Result};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use rusqlite::{named_params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::scheme::RefScheme;
use crate::stats::HitStat;

/// Timestamps are stored as text in this format; it sorts chronologically.
const HOUR_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parameters for listing the referrers of one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefQuery {
    pub site: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub path: i64,
    pub limit: usize,
    pub offset: usize,
}

/// Storage primitive used by [`crate::stats::HitStats`].
pub trait RefStore {
    /// Aggregated referrers for `query.path` between `query.start` and
    /// `query.end` (inclusive), most hits first, at most `query.limit` rows.
    fn select_refs(&self, query: &RefQuery) -> Result<Vec<HitStat>>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `path`. A missing file is only created when
    /// `create` is set.
    pub fn open(path: &Path, create: bool) -> Result<Self> {
        if !path.exists() && !create {
            anyhow::bail!(
                "database at {:?} doesn't exist; pass --create if you're sure this is the right location",
                path
            );
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;
        info!(action = "open", component = "sqlite_store", path = ?path, "Connected to database");

        let store = SqliteStore { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = SqliteStore {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "create table if not exists refs (
                    ref_id     integer primary key autoincrement,
                    ref        text    not null,
                    ref_scheme text
                );
                create unique index if not exists refs_ref on refs(ref, ref_scheme);

                create table if not exists ref_counts (
                    site_id integer not null,
                    path_id integer not null,
                    ref_id  integer not null references refs(ref_id),
                    hour    text    not null,
                    total   integer not null default 0,
                    primary key (site_id, path_id, ref_id, hour)
                );",
            )
            .context("Failed to create referrer tables")?;
        debug!(action = "migrate", component = "sqlite_store", "Referrer tables ready");
        Ok(())
    }

    /// Add `count` hits from `display` to the hourly total of one path.
    pub fn record(
        &self,
        site: i64,
        path: i64,
        hour: DateTime<Utc>,
        display: &str,
        scheme: Option<RefScheme>,
        count: i64,
    ) -> Result<()> {
        let hour = hour
            .duration_trunc(TimeDelta::hours(1))
            .context("Failed to truncate timestamp to the hour")?;
        let ref_id = self.ref_id(display, scheme)?;
        self.conn
            .execute(
                "insert into ref_counts (site_id, path_id, ref_id, hour, total)
                 values (:site, :path, :ref_id, :hour, :count)
                 on conflict (site_id, path_id, ref_id, hour) do update set total = total + excluded.total",
                named_params! {
                    ":site": site,
                    ":path": path,
                    ":ref_id": ref_id,
                    ":hour": hour.format(HOUR_FORMAT).to_string(),
                    ":count": count,
                },
            )
            .context("Failed to update ref_counts")?;
        Ok(())
    }

    fn ref_id(&self, display: &str, scheme: Option<RefScheme>) -> Result<i64> {
        let code = scheme.map(RefScheme::code);
        let existing: Option<i64> = self
            .conn
            .query_row(
                "select ref_id from refs where ref = :ref and ref_scheme is :scheme",
                named_params! { ":ref": display, ":scheme": code },
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }

        self.conn.execute(
            "insert into refs (ref, ref_scheme) values (:ref, :scheme)",
            named_params! { ":ref": display, ":scheme": code },
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

impl RefStore for SqliteStore {
    fn select_refs(&self, query: &RefQuery) -> Result<Vec<HitStat>> {
        let start_time = Instant::now();

        let mut stmt = self.conn.prepare(
            "select refs.ref, refs.ref_scheme, sum(ref_counts.total) as ref_total
             from ref_counts
             join refs using (ref_id)
             where ref_counts.site_id = :site
               and ref_counts.path_id = :path
               and ref_counts.hour >= :start
               and ref_counts.hour <= :end
             group by refs.ref_id
             order by ref_total desc, refs.ref_id desc
             limit :limit offset :offset",
        )?;

        let rows = stmt
            .query_map(
                named_params! {
                    ":site": query.site,
                    ":path": query.path,
                    ":start": query.start.format(HOUR_FORMAT).to_string(),
                    ":end": query.end.format(HOUR_FORMAT).to_string(),
                    ":limit": i64::try_from(query.limit).unwrap_or(i64::MAX),
                    ":offset": i64::try_from(query.offset).unwrap_or(i64::MAX),
                },
                |row| {
                    let code: Option<String> = row.get(1)?;
                    Ok(HitStat {
                        name: row.get(0)?,
                        ref_scheme: code.as_deref().and_then(RefScheme::from_code),
                        count: row.get(2)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(
            action = "query",
            component = "sqlite_store",
            path = query.path,
            row_count = rows.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Selected referrers"
        );
        Ok(rows)
    }
}
