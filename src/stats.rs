use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scheme::RefScheme;
use crate::sqlite::{RefQuery, RefStore};

/// Aggregated hits from one referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitStat {
    pub name: String,
    pub ref_scheme: Option<RefScheme>,
    pub count: i64,
}

/// One page of referrers for a path.
#[derive(Debug, Default, Serialize)]
pub struct HitStats {
    pub stats: Vec<HitStat>,
    /// There are rows beyond this page.
    pub more: bool,
}

/// Inclusive time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl HitStats {
    /// List the referrers for `path_id`, `limit` rows starting at `offset`.
    ///
    /// Asks the store for one extra row to find out if there is a next page.
    /// On error `self` is left untouched.
    pub fn list_refs_by_path_id(
        &mut self,
        store: &impl RefStore,
        site: i64,
        path_id: i64,
        range: TimeRange,
        limit: usize,
        offset: usize,
    ) -> Result<()> {
        let mut stats = store
            .select_refs(&RefQuery {
                site,
                start: range.start,
                end: range.end,
                path: path_id,
                limit: limit.saturating_add(1),
                offset,
            })
            .context("HitStats::list_refs_by_path_id")?;

        self.more = stats.len() > limit;
        stats.truncate(limit);
        self.stats = stats;
        Ok(())
    }
}
