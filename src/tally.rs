use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

use crate::referrer::prepare_ref;
use crate::scheme::RefScheme;

#[derive(Debug, Default)]
pub struct TallyStats {
    /// Hits per display string.
    pub ref_counts: HashMap<String, u32>,
    /// Referrers that resolved to a known group.
    pub grouped: u32,
    /// Empty or non-http referrers.
    pub skipped: u32,
}

impl TallyStats {
    fn merge(mut self, other: TallyStats) -> TallyStats {
        for (display, count) in other.ref_counts {
            *self.ref_counts.entry(display).or_insert(0) += count;
        }
        self.grouped += other.grouped;
        self.skipped += other.skipped;
        self
    }

    /// Displays sorted by count, most hits first; ties by name.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut sorted: Vec<(&str, u32)> = self
            .ref_counts
            .iter()
            .map(|(display, count)| (display.as_str(), *count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }
}

/// Classify `refs` on a pool of `max_workers` threads and count the results.
pub fn tally_refs(refs: &[String], max_workers: Option<usize>) -> Result<TallyStats> {
    let start_time = Instant::now();

    let max_workers = max_workers.unwrap_or_else(|| {
        let cpu_count = num_cpus::get();
        std::cmp::min(cpu_count, 8)
    });
    info!(action = "configure", component = "ref_tally", worker_count = max_workers, ref_count = refs.len(), "Using workers for processing");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .build()
        .context("Failed to build worker pool")?;

    let stats = pool.install(|| {
        refs.par_iter()
            .fold(TallyStats::default, |mut acc, raw| {
                match prepare_ref(raw, None) {
                    Some(r) if matches!(r.scheme, RefScheme::Http | RefScheme::Generated) => {
                        if r.scheme == RefScheme::Generated {
                            acc.grouped += 1;
                        }
                        *acc.ref_counts.entry(r.display).or_insert(0) += 1;
                    }
                    _ => acc.skipped += 1,
                }
                acc
            })
            .reduce(TallyStats::default, TallyStats::merge)
    });

    info!(
        action = "complete",
        component = "ref_tally",
        unique_refs = stats.ref_counts.len(),
        grouped = stats.grouped,
        skipped = stats.skipped,
        duration_ms = start_time.elapsed().as_millis(),
        "Referrer tally completed"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tally() {
        let input = refs(&[
            "https://www.google.com/",
            "https://www.google.nl/search?q=x",
            "https://old.reddit.com/r/rust/new",
            "https://www.reddit.com/r/rust/top?utm_source=share",
            "https://example.com/post?utm_medium=rss",
            "",
            "ftp://example.com/",
        ]);
        let stats = tally_refs(&input, Some(2)).unwrap();

        assert_eq!(stats.grouped, 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(
            stats.sorted(),
            vec![
                ("Google", 2),
                ("www.reddit.com/r/rust", 2),
                ("example.com/post", 1),
            ]
        );
    }

    #[test]
    fn test_worker_count_does_not_matter() {
        let input: Vec<String> = (0..200)
            .map(|i| format!("https://example.com/{}?utm_source=x", i % 7))
            .collect();
        let one = tally_refs(&input, Some(1)).unwrap();
        let many = tally_refs(&input, Some(4)).unwrap();
        assert_eq!(one.ref_counts, many.ref_counts);
        assert_eq!(one.sorted().len(), 7);
    }

    #[test]
    fn test_empty() {
        let stats = tally_refs(&[], Some(1)).unwrap();
        assert!(stats.ref_counts.is_empty());
        assert_eq!(stats.skipped, 0);
    }
}
