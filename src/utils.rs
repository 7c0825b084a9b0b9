use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command};
use crate::stats::TimeRange;

/// Log to stderr; `RUST_LOG` overrides the level picked by `verbose`.
pub fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "error" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::new(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        )))
        .with_writer(std::io::stderr)
        .init();
}

pub fn format_number(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Parse an RFC 3339 timestamp or a bare date. A bare date is the start of
/// that day, or its last second when `end_of_day` is set.
pub fn parse_time(s: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid time {:?}; expected RFC 3339 or YYYY-MM-DD", s))?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .context("invalid time of day")?;
    Ok(date.and_time(time).and_utc())
}

pub fn parse_range(start: &str, end: &str) -> Result<TimeRange> {
    let range = TimeRange {
        start: parse_time(start, false)?,
        end: parse_time(end, true)?,
    };
    if range.start > range.end {
        anyhow::bail!("--start must not be after --end");
    }
    Ok(range)
}

pub fn validate_args(args: &Args) -> Result<()> {
    match &args.command {
        Command::Classify { .. } => {}
        Command::Tally { top, workers, .. } => {
            if *top == Some(0) {
                anyhow::bail!("--top must be greater than 0");
            }
            if *workers == Some(0) {
                anyhow::bail!("--workers must be greater than 0");
            }
        }
        Command::Refs { limit, .. } => {
            if *limit == 0 {
                anyhow::bail!("--limit must be greater than 0");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(5_000_000_000), "5,000,000,000");
        assert_eq!(format_number(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("2024-03-01", false).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time("2024-03-01", true).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap()
        );
        assert_eq!(
            parse_time("2024-03-01T12:00:00+02:00", false).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
        );
        assert!(parse_time("yesterday", false).is_err());
    }

    #[test]
    fn test_parse_range() {
        assert!(parse_range("2024-03-01", "2024-03-01").is_ok());
        assert!(parse_range("2024-03-02", "2024-03-01").is_err());
    }

    #[test]
    fn test_validate_args() {
        let ok = Args::parse_from(["refgroup", "tally", "--input", "refs.txt", "--top", "5"]);
        assert!(validate_args(&ok).is_ok());

        let zero_top = Args::parse_from(["refgroup", "tally", "--input", "refs.txt", "--top", "0"]);
        assert!(validate_args(&zero_top).is_err());

        let zero_limit = Args::parse_from([
            "refgroup", "refs", "--db", "x.db", "--path-id", "1", "--start", "2024-01-01",
            "--end", "2024-01-31", "--limit", "0",
        ]);
        assert!(validate_args(&zero_limit).is_err());
    }
}
