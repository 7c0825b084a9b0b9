use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use tracing::error;

use refgroup::args::{Args, Command};
use refgroup::utils::{format_number, parse_range, setup_logging, validate_args};
use refgroup::{prepare_ref, tally_refs, HitStats, SqliteStore};

fn classify(refs: &[String], page_query: Option<&str>) {
    for raw in refs {
        match prepare_ref(raw, page_query) {
            Some(r) => println!("{}\t{}", r.scheme, r.display),
            None => println!("-\t"),
        }
    }
}

fn tally(input: &Path, top: Option<usize>, workers: Option<usize>) -> Result<()> {
    let content =
        fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;
    let refs: Vec<String> = content.lines().map(str::to_string).collect();
    let stats = tally_refs(&refs, workers)?;

    println!("\n--- Referrer Tally ---");
    println!("Referrers read: {}", format_number(refs.len() as u64));
    println!(
        "Unique referrers: {}",
        format_number(stats.ref_counts.len() as u64)
    );
    println!("Known groups: {}", format_number(u64::from(stats.grouped)));
    println!("Skipped (empty or non-http): {}", format_number(u64::from(stats.skipped)));

    let sorted = stats.sorted();
    let top = top.unwrap_or(sorted.len());
    println!("\nTop {} referrers:", std::cmp::min(top, sorted.len()));
    for (display, count) in sorted.iter().take(top) {
        println!("- {}: {} hits", display, format_number(u64::from(*count)));
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Classify { refs, page_query } => {
            classify(refs, page_query.as_deref());
            Ok(())
        }
        Command::Tally {
            input,
            top,
            workers,
        } => tally(input, *top, *workers),
        Command::Refs {
            db,
            create,
            site,
            path_id,
            start,
            end,
            limit,
            offset,
            json,
        } => {
            let range = parse_range(start, end)?;
            let store = SqliteStore::open(db, *create)?;

            let mut hs = HitStats::default();
            hs.list_refs_by_path_id(&store, *site, *path_id, range, *limit, *offset)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&hs)?);
                return Ok(());
            }
            for stat in &hs.stats {
                let scheme = stat.ref_scheme.map(|s| s.code()).unwrap_or("-");
                let count = u64::try_from(stat.count)
                    .map(format_number)
                    .unwrap_or_else(|_| stat.count.to_string());
                println!("{}\t{}\t{}", count, scheme, stat.name);
            }
            if hs.more {
                println!("(more)");
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    if let Err(e) = run(&args) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
