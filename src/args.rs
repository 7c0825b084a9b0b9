use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "refgroup",
    about = "Classify HTTP referrers and list aggregated referrer statistics",
    version,
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the scheme code and display string for each referrer
    Classify {
        /// Raw Referer header values
        #[arg(required = true)]
        refs: Vec<String>,

        /// Page query string, consulted for a campaign when a referrer is empty
        #[arg(long)]
        page_query: Option<String>,
    },

    /// Count display strings for a file with one referrer per line
    Tally {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Number of top referrers to display
        #[arg(short, long)]
        top: Option<usize>,

        /// Number of worker threads
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// List aggregated referrers for a path
    Refs {
        /// SQLite database
        #[arg(long)]
        db: PathBuf,

        /// Create the database if it doesn't exist
        #[arg(long)]
        create: bool,

        #[arg(long, default_value_t = 1)]
        site: i64,

        #[arg(long)]
        path_id: i64,

        /// Start of the range (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End of the range, inclusive (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        end: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
