pub mod args;
pub mod clean;
pub mod groups;
pub mod referrer;
pub mod refurl;
pub mod scheme;
pub mod sqlite;
pub mod stats;
pub mod tally;
pub mod utils;

pub use args::Args;
pub use clean::{clean_ref, Cleaned};
pub use referrer::{prepare_ref, Referrer};
pub use scheme::RefScheme;
pub use sqlite::{RefQuery, RefStore, SqliteStore};
pub use stats::{HitStat, HitStats, TimeRange};
pub use tally::{tally_refs, TallyStats};
