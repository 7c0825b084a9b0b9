use tracing::trace;
use url::{form_urlencoded, Url};

use crate::groups;
use crate::refurl::RefUrl;

/// Suffixes of Reddit listing pages; the listing itself isn't interesting.
const REDDIT_LISTING_SUFFIXES: &[&str] = &["/top", "/new", "/search", ".compact"];

/// Outcome of cleaning a single referrer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleaned {
    /// Group label or scheme-less, tracking-free referrer.
    pub display: String,
    /// `display` is a group label from the known aggregators.
    pub is_group: bool,
}

impl Cleaned {
    fn group(label: &str) -> Self {
        Cleaned {
            display: label.to_string(),
            is_group: true,
        }
    }

    fn plain(display: impl Into<String>) -> Self {
        Cleaned {
            display: display.into(),
            is_group: false,
        }
    }
}

/// Working state threaded through the rules.
struct RefState {
    /// The raw referrer; loses its scheme in `strip_scheme`.
    ref_str: String,
    /// Host before aliasing.
    orig_host: String,
    url: RefUrl,
}

type Rule = fn(&mut RefState) -> Option<Cleaned>;

/// Applied in order; the first rule to return a result wins. Rules that only
/// rewrite the state return `None`.
const RULES: &[(&str, Rule)] = &[
    ("relay_host", relay_host),
    ("strip_scheme", strip_scheme),
    ("host_alias", host_alias),
    ("google", google),
    ("yahoo", yahoo),
    ("group_table", group_table),
    ("lobsters", lobsters),
    ("pocket", pocket),
    ("reddit_listing", reddit_listing),
    ("tco", tco),
];

/// Classify and normalize a referrer.
///
/// `raw` is the referrer as received and `parsed` its parsed form. Never
/// fails: anything that no rule claims falls through to query cleanup.
pub fn clean_ref(raw: &str, parsed: &Url) -> Cleaned {
    let url = RefUrl::new(raw, parsed);
    let mut state = RefState {
        ref_str: raw.to_string(),
        orig_host: url.host.clone(),
        url,
    };

    for (name, rule) in RULES {
        if let Some(cleaned) = rule(&mut state) {
            trace!(rule = *name, display = %cleaned.display, is_group = cleaned.is_group, "Referrer matched rule");
            return cleaned;
        }
    }

    clean_query(state)
}

// There are a lot of these; they all go through the same relay.
fn relay_host(state: &mut RefState) -> Option<Cleaned> {
    (state.url.host == "link.oreilly.com").then(|| Cleaned::plain("link.oreilly.com"))
}

fn strip_scheme(state: &mut RefState) -> Option<Cleaned> {
    let scheme = std::mem::take(&mut state.url.scheme);
    let rest = state
        .ref_str
        .get(..scheme.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(&scheme))
        .map(|_| &state.ref_str[scheme.len()..]);

    if let Some(rest) = rest {
        let rest = rest
            .strip_prefix("://")
            .or_else(|| rest.strip_prefix(':'))
            .unwrap_or(rest);
        state.ref_str = rest.to_string();
    }
    None
}

fn host_alias(state: &mut RefState) -> Option<Cleaned> {
    if let Some(canonical) = groups::canonical_host(&state.url.host) {
        state.url.host = canonical.to_string();
    }
    None
}

// google.co.nz, www.google.nl, etc.
fn google(state: &mut RefState) -> Option<Cleaned> {
    let host = &state.url.host;
    (host.starts_with("www.google.") || host.starts_with("google."))
        .then(|| Cleaned::group("Google"))
}

fn yahoo(state: &mut RefState) -> Option<Cleaned> {
    state
        .url
        .host
        .contains("search.yahoo.com")
        .then(|| Cleaned::group("Yahoo"))
}

fn group_table(state: &mut RefState) -> Option<Cleaned> {
    groups::group_for(&state.url.host)
        .or_else(|| groups::group_for(&state.orig_host))
        .or_else(|| groups::group_for(&state.ref_str))
        .map(Cleaned::group)
}

// Only story pages (/s/...) are worth keeping; /newest, /page/7, /t/rust and
// friends are listings.
fn lobsters(state: &mut RefState) -> Option<Cleaned> {
    let host = state.url.host.as_str();
    ((host == "lobste.rs" || host == "gambe.ro") && !state.url.path.starts_with("/s/"))
        .then(|| Cleaned::plain("lobste.rs"))
}

// Paths are per-user reading lists.
fn pocket(state: &mut RefState) -> Option<Cleaned> {
    let host = state.url.host.as_str();
    (host == "getpocket.com" || host == "app.getpocket.com")
        .then(|| Cleaned::plain("getpocket.com"))
}

fn reddit_listing(state: &mut RefState) -> Option<Cleaned> {
    if state.url.host != "www.reddit.com" {
        return None;
    }
    let trimmed = REDDIT_LISTING_SUFFIXES
        .iter()
        .find_map(|suffix| state.url.path.strip_suffix(suffix))
        .map(str::to_string);
    if let Some(path) = trimmed {
        state.url.path = path;
    }
    None
}

// A t.co link points back at the page itself; link to the tweets sharing it.
fn tco(state: &mut RefState) -> Option<Cleaned> {
    if state.url.host != "t.co" || state.url.path.len() <= 1 {
        return None;
    }
    let escaped: String = form_urlencoded::byte_serialize(state.url.path.as_bytes()).collect();
    Some(Cleaned::plain(format!(
        "twitter.com/search?q=https%3A%2F%2Ft.co{escaped}"
    )))
}

fn clean_query(state: RefState) -> Cleaned {
    let mut url = state.url;
    if !state.ref_str.contains('?') {
        return Cleaned::plain(url.to_string().trim_start_matches('/'));
    }

    // Drops utm_*, Cloudflare challenge tokens and every other parameter. A
    // bare trailing "?" survives through `force_query`.
    url.raw_query.clear();
    let rendered = url.to_string();
    if rendered.len() > 1 {
        // Drop the "//" in front of the host.
        Cleaned::plain(rendered.get(2..).unwrap_or_default())
    } else {
        Cleaned::plain("/")
    }
}
