use std::collections::HashMap;
use std::sync::LazyLock;

// Keys are either a host or, for a few entries, the full referrer with the
// scheme removed.
const GROUP_ENTRIES: &[(&str, &str)] = &[
    // HN sends <meta name="referrer" content="origin">, so only the domain
    // ever shows up.
    ("news.ycombinator.com", "Hacker News"),
    ("hn.algolia.com", "Hacker News"),
    ("hckrnews.com", "Hacker News"),
    ("hn.premii.com", "Hacker News"),
    ("com.stefandekanski.hackernews.free", "Hacker News"),
    ("io.github.hidroh.materialistic", "Hacker News"),
    ("hackerweb.app", "Hacker News"),
    ("www.daemonology.net/hn-daily", "Hacker News"),
    ("quiethn.com", "Hacker News"),
    ("hnews.xyz", "Hacker News"),
    ("hackernewsmobile.com", "Hacker News"),
    // Webmail
    ("mail.google.com", "Email"),
    ("com.google.android.gm", "Email"),
    ("mail.yahoo.com", "Email"),
    // Feed readers
    ("org.fox.ttrss", "RSS"),
    ("www.inoreader.com", "RSS"),
    ("com.innologica.inoreader", "RSS"),
    ("usepanda.com", "RSS"),
    ("feedly.com", "RSS"),
    // Search app wrappers
    ("com.google.android.googlequicksearchbox", "Google"),
    (
        "com.google.android.googlequicksearchbox/https/www.google.com",
        "Google",
    ),
    // Reddit apps
    ("com.andrewshu.android.reddit", "www.reddit.com"),
    ("com.laurencedawson.reddit_sync", "www.reddit.com"),
    ("com.laurencedawson.reddit_sync.dev", "www.reddit.com"),
    ("com.laurencedawson.reddit_sync.pro", "www.reddit.com"),
    // Facebook redirectors
    ("m.facebook.com", "www.facebook.com"),
    ("l.facebook.com", "www.facebook.com"),
    ("lm.facebook.com", "www.facebook.com"),
    // Chat
    ("org.telegram.messenger", "Telegram Messenger"),
    ("com.Slack", "Slack Chat"),
    // Baidu
    ("baidu.com", "Baidu"),
    ("c.tieba.baidu.com", "Baidu"),
    ("m.baidu.com", "Baidu"),
    ("tieba.baidu.com", "Baidu"),
    ("www.baidu.com", "Baidu"),
];

const HOST_ALIAS_ENTRIES: &[(&str, &str)] = &[
    ("en.m.wikipedia.org", "en.wikipedia.org"),
    ("m.facebook.com", "www.facebook.com"),
    ("m.habr.com", "habr.com"),
    ("old.reddit.com", "www.reddit.com"),
    ("i.reddit.com", "www.reddit.com"),
    ("np.reddit.com", "www.reddit.com"),
    ("fr.reddit.com", "www.reddit.com"),
];

/// Known aggregators, keyed by host or scheme-less referrer.
pub static GROUPS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| GROUP_ENTRIES.iter().copied().collect());

/// Mobile, regional and legacy hosts mapped to their canonical host.
pub static HOST_ALIASES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| HOST_ALIAS_ENTRIES.iter().copied().collect());

pub fn group_for(key: &str) -> Option<&'static str> {
    GROUPS.get(key).copied()
}

pub fn canonical_host(host: &str) -> Option<&'static str> {
    HOST_ALIASES.get(host).copied()
}
