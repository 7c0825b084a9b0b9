use serde::Serialize;
use std::fmt;

/// How a hit arrived. Stored per hit as a single-character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum RefScheme {
    /// Regular http(s) referrer.
    Http,
    /// Non-http referrer, or one that could not be parsed.
    Other,
    /// Referrer replaced by a group label.
    Generated,
    /// Campaign parameter on the page URL.
    Campaign,
}

impl RefScheme {
    pub fn code(self) -> &'static str {
        match self {
            RefScheme::Http => "h",
            RefScheme::Other => "o",
            RefScheme::Generated => "g",
            RefScheme::Campaign => "c",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "h" => Some(RefScheme::Http),
            "o" => Some(RefScheme::Other),
            "g" => Some(RefScheme::Generated),
            "c" => Some(RefScheme::Campaign),
            _ => None,
        }
    }
}

impl From<RefScheme> for &'static str {
    fn from(scheme: RefScheme) -> Self {
        scheme.code()
    }
}

impl fmt::Display for RefScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
