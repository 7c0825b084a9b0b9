use std::fmt;
use url::Url;

/// Editable view of a parsed referrer.
///
/// `url::Url` always carries a scheme and normalizes an empty path to `/`;
/// the cleaning rules need to drop the scheme and to tell `example.com` apart
/// from `example.com/`, so the parts are copied out into plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUrl {
    pub scheme: String,
    /// Host including a non-default port.
    pub host: String,
    /// Percent-encoded path, empty when the referrer had no path at all.
    pub path: String,
    pub raw_query: String,
    /// Render a `?` even when `raw_query` is empty, as in `example.com/a?`.
    pub force_query: bool,
    pub fragment: String,
}

impl RefUrl {
    pub fn new(raw: &str, parsed: &Url) -> Self {
        let mut host = parsed.host_str().unwrap_or_default().to_string();
        if let Some(port) = parsed.port() {
            host.push(':');
            host.push_str(&port.to_string());
        }

        let mut path = parsed.path().to_string();
        if path == "/" && !has_explicit_path(raw) {
            path.clear();
        }

        RefUrl {
            scheme: parsed.scheme().to_string(),
            host,
            path,
            raw_query: parsed.query().unwrap_or_default().to_string(),
            force_query: parsed.query() == Some(""),
            fragment: parsed.fragment().unwrap_or_default().to_string(),
        }
    }
}

/// Whether anything follows the authority in `raw`.
fn has_explicit_path(raw: &str) -> bool {
    let head = raw.split(['?', '#']).next().unwrap_or_default();
    match head.find("://") {
        Some(i) => head[i + 3..].contains('/'),
        None => true,
    }
}

/// Renders `scheme://host/path?query#fragment`. Without a scheme a host is
/// still introduced by `//`.
impl fmt::Display for RefUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !self.host.is_empty() {
            write!(f, "//{}", self.host)?;
            if !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_str("/")?;
            }
        }
        f.write_str(&self.path)?;
        if !self.raw_query.is_empty() {
            write!(f, "?{}", self.raw_query)?;
        } else if self.force_query {
            f.write_str("?")?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}
