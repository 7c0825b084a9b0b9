use url::{form_urlencoded, Url};

use crate::clean::clean_ref;
use crate::scheme::RefScheme;

/// Page query parameters that name a campaign, in order of preference.
pub const CAMPAIGN_PARAMS: &[&str] = &["utm_campaign", "utm_source", "ref", "src", "source"];

/// A referrer ready to be stored with a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referrer {
    pub scheme: RefScheme,
    pub display: String,
}

/// Decide the scheme and display string for the `Referer` header of a hit.
///
/// `page_query` is the raw query string of the page that was visited; it is
/// only consulted for a campaign name when the header is empty. Returns
/// `None` when there is no referrer of any kind.
pub fn prepare_ref(header: &str, page_query: Option<&str>) -> Option<Referrer> {
    let header = header.trim();
    if header.is_empty() {
        return page_query.and_then(campaign).map(|name| Referrer {
            scheme: RefScheme::Campaign,
            display: name,
        });
    }

    let parsed = match Url::parse(header) {
        Ok(parsed) => parsed,
        Err(_) => {
            return Some(Referrer {
                scheme: RefScheme::Other,
                display: header.to_string(),
            })
        }
    };

    match parsed.scheme() {
        "http" | "https" | "android-app" => {
            let cleaned = clean_ref(header, &parsed);
            Some(Referrer {
                scheme: if cleaned.is_group {
                    RefScheme::Generated
                } else {
                    RefScheme::Http
                },
                display: cleaned.display,
            })
        }
        _ => Some(Referrer {
            scheme: RefScheme::Other,
            display: header.to_string(),
        }),
    }
}

/// First non-empty campaign parameter in `query`.
pub fn campaign(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs: Vec<_> = form_urlencoded::parse(query.as_bytes()).collect();
    CAMPAIGN_PARAMS.iter().find_map(|param| {
        pairs
            .iter()
            .find(|(key, value)| key == param && !value.trim().is_empty())
            .map(|(_, value)| value.trim().to_string())
    })
}
