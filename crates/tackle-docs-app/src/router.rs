//! Hash-fragment routing between URLs and documentation pages.

use serde::{Deserialize, Serialize};

use crate::app::Effect;

/// Which documentation page is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Install,
    Use,
    QueryTable,
    NotFound,
}

impl Page {
    /// Pages reachable from the navigation menu, in menu order.
    pub const ROUTABLE: [Page; 3] = [Page::Install, Page::Use, Page::QueryTable];

    /// Every page, including [`Page::NotFound`].
    pub const ALL: [Page; 4] = [Page::Install, Page::Use, Page::QueryTable, Page::NotFound];

    /// Resolve URL path segments to a page.
    ///
    /// Never fails: anything unrecognised resolves to [`Page::NotFound`].
    pub fn parse_from_url_segments<S: AsRef<str>>(segments: &[S]) -> Page {
        let segments: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();

        match segments.as_slice() {
            [] => Page::Install,
            ["docs", "install"] => Page::Install,
            ["docs", "use"] => Page::Use,
            ["querytable"] => Page::QueryTable,
            _ => Page::NotFound,
        }
    }

    /// Path segments and query parameters of the page's canonical URL.
    pub fn to_url_segments(&self) -> (Vec<String>, Vec<(String, String)>) {
        let path: &[&str] = match self {
            Page::Install => &["docs", "install"],
            Page::Use => &["docs", "use"],
            Page::QueryTable => &["querytable"],
            Page::NotFound => &["notfound"],
        };

        (path.iter().map(|s| s.to_string()).collect(), Vec::new())
    }

    /// Link target for this page, e.g. `#/docs/use`.
    pub fn href(&self) -> String {
        let (path, query) = self.to_url_segments();
        format!("{}{}", encode_parts(&path), encode_query_string(&query))
    }

    /// Menu label for the page.
    pub fn label(&self) -> &'static str {
        match self {
            Page::Install => "Install",
            Page::Use => "Use",
            Page::QueryTable => "QueryTable",
            Page::NotFound => "Not found",
        }
    }

    /// Stable identifier, used for element ids and file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Install => "install",
            Page::Use => "use",
            Page::QueryTable => "querytable",
            Page::NotFound => "notfound",
        }
    }
}

/// Build a navigation effect for `page`.
///
/// The effect only moves the browser location. State follows when the
/// resulting url-changed event comes back through [`crate::app::update`].
pub fn navigate(page: Page) -> Effect {
    Effect::Navigate(page)
}

/// Effect that moves the address bar to the canonical URL of `page`.
///
/// [`Page::NotFound`] has no canonical URL, so an unknown hash is left as
/// the user typed it.
pub fn normalize(page: Page) -> Effect {
    match page {
        Page::NotFound => Effect::None,
        page => navigate(page),
    }
}

/// Split a location hash such as `#/docs/use?x=1` into decoded path segments.
pub fn url_segments(hash: &str) -> Vec<String> {
    let (path, _) = split_query(strip_hash(hash));

    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            urlencoding::decode(s)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| s.to_string())
        })
        .collect()
}

/// Query parameters of a location hash.
pub fn query_params(hash: &str) -> Vec<(String, String)> {
    let (_, query) = split_query(strip_hash(hash));
    let Some(query) = query else {
        return Vec::new();
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Resolve a location hash straight to a page.
pub fn parse_hash(hash: &str) -> Page {
    Page::parse_from_url_segments(&url_segments(hash))
}

/// Join path segments into a hash URL (`#/a/b`).
pub fn encode_parts<S: AsRef<str>>(parts: &[S]) -> String {
    let encoded: Vec<String> = parts
        .iter()
        .map(|p| urlencoding::encode(p.as_ref()).into_owned())
        .collect();
    format!("#/{}", encoded.join("/"))
}

/// Render query parameters as `?k=v&...`, or an empty string.
pub fn encode_query_string(query: &[(String, String)]) -> String {
    if query.is_empty() {
        return String::new();
    }

    let pairs: Vec<String> = query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("?{}", pairs.join("&"))
}

fn strip_hash(hash: &str) -> &str {
    hash.trim_start_matches('#')
}

fn split_query(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    }
}

fn decode_component(s: &str) -> String {
    let s = s.replace('+', " ");
    urlencoding::decode(&s)
        .map(|d| d.into_owned())
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_routable_pages() {
        for page in Page::ROUTABLE {
            let (path, _) = page.to_url_segments();
            assert_eq!(Page::parse_from_url_segments(&path), page);
        }
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(
            Page::parse_from_url_segments(&["unknown", "path"]),
            Page::NotFound
        );
        assert_eq!(
            Page::parse_from_url_segments(&["docs", "use", "extra"]),
            Page::NotFound
        );
        assert_eq!(Page::parse_from_url_segments(&["", "%%"]), Page::NotFound);
    }

    #[test]
    fn empty_path_is_install() {
        let empty: [&str; 0] = [];
        assert_eq!(Page::parse_from_url_segments(&empty), Page::Install);
        assert_eq!(parse_hash(""), Page::Install);
        assert_eq!(parse_hash("#/"), Page::Install);
    }

    #[test]
    fn splits_hash_into_segments() {
        assert_eq!(url_segments("#/docs/use"), vec!["docs", "use"]);
        assert_eq!(url_segments("#/docs//use/"), vec!["docs", "use"]);
        assert_eq!(url_segments("#/querytable?tab=2"), vec!["querytable"]);
        assert_eq!(url_segments("#/a%20b"), vec!["a b"]);
    }

    #[test]
    fn parses_query_params() {
        assert_eq!(
            query_params("#/querytable?tab=2&name=a+b"),
            vec![
                ("tab".to_string(), "2".to_string()),
                ("name".to_string(), "a b".to_string())
            ]
        );
        assert!(query_params("#/querytable").is_empty());
    }

    #[test]
    fn builds_hrefs() {
        assert_eq!(Page::Install.href(), "#/docs/install");
        assert_eq!(Page::Use.href(), "#/docs/use");
        assert_eq!(Page::QueryTable.href(), "#/querytable");
        assert_eq!(parse_hash(&Page::Use.href()), Page::Use);
    }

    #[test]
    fn normalizes_routable_pages_only() {
        for page in Page::ROUTABLE {
            assert_eq!(normalize(page), Effect::Navigate(page));
        }
        assert_eq!(normalize(Page::NotFound), Effect::None);
    }

    #[test]
    fn encodes_query_string() {
        let query = vec![("q".to_string(), "a b".to_string())];
        assert_eq!(encode_query_string(&query), "?q=a%20b");
        assert_eq!(encode_query_string(&[]), "");
    }
}
