//! The configured store endpoint.

const RECOGNIZED_SCHEMES: [&str; 2] = ["https://", "http://"];

/// A store URL that passed the configuration check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEndpoint {
    url: String,
}

impl StoreEndpoint {
    /// Returns `None` for a missing, blank, host-less or scheme-less URL,
    /// which puts the gateway into unconfigured mode. Any `#fragment` is
    /// dropped.
    ///
    /// A bare `scheme://host[:port]` gets a trailing `/` so query strings
    /// attach to a path.
    pub fn parse(url: Option<&str>) -> Option<Self> {
        // fragments are never sent to the server
        let url = url?.split('#').next().unwrap_or_default().trim();
        let scheme = RECOGNIZED_SCHEMES
            .iter()
            .find(|scheme| starts_with_ignore_case(url, scheme))?;
        let rest = &url[scheme.len()..];
        if rest.is_empty() || rest.starts_with(['/', '?']) {
            return None;
        }
        let url = if rest.contains(['/', '?']) {
            url.to_string()
        } else {
            format!("{url}/")
        };
        Some(Self { url })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// The endpoint URL with `query` appended as (additional) query string.
    pub fn with_query(&self, query: &str) -> String {
        if self.url.ends_with('?') || self.url.ends_with('&') {
            format!("{}{query}", self.url)
        } else if self.url.contains('?') {
            format!("{}&{query}", self.url)
        } else {
            format!("{}?{query}", self.url)
        }
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_inputs() {
        assert_eq!(StoreEndpoint::parse(None), None);
        assert_eq!(StoreEndpoint::parse(Some("")), None);
        assert_eq!(StoreEndpoint::parse(Some("   ")), None);
        assert_eq!(StoreEndpoint::parse(Some("script.google.com/exec")), None);
        assert_eq!(StoreEndpoint::parse(Some("ftp://example.com/")), None);
        assert_eq!(StoreEndpoint::parse(Some("https://")), None);
        assert_eq!(StoreEndpoint::parse(Some("http://?x=1")), None);
        assert_eq!(StoreEndpoint::parse(Some("https://#f")), None);
    }

    #[test]
    fn fragment_is_dropped() {
        let endpoint = StoreEndpoint::parse(Some("http://localhost:3000#top")).unwrap();
        assert_eq!(endpoint.as_str(), "http://localhost:3000/");
        assert_eq!(endpoint.with_query("action=list"), "http://localhost:3000/?action=list");
    }

    #[test]
    fn bare_host_gets_trailing_slash() {
        let endpoint = StoreEndpoint::parse(Some("http://localhost:3000")).unwrap();
        assert_eq!(endpoint.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn path_is_kept_as_is() {
        let endpoint = StoreEndpoint::parse(Some(" https://script.google.com/macros/s/abc/exec ")).unwrap();
        assert_eq!(endpoint.as_str(), "https://script.google.com/macros/s/abc/exec");
        assert_eq!(
            endpoint.with_query("action=list"),
            "https://script.google.com/macros/s/abc/exec?action=list"
        );
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert!(StoreEndpoint::parse(Some("HTTPS://example.com/exec")).is_some());
    }

    #[test]
    fn existing_query_is_extended() {
        let endpoint = StoreEndpoint::parse(Some("https://example.com/exec?key=k")).unwrap();
        assert_eq!(endpoint.with_query("action=list"), "https://example.com/exec?key=k&action=list");

        let endpoint = StoreEndpoint::parse(Some("https://example.com/exec?")).unwrap();
        assert_eq!(endpoint.with_query("action=list"), "https://example.com/exec?action=list");
    }
}
