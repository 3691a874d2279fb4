// src/crawl/scope.rs
// =============================================================================
// URL normalization against the crawl's site scope.
//
// Every href or src the extractor finds is turned into one absolute form
// before it is used as a dedup key or handed to the fetcher:
//
//   //cdn.example.com/a.png  -> https://cdn.example.com/a.png
//   /about                   -> https://<site host>/about
//   https://example.com/x    -> unchanged
//   example.com/x            -> https://example.com/x
//
// No path joining happens for document-relative hrefs ("img/a.png"); they
// are treated like bare hostnames. That is a deliberate simplification.
// =============================================================================

use anyhow::{anyhow, Result};
use std::fmt;
use url::Url;

/// The hostname boundary of a crawl, taken from the seed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    hostname: String,
}

impl SiteScope {
    /// Derives the scope from the seed URL.
    ///
    /// Fails if the seed is not an absolute URL or has no host
    /// (e.g. `file:///tmp`, `mailto:x@y`).
    pub fn from_seed(seed: &str) -> Result<Self> {
        let parsed = Url::parse(seed).map_err(|e| anyhow!("Invalid URL '{}': {}", seed, e))?;

        let hostname = parsed
            .host_str()
            .ok_or_else(|| anyhow!("URL has no host: {}", seed))?;

        Ok(Self {
            hostname: hostname.to_string(),
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Whether a raw href may be followed recursively.
    ///
    /// In scope means the text mentions the site host, or it is root-relative
    /// and therefore same-host by construction. A protocol-relative `//host`
    /// href is not root-relative and must name the host itself.
    pub fn in_scope(&self, raw: &str) -> bool {
        raw.contains(self.hostname.as_str()) || (raw.starts_with('/') && !raw.starts_with("//"))
    }
}

/// A normalized absolute URL string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The same URL with any `#fragment` removed.
    ///
    /// A fragment never changes which resource the server returns.
    pub fn without_fragment(&self) -> CanonicalUrl {
        match self.0.split_once('#') {
            Some((base, _)) => CanonicalUrl(base.to_string()),
            None => self.clone(),
        }
    }

    /// The key the visited registry dedups on.
    ///
    /// Drops the fragment and a trailing `/` on a non-root path, and gives a
    /// bare host an explicit root path, so `/about` and `/about/` (and
    /// `https://h` and `https://h/`) claim the same entry.
    pub fn visit_key(&self) -> String {
        let without_fragment = self.0.split('#').next().unwrap_or_default();

        let (base, query) = match without_fragment.find('?') {
            Some(i) => without_fragment.split_at(i),
            None => (without_fragment, ""),
        };

        let authority_start = base.find("://").map_or(0, |i| i + 3);
        match base[authority_start..].find('/') {
            None => format!("{}/{}", base, query),
            Some(offset) => {
                let path = &base[authority_start + offset..];
                if path.len() > 1 && path.ends_with('/') {
                    format!("{}{}", &base[..base.len() - 1], query)
                } else {
                    format!("{}{}", base, query)
                }
            }
        }
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalizes a raw href/src relative to the site scope.
///
/// Never fails; any string has a canonical form. Idempotent, because every
/// output starts with `http` and rule 3 returns such input untouched.
pub fn normalize(raw: &str, scope: &SiteScope) -> CanonicalUrl {
    let absolute = if raw.starts_with("//") {
        format!("https:{}", raw)
    } else if raw.starts_with('/') {
        format!("https://{}{}", scope.hostname, raw)
    } else if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    CanonicalUrl(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> SiteScope {
        SiteScope::from_seed("https://example.com/start").unwrap()
    }

    #[test]
    fn test_scope_from_seed() {
        assert_eq!(scope().hostname(), "example.com");
        let with_port = SiteScope::from_seed("http://localhost:8080/").unwrap();
        assert_eq!(with_port.hostname(), "localhost");
    }

    #[test]
    fn test_scope_rejects_bad_seed() {
        assert!(SiteScope::from_seed("not a url").is_err());
        assert!(SiteScope::from_seed("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_normalize_rules() {
        let s = scope();
        assert_eq!(
            normalize("//cdn.example.com/a.png", &s).as_str(),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(normalize("/about", &s).as_str(), "https://example.com/about");
        assert_eq!(
            normalize("http://example.com/x", &s).as_str(),
            "http://example.com/x"
        );
        assert_eq!(normalize("other.org/page", &s).as_str(), "https://other.org/page");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let s = scope();
        for raw in [
            "//cdn.example.com/a.png",
            "/about/",
            "https://example.com/",
            "http://plain.org",
            "img/relative.png",
            "",
        ] {
            let once = normalize(raw, &s);
            let twice = normalize(once.as_str(), &s);
            assert_eq!(once, twice, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_equivalent_forms_agree() {
        let s = scope();
        let absolute = normalize("https://example.com/docs", &s);
        assert_eq!(normalize("/docs", &s), absolute);
        assert_eq!(normalize("//example.com/docs", &s), absolute);
    }

    #[test]
    fn test_in_scope() {
        let s = scope();
        assert!(s.in_scope("/about"));
        assert!(s.in_scope("https://example.com/blog"));
        assert!(s.in_scope("//example.com/blog"));
        assert!(!s.in_scope("//cdn.other.net/page"));
        assert!(!s.in_scope("https://other.org/"));
        assert!(!s.in_scope("relative/page"));
    }

    #[test]
    fn test_visit_key_trailing_slash_and_fragment() {
        let s = scope();
        assert_eq!(
            normalize("/about", &s).visit_key(),
            normalize("/about/", &s).visit_key()
        );
        assert_eq!(
            normalize("/about#team", &s).visit_key(),
            "https://example.com/about"
        );
        assert_eq!(
            normalize("/about/?tab=1", &s).visit_key(),
            "https://example.com/about?tab=1"
        );
    }

    #[test]
    fn test_without_fragment() {
        let s = scope();
        assert_eq!(
            normalize("/a.png#zoom", &s).without_fragment(),
            normalize("/a.png", &s)
        );
        assert_eq!(
            normalize("/a.png?v=2#x", &s).without_fragment().as_str(),
            "https://example.com/a.png?v=2"
        );
        assert_eq!(normalize("/a.png", &s).without_fragment(), normalize("/a.png", &s));
    }

    #[test]
    fn test_visit_key_root() {
        let s = scope();
        let bare = normalize("https://example.com", &s).visit_key();
        assert_eq!(bare, "https://example.com/");
        assert_eq!(normalize("/", &s).visit_key(), bare);
        assert_eq!(
            normalize("https://example.com?q=1", &s).visit_key(),
            "https://example.com/?q=1"
        );
    }
}
