//! Locale resolution: decides which supported locale a request is served in.
//!
//! Every user-facing path carries a locale prefix (`/en/about`). Requests
//! without one are redirected to the same path with the locale prepended,
//! picked from the `Accept-Language` header or the configured default.
//! Asset, API and file paths bypass resolution entirely.

use crate::config::{I18nConfig, ServerConfig};

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Path is excluded from locale routing; serve as-is.
    Bypass,
    /// Path already starts with a supported locale segment.
    Localized(&'a str),
    /// Path has no locale prefix; redirect to `location`.
    Redirect { locale: &'a str, location: String },
}

impl Resolution<'_> {
    /// The effective locale, if the request is locale-routed at all.
    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::Bypass => None,
            Self::Localized(locale) => Some(*locale),
            Self::Redirect { locale, .. } => Some(*locale),
        }
    }
}

/// Per-request pairing of the requested path and its resolved locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub locale: String,
}

/// Resolves request paths against a fixed set of supported locales.
///
/// Built once from config and shared read-only; every method is total.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    locales: Vec<String>,
    default_locale: String,
    bypass_prefixes: Vec<String>,
}

impl LocaleResolver {
    pub fn new(i18n: &I18nConfig, server: &ServerConfig) -> Self {
        Self {
            locales: i18n.locales.clone(),
            default_locale: i18n.default_locale.clone(),
            bypass_prefixes: vec![
                server.assets_prefix.clone(),
                server.api_prefix.clone(),
                server.favicon_path.clone(),
            ],
        }
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Resolve a request. `query` is the raw query string without `?`.
    pub fn resolve(
        &self,
        path: &str,
        query: Option<&str>,
        accept_language: Option<&str>,
    ) -> Resolution<'_> {
        if self.is_excluded(path) {
            return Resolution::Bypass;
        }
        if let Some(locale) = self.path_locale(path) {
            return Resolution::Localized(locale);
        }
        let locale = self.negotiate(accept_language);
        Resolution::Redirect {
            locale,
            location: redirect_target(locale, path, query),
        }
    }

    /// The supported locale the path is prefixed with, if any.
    ///
    /// Matches only a whole first segment: `/en` and `/en/...` match `en`,
    /// `/environment` does not.
    pub fn path_locale(&self, path: &str) -> Option<&str> {
        let rest = path.strip_prefix('/')?;
        let segment = rest.split('/').next().unwrap_or(rest);
        self.locales
            .iter()
            .find(|l| l.as_str() == segment)
            .map(String::as_str)
    }

    /// Pick a locale from an `Accept-Language` value.
    ///
    /// Entries are tried in header order; weights only matter in that an
    /// entry with `q=0` is skipped. Falls back to the default locale.
    pub fn negotiate(&self, accept_language: Option<&str>) -> &str {
        accept_language
            .and_then(|header| self.match_preference(header))
            .unwrap_or(self.default_locale.as_str())
    }

    fn match_preference(&self, header: &str) -> Option<&str> {
        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let tag = parts.next().unwrap_or_default().trim();
            if tag.is_empty() || parts.any(is_zero_quality) {
                continue;
            }
            let primary = primary_subtag(tag);
            if let Some(code) = self
                .locales
                .iter()
                .find(|l| l.eq_ignore_ascii_case(primary))
            {
                return Some(code.as_str());
            }
        }
        None
    }

    /// Whether `path` bypasses locale routing: the asset, API and favicon
    /// prefixes (on a segment boundary), or a last segment with an extension.
    ///
    /// Unlike a matcher that bypasses any path containing a dot, only the last
    /// segment is checked, so `/v1.2/docs` is still locale-routed.
    pub fn is_excluded(&self, path: &str) -> bool {
        if self
            .bypass_prefixes
            .iter()
            .any(|prefix| has_segment_prefix(path, prefix))
        {
            return true;
        }
        path.rsplit('/')
            .next()
            .is_some_and(|last| last.contains('.'))
    }

    /// The same page in another locale: swaps the locale segment of `path`,
    /// or prepends one if `path` has none.
    pub fn switch_path(&self, path: &str, target: &str) -> String {
        match self.path_locale(path) {
            Some(current) => format!("/{target}{}", &path[1 + current.len()..]),
            None => redirect_target(target, path, None),
        }
    }
}

/// Build `/<locale><path>[?query]`. The bare root maps to `/<locale>`.
pub fn redirect_target(locale: &str, path: &str, query: Option<&str>) -> String {
    let mut location = format!("/{locale}");
    if !path.is_empty() && path != "/" {
        if !path.starts_with('/') {
            location.push('/');
        }
        location.push_str(path);
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    location
}

/// Primary language subtag: `fr` for `fr-CA` or `fr_CA`.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag).trim()
}

fn is_zero_quality(param: &str) -> bool {
    let Some((name, value)) = param.split_once('=') else {
        return false;
    };
    name.trim().eq_ignore_ascii_case("q")
        && value.trim().parse::<f32>().is_ok_and(|q| q <= 0.0)
}

fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LocaleResolver {
        LocaleResolver::new(&I18nConfig::default(), &ServerConfig::default())
    }

    #[test]
    fn test_accept_language_picks_primary_subtag() {
        let r = resolver();
        let res = r.resolve("/about", None, Some("fr-CA,en;q=0.8"));
        assert_eq!(
            res,
            Resolution::Redirect {
                locale: "fr",
                location: "/fr/about".into(),
            }
        );
    }

    #[test]
    fn test_empty_preference_redirects_to_default() {
        let r = resolver();
        for header in [None, Some(""), Some("   "), Some(",,;"), Some("*")] {
            let res = r.resolve("/about", None, header);
            assert_eq!(res.locale(), Some("en"), "header {header:?}");
            assert!(matches!(res, Resolution::Redirect { ref location, .. } if location == "/en/about"));
        }
    }

    #[test]
    fn test_first_supported_entry_wins() {
        let r = resolver();
        assert_eq!(r.negotiate(Some("de-DE,fr;q=0.5,en;q=0.9")), "fr");
        assert_eq!(r.negotiate(Some("en-GB,en-US,fr")), "en");
        assert_eq!(r.negotiate(Some("es, de")), "en");
    }

    #[test]
    fn test_negotiation_is_case_insensitive() {
        let r = resolver();
        assert_eq!(r.negotiate(Some("FR-ca")), "fr");
        assert_eq!(r.negotiate(Some("fr_CA")), "fr");
    }

    #[test]
    fn test_zero_quality_entry_is_skipped() {
        let r = resolver();
        assert_eq!(r.negotiate(Some("fr;q=0, en;q=0.5")), "en");
        assert_eq!(r.negotiate(Some("fr;q=0.0")), "en");
        assert_eq!(r.negotiate(Some("fr;q=0.1")), "fr");
    }

    #[test]
    fn test_every_locale_redirects_when_preferred() {
        let r = resolver();
        for locale in ["en", "fr"] {
            for path in ["/", "/about", "/docs/intro"] {
                let res = r.resolve(path, None, Some(locale));
                let expected = redirect_target(locale, path, None);
                assert_eq!(
                    res,
                    Resolution::Redirect {
                        locale,
                        location: expected,
                    }
                );
            }
        }
    }

    #[test]
    fn test_prefixed_paths_are_not_redirected() {
        let r = resolver();
        for path in ["/en", "/en/", "/en/about", "/fr", "/fr/about/team"] {
            let res = r.resolve(path, None, Some("fr"));
            assert!(
                matches!(res, Resolution::Localized(_)),
                "{path} should be localized, got {res:?}"
            );
        }
        assert_eq!(r.resolve("/fr/about", None, Some("en")).locale(), Some("fr"));
    }

    #[test]
    fn test_prefix_requires_segment_boundary() {
        let r = resolver();
        assert_eq!(r.path_locale("/environment-config"), None);
        assert_eq!(r.path_locale("/english"), None);
        assert_eq!(r.path_locale("/france/paris"), None);
        assert_eq!(r.path_locale("/"), None);
        assert_eq!(r.path_locale(""), None);
        assert_eq!(r.path_locale("/EN"), None);

        let res = r.resolve("/environment-config", None, None);
        assert_eq!(
            res,
            Resolution::Redirect {
                locale: "en",
                location: "/en/environment-config".into(),
            }
        );
    }

    #[test]
    fn test_redirect_preserves_query() {
        let r = resolver();
        let res = r.resolve("/about", Some("tab=team&x=1"), Some("fr"));
        assert_eq!(
            res,
            Resolution::Redirect {
                locale: "fr",
                location: "/fr/about?tab=team&x=1".into(),
            }
        );
    }

    #[test]
    fn test_redirect_target_root_and_empty_query() {
        assert_eq!(redirect_target("en", "/", None), "/en");
        assert_eq!(redirect_target("en", "", Some("")), "/en");
        assert_eq!(redirect_target("fr", "/", Some("a=b")), "/fr?a=b");
        assert_eq!(redirect_target("fr", "about", None), "/fr/about");
    }

    #[test]
    fn test_excluded_paths_bypass() {
        let r = resolver();
        for path in [
            "/_assets",
            "/_assets/app.js",
            "/api",
            "/api/health",
            "/favicon.ico",
            "/robots.txt",
            "/images/logo.png",
            "/en/sitemap.xml",
        ] {
            assert_eq!(r.resolve(path, None, Some("fr")), Resolution::Bypass, "{path}");
        }
    }

    #[test]
    fn test_exclusion_prefixes_respect_segments() {
        let r = resolver();
        assert!(!r.is_excluded("/apiary"));
        assert!(!r.is_excluded("/_assetsmanager"));
        assert!(!r.is_excluded("/v1.2/docs"));
        assert!(r.is_excluded("/docs/v1.2"));
    }

    #[test]
    fn test_switch_path_swaps_locale_segment() {
        let r = resolver();
        assert_eq!(r.switch_path("/en", "fr"), "/fr");
        assert_eq!(r.switch_path("/en/about", "fr"), "/fr/about");
        assert_eq!(r.switch_path("/fr/en/about", "en"), "/en/en/about");
        assert_eq!(r.switch_path("/about", "fr"), "/fr/about");
    }

    #[test]
    fn test_primary_subtag() {
        assert_eq!(primary_subtag("fr-CA"), "fr");
        assert_eq!(primary_subtag("en_US"), "en");
        assert_eq!(primary_subtag("de"), "de");
        assert_eq!(primary_subtag("zh-Hant-TW"), "zh");
    }

    #[test]
    fn test_custom_locale_set_and_default() {
        let i18n = I18nConfig {
            default_locale: "fr".into(),
            locales: vec!["fr".into(), "de".into()],
            ..I18nConfig::default()
        };
        let r = LocaleResolver::new(&i18n, &ServerConfig::default());
        assert_eq!(r.negotiate(Some("en-US")), "fr");
        assert_eq!(r.negotiate(Some("en-US,de;q=0.3")), "de");
        assert_eq!(r.path_locale("/en/about"), None);
        assert_eq!(r.default_locale(), "fr");
        assert_eq!(r.locales(), ["fr", "de"]);
    }
}
