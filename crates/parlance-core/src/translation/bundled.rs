//! Translation documents embedded at compile time.

/// Bundled English translations.
const BUNDLED_EN: &str = include_str!("../../locales/en/translation.json");

/// Bundled French translations.
const BUNDLED_FR: &str = include_str!("../../locales/fr/translation.json");

/// Return the bundled document for `(locale, namespace)`, if one ships with
/// the binary.
pub fn document(locale: &str, namespace: &str) -> Option<&'static str> {
    match (locale, namespace) {
        ("en", "translation") => Some(BUNDLED_EN),
        ("fr", "translation") => Some(BUNDLED_FR),
        _ => None,
    }
}
