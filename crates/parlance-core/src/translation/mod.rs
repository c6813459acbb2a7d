//! Translation binding: per-request lookup functions over shared tables.
//!
//! A [`Catalog`] holds every (locale, namespace) table, loaded once at
//! startup and never mutated. Rendering code asks the catalog for a
//! [`Translator`] bound to the request's locale; translators are cheap,
//! immutable values, so concurrent requests never share mutable state.

mod bundled;
mod table;


pub use table::TranslationTable;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{shellexpand, I18nConfig};
use crate::error::ParlanceError;

/// Where a table's document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Bundled,
    Directory,
}

/// All translation tables, keyed by namespace then locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    default_locale: String,
    default_namespace: String,
    tables: HashMap<String, HashMap<String, Arc<TranslationTable>>>,
}

impl Catalog {
    /// An empty catalog with the given defaults. Tables are added with
    /// [`Catalog::insert`] before the catalog is shared.
    pub fn new(default_locale: &str, default_namespace: &str) -> Self {
        Self {
            default_locale: default_locale.to_string(),
            default_namespace: default_namespace.to_string(),
            tables: HashMap::new(),
        }
    }

    /// Load the default namespace for every configured locale.
    ///
    /// Documents under `locales_dir` take precedence over bundled ones. A
    /// configured locale with no document anywhere is an error, as is a
    /// malformed document.
    pub fn load(config: &I18nConfig) -> Result<Self, ParlanceError> {
        let mut catalog = Self::new(&config.default_locale, &config.default_namespace);
        let namespace = config.default_namespace.as_str();
        let dir = if config.locales_dir.is_empty() {
            None
        } else {
            Some(shellexpand(&config.locales_dir))
        };

        for locale in &config.locales {
            let (raw, source) = read_document(dir.as_deref(), locale, namespace)?;
            let table = TranslationTable::from_json(&raw).map_err(|e| {
                ParlanceError::Translation {
                    locale: locale.clone(),
                    namespace: namespace.to_string(),
                    reason: format!("invalid document: {e}"),
                }
            })?;
            info!(
                "translations: loaded {locale}/{namespace} ({} keys, {source:?})",
                table.len()
            );
            catalog.insert(locale, namespace, table);
        }

        for locale in &config.locales {
            let missing = catalog.missing_keys(locale, namespace);
            if !missing.is_empty() {
                warn!(
                    "translations: {locale}/{namespace} is missing {} keys, falling back to {}: {}",
                    missing.len(),
                    config.default_locale,
                    missing.join(", ")
                );
            }
        }

        Ok(catalog)
    }

    pub fn insert(&mut self, locale: &str, namespace: &str, table: TranslationTable) {
        self.tables
            .entry(namespace.to_string())
            .or_default()
            .insert(locale.to_string(), Arc::new(table));
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Locales with a table in `namespace`, sorted.
    pub fn locales(&self, namespace: &str) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .tables
            .get(namespace)
            .map(|by_locale| by_locale.keys().map(String::as_str).collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// The table for `(locale, namespace)`, if loaded.
    pub fn table(&self, locale: &str, namespace: &str) -> Option<&TranslationTable> {
        self.tables
            .get(namespace)
            .and_then(|by_locale| by_locale.get(locale))
            .map(Arc::as_ref)
    }

    /// Bind a lookup function to `locale`.
    ///
    /// An unsupported locale is bound to the default locale's table; an
    /// omitted or unknown namespace uses the default namespace.
    pub fn translator(&self, locale: &str, namespace: Option<&str>) -> Translator {
        let namespace = namespace
            .filter(|ns| self.tables.contains_key(*ns))
            .unwrap_or(self.default_namespace.as_str());
        let by_locale = self.tables.get(namespace);
        let default_table = by_locale.and_then(|t| t.get(&self.default_locale)).cloned();

        let (bound, table) = match by_locale.and_then(|t| t.get(locale)) {
            Some(table) => (locale, Arc::clone(table)),
            None => (
                self.default_locale.as_str(),
                default_table.clone().unwrap_or_default(),
            ),
        };
        let fallback = if bound == self.default_locale {
            None
        } else {
            default_table
        };

        Translator {
            locale: bound.to_string(),
            namespace: namespace.to_string(),
            table,
            fallback,
        }
    }

    /// Keys present in the default locale's table but absent from `locale`'s.
    pub fn missing_keys(&self, locale: &str, namespace: &str) -> Vec<String> {
        let Some(default_table) = self.table(&self.default_locale, namespace) else {
            return Vec::new();
        };
        let table = self.table(locale, namespace);
        default_table
            .keys()
            .into_iter()
            .filter(|key| table.and_then(|t| t.lookup(key)).is_none())
            .collect()
    }
}

fn read_document(
    dir: Option<&str>,
    locale: &str,
    namespace: &str,
) -> Result<(String, Source), ParlanceError> {
    if let Some(dir) = dir {
        let path = Path::new(dir).join(locale).join(format!("{namespace}.json"));
        if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| ParlanceError::Translation {
                locale: locale.to_string(),
                namespace: namespace.to_string(),
                reason: format!("failed to read {}: {e}", path.display()),
            })?;
            return Ok((raw, Source::Directory));
        }
    }

    bundled::document(locale, namespace)
        .map(|raw| (raw.to_string(), Source::Bundled))
        .ok_or_else(|| ParlanceError::Translation {
            locale: locale.to_string(),
            namespace: namespace.to_string(),
            reason: "no translation document found".into(),
        })
}

/// A lookup function bound to one locale and namespace.
///
/// Holds shared read-only snapshots of its tables; build one per request.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    namespace: String,
    table: Arc<TranslationTable>,
    fallback: Option<Arc<TranslationTable>>,
}

impl Translator {
    /// Translate a dotted key: bound locale, then default locale, then the
    /// key itself.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.table
            .lookup(key)
            .or_else(|| self.fallback.as_deref().and_then(|f| f.lookup(key)))
            .unwrap_or(key)
    }

    /// The locale this translator is bound to.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}
