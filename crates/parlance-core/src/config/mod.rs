mod defaults;


use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::ParlanceError;
use defaults::*;

/// Top-level Parlance configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// General site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for daily rolling log files. Empty = stderr only.
    #[serde(default)]
    pub log_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

/// Locale settings shared by the resolver and the translation binder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Locale used when nothing else matches. Must be one of `locales`.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Supported locale codes, e.g. `["en", "fr"]`.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
    /// Optional directory with `{locale}/{namespace}.json` documents that
    /// replace the bundled ones. Empty = bundled only.
    #[serde(default)]
    pub locales_dir: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            locales: default_locales(),
            default_namespace: default_namespace(),
            locales_dir: String::new(),
        }
    }
}

impl I18nConfig {
    /// Whether `code` is one of the supported locales (exact match).
    pub fn is_supported(&self, code: &str) -> bool {
        self.locales.iter().any(|l| l == code)
    }
}

/// HTTP server settings, including the paths that bypass locale routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_assets_prefix")]
    pub assets_prefix: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_favicon_path")]
    pub favicon_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            assets_prefix: default_assets_prefix(),
            api_prefix: default_api_prefix(),
            favicon_path: default_favicon_path(),
        }
    }
}

impl ServerConfig {
    /// Socket address string, `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ParlanceError> {
        let i18n = &self.i18n;
        if i18n.locales.is_empty() {
            return Err(ParlanceError::Config(
                "i18n.locales must list at least one locale".into(),
            ));
        }

        let mut seen = HashSet::new();
        for code in &i18n.locales {
            if code.is_empty() || !code.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(ParlanceError::Config(format!(
                    "invalid locale code '{code}': expected lowercase ASCII letters"
                )));
            }
            if !seen.insert(code.as_str()) {
                return Err(ParlanceError::Config(format!(
                    "locale '{code}' is listed more than once"
                )));
            }
        }

        if !i18n.is_supported(&i18n.default_locale) {
            return Err(ParlanceError::Config(format!(
                "default locale '{}' is not in i18n.locales {:?}",
                i18n.default_locale, i18n.locales
            )));
        }

        if i18n.default_namespace.trim().is_empty() {
            return Err(ParlanceError::Config(
                "i18n.default_namespace must not be empty".into(),
            ));
        }

        for (field, value) in [
            ("server.assets_prefix", &self.server.assets_prefix),
            ("server.api_prefix", &self.server.api_prefix),
            ("server.favicon_path", &self.server.favicon_path),
        ] {
            if !value.starts_with('/') || value.len() < 2 || value.ends_with('/') {
                return Err(ParlanceError::Config(format!(
                    "{field} must be an absolute path like '/x' without a trailing '/', got '{value}'"
                )));
            }
        }

        Ok(())
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Where [`load`] took the configuration from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file did not exist.
    Defaults,
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. The result is always
/// validated. Nothing is logged here: callers load config before the
/// subscriber exists, so they report the [`ConfigSource`] themselves.
pub fn load(path: &str) -> Result<(Config, ConfigSource), ParlanceError> {
    let path = Path::new(path);
    if !path.exists() {
        let config = Config::default();
        config.validate()?;
        return Ok((config, ConfigSource::Defaults));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ParlanceError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| ParlanceError::Config(format!("failed to parse config: {}", e)))?;

    config.validate()?;
    Ok((config, ConfigSource::File))
}
