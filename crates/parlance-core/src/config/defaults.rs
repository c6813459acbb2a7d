//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Parlance".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_locale() -> String {
    "en".to_string()
}

pub fn default_locales() -> Vec<String> {
    vec!["en".to_string(), "fr".to_string()]
}

pub fn default_namespace() -> String {
    "translation".to_string()
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    3000
}

pub fn default_assets_prefix() -> String {
    "/_assets".to_string()
}

pub fn default_api_prefix() -> String {
    "/api".to_string()
}

pub fn default_favicon_path() -> String {
    "/favicon.ico".to_string()
}
