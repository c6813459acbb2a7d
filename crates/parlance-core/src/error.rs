use thiserror::Error;

/// Top-level error type for Parlance.
///
/// Locale resolution and translation lookup are total and never produce one
/// of these; they only surface while loading config or translation documents.
#[derive(Debug, Error)]
pub enum ParlanceError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// A translation document could not be loaded.
    #[error("translation error ({locale}/{namespace}): {reason}")]
    Translation {
        locale: String,
        namespace: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ParlanceError::Config("test".into());
        assert_eq!(format!("{err}"), "config error: test");
    }

    #[test]
    fn test_translation_error_display() {
        let err = ParlanceError::Translation {
            locale: "fr".into(),
            namespace: "translation".into(),
            reason: "missing document".into(),
        };
        assert_eq!(
            format!("{err}"),
            "translation error (fr/translation): missing document"
        );
    }
}
