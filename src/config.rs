use anyhow::{Context, Result};

use crate::i18n::{default_language, parse_language, LanguageTag};

/// Environment variables consulted for the process language, in order.
pub const DEFAULT_LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Configuration for a text registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Language used when no preference is given or none can be detected
    pub fallback_language: LanguageTag,

    /// Variables read (first non-empty wins) when detecting the process language
    pub locale_vars: Vec<&'static str>,

    /// Whether the default text map follows the detected process language.
    /// When false it is always built for `fallback_language`.
    pub detect_locale: bool,
}

impl RegistryConfig {
    /// Create a configuration with the given fallback language
    pub fn new(fallback_language: LanguageTag) -> Self {
        Self {
            fallback_language,
            locale_vars: DEFAULT_LOCALE_VARS.to_vec(),
            detect_locale: true,
        }
    }

    /// Set the fallback language
    pub fn with_fallback_language(mut self, tag: LanguageTag) -> Self {
        self.fallback_language = tag;
        self
    }

    /// Set the fallback language from a code such as `"es"` or `"pt_BR"`
    pub fn with_fallback_code(self, code: &str) -> Result<Self> {
        let tag = parse_language(code).context("Invalid fallback language")?;
        Ok(self.with_fallback_language(tag))
    }

    /// Set the variables consulted for locale detection
    pub fn with_locale_vars(mut self, vars: Vec<&'static str>) -> Self {
        self.locale_vars = vars;
        self
    }

    /// Build the default text map for the fallback language only
    pub fn without_locale_detection(mut self) -> Self {
        self.detect_locale = false;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new(default_language())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.fallback_language.to_string(), "en");
        assert_eq!(config.locale_vars, vec!["LC_ALL", "LC_MESSAGES", "LANG"]);
        assert!(config.detect_locale);
    }

    #[test]
    fn test_with_fallback_code() {
        let config = RegistryConfig::default()
            .with_fallback_code("pt_BR")
            .expect("Should parse");
        assert_eq!(config.fallback_language.to_string(), "pt-BR");
    }

    #[test]
    fn test_with_fallback_code_invalid() {
        let result = RegistryConfig::default().with_fallback_code("");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid fallback language"));
    }

    #[test]
    fn test_builder_chain() {
        let config = RegistryConfig::default()
            .with_locale_vars(vec!["APP_LANG"])
            .without_locale_detection();
        assert_eq!(config.locale_vars, vec!["APP_LANG"]);
        assert!(!config.detect_locale);
    }
}
