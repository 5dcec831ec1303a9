//! Static language configuration.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::ReferenceDataError;
use crate::interfaces::LanguageConfigProvider;

/// Language configuration with a fixed set of supported codes.
#[derive(Debug, Clone, Default)]
pub struct StaticLanguageConfig {
    codes: HashSet<String>,
}

impl StaticLanguageConfig {
    /// Create a configuration supporting the given codes.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list of codes, ignoring blanks.
    ///
    /// ```
    /// use catalog_indexer_repository::StaticLanguageConfig;
    ///
    /// let config = StaticLanguageConfig::from_csv("eng, fra,,ger");
    /// assert_eq!(config.len(), 3);
    /// ```
    pub fn from_csv(value: &str) -> Self {
        Self::new(
            value
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty()),
        )
    }

    /// Number of supported codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no code is supported.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[async_trait]
impl LanguageConfigProvider for StaticLanguageConfig {
    async fn supported_language_codes(&self) -> Result<HashSet<String>, ReferenceDataError> {
        Ok(self.codes.clone())
    }
}
