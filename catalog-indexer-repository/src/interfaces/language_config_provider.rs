//! Language configuration provider trait definition.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::ReferenceDataError;

/// Read contract of the tenant-wide language configuration.
///
/// Persisting the configuration is not part of this contract.
#[async_trait]
pub trait LanguageConfigProvider: Send + Sync {
    /// Return the language codes currently configured as supported.
    async fn supported_language_codes(&self) -> Result<HashSet<String>, ReferenceDataError>;
}
