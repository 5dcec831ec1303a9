//! Reference data provider trait definition.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::ReferenceDataError;
use crate::types::ReferenceDataType;

/// Looks up reference data identifiers for a tenant.
///
/// Caching, if any, is the implementation's responsibility; callers treat
/// every call as a potentially remote lookup.
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    /// Fetch the identifiers of `data_type` records whose `filter_field` is one
    /// of `filter_values`.
    ///
    /// # Arguments
    ///
    /// * `tenant` - The tenant the lookup is made for
    /// * `data_type` - The kind of reference data
    /// * `filter_field` - The record attribute to filter on
    /// * `filter_values` - Accepted values of that attribute
    ///
    /// # Returns
    ///
    /// * `Ok(HashSet<String>)` - Matching identifiers (possibly empty)
    /// * `Err(ReferenceDataError)` - If the lookup could not be performed
    async fn fetch(
        &self,
        tenant: &str,
        data_type: ReferenceDataType,
        filter_field: &str,
        filter_values: &[String],
    ) -> Result<HashSet<String>, ReferenceDataError>;
}
