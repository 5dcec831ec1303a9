//! Static reference data.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::ReferenceDataError;
use crate::interfaces::ReferenceDataProvider;
use crate::types::{ReferenceDataType, ReferenceRecord};

/// Reference data held in memory, shared by all tenants.
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceData {
    records: HashMap<ReferenceDataType, Vec<ReferenceRecord>>,
}

impl StaticReferenceData {
    /// Create an empty reference data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record of the given type.
    pub fn with_record(mut self, data_type: ReferenceDataType, record: ReferenceRecord) -> Self {
        self.records.entry(data_type).or_default().push(record);
        self
    }

    /// Add call number types whose source is `local`.
    pub fn with_local_call_number_types<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ids.into_iter().fold(self, |data, id| {
            data.with_record(
                ReferenceDataType::CallNumberTypes,
                ReferenceRecord::new(id, "source", "local"),
            )
        })
    }
}

#[async_trait]
impl ReferenceDataProvider for StaticReferenceData {
    async fn fetch(
        &self,
        tenant: &str,
        data_type: ReferenceDataType,
        filter_field: &str,
        filter_values: &[String],
    ) -> Result<HashSet<String>, ReferenceDataError> {
        let ids: HashSet<String> = self
            .records
            .get(&data_type)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.matches(filter_field, filter_values))
                    .map(|record| record.id.clone())
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            tenant = %tenant,
            data_type = %data_type,
            filter_field = %filter_field,
            count = ids.len(),
            "Fetched static reference data"
        );
        Ok(ids)
    }
}
