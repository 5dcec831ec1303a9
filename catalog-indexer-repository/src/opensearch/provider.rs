//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use catalog_indexer_shared::SearchDocumentBody;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    BulkParts, DeleteParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{BatchOperationResult, BatchOperationSummary};

/// OpenSearch provider implementation.
///
/// Writes document bodies with the bulk API. Each body carries its own target
/// index, so one provider serves every resource type and tenant.
///
/// # Example
///
/// ```ignore
/// let provider = OpenSearchProvider::new("http://localhost:9200").await?;
/// let body = SearchDocumentBody::for_upsert(id, "diku", "catalog_instance_diku", event_type, "{}");
/// provider.bulk_index_documents(&[body]).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

/// Bulk request lines and the bodies they were built from.
struct BulkRequest<'a> {
    lines: Vec<JsonBody<Value>>,
    sent: Vec<&'a SearchDocumentBody>,
    rejected: Vec<BatchOperationResult>,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::unreachable(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::unreachable(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch provider");

        Ok(Self { client })
    }

    /// Build the action/source line pairs of a bulk request.
    ///
    /// Bodies that are not index bodies, or whose payload is missing or not a
    /// JSON object, are rejected up front and never sent.
    fn build_bulk_request(documents: &[SearchDocumentBody]) -> BulkRequest<'_> {
        let mut request = BulkRequest {
            lines: Vec::with_capacity(documents.len() * 2),
            sent: Vec::with_capacity(documents.len()),
            rejected: Vec::new(),
        };

        for document in documents {
            match Self::parse_payload(document) {
                Ok(source) => {
                    request.lines.push(
                        json!({ "index": { "_index": document.index, "_id": document.id } })
                            .into(),
                    );
                    request.lines.push(source.into());
                    request.sent.push(document);
                }
                Err(e) => request.rejected.push(BatchOperationResult::failed(
                    document.id.clone(),
                    document.index.clone(),
                    e,
                )),
            }
        }

        request
    }

    fn parse_payload(document: &SearchDocumentBody) -> Result<Value, SearchIndexError> {
        if !document.is_index() {
            return Err(SearchIndexError::rejected(document, "not an index body"));
        }

        let payload = document
            .payload
            .as_deref()
            .ok_or_else(|| SearchIndexError::rejected(document, "no payload"))?;

        let source: Value = serde_json::from_str(payload)
            .map_err(|e| SearchIndexError::unreadable_payload(document, e.to_string()))?;
        if !source.is_object() {
            return Err(SearchIndexError::rejected(
                document,
                "payload is not a JSON object",
            ));
        }

        Ok(source)
    }

    /// Map the `items` of a bulk response back onto the bodies that were sent.
    ///
    /// Items are returned by the backend in request order.
    fn collect_bulk_results(
        response: &Value,
        sent: &[&SearchDocumentBody],
    ) -> Result<Vec<BatchOperationResult>, SearchIndexError> {
        let items = response
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| SearchIndexError::unexpected_response("Bulk response has no items"))?;

        if items.len() != sent.len() {
            return Err(SearchIndexError::unexpected_response(format!(
                "Bulk response has {} items for {} documents",
                items.len(),
                sent.len()
            )));
        }

        Ok(items
            .iter()
            .zip(sent)
            .map(|(item, document)| {
                let outcome = item.get("index").unwrap_or(item);
                match outcome.get("error") {
                    Some(error) if !error.is_null() => BatchOperationResult::failed(
                        document.id.clone(),
                        document.index.clone(),
                        SearchIndexError::not_indexed(document, error.to_string()),
                    ),
                    _ => BatchOperationResult::succeeded(
                        document.id.clone(),
                        document.index.clone(),
                    ),
                }
            })
            .collect())
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    /// Write multiple documents with a single bulk request.
    ///
    /// Documents rejected before sending and documents the backend refused are
    /// both reported as failed in the summary. Only a failure of the request as
    /// a whole is returned as an error.
    async fn bulk_index_documents(
        &self,
        documents: &[SearchDocumentBody],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let BulkRequest {
            lines,
            sent,
            mut rejected,
        } = Self::build_bulk_request(documents);

        if sent.is_empty() {
            return Ok(BatchOperationSummary::from_results(rejected));
        }

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(lines)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_request_failed(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_request_failed(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::unexpected_response(e.to_string()))?;

        let mut results = Self::collect_bulk_results(&body, &sent)?;
        results.append(&mut rejected);

        let summary = BatchOperationSummary::from_results(results);
        debug!(
            total = summary.total,
            failed = summary.failed,
            "Bulk request completed"
        );
        Ok(summary)
    }

    /// Delete a document from the search index.
    ///
    /// A missing document (404) is considered a successful deletion.
    async fn delete_document(&self, document: &SearchDocumentBody) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(&document.index, &document.id))
            .send()
            .await
            .map_err(|e| SearchIndexError::delete_failed(document, e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - document may not exist
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(SearchIndexError::delete_failed(
                document,
                format!("status {}: {}", status, error_body),
            ));
        }

        debug!(index = %document.index, doc_id = %document.id, "Document deleted");
        Ok(())
    }
}
