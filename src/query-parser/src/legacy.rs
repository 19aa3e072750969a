use async_trait::async_trait;
use query_api::DataSourceRef;

/// Failure modes of a legacy datasource lookup.
#[derive(Debug, thiserror::Error)]
pub enum LegacyLookupError {
    /// Neither a datasource name nor a numeric id was supplied.
    #[error("missing datasource name or id parameter")]
    MissingParameter,

    /// The retriever found no datasource for the given name or id.
    #[error("datasource not found ({0})")]
    NotFound(String),

    /// Registry or service failure inside the retriever.
    #[error("datasource lookup failed: {0}")]
    Lookup(String),
}

/// Resolves deprecated by-name / by-numeric-id datasource references to a
/// modern `{type, uid}` reference.
///
/// Contract: a numeric id takes precedence when present; otherwise a
/// non-empty name is used; with neither the call fails with
/// [`LegacyLookupError::MissingParameter`]. Implementations may hit a
/// registry or remote service and must be safe for concurrent use, since the
/// hosting server parses many requests at once. The frontend performs no
/// retries around this call.
#[async_trait]
pub trait LegacyDatasourceRetriever: Send + Sync {
    async fn get_datasource_from_deprecated_fields(
        &self,
        name: &str,
        id: Option<i64>,
    ) -> Result<DataSourceRef, LegacyLookupError>;
}
