use crate::expression::ExpressionError;
use crate::legacy::LegacyLookupError;

/// Errors raised while splitting a request. Every variant is request-fatal:
/// the caller gets either a complete `ParsedRequestInfo` or one of these,
/// never a partial grouping.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("duplicate refId '{ref_id}' (query {index})")]
    DuplicateRefId { ref_id: String, index: usize },

    #[error("missing datasource reference for query '{ref_id}'")]
    MissingDatasource { ref_id: String },

    #[error("legacy datasource lookup failed for query '{ref_id}': {source}")]
    LegacyResolutionFailed {
        ref_id: String,
        #[source]
        source: LegacyLookupError,
    },

    #[error("legacy datasource lookup unsupported (query '{ref_id}')")]
    LegacyLookupUnsupported { ref_id: String },

    #[error("invalid expression query '{ref_id}': {source}")]
    InvalidExpression {
        ref_id: String,
        #[source]
        source: ExpressionError,
    },
}
