//! Umbrella crate for the federated query frontend.
//!
//! Re-exports the wire models and the request-splitting parser so hosting
//! services depend on a single crate. The fixture-driven regression suite
//! for the full pipeline lives in `tests/`.

pub use query_api as api;
pub use query_parser as parser;

use std::sync::Arc;

use query_parser::{ExpressionTypeReader, FeatureFlags, LegacyDatasourceRetriever, QueryParser};

/// Build a parser from feature flags and an optional legacy retriever.
pub fn new_query_parser(
    flags: FeatureFlags,
    legacy: Option<Arc<dyn LegacyDatasourceRetriever>>,
) -> QueryParser {
    QueryParser::new(ExpressionTypeReader::new(flags), legacy)
}
