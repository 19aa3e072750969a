//! Request-splitting frontend of the federated query engine.
//!
//! One pass per request: validate refIds, resolve each query's time range
//! and execution target, classify expression queries, then partition the
//! request into backend-grouped sub-requests. Pure and call-scoped; the
//! only I/O happens inside the legacy datasource retriever collaborator.

pub mod config;
pub mod error;
pub mod expression;
pub mod legacy;
pub mod parser;
pub mod partition;
pub mod target;
pub mod time_range;
pub mod validate;

pub use config::FeatureFlags;
pub use error::ParseError;
pub use expression::{ExpressionError, ExpressionKind, ExpressionTypeReader};
pub use legacy::{LegacyDatasourceRetriever, LegacyLookupError};
pub use parser::QueryParser;
