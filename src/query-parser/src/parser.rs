use std::sync::Arc;

use query_api::{ParsedRequestInfo, QueryDataRequest, TimeRange};

use crate::error::ParseError;
use crate::expression::{ExpressionKind, ExpressionTypeReader};
use crate::legacy::LegacyDatasourceRetriever;
use crate::partition::{AnnotatedQuery, partition_queries};
use crate::target::TargetResolver;
use crate::time_range::resolve_time_range;
use crate::validate::check_unique_ref_ids;

/// Splits one client request into backend-grouped sub-requests.
///
/// Holds no mutable state; a single instance may be shared across
/// concurrently parsed requests. Each call is one forward pass:
/// validate, resolve time ranges and targets, classify expressions,
/// partition. The first error aborts the call with no partial result.
pub struct QueryParser {
    reader: ExpressionTypeReader,
    targets: TargetResolver,
}

impl QueryParser {
    /// `legacy` may be `None` when the host has no legacy datasource
    /// registry; deprecated-field lookups then fail cleanly.
    pub fn new(
        reader: ExpressionTypeReader,
        legacy: Option<Arc<dyn LegacyDatasourceRetriever>>,
    ) -> Self {
        Self {
            reader,
            targets: TargetResolver::new(legacy),
        }
    }

    #[tracing::instrument(skip_all, fields(queries = request.queries.len()))]
    pub async fn parse_request(
        &self,
        request: &QueryDataRequest,
    ) -> Result<ParsedRequestInfo, ParseError> {
        check_unique_ref_ids(&request.queries)?;

        let global = TimeRange {
            from: request.from.clone(),
            to: request.to.clone(),
        };

        let mut info = ParsedRequestInfo::default();
        let mut annotated = Vec::with_capacity(request.queries.len());

        for query in &request.queries {
            let time_range = resolve_time_range(&global, query.time_range.as_ref());
            let target = self.targets.resolve(query).await?;

            if target.is_expression() {
                let kind = self.reader.read_type(query).map_err(|source| {
                    ParseError::InvalidExpression {
                        ref_id: query.ref_id.clone(),
                        source,
                    }
                })?;
                if kind == ExpressionKind::Sql {
                    info.sql_inputs.insert(query.ref_id.clone());
                }
            }

            annotated.push(AnnotatedQuery {
                target,
                time_range,
                query: query.clone(),
            });
        }

        info.requests = partition_queries(annotated);
        Ok(info)
    }
}
