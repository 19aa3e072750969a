use std::sync::Arc;

use query_api::{BUILTIN_DATASOURCE_UID, DataQuery, ResolvedTarget};

use crate::error::ParseError;
use crate::legacy::LegacyDatasourceRetriever;

/// A collaborator-free resolution strategy: either a resolved target or
/// "not applicable". The first applicable strategy wins.
type Strategy = fn(&DataQuery) -> Option<ResolvedTarget>;

/// Checked in priority order before any legacy fallback.
const STRATEGIES: &[Strategy] = &[builtin, expression, modern];

/// The built-in virtual datasource is addressed purely by its reserved uid.
/// It wins over whatever type value was also supplied, so the short-circuit
/// stays deterministic and never touches the legacy retriever.
fn builtin(query: &DataQuery) -> Option<ResolvedTarget> {
    let ds = query.datasource.as_ref()?;
    (ds.uid == BUILTIN_DATASOURCE_UID).then(ResolvedTarget::builtin)
}

/// Expression queries target the in-process pseudo-datasource. The legacy
/// numeric uid alias normalizes to the modern marker here.
fn expression(query: &DataQuery) -> Option<ResolvedTarget> {
    let ds = query.datasource.as_ref()?;
    ds.is_expression().then(ResolvedTarget::expression)
}

/// A modern reference with both type and uid maps verbatim. No registry
/// lookup at this layer; plugin existence is a downstream concern.
fn modern(query: &DataQuery) -> Option<ResolvedTarget> {
    let ds = query.datasource.as_ref()?;
    (!ds.plugin_type.is_empty() && !ds.uid.is_empty())
        .then(|| ResolvedTarget::new(ds.plugin_type.clone(), ds.uid.clone()))
}

/// Resolves each query's execution target, falling back to the legacy
/// deprecated-fields lookup when no strategy applies.
pub struct TargetResolver {
    legacy: Option<Arc<dyn LegacyDatasourceRetriever>>,
}

impl TargetResolver {
    pub fn new(legacy: Option<Arc<dyn LegacyDatasourceRetriever>>) -> Self {
        Self { legacy }
    }

    #[tracing::instrument(skip(self, query), fields(ref_id = %query.ref_id))]
    pub async fn resolve(&self, query: &DataQuery) -> Result<ResolvedTarget, ParseError> {
        for strategy in STRATEGIES {
            if let Some(target) = strategy(query) {
                return Ok(target);
            }
        }

        // A ref carrying a uid but no type is the legacy by-name wire form.
        let name = query
            .datasource
            .as_ref()
            .filter(|ds| ds.plugin_type.is_empty() && !ds.uid.is_empty())
            .map(|ds| ds.uid.as_str());
        let id = query.datasource_id;

        if name.is_none() && id.is_none() {
            return Err(ParseError::MissingDatasource {
                ref_id: query.ref_id.clone(),
            });
        }

        let Some(retriever) = &self.legacy else {
            return Err(ParseError::LegacyLookupUnsupported {
                ref_id: query.ref_id.clone(),
            });
        };

        tracing::warn!(
            ref_id = %query.ref_id,
            name = name.unwrap_or(""),
            id = ?id,
            "resolving datasource via deprecated fields"
        );

        let ds = retriever
            .get_datasource_from_deprecated_fields(name.unwrap_or(""), id)
            .await
            .map_err(|source| ParseError::LegacyResolutionFailed {
                ref_id: query.ref_id.clone(),
                source,
            })?;

        Ok(ResolvedTarget::new(ds.plugin_type, ds.uid))
    }
}
