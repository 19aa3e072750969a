use std::collections::HashSet;

use query_api::DataQuery;

use crate::error::ParseError;

/// Reject the request on the first repeated refId, in input order. The empty
/// string counts as a refId too: one empty-refId query is fine, a second one
/// is a duplicate. Runs before any resolution so duplicate detection never
/// depends on resolution outcomes.
pub fn check_unique_ref_ids(queries: &[DataQuery]) -> Result<(), ParseError> {
    let mut seen = HashSet::with_capacity(queries.len());
    for (index, query) in queries.iter().enumerate() {
        if !seen.insert(query.ref_id.as_str()) {
            return Err(ParseError::DuplicateRefId {
                ref_id: query.ref_id.clone(),
                index,
            });
        }
    }
    Ok(())
}
