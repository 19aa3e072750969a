use std::collections::HashMap;

use query_api::{DataQuery, DataSourceRequest, QueryDataRequest, ResolvedTarget, TimeRange};

/// A query annotated with its resolved target and effective time range,
/// ready for grouping.
#[derive(Debug, Clone)]
pub struct AnnotatedQuery {
    pub target: ResolvedTarget,
    pub time_range: TimeRange,
    pub query: DataQuery,
}

/// Group annotated queries into one sub-request per distinct target.
///
/// Sub-request order is the order of first occurrence of each target in the
/// input; member order within a group is input order. A group's time range
/// is its first member's effective range; a member that disagrees still
/// carries its own override inside the member query itself.
pub fn partition_queries(queries: Vec<AnnotatedQuery>) -> Vec<DataSourceRequest> {
    let mut requests: Vec<DataSourceRequest> = Vec::new();
    let mut index: HashMap<ResolvedTarget, usize> = HashMap::new();

    for annotated in queries {
        let slot = match index.get(&annotated.target) {
            Some(&slot) => slot,
            None => {
                index.insert(annotated.target.clone(), requests.len());
                requests.push(DataSourceRequest {
                    plugin_id: annotated.target.plugin_id,
                    uid: annotated.target.uid,
                    request: QueryDataRequest {
                        from: annotated.time_range.from,
                        to: annotated.time_range.to,
                        queries: Vec::new(),
                    },
                });
                requests.len() - 1
            }
        };
        requests[slot].request.queries.push(annotated.query);
    }

    requests
}
