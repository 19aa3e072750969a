use query_api::TimeRange;

/// Compute the effective time window for one query.
///
/// Priority: the query's own range when both endpoints are set, else the
/// request-level range when both endpoints are set, else the zero range.
/// A partially specified range (one endpoint empty) is unusable at its level
/// and inheritance continues, so every query ends up with a concrete range
/// and backends never see an absent window.
pub fn resolve_time_range(global: &TimeRange, per_query: Option<&TimeRange>) -> TimeRange {
    if let Some(range) = per_query {
        if range.is_complete() {
            return range.clone();
        }
    }
    if global.is_complete() {
        return global.clone();
    }
    TimeRange::zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_range_wins_over_global() {
        let global = TimeRange::new("now-1h", "now");
        let query = TimeRange::new("now-1d", "now");
        assert_eq!(resolve_time_range(&global, Some(&query)), query);
    }

    #[test]
    fn test_global_range_used_when_query_has_none() {
        let global = TimeRange::new("now-1h", "now");
        assert_eq!(resolve_time_range(&global, None), global);
    }

    #[test]
    fn test_zero_range_when_nothing_specified() {
        assert_eq!(
            resolve_time_range(&TimeRange::default(), None),
            TimeRange::zero()
        );
    }

    #[test]
    fn test_partial_query_range_falls_through_to_global() {
        let global = TimeRange::new("now-1h", "now");
        let partial = TimeRange::new("now-1d", "");
        assert_eq!(resolve_time_range(&global, Some(&partial)), global);
    }

    #[test]
    fn test_partial_global_range_falls_through_to_zero() {
        let partial = TimeRange::new("", "now");
        assert_eq!(resolve_time_range(&partial, None), TimeRange::zero());
    }
}
