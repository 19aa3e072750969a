//! Wire models for the federated query frontend.
//!
//! A client request bundles queries for several independent backend data
//! sources plus in-process "expression" queries. The types here mirror the
//! JSON shapes exchanged with clients and downstream backends; everything a
//! query carries beyond the common subset stays in an opaque passthrough map
//! so backends can evolve their query shapes without touching this crate.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Plugin id and uid of the reserved expression pseudo-datasource. Queries
/// addressed to it are computed in-process from other queries' results.
pub const EXPRESSION_DATASOURCE_UID: &str = "__expr__";

/// Legacy numeric alias some clients still send for the expression
/// pseudo-datasource uid.
pub const EXPRESSION_DATASOURCE_LEGACY_UID: &str = "-100";

/// Reserved uid (and plugin id) of the built-in virtual datasource serving
/// internal meta queries. Addressed purely by this id, never via a registry.
pub const BUILTIN_DATASOURCE_UID: &str = "__builtin__";

/// A time window expressed as opaque time expressions, either absolute
/// timestamps or relative forms like `now-1h`. The frontend never interprets
/// these beyond checking for presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl TimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// The neutral "no time window specified" range. Downstream backends get
    /// this literal pair rather than an absent field.
    pub fn zero() -> Self {
        Self::new("0", "0")
    }

    /// True when both endpoints are set. Partially specified ranges are not
    /// usable and fall through to the next level of the inheritance rule.
    pub fn is_complete(&self) -> bool {
        !self.from.is_empty() && !self.to.is_empty()
    }
}

/// Reference to a datasource instance by plugin type and instance uid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRef {
    /// Plugin id, e.g. `prometheus`. Empty in the legacy by-name wire form.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub plugin_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
}

impl DataSourceRef {
    pub fn new(plugin_type: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            plugin_type: plugin_type.into(),
            uid: uid.into(),
        }
    }

    /// True when the uid names the expression pseudo-datasource, under either
    /// its modern marker or its legacy numeric alias.
    pub fn is_expression(&self) -> bool {
        self.uid == EXPRESSION_DATASOURCE_UID || self.uid == EXPRESSION_DATASOURCE_LEGACY_UID
    }
}

/// One query inside a request. The typed fields are the common subset every
/// query carries; everything else lands in `extra` and is passed through to
/// the backend unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQuery {
    /// Client-assigned label, unique within a request. May be empty, but at
    /// most one query per request may leave it empty.
    #[serde(rename = "refId", default, skip_serializing_if = "String::is_empty")]
    pub ref_id: String,

    #[serde(
        default,
        deserialize_with = "datasource_ref_compat",
        skip_serializing_if = "Option::is_none"
    )]
    pub datasource: Option<DataSourceRef>,

    /// Deprecated numeric datasource id, resolved through the legacy lookup.
    #[serde(
        rename = "datasourceId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub datasource_id: Option<i64>,

    /// Per-query override of the request-level time range.
    #[serde(rename = "timeRange", default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,

    /// Backend-specific properties, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataQuery {
    /// Expression sub-type (`math`, `reduce`, `sql`, ...) for queries
    /// addressed to the expression pseudo-datasource.
    pub fn expression_type(&self) -> Option<&str> {
        self.extra.get("type").and_then(Value::as_str)
    }

    /// Raw expression text. Opaque to the frontend.
    pub fn expression_text(&self) -> Option<&str> {
        self.extra.get("expression").and_then(Value::as_str)
    }
}

/// Accept both the modern object form and the bare legacy string form of the
/// `datasource` field; a string is a datasource name, carried in `uid` with
/// an empty plugin type.
fn datasource_ref_compat<'de, D>(deserializer: D) -> Result<Option<DataSourceRef>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Compat {
        Ref(DataSourceRef),
        Name(String),
    }

    Ok(match Option::<Compat>::deserialize(deserializer)? {
        None => None,
        Some(Compat::Ref(ds)) => Some(ds),
        Some(Compat::Name(name)) => Some(DataSourceRef {
            plugin_type: String::new(),
            uid: name,
        }),
    })
}

/// An incoming request: an optional global time range and an ordered list of
/// queries. Also the inner shape of each backend-grouped sub-request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDataRequest {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub queries: Vec<DataQuery>,
}

/// The execution target of a resolved query, and the grouping key for
/// partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedTarget {
    #[serde(rename = "pluginId")]
    pub plugin_id: String,
    pub uid: String,
}

impl ResolvedTarget {
    pub fn new(plugin_id: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            uid: uid.into(),
        }
    }

    /// The reserved in-process expression pseudo-target.
    pub fn expression() -> Self {
        Self::new(EXPRESSION_DATASOURCE_UID, EXPRESSION_DATASOURCE_UID)
    }

    /// The built-in virtual datasource target.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_DATASOURCE_UID, BUILTIN_DATASOURCE_UID)
    }

    pub fn is_expression(&self) -> bool {
        self.plugin_id == EXPRESSION_DATASOURCE_UID
    }
}

/// One backend-grouped sub-request: a resolved target and the member queries
/// that share it, with the group's effective time range on the inner request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSourceRequest {
    #[serde(rename = "pluginId")]
    pub plugin_id: String,
    #[serde(default)]
    pub uid: String,
    pub request: QueryDataRequest,
}

/// The parse result: ordered sub-requests plus the refIds of queries
/// classified as SQL-style expressions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRequestInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<DataSourceRequest>,

    /// Serialized as a map of refId to empty object, the historical wire
    /// shape consumers already depend on.
    #[serde(
        rename = "sqlInputs",
        default,
        with = "sql_inputs_wire",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub sql_inputs: BTreeSet<String>,
}

/// `sqlInputs` is a set on our side but `{"<refId>": {}}` on the wire.
mod sql_inputs_wire {
    use std::collections::{BTreeMap, BTreeSet};

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Marker {}

    pub fn serialize<S: Serializer>(set: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(set.iter().map(|ref_id| (ref_id, Marker {})))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeSet<String>, D::Error> {
        let map = BTreeMap::<String, Marker>::deserialize(deserializer)?;
        Ok(map.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_range_completeness() {
        assert!(TimeRange::new("now-1h", "now").is_complete());
        assert!(TimeRange::zero().is_complete());
        assert!(!TimeRange::default().is_complete());
        assert!(!TimeRange::new("now-1h", "").is_complete());
        assert!(!TimeRange::new("", "now").is_complete());
    }

    #[test]
    fn test_data_query_passthrough_fields_survive() {
        let query: DataQuery = serde_json::from_value(json!({
            "refId": "A",
            "datasource": {"type": "prometheus", "uid": "local-prom"},
            "expr": "up",
            "maxDataPoints": 500
        }))
        .unwrap();

        assert_eq!(query.ref_id, "A");
        assert_eq!(
            query.datasource,
            Some(DataSourceRef::new("prometheus", "local-prom"))
        );
        assert_eq!(query.extra.get("expr"), Some(&json!("up")));
        assert_eq!(query.extra.get("maxDataPoints"), Some(&json!(500)));

        let round = serde_json::to_value(&query).unwrap();
        assert_eq!(round["expr"], json!("up"));
        assert_eq!(round["maxDataPoints"], json!(500));
    }

    #[test]
    fn test_datasource_accepts_legacy_string_form() {
        let query: DataQuery = serde_json::from_value(json!({
            "refId": "A",
            "datasource": "my-old-datasource"
        }))
        .unwrap();

        let ds = query.datasource.unwrap();
        assert_eq!(ds.plugin_type, "");
        assert_eq!(ds.uid, "my-old-datasource");
    }

    #[test]
    fn test_expression_ref_detection() {
        assert!(DataSourceRef::new("__expr__", "__expr__").is_expression());
        assert!(DataSourceRef::new("", "-100").is_expression());
        assert!(!DataSourceRef::new("prometheus", "local-prom").is_expression());
    }

    #[test]
    fn test_expression_accessors() {
        let query: DataQuery = serde_json::from_value(json!({
            "refId": "B",
            "datasource": {"type": "__expr__", "uid": "__expr__"},
            "type": "sql",
            "expression": "SELECT * FROM A"
        }))
        .unwrap();

        assert_eq!(query.expression_type(), Some("sql"));
        assert_eq!(query.expression_text(), Some("SELECT * FROM A"));
    }

    #[test]
    fn test_sql_inputs_wire_shape() {
        let mut info = ParsedRequestInfo::default();
        info.sql_inputs.insert("B".to_string());
        info.sql_inputs.insert("C".to_string());

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["sqlInputs"], json!({"B": {}, "C": {}}));

        let back: ParsedRequestInfo = serde_json::from_value(value).unwrap();
        assert_eq!(back.sql_inputs, info.sql_inputs);
    }

    #[test]
    fn test_empty_parsed_request_serializes_empty() {
        let value = serde_json::to_value(ParsedRequestInfo::default()).unwrap();
        assert_eq!(value, json!({}));
    }
}
