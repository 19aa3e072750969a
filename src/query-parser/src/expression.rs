use std::fmt;
use std::str::FromStr;

use query_api::DataQuery;
use serde::{Deserialize, Serialize};

use crate::config::FeatureFlags;

/// Known expression sub-types. The expression text itself stays opaque at
/// this layer; only the declared sub-type matters for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionKind {
    Math,
    Reduce,
    Resample,
    Threshold,
    #[serde(rename = "classic_conditions")]
    Classic,
    Sql,
}

impl ExpressionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionKind::Math => "math",
            ExpressionKind::Reduce => "reduce",
            ExpressionKind::Resample => "resample",
            ExpressionKind::Threshold => "threshold",
            ExpressionKind::Classic => "classic_conditions",
            ExpressionKind::Sql => "sql",
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpressionKind {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "math" => Ok(ExpressionKind::Math),
            "reduce" => Ok(ExpressionKind::Reduce),
            "resample" => Ok(ExpressionKind::Resample),
            "threshold" => Ok(ExpressionKind::Threshold),
            "classic_conditions" => Ok(ExpressionKind::Classic),
            "sql" => Ok(ExpressionKind::Sql),
            other => Err(ExpressionError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    #[error("missing expression type")]
    MissingType,
    #[error("unknown expression type '{0}'")]
    UnknownType(String),
    #[error("sql expressions are disabled")]
    SqlDisabled,
}

/// Reads the declared sub-type of a query addressed to the expression
/// pseudo-datasource. Owns the SQL feature-flag gate: with the flag off,
/// SQL-type queries are rejected here and callers never see the sub-type.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionTypeReader {
    flags: FeatureFlags,
}

impl ExpressionTypeReader {
    pub fn new(flags: FeatureFlags) -> Self {
        Self { flags }
    }

    /// The expression text is never parsed or validated here; multi-clause
    /// SQL (CTEs and the like) passes through untouched. Dependency
    /// extraction belongs to the downstream expression engine.
    pub fn read_type(&self, query: &DataQuery) -> Result<ExpressionKind, ExpressionError> {
        let declared = query
            .expression_type()
            .filter(|t| !t.is_empty())
            .ok_or(ExpressionError::MissingType)?;
        let kind = declared.parse::<ExpressionKind>()?;
        if kind == ExpressionKind::Sql && !self.flags.sql_expressions {
            return Err(ExpressionError::SqlDisabled);
        }
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expression_query(kind: &str, text: &str) -> DataQuery {
        serde_json::from_value(json!({
            "refId": "B",
            "datasource": {"type": "__expr__", "uid": "__expr__"},
            "type": kind,
            "expression": text
        }))
        .unwrap()
    }

    #[test]
    fn test_reads_declared_kind() {
        let reader = ExpressionTypeReader::new(FeatureFlags::default());
        let query = expression_query("math", "$A + 10");
        assert_eq!(reader.read_type(&query).unwrap(), ExpressionKind::Math);
    }

    #[test]
    fn test_sql_allowed_when_flag_on() {
        let reader = ExpressionTypeReader::new(FeatureFlags {
            sql_expressions: true,
        });
        let query = expression_query("sql", "SELECT time, value + 10 FROM A");
        assert_eq!(reader.read_type(&query).unwrap(), ExpressionKind::Sql);
    }

    #[test]
    fn test_sql_rejected_when_flag_off() {
        let reader = ExpressionTypeReader::new(FeatureFlags::default());
        let query = expression_query("sql", "SELECT * FROM A");
        assert!(matches!(
            reader.read_type(&query),
            Err(ExpressionError::SqlDisabled)
        ));
    }

    #[test]
    fn test_multi_clause_sql_text_is_opaque() {
        let reader = ExpressionTypeReader::new(FeatureFlags {
            sql_expressions: true,
        });
        let query = expression_query(
            "sql",
            "WITH cte AS (SELECT month FROM A) SELECT * FROM cte",
        );
        assert_eq!(reader.read_type(&query).unwrap(), ExpressionKind::Sql);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let reader = ExpressionTypeReader::new(FeatureFlags::default());
        let query = expression_query("smooth", "whatever");
        assert!(matches!(
            reader.read_type(&query),
            Err(ExpressionError::UnknownType(t)) if t == "smooth"
        ));
    }

    #[test]
    fn test_missing_kind_rejected() {
        let reader = ExpressionTypeReader::new(FeatureFlags::default());
        let query: DataQuery = serde_json::from_value(json!({
            "refId": "B",
            "datasource": {"type": "__expr__", "uid": "__expr__"}
        }))
        .unwrap();
        assert!(matches!(
            reader.read_type(&query),
            Err(ExpressionError::MissingType)
        ));
    }
}
