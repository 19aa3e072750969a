use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Feature flags consumed by the frontend. Passed explicitly at construction
/// time rather than read from global state, so behavior is reproducible per
/// configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// When off, SQL-type expression queries are rejected by the expression
    /// type reader instead of being classified.
    pub sql_expressions: bool,
}

impl FeatureFlags {
    /// Load flags from `queryfed.toml` and `QUERYFED__`-prefixed environment
    /// variables layered over the defaults.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let flags = Figment::from(Serialized::defaults(FeatureFlags::default()))
            .merge(Toml::file("queryfed.toml"))
            .merge(Env::prefixed("QUERYFED__").split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_expressions_default_off() {
        assert!(!FeatureFlags::default().sql_expressions);
    }

    #[test]
    fn test_configless_operation() {
        // Defaults extract cleanly without any config file present
        let flags = Figment::from(Serialized::defaults(FeatureFlags::default()))
            .extract::<FeatureFlags>()
            .unwrap();
        assert!(!flags.sql_expressions);
    }

    #[test]
    fn test_toml_override() {
        let flags = Figment::from(Serialized::defaults(FeatureFlags::default()))
            .merge(Toml::string("sql_expressions = true"))
            .extract::<FeatureFlags>()
            .unwrap();
        assert!(flags.sql_expressions);
    }
}
