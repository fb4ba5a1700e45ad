use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_expiration")]
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Hours a rejected listing is kept before the janitor purges it.
    #[serde(default = "default_retention_hours")]
    pub rejected_retention_hours: u64,
    /// Hours a listing may sit pending before being auto-approved.
    #[serde(default = "default_retention_hours")]
    pub pending_auto_approve_hours: u64,
    #[serde(default = "default_janitor_interval")]
    pub janitor_interval_seconds: u64,
}

fn default_expiration() -> u64 {
    86_400
}

fn default_retention_hours() -> u64 {
    24
}

fn default_janitor_interval() -> u64 {
    3_600
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            rejected_retention_hours: default_retention_hours(),
            pending_auto_approve_hours: default_retention_hours(),
            janitor_interval_seconds: default_janitor_interval(),
        }
    }
}

impl BusinessRules {
    pub fn janitor_config(&self) -> openex_catalog::janitor::JanitorConfig {
        openex_catalog::janitor::JanitorConfig {
            rejected_retention: chrono::Duration::hours(self.rejected_retention_hours as i64),
            pending_wait: chrono::Duration::hours(self.pending_auto_approve_hours as i64),
            tick: std::time::Duration::from_secs(self.janitor_interval_seconds),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Then the current environment's file, which is optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // A local file that shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Finally environment variables, e.g. OPENEX_AUTH__JWT_SECRET
            .add_source(config::Environment::with_prefix("OPENEX").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rule_defaults_match_deployment() {
        let rules = BusinessRules::default();
        assert_eq!(rules.rejected_retention_hours, 24);
        assert_eq!(rules.pending_auto_approve_hours, 24);
        assert_eq!(rules.janitor_interval_seconds, 3_600);

        let janitor = rules.janitor_config();
        assert_eq!(janitor.rejected_retention.num_hours(), 24);
        assert_eq!(janitor.tick.as_secs(), 3_600);
    }
}
