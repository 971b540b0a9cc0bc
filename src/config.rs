use crate::matcher::BrandRules;
use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;

/// One catalog slice processed as an independent run.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub source: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: String,
    /// JSON snapshot of brand connections; read from the database when absent.
    #[serde(default)]
    pub connections_path: Option<String>,
    /// JSON snapshot of candidate records; read from the database when absent.
    #[serde(default)]
    pub records_path: Option<String>,
    pub targets: Vec<TargetConfig>,
    #[serde(default)]
    pub rules: BrandRules,
    #[serde(default = "default_delimiter")]
    pub connection_delimiter: String,
    #[serde(default = "default_version_key")]
    pub version_key: String,
    /// Placeholder manufacturers ("no brand" and the like).
    #[serde(default)]
    pub generic_brands: Vec<String>,
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_version_key() -> String {
    "assignBrandIfKnown".to_string()
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    Ok(config)
}
