use crate::domain::model::OperationSelection;
use crate::utils::error::{GeoError, Result};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Run parameters loaded from a TOML file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub sequence: Option<SequenceSection>,
    pub harness: Option<HarnessSection>,
    pub output: Option<OutputSection>,
    pub monitoring: Option<MonitoringSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceSection {
    pub a: Option<IntegerValue>,
    pub r: Option<IntegerValue>,
    pub n: Option<u64>,
}

/// TOML integers stop at 64 bits; larger values are given as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerValue {
    Int(i64),
    Text(String),
}

impl IntegerValue {
    pub fn to_bigint(&self, field: &str) -> Result<BigInt> {
        match self {
            IntegerValue::Int(v) => Ok(BigInt::from(*v)),
            IntegerValue::Text(s) => s
                .trim()
                .parse::<BigInt>()
                .map_err(|e| GeoError::invalid(field, s, format!("not an integer: {}", e))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessSection {
    pub operation: Option<OperationSelection>,
    pub series: Option<bool>,
    pub max_n: Option<u64>,
    pub recursion_limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub formats: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: Option<bool>,
    pub log_format: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| GeoError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| GeoError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn json_logs(&self) -> Option<bool> {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
    }
}
