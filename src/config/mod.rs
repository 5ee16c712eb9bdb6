#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::recursive::{DEFAULT_RECURSION_LIMIT, MAX_RECURSION_LIMIT};
use crate::core::ConfigProvider;
use crate::domain::model::{OperationSelection, SequenceParams};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_headroom, validate_output_formats, validate_path, validate_positive_number,
    validate_range, Validate,
};
use num_bigint::BigInt;
use toml_config::TomlConfig;

/// Upper bound on `n`; keeps the O(n²) series affordable and well under
/// the default recursion limit.
pub const DEFAULT_MAX_N: u64 = 900;

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub a: BigInt,
    pub r: BigInt,
    pub n: u64,
    pub operation: OperationSelection,
    pub series: bool,
    pub max_n: u64,
    pub recursion_limit: u64,
    pub output_path: String,
    pub export_formats: Vec<String>,
    pub monitor: bool,
    pub json_logs: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            a: BigInt::from(2),
            r: BigInt::from(3),
            n: 10,
            operation: OperationSelection::Both,
            series: false,
            max_n: DEFAULT_MAX_N,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            output_path: "./output".to_string(),
            export_formats: Vec::new(),
            monitor: false,
            json_logs: false,
        }
    }
}

impl RunConfig {
    /// Defaults overlaid with whatever the TOML file sets.
    pub fn from_toml(toml: &TomlConfig) -> Result<Self> {
        let mut config = Self::default();

        if let Some(sequence) = &toml.sequence {
            if let Some(a) = &sequence.a {
                config.a = a.to_bigint("sequence.a")?;
            }
            if let Some(r) = &sequence.r {
                config.r = r.to_bigint("sequence.r")?;
            }
            if let Some(n) = sequence.n {
                config.n = n;
            }
        }

        if let Some(harness) = &toml.harness {
            if let Some(operation) = harness.operation {
                config.operation = operation;
            }
            if let Some(series) = harness.series {
                config.series = series;
            }
            if let Some(max_n) = harness.max_n {
                config.max_n = max_n;
            }
            if let Some(limit) = harness.recursion_limit {
                config.recursion_limit = limit;
            }
        }

        if let Some(output) = &toml.output {
            if let Some(path) = &output.path {
                config.output_path = path.clone();
            }
            if let Some(formats) = &output.formats {
                config.export_formats = formats.iter().map(|f| f.to_ascii_lowercase()).collect();
            }
        }

        if let Some(monitoring) = &toml.monitoring {
            if let Some(enabled) = monitoring.enabled {
                config.monitor = enabled;
            }
        }
        if let Some(json) = toml.json_logs() {
            config.json_logs = json;
        }

        Ok(config)
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_range("recursion_limit", self.recursion_limit, 1, MAX_RECURSION_LIMIT)?;
        validate_positive_number("max_n", self.max_n, 1)?;
        validate_headroom(self.max_n, self.recursion_limit)?;
        validate_range("n", self.n, 1, self.max_n)?;
        validate_path("output_path", &self.output_path)?;
        validate_output_formats("export", &self.export_formats)?;
        Ok(())
    }
}

impl ConfigProvider for RunConfig {
    fn sequence_params(&self) -> SequenceParams {
        SequenceParams::new(self.a.clone(), self.r.clone(), self.n)
    }

    fn operations(&self) -> OperationSelection {
        self.operation
    }

    fn series_enabled(&self) -> bool {
        self.series
    }

    fn max_n(&self) -> u64 {
        self.max_n
    }

    fn recursion_limit(&self) -> u64 {
        self.recursion_limit
    }

    fn export_formats(&self) -> &[String] {
        &self.export_formats
    }
}
