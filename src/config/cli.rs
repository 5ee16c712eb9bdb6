use crate::config::toml_config::TomlConfig;
use crate::config::RunConfig;
use crate::domain::model::OperationSelection;
use crate::utils::error::Result;
use clap::Parser;
use num_bigint::BigInt;

#[derive(Debug, Clone, Parser)]
#[command(name = "geoseq")]
#[command(about = "Compare iterative and recursive geometric-sequence evaluation")]
pub struct CliConfig {
    /// First term of the sequence
    #[arg(short, long, allow_hyphen_values = true)]
    pub a: Option<BigInt>,

    /// Common ratio
    #[arg(short, long, allow_hyphen_values = true)]
    pub r: Option<BigInt>,

    /// Number of terms (sum) or 1-based index (term)
    #[arg(short, long)]
    pub n: Option<u64>,

    /// Which quantity to evaluate
    #[arg(long, value_enum)]
    pub operation: Option<OperationSelection>,

    /// Also measure the runtime series for every size 1..=n
    #[arg(long)]
    pub series: bool,

    /// Largest accepted n
    #[arg(long)]
    pub max_n: Option<u64>,

    /// Call-depth ceiling for the recursive evaluator
    #[arg(long)]
    pub recursion_limit: Option<u64>,

    /// Directory for exported reports
    #[arg(long)]
    pub output_path: Option<String>,

    /// Export formats, comma separated (csv, json)
    #[arg(long, value_delimiter = ',')]
    pub export: Vec<String>,

    /// TOML file with run settings; flags given here take precedence
    #[arg(short, long)]
    pub config: Option<String>,

    /// Show the resolved settings and exit
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl CliConfig {
    /// Loads the TOML file when given and applies the flags on top.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_toml(&TomlConfig::from_file(path)?)?,
            None => RunConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut RunConfig) {
        if let Some(a) = &self.a {
            config.a = a.clone();
        }
        if let Some(r) = &self.r {
            config.r = r.clone();
        }
        if let Some(n) = self.n {
            config.n = n;
        }
        if let Some(operation) = self.operation {
            config.operation = operation;
        }
        if let Some(max_n) = self.max_n {
            config.max_n = max_n;
        }
        if let Some(limit) = self.recursion_limit {
            config.recursion_limit = limit;
        }
        if let Some(path) = &self.output_path {
            config.output_path = path.clone();
        }
        if !self.export.is_empty() {
            config.export_formats = self
                .export
                .iter()
                .map(|f| f.trim().to_ascii_lowercase())
                .collect();
        }
        config.series |= self.series;
        config.monitor |= self.monitor;
        config.json_logs |= self.json_logs;
    }
}
