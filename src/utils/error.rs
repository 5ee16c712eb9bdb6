use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Recursion depth {depth} exceeds the configured limit of {limit}")]
    RecursionLimitExceeded { depth: u64, limit: u64 },

    #[error("Series generation cancelled after {completed} of {total} sizes")]
    Cancelled { completed: u64, total: u64 },

    #[error("Measurement worker failed: {message}")]
    WorkerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Resource,
    Interrupted,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GeoError {
    pub fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        GeoError::InvalidParameter {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GeoError::ConfigError { .. } | GeoError::ConfigParseError { .. } => {
                ErrorCategory::Configuration
            }
            GeoError::InvalidParameter { .. } => ErrorCategory::Validation,
            GeoError::RecursionLimitExceeded { .. } | GeoError::WorkerError { .. } => {
                ErrorCategory::Resource
            }
            GeoError::Cancelled { .. } => ErrorCategory::Interrupted,
            GeoError::IoError(_) | GeoError::CsvError(_) | GeoError::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Interrupted => ErrorSeverity::Low,
            ErrorCategory::Configuration | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::Resource => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI. A cancelled series is not a failure.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GeoError::InvalidParameter { field, .. } => {
                format!("Check the value passed for '{}' and try again", field)
            }
            GeoError::RecursionLimitExceeded { limit, .. } => format!(
                "Lower n below {} or raise --recursion-limit (the thread stack must be able to hold that many frames)",
                limit
            ),
            GeoError::Cancelled { .. } => "Re-run with a smaller n to finish faster".to_string(),
            GeoError::WorkerError { .. } => "Re-run with --verbose to see where it stopped".to_string(),
            GeoError::ConfigError { .. } | GeoError::ConfigParseError { .. } => {
                "Verify the configuration file is valid TOML and all fields have the right type"
                    .to_string()
            }
            GeoError::IoError(_) => "Check that the output path exists and is writable".to_string(),
            GeoError::CsvError(_) | GeoError::SerializationError(_) => {
                "Report exports could not be encoded; retry without --export".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GeoError::InvalidParameter { field, reason, .. } => {
                format!("Invalid input for {}: {}", field, reason)
            }
            GeoError::RecursionLimitExceeded { depth, limit } => format!(
                "The recursive evaluator ran out of call depth ({} > {})",
                depth, limit
            ),
            GeoError::Cancelled { completed, total } => {
                format!("Stopped after measuring {} of {} sizes", completed, total)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursion_limit_is_critical_resource_error() {
        let err = GeoError::RecursionLimitExceeded {
            depth: 11,
            limit: 10,
        };
        assert_eq!(err.category(), ErrorCategory::Resource);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.recovery_suggestion().contains("--recursion-limit"));
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = GeoError::invalid("n", 0, "n must be at least 1");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.user_friendly_message(), "Invalid input for n: n must be at least 1");
        assert_eq!(err.to_string(), "Invalid value for n: '0' (n must be at least 1)");
    }

    #[test]
    fn test_cancelled_exits_cleanly() {
        let err = GeoError::Cancelled {
            completed: 3,
            total: 10,
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.exit_code(), 0);
    }
}
