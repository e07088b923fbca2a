use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllocError {
    #[error("Model file not found at {path}. Please check the file path and try again.")]
    ModelNotFound { path: String },

    #[error("Invalid budget or period: total_budget={total_budget}, time_period={time_period}")]
    InvalidBudgetPeriod { total_budget: f64, time_period: i64 },

    #[error("Invalid bounds for channel '{channel}' (min={min}, max={max}): {reason}")]
    InvalidBounds {
        channel: String,
        min: f64,
        max: f64,
        reason: String,
    },

    #[error("Channel '{channel}' is missing from the request bounds")]
    MissingChannel { channel: String },

    #[error("Channel '{channel}' is not part of the configured channel set")]
    UnknownChannel { channel: String },

    #[error("Budget optimizer failed: {message}")]
    OptimizerFailure { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, AllocError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,      // informational, run still usable
    Medium,   // bad input, resubmission fixes it
    High,     // allocation failed
    Critical, // session cannot continue
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Model,
    Input,
    Optimizer,
    Config,
    System,
}

impl AllocError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AllocError::ModelNotFound { .. } => ErrorSeverity::Critical,
            AllocError::InvalidBudgetPeriod { .. }
            | AllocError::InvalidBounds { .. }
            | AllocError::MissingChannel { .. }
            | AllocError::UnknownChannel { .. } => ErrorSeverity::Medium,
            AllocError::OptimizerFailure { .. } => ErrorSeverity::High,
            AllocError::ConfigError { .. }
            | AllocError::InvalidConfigValueError { .. }
            | AllocError::MissingConfigError { .. }
            | AllocError::ValidationError { .. } => ErrorSeverity::Medium,
            AllocError::IoError(_)
            | AllocError::SerializationError(_)
            | AllocError::TomlError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AllocError::ModelNotFound { .. } => ErrorCategory::Model,
            AllocError::InvalidBudgetPeriod { .. }
            | AllocError::InvalidBounds { .. }
            | AllocError::MissingChannel { .. }
            | AllocError::UnknownChannel { .. } => ErrorCategory::Input,
            AllocError::OptimizerFailure { .. } => ErrorCategory::Optimizer,
            AllocError::ConfigError { .. }
            | AllocError::InvalidConfigValueError { .. }
            | AllocError::MissingConfigError { .. }
            | AllocError::ValidationError { .. }
            | AllocError::TomlError(_) => ErrorCategory::Config,
            AllocError::IoError(_) | AllocError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AllocError::ModelNotFound { path } => {
                format!(
                    "Model file not found at {}. Please check the file path and try again.",
                    path
                )
            }
            AllocError::InvalidBudgetPeriod { .. } => {
                "Please provide valid Total Budget and Time Period.".to_string()
            }
            AllocError::InvalidBounds { channel, .. } => {
                format!(
                    "Ensure the maximum budget for {} is greater than its minimum budget and within the total budget.",
                    channel
                )
            }
            AllocError::MissingChannel { channel } => {
                format!("No budget bounds were provided for channel {}.", channel)
            }
            AllocError::UnknownChannel { channel } => {
                format!("Channel {} is not one of the configured channels.", channel)
            }
            AllocError::OptimizerFailure { message } => {
                format!(
                    "The budget optimizer could not produce an allocation: {}",
                    message
                )
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AllocError::ModelNotFound { .. } => {
                "Point --model-path at a pre-fitted model artifact (JSON)".to_string()
            }
            AllocError::InvalidBudgetPeriod { .. } => {
                "Use a total budget of at least 100 and a time period of at least 1 day".to_string()
            }
            AllocError::InvalidBounds { .. } => {
                "For every channel set 0 <= min < max <= total budget".to_string()
            }
            AllocError::MissingChannel { .. } | AllocError::UnknownChannel { .. } => {
                "Provide one min/max bound for each configured channel, and no others".to_string()
            }
            AllocError::OptimizerFailure { .. } => {
                "Relax the channel bounds or increase the total budget, then retry".to_string()
            }
            AllocError::ConfigError { .. }
            | AllocError::InvalidConfigValueError { .. }
            | AllocError::MissingConfigError { .. }
            | AllocError::ValidationError { .. }
            | AllocError::TomlError(_) => "Fix the configuration value and run again".to_string(),
            AllocError::IoError(_) | AllocError::SerializationError(_) => {
                "Check file permissions and that the artifact is valid JSON".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        let err = AllocError::ModelNotFound {
            path: "model.json".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Model);

        let err = AllocError::InvalidBudgetPeriod {
            total_budget: 0.0,
            time_period: 90,
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.category(), ErrorCategory::Input);

        let err = AllocError::OptimizerFailure {
            message: "infeasible bounds".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.category(), ErrorCategory::Optimizer);
    }

    #[test]
    fn test_user_friendly_messages_mention_channel() {
        let err = AllocError::InvalidBounds {
            channel: "google_ads_c".to_string(),
            min: 100.0,
            max: 100.0,
            reason: "maximum must be greater than minimum".to_string(),
        };
        assert!(err.user_friendly_message().contains("google_ads_c"));
    }
}
