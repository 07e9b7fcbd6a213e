use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimerError {
    #[error("Invalid parameter `{field}` = {value}: {reason}")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl TimerError {
    pub fn invalid(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        TimerError::InvalidParameter {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        TimerError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TimerError::InvalidParameter { .. } => ErrorCategory::Validation,
            TimerError::ConfigError { .. } | TimerError::TomlError(_) => {
                ErrorCategory::Configuration
            }
            TimerError::IoError(_) | TimerError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            TimerError::InvalidParameter { field, .. } => {
                format!("Check the value given for '{}'; times and percentages must be zero or more, run durations above zero", field)
            }
            TimerError::ConfigError { .. } => {
                "Pick a duration with --minutes, --clock, --percent or --option".to_string()
            }
            TimerError::TomlError(_) => {
                "Make sure the session file is valid TOML with an [exam] section".to_string()
            }
            TimerError::IoError(_) => "Check that the file exists and is readable".to_string(),
            TimerError::SerializationError(_) => "Retry without --json".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TimerError::InvalidParameter { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            TimerError::ConfigError { message } => message.clone(),
            TimerError::TomlError(e) => format!("Could not read session file: {}", e),
            TimerError::IoError(e) => format!("File error: {}", e),
            TimerError::SerializationError(e) => format!("Could not render output: {}", e),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, TimerError>;
