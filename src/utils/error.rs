use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Failed to connect to MongoDB: {message}")]
    ConnectionError { message: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] mongodb::error::Error),

    #[error("No collection found in database '{database}'")]
    NoCollectionError { database: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Connection,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 可重試 (例如網路暫時中斷)
    Medium,
    /// 需要人工修正設定或資料
    High,
    /// 系統層級錯誤 (磁碟、權限)
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::ConnectionError { .. } | EtlError::DatabaseError(_) => {
                ErrorCategory::Connection
            }
            EtlError::NoCollectionError { .. } | EtlError::SerializationError(_) => {
                ErrorCategory::Data
            }
            EtlError::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Connection => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run that failed with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::MissingConfigError { field } => {
                format!("Set {} in the environment or the config file", field)
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Check the value of {}", field)
            }
            EtlError::ConfigValidationError { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            EtlError::ConnectionError { .. } | EtlError::DatabaseError(_) => {
                "Verify the MongoDB URI, credentials and network access, then retry".to_string()
            }
            EtlError::NoCollectionError { .. } => {
                "Set collection.name explicitly or check the database name".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the output directory is writable and the disk is not full".to_string()
            }
            EtlError::SerializationError(_) => {
                "Inspect the source documents for values that cannot be encoded".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Connection => format!("Could not read from MongoDB: {}", self),
            ErrorCategory::Data => format!("Could not process the data: {}", self),
            ErrorCategory::Storage => format!("Could not write the snapshot files: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_configuration_error() {
        let err = EtlError::MissingConfigError {
            field: "MONGODB_URI".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 1);
        assert!(err.recovery_suggestion().contains("MONGODB_URI"));
    }

    #[test]
    fn test_exit_codes_are_never_zero() {
        let errors = vec![
            EtlError::ConnectionError {
                message: "refused".to_string(),
            },
            EtlError::NoCollectionError {
                database: "dumpy".to_string(),
            },
            EtlError::IoError(std::io::Error::other("disk full")),
        ];

        let codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert_eq!(codes, vec![2, 1, 3]);
    }

    #[test]
    fn test_user_friendly_message_includes_cause() {
        let err = EtlError::NoCollectionError {
            database: "dumpy".to_string(),
        };
        assert!(err.user_friendly_message().contains("dumpy"));
    }
}
