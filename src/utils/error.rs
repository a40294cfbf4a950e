use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing column '{column}' in {file}")]
    MissingColumn { column: String, file: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl TaggerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TaggerError::TomlError(_)
            | TaggerError::ConfigValidationError { .. }
            | TaggerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            TaggerError::CsvError(_) | TaggerError::MissingColumn { .. } => ErrorCategory::Input,
            TaggerError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ErrorCategory::Input
            }
            TaggerError::IoError(_) | TaggerError::SerializationError(_) => ErrorCategory::Output,
            TaggerError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TaggerError::IoError(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                ErrorSeverity::Medium
            }
            TaggerError::ProcessingError { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TaggerError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("File not found: {}", e)
            }
            TaggerError::MissingColumn { column, file } => {
                format!("The file {} has no '{}' column", file, column)
            }
            TaggerError::CsvError(e) => format!("Could not read the question table: {}", e),
            TaggerError::TomlError(e) => format!("Could not parse the configuration: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        if let TaggerError::IoError(e) = self {
            if e.kind() == std::io::ErrorKind::NotFound {
                return "Check --input-dir and --subject, and that any --config or --keywords file exists";
            }
        }

        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command-line flags and the TOML configuration file"
            }
            ErrorCategory::Input => {
                "Make sure the subject CSV exists and has 'Question Number' and 'Question' columns"
            }
            ErrorCategory::Output => "Check that the output directory is writable",
            ErrorCategory::Processing => "Re-run with --verbose and report the log output",
        }
    }
}

pub type Result<T> = std::result::Result<T, TaggerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_is_input_error() {
        let err = TaggerError::MissingColumn {
            column: "Question".to_string(),
            file: "math.csv".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("'Question'"));
    }

    #[test]
    fn test_processing_error_is_critical() {
        let err = TaggerError::ProcessingError {
            message: "worker panicked".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Processing);
    }

    #[test]
    fn test_not_found_message() {
        let err = TaggerError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "data/math.csv",
        ));
        assert!(err.user_friendly_message().starts_with("File not found"));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.recovery_suggestion().contains("--input-dir"));
        assert!(!err.recovery_suggestion().contains("writable"));
    }

    #[test]
    fn test_write_failure_is_output_error() {
        let err = TaggerError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "out/output_concepts_math.csv",
        ));
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.recovery_suggestion(), "Check that the output directory is writable");
    }
}
