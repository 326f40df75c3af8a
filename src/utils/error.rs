use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("No CSV data provided")]
    NoData,

    #[error("CSV must have at least 2 lines (header and data), found {found}")]
    TooFewLines { found: usize },

    #[error("Target entity '{name}' is not supported for CSV import")]
    UnsupportedEntity { name: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl IngestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IngestError::NoData
            | IngestError::TooFewLines { .. }
            | IngestError::UnsupportedEntity { .. }
            | IngestError::CsvError(_) => ErrorCategory::Input,
            IngestError::ConfigValidationError { .. }
            | IngestError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            IngestError::StoreError { .. } | IngestError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            IngestError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 結構性錯誤：匯入在觸碰任何集合之前即中止
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            IngestError::NoData
                | IngestError::TooFewLines { .. }
                | IngestError::UnsupportedEntity { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            IngestError::NoData => "Provide a non-empty CSV export".to_string(),
            IngestError::TooFewLines { .. } => {
                "The file needs a header row and at least one data row".to_string()
            }
            IngestError::UnsupportedEntity { .. } => {
                "Use one of: Assembly, Product, TestDocument".to_string()
            }
            IngestError::CsvError(_) => "Check the CSV file for encoding problems".to_string(),
            IngestError::IoError(_) => {
                "Check that the file exists and the store directory is writable".to_string()
            }
            IngestError::SerializationError(_) | IngestError::StoreError { .. } => {
                "Inspect the store directory; a collection file may be corrupted".to_string()
            }
            IngestError::ConfigValidationError { .. }
            | IngestError::InvalidConfigValueError { .. } => {
                "Review the command-line flags and the TOML configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Import rejected: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Storage => format!("Could not access the record store: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
