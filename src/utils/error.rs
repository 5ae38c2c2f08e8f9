use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaffleError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Text generation service is not configured")]
    CollaboratorUnavailable,

    #[error("Text generation service returned status {status}: {message}")]
    CollaboratorError { status: u16, message: String },

    #[error("Malformed response from text generation service: {message}")]
    MalformedResponse { message: String },

    #[error("Unknown command: {input}")]
    CommandError { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Collaborator,
    Input,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RaffleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RaffleError::ConfigError { .. }
            | RaffleError::InvalidConfigValueError { .. }
            | RaffleError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            RaffleError::HttpError(_)
            | RaffleError::CollaboratorUnavailable
            | RaffleError::CollaboratorError { .. }
            | RaffleError::MalformedResponse { .. }
            | RaffleError::SerializationError(_) => ErrorCategory::Collaborator,
            RaffleError::CsvError(_) | RaffleError::CommandError { .. } => ErrorCategory::Input,
            RaffleError::IoError(_) => ErrorCategory::Io,
        }
    }

    /// 協作服務失敗只影響顯示文字，永遠不是致命錯誤
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Collaborator => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RaffleError::IoError(e) => format!("無法讀寫檔案: {}", e),
            RaffleError::CsvError(e) => format!("CSV 匯出失敗: {}", e),
            RaffleError::CollaboratorUnavailable => "AI 文字服務未設定，已使用預設文字".to_string(),
            RaffleError::CommandError { input } => format!("無法識別的指令: {}", input),
            other => other.to_string(),
        }
    }

    /// Process exit status for an error that ends a run. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the config file values and command line flags",
            ErrorCategory::Collaborator => {
                "Set GEMINI_API_KEY or [collaborator].api_key, or keep using the local template"
            }
            ErrorCategory::Input => "Type 'help' to list the available commands",
            ErrorCategory::Io => "Make sure the path exists and is writable",
        }
    }
}

impl From<toml::de::Error> for RaffleError {
    fn from(e: toml::de::Error) -> Self {
        RaffleError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, RaffleError>;
