use thiserror::Error;

const FRIENDLY_PREFIX: &str = "Could not fetch Core Web Vitals. ";

#[derive(Error, Debug)]
pub enum VitalsError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("API Error for {domain}: {message}")]
    ApiError {
        domain: String,
        status: u16,
        message: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Network,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VitalsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::TransportError(_) | Self::ApiError { .. } => ErrorCategory::Network,
            Self::ZipError(_)
            | Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// 連線層級的失敗（無法連線或逾時）
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::TransportError(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Pass between one and four domains or URLs, e.g. example.com"
            }
            Self::MissingConfigError { .. } => {
                "Set CRUX_API_KEY or pass --api-key / [api].api_key in the config file"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the config file and command line flags"
            }
            Self::ApiError { status: 404, .. } => {
                "The Chrome UX Report has no data for this target; try origin mode or another form factor"
            }
            Self::ApiError { .. } => "Check the API key and the entered domains",
            Self::TransportError(_) => "Check your network connection and retry",
            Self::ZipError(_) | Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                "Check that the output path exists and is writable"
            }
        }
    }

    /// 將錯誤轉換為單一的使用者訊息，先比對已知的 API 訊息，再檢查連線狀態
    pub fn user_friendly_message(&self) -> String {
        let raw = self.to_string();
        let missing_key =
            matches!(self, Self::MissingConfigError { field } if field == "api_key");

        let detail = if missing_key || raw.contains("API key not found") {
            "API key is missing. Please check your environment setup.".to_string()
        } else if raw.contains("Invalid Value") {
            "Please enter valid domain names (e.g., example.com).".to_string()
        } else if raw.contains("No data found") {
            "No Core Web Vitals data available for these domains.".to_string()
        } else if self.is_connectivity() {
            "Please check your internet connection.".to_string()
        } else {
            raw
        };

        format!("{}{}", FRIENDLY_PREFIX, detail)
    }
}

pub type Result<T> = std::result::Result<T, VitalsError>;
