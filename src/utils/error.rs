use thiserror::Error;

/// Why a submission was rejected. The display text is what the client sees.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("All fields are required")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid phone number (minimum 10 digits)")]
    InvalidPhone,
}

/// Terminal failure states of the contact upsert.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrmFailure {
    #[error("HubSpot API error (status {status}): {body}")]
    CreateFailed { status: u16, body: String },

    #[error("HubSpot update failed for contact {contact_id} (status {status}): {body}")]
    UpdateFailed {
        contact_id: String,
        status: u16,
        body: String,
    },

    #[error("Contact exists but could not be found or updated")]
    UnresolvedConflict { email: String },

    #[error("HubSpot request failed: {message}")]
    Transport { message: String },
}

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config file parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    ValidationError(#[from] ValidationFailure),

    #[error("Missing required fields: {fields}")]
    MissingFieldsError { fields: String },

    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error(transparent)]
    CrmError(#[from] CrmFailure),

    #[error("Sync write-back failed: {message}")]
    WritebackError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Store,
    Crm,
    Configuration,
    System,
}

impl LeadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LeadError::ValidationError(_) | LeadError::MissingFieldsError { .. } => {
                ErrorCategory::Validation
            }
            LeadError::DuplicateEmail { .. }
            | LeadError::StoreError { .. }
            | LeadError::WritebackError { .. } => ErrorCategory::Store,
            LeadError::CrmError(_) => ErrorCategory::Crm,
            LeadError::ConfigError { .. }
            | LeadError::MissingConfigError { .. }
            | LeadError::InvalidConfigValueError { .. }
            | LeadError::TomlError(_) => ErrorCategory::Configuration,
            LeadError::HttpError(_) | LeadError::IoError(_) | LeadError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    /// 給 CLI 使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Submission rejected: {}", self),
            ErrorCategory::Store => format!("Lead store problem: {}", self),
            ErrorCategory::Crm => format!("HubSpot sync failed: {}", self),
            ErrorCategory::Configuration => {
                format!("Configuration problem: {}. Check your environment or config file.", self)
            }
            ErrorCategory::System => format!("Unexpected system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeadError>;
