use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("Validation error on {field}: {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Participant already exists: {name} ({contact})")]
    DuplicateParticipant { name: String, contact: String },

    #[error("No stored group found for user '{owner}'")]
    NotFound { owner: String },

    #[error("At least 2 participants are required, found {count}")]
    NotEnoughParticipants { count: usize },

    #[error("Participant name '{name}' is used more than once")]
    AmbiguousParticipantName { name: String },

    #[error("Matchmaking failed after {attempts} attempts")]
    MatchmakingFailed { attempts: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    EncodingError(#[from] base64::DecodeError),

    #[error("Unsupported group schema version {found} (supported: {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },

    #[error("Corrupt stored record: {reason}")]
    CorruptRecord { reason: String },

    #[error("Configuration validation error on {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Input stream closed")]
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Matching,
    Persistence,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn validation(field: &str, value: &str, reason: impl Into<String>) -> Self {
        SantaError::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::ValidationError { .. }
            | SantaError::DuplicateParticipant { .. }
            | SantaError::InputClosed => ErrorCategory::Input,
            SantaError::NotEnoughParticipants { .. }
            | SantaError::AmbiguousParticipantName { .. }
            | SantaError::MatchmakingFailed { .. } => ErrorCategory::Matching,
            SantaError::NotFound { .. }
            | SantaError::IoError(_)
            | SantaError::CsvError(_)
            | SantaError::SerializationError(_)
            | SantaError::EncodingError(_)
            | SantaError::UnsupportedSchemaVersion { .. }
            | SantaError::CorruptRecord { .. } => ErrorCategory::Persistence,
            SantaError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SantaError::ValidationError { .. }
            | SantaError::DuplicateParticipant { .. }
            | SantaError::NotFound { .. }
            | SantaError::NotEnoughParticipants { .. } => ErrorSeverity::Low,
            SantaError::AmbiguousParticipantName { .. }
            | SantaError::MatchmakingFailed { .. }
            | SantaError::InputClosed => ErrorSeverity::Medium,
            SantaError::IoError(_)
            | SantaError::CsvError(_)
            | SantaError::SerializationError(_)
            | SantaError::EncodingError(_)
            | SantaError::UnsupportedSchemaVersion { .. }
            | SantaError::CorruptRecord { .. } => ErrorSeverity::High,
            SantaError::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Message shown to the person at the keyboard.
    pub fn user_friendly_message(&self) -> String {
        match self {
            SantaError::ValidationError { field, .. } => format!("Not a valid {}", field),
            SantaError::DuplicateParticipant { .. } => {
                "You've already added this participant".to_string()
            }
            SantaError::NotFound { .. } => "Sorry. Couldn't find that group".to_string(),
            SantaError::NotEnoughParticipants { .. } => {
                "You need some participants first".to_string()
            }
            SantaError::AmbiguousParticipantName { name } => format!(
                "More than one participant is called '{}', names must be unique to match",
                name
            ),
            SantaError::MatchmakingFailed { attempts } => format!(
                "Could not find a valid matching after {} attempts, please try again",
                attempts
            ),
            SantaError::IoError(e) => format!("Could not access the group store: {}", e),
            SantaError::CsvError(_)
            | SantaError::SerializationError(_)
            | SantaError::EncodingError(_)
            | SantaError::CorruptRecord { .. } => {
                "The group store contains an unreadable record".to_string()
            }
            SantaError::UnsupportedSchemaVersion { found, .. } => format!(
                "That group was saved by a newer version (schema {})",
                found
            ),
            SantaError::ConfigValidationError { field, message } => {
                format!("Invalid setting '{}': {}", field, message)
            }
            SantaError::InputClosed => "Input closed".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the value and enter it again",
            ErrorCategory::Matching => "Add more participants with distinct names and retry",
            ErrorCategory::Persistence => match self {
                SantaError::NotFound { .. } => "Check the username and password",
                _ => "Check that the store file exists, is readable and writable",
            },
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
