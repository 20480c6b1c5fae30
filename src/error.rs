use crate::models::Role;
use thiserror::Error;

/// Application error type
///
/// Every variant renders a message that can be shown to the user as-is.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed
    #[error("{0}")]
    Api(#[from] ApiError),
    /// Missing or rejected credentials
    #[error("{0}")]
    Auth(#[from] AuthError),
    /// Input rejected before any network call
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// Workflow rule violated
    #[error("{0}")]
    Business(#[from] BusinessError),
    /// Session file could not be read or written
    #[error("session storage error: {0}")]
    Session(#[from] SessionError),
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Anything else (wrapped third-party errors)
    #[error("error: {0}")]
    Other(String),
}

/// Backend call errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or transport failure
    #[error("request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The request exceeded the configured timeout
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
    /// The caller abandoned the request
    #[error("request to {endpoint} was cancelled")]
    Cancelled { endpoint: String },
    /// The backend answered 404
    #[error("not found ({endpoint}){}", fmt_detail(.detail))]
    NotFound {
        endpoint: String,
        detail: Option<String>,
    },
    /// Any other non-2xx response
    #[error("server returned {status} ({endpoint}){}", fmt_detail(.detail))]
    BadResponse {
        endpoint: String,
        status: u16,
        detail: Option<String>,
    },
    /// The response body did not match the expected shape
    #[error("could not parse response from {endpoint}: {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// No session is stored
    #[error("you are not logged in, please log in first")]
    NotLoggedIn,
    /// Logged in, but with the wrong account type
    #[error("this action requires a {required} account (logged in as {actual})")]
    WrongRole { required: Role, actual: Role },
    /// The backend rejected the token or the credentials
    #[error("authentication rejected ({status}){}, please log in again", fmt_detail(.detail))]
    Rejected { status: u16, detail: Option<String> },
}

/// Validation errors, raised before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please answer all {total} questions before submitting.")]
    IncompleteQuestions { answered: usize, total: usize },
    #[error("Please complete all {total} coding exercises before submitting.")]
    IncompleteCoding { answered: usize, total: usize },
    #[error("Please place an item in all {total} drop zones before submitting.")]
    IncompletePuzzle { placed: usize, total: usize },
    #[error("Please complete all {total} reading activities before submitting.")]
    IncompleteReading { answered: usize, total: usize },
    #[error("Please complete all {total} spelling exercises before submitting.")]
    IncompleteSpelling { answered: usize, total: usize },
    #[error("Please fill in all fields ({form}).")]
    MissingFields { form: &'static str },
    #[error("Points must be a positive number (got {value}).")]
    InvalidPoints { value: i64 },
    #[error("Please fill in all {expected} words.")]
    WordListSize { expected: usize },
    #[error("Please select at least one student.")]
    NoStudentsSelected,
    #[error("Please select a coding level.")]
    MissingCodingLevel,
    #[error("Message cannot be empty.")]
    EmptyMessage,
    #[error("Invalid answer sheet: {detail}")]
    InvalidAnswerSheet { detail: String },
}

/// Workflow rule violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusinessError {
    /// The assignment was already submitted
    #[error("assignment {id} has already been submitted")]
    AlreadySubmitted { id: String },
    /// A submit for this assignment is still running
    #[error("assignment {id} is already being submitted, please wait")]
    SubmitInFlight { id: String },
    /// Redeem attempted with a balance below the reward cost
    #[error("Not enough points: this reward costs {cost} and you have {balance}.")]
    InsufficientPoints { cost: i64, balance: i64 },
}

/// Session storage errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("stored session in {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
    #[error("failed to read config file {path}: {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

fn fmt_detail(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {}", detail),
        None => String::new(),
    }
}

// ========== Classification ==========

impl AppError {
    /// Whether re-invoking the same action may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Api(ApiError::RequestFailed { .. })
            | AppError::Api(ApiError::Timeout { .. })
            | AppError::Api(ApiError::Cancelled { .. }) => true,
            AppError::Api(ApiError::BadResponse { status, .. }) => *status >= 500 || *status == 429,
            AppError::Business(BusinessError::SubmitInFlight { .. }) => true,
            _ => false,
        }
    }

    /// Whether the user has to log in (again) before retrying
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            AppError::Auth(AuthError::NotLoggedIn) | AppError::Auth(AuthError::Rejected { .. })
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Api(ApiError::NotFound { .. }))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

// ========== Convenience constructors ==========

impl AppError {
    /// Transport failure, or timeout when reqwest reports one
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        if source.is_timeout() {
            AppError::Api(ApiError::Timeout { endpoint })
        } else {
            AppError::Api(ApiError::RequestFailed { endpoint, source })
        }
    }

    pub fn cancelled(endpoint: impl Into<String>) -> Self {
        AppError::Api(ApiError::Cancelled {
            endpoint: endpoint.into(),
        })
    }

    pub fn json_parse_failed(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// Maps a non-2xx status onto the error taxonomy
    pub fn from_status(endpoint: impl Into<String>, status: u16, detail: Option<String>) -> Self {
        let endpoint = endpoint.into();
        match status {
            401 | 403 => AppError::Auth(AuthError::Rejected { status, detail }),
            404 => AppError::Api(ApiError::NotFound { endpoint, detail }),
            _ => AppError::Api(ApiError::BadResponse {
                endpoint,
                status,
                detail,
            }),
        }
    }
}

// ========== Result alias ==========

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
