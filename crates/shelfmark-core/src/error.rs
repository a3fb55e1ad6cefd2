use thiserror::Error;

/// All errors that can occur in shelfmark-core.
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Book already exists in library: {0}")]
    BookAlreadyExists(String),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    StorageError = 4,
    NetworkError = 6,
    Conflict = 7,
    ConfirmRequired = 8,
}

impl ShelfError {
    /// True when a persistence read or write did not complete.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::BookAlreadyExists(_) => ExitCode::Conflict,
            Self::BookNotFound(_) => ExitCode::NotFound,
            Self::ValidationError(_) => ExitCode::InvalidArgs,
            Self::Storage(_) | Self::Io(_) | Self::Json(_) => ExitCode::StorageError,
            Self::TomlParse(_) | Self::TomlSerialize(_) => ExitCode::GeneralError,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShelfError>;
