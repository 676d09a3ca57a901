use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("task {0} not found")]
    TaskNotFound(u64),

    #[error("tag '{0}' not found")]
    TagNotFound(String),

    #[error("task list '{0}' not found")]
    ListNotFound(String),

    #[error("{reason}")]
    Usage { reason: String, usage: String },

    #[error("invalid date '{token}' (expected YYYY-MM-DD)")]
    InvalidDate { token: String, usage: String },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("telegram api error: {0}")]
    Telegram(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl BotError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::TaskNotFound(_) => "task_not_found",
            Self::TagNotFound(_) => "tag_not_found",
            Self::ListNotFound(_) => "list_not_found",
            Self::Usage { .. } => "usage",
            Self::InvalidDate { .. } => "invalid_date",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Config(_) => "config_error",
            Self::Telegram(_) => "telegram_error",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::Http(_) => "http_error",
            Self::Db(_) => "db_error",
        }
    }

    /// Errors caused by what the user typed or asked for, as opposed to
    /// failures of the store or transport.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound(_)
                | Self::TagNotFound(_)
                | Self::ListNotFound(_)
                | Self::Usage { .. }
                | Self::InvalidDate { .. }
                | Self::UnknownCommand(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
