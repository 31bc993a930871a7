//! Validation errors shared by every bracket operation

/// Error types for bracket, result and user operations
///
/// Every variant is a local validation failure. The operation that returned
/// it has not modified any store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BracketError {
    #[error("{value} is not an eligible pick for round {round} game {index} (options: {options})")]
    InvalidPick {
        round: u8,
        index: usize,
        value: String,
        options: String,
    },

    #[error("picks must be length {expected}, got {actual}")]
    MalformedBracket { expected: usize, actual: usize },

    #[error("{0}")]
    OutOfRange(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid team token: {0:?}")]
    InvalidTeam(String),

    #[error("name required")]
    EmptyName,
}

pub type Result<T> = std::result::Result<T, BracketError>;
