use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskifyError>;

#[derive(Debug, Error)]
pub enum TaskifyError {
    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Index {index} out of range for collection of length {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Invalid gesture: {0}")]
    InvalidGesture(String),

    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl TaskifyError {
    /// Short message suitable for a toast. Internal failures collapse to a
    /// generic message so nothing about the backend leaks to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::ListNotFound(_) => "List not found".to_string(),
            Self::CardNotFound(_) => "Card not found".to_string(),
            Self::BoardNotFound(_) => "Board not found".to_string(),
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::InvalidTitle(reason) => reason.clone(),
            Self::InvalidIndex { .. } | Self::InvalidGesture(_) => "Invalid move".to_string(),
            Self::PersistenceFailure(_)
            | Self::StorageError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::ConfigError(_)
            | Self::Other(_) => "Something went wrong!".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internals() {
        let err = TaskifyError::StorageError("disk on fire at /var/lib".to_string());
        assert_eq!(err.user_message(), "Something went wrong!");
    }

    #[test]
    fn test_user_message_keeps_title_reason() {
        let err = TaskifyError::InvalidTitle("Title is required".to_string());
        assert_eq!(err.user_message(), "Title is required");
    }

    #[test]
    fn test_display_invalid_index() {
        let err = TaskifyError::InvalidIndex { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "Index 4 out of range for collection of length 2"
        );
    }
}
