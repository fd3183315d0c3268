//! Error types for log parsing

use thiserror::Error;

/// Failures surfaced to the caller of [`crate::parse_log`].
///
/// The input-validation variants carry fixed, user-facing messages; the caller is
/// expected to show the message and ask for another log.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Please paste a game log to analyze")]
    EmptyLog,

    #[error("Invalid log format: missing setup phase")]
    MissingSetup,

    #[error("Could not identify players in the log")]
    PlayersNotFound,

    #[error("Invalid log format: missing coin flip information")]
    MissingCoinFlip,

    #[error("No turns found in the log")]
    NoTurns,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LogError {
    /// True for the failures caused by the shape of the pasted log itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LogError::EmptyLog
                | LogError::MissingSetup
                | LogError::PlayersNotFound
                | LogError::MissingCoinFlip
                | LogError::NoTurns
        )
    }
}

pub type Result<T> = std::result::Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_messages() {
        assert_eq!(LogError::EmptyLog.to_string(), "Please paste a game log to analyze");
        assert!(LogError::MissingSetup.to_string().contains("missing setup phase"));
        assert!(LogError::MissingCoinFlip.to_string().contains("missing coin flip"));
    }

    #[test]
    fn test_is_input_error() {
        assert!(LogError::NoTurns.is_input_error());
        assert!(LogError::PlayersNotFound.is_input_error());
        assert!(!LogError::Config("bad".to_string()).is_input_error());
    }
}
