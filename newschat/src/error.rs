//! Chat-facing error classes

use thiserror::Error;

/// Errors that surface to the user as ordinary assistant text.
/// Retrieval failures are not represented here: the news source collapses
/// them to an empty result list at its boundary.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Missing or empty credential configuration
    #[error("설정 오류: {0}")]
    Configuration(String),

    /// Model call failure (transport or API); never retried
    #[error("API 요청 실패: {0}")]
    Service(String),
}

impl ChatError {
    /// Check whether this error comes from configuration rather than the service
    pub fn is_configuration(&self) -> bool {
        matches!(self, ChatError::Configuration(_))
    }
}
