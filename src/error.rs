// Error types for store operations

use thiserror::Error;

/// Errors surfaced to callers of `TaskStore`
///
/// Persistence write failures are deliberately absent: they are reported to
/// the tracing sink and swallowed, because the in-memory state is
/// authoritative for the session.
#[derive(Debug, Error)]
pub enum Error {
    /// Input failed validation; carries the first violated rule's message.
    #[error("{0}")]
    Validation(String),

    /// No task with the given id exists.
    #[error("task not found: {0}")]
    NotFound(String),

    /// `confirm_delete` called with no delete pending.
    #[error("no delete is pending confirmation")]
    NoPendingDelete,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_passes_through() {
        let err = Error::Validation("Title is required".to_string());
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn test_not_found_names_the_id() {
        let err = Error::NotFound("abc-123".to_string());
        assert_eq!(err.to_string(), "task not found: abc-123");
    }
}
