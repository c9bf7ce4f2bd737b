use thiserror::Error;

/// Failure taxonomy for the client core. `Validation` and `NotFound` are
/// raised before any network call; `SessionExpired` comes only from the
/// gateway's unauthorized handling and is the one variant that empties the
/// credential store.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("remote error: http {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("session expired")]
    SessionExpired,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("credential store error: {0}")]
    Credential(String),
    #[error("invalid payload: {0}")]
    Payload(String),
    #[error("internal error: {0}")]
    Internal(String),
}
