use crate::infrastructure::error::ApiError;

/// What a view should do with a failed operation. Session expiry always
/// forces navigation back to login; everything else stays inline, with a
/// retry affordance only where retrying can help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureDisposition {
    RedirectToLogin,
    Inline { message: String, retryable: bool },
}

/// The single place that decides between redirect and inline rendering.
/// By the time a `SessionExpired` reaches here the gateway has already
/// emptied the credential store.
pub fn classify_failure(error: &ApiError) -> FailureDisposition {
    match error {
        ApiError::SessionExpired => FailureDisposition::RedirectToLogin,
        ApiError::Unreachable(_) | ApiError::Remote { .. } => FailureDisposition::Inline {
            message: error.to_string(),
            retryable: true,
        },
        other => FailureDisposition::Inline {
            message: other.to_string(),
            retryable: false,
        },
    }
}
