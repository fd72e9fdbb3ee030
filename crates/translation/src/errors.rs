use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Text to translate must not be empty")]
    EmptyText,

    #[error("Text is too long: {len} characters (max {max})")]
    TextTooLong { len: usize, max: usize },

    #[error("{provider}: request failed: {message}")]
    Request { provider: String, message: String },

    #[error("{provider}: unexpected response: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("{provider}: timed out")]
    Timeout { provider: String },
}

impl TranslationError {
    /// Validation failures are the caller's fault; everything else is a provider failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyText | Self::TextTooLong { .. })
    }

    pub(crate) fn request(provider: &str, err: impl std::fmt::Display) -> Self {
        Self::Request {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid(provider: &str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
