//! Failures surfaced by the exchange registry and assignment engine.

use thiserror::Error;

use super::{Error, ExchangeCode};

/// Errors returned by the gift-exchange driving port.
///
/// Every variant is recoverable at the adapter boundary: the messaging bot
/// renders each one as its own reply text, and JSON adapters convert them to
/// [`Error`] via `From`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// No exchange uses this code.
    #[error("there is no exchange with code {code}")]
    NotFound { code: ExchangeCode },
    /// The exchange has already been drawn.
    #[error("exchange {code} is not open")]
    NotOpen { code: ExchangeCode },
    /// The draw needs at least two participants.
    #[error("exchange {code} has {count} participant(s); at least 2 are needed")]
    InsufficientParticipants { code: ExchangeCode, count: usize },
    /// Persistence is unreachable.
    #[error("exchange storage unavailable: {message}")]
    Unavailable { message: String },
    /// Unexpected failure inside an adapter.
    #[error("exchange operation failed: {message}")]
    Internal { message: String },
}

impl ExchangeError {
    /// Build [`ExchangeError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Build [`ExchangeError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ExchangeError> for Error {
    fn from(value: ExchangeError) -> Self {
        match value {
            ExchangeError::NotFound { .. } => Self::not_found(value.to_string()),
            ExchangeError::NotOpen { .. } | ExchangeError::InsufficientParticipants { .. } => {
                Self::conflict(value.to_string())
            }
            ExchangeError::Unavailable { .. } => Self::service_unavailable(value.to_string()),
            ExchangeError::Internal { .. } => Self::internal(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn code() -> ExchangeCode {
        ExchangeCode::new(9).expect("valid code")
    }

    #[rstest]
    #[case(ExchangeError::NotFound { code: code() }, ErrorCode::NotFound)]
    #[case(ExchangeError::NotOpen { code: code() }, ErrorCode::Conflict)]
    #[case(
        ExchangeError::InsufficientParticipants { code: code(), count: 1 },
        ErrorCode::Conflict
    )]
    #[case(ExchangeError::unavailable("pool"), ErrorCode::ServiceUnavailable)]
    #[case(ExchangeError::internal("boom"), ErrorCode::InternalError)]
    fn maps_to_json_error_codes(#[case] error: ExchangeError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }

    #[rstest]
    fn messages_mention_the_code() {
        let err = ExchangeError::NotOpen { code: code() };
        assert_eq!(err.to_string(), "exchange 9 is not open");
    }
}
