use thiserror::Error;

/// Top-level error type for the `sector-api` crate.
///
/// A closed taxonomy: every operation fails with exactly one of these four
/// kinds, so callers can branch exhaustively (re-login on `InvalidSession`,
/// back off on `Communication`, and so on). `sector-core` surfaces these
/// unmodified.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (DNS, connection refused, timeout, reset) or
    /// a response the service contract does not allow for.
    #[error("communication error: {message}")]
    Communication { message: String },

    /// Login rejected by the service (anything but a redirect back from the
    /// login form).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An authenticated call was rejected: the session cookie is missing,
    /// expired, or revoked. Re-login and retry.
    #[error("invalid session: login required or session expired")]
    InvalidSession,

    /// The caller supplied an action outside the fixed enumeration.
    /// Detected before any request is sent.
    #[error("invalid command: {command:?}")]
    InvalidCommand { command: String },
}

impl Error {
    pub(crate) fn communication(message: impl Into<String>) -> Self {
        Self::Communication {
            message: message.into(),
        }
    }

    /// Returns `true` if this error indicates the session is no longer
    /// valid and a fresh login might resolve it.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::InvalidSession)
    }

    /// Returns `true` if this is a transient failure worth retrying
    /// (with backoff supplied by the caller).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Communication { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Communication {
            message: err.to_string(),
        }
    }
}
