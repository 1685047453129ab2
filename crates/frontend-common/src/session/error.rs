use agendify_core::FormError;
use agendify_core::constants::messages;
use agendify_http::ClientError;
use thiserror::Error;

/// Sign-in failures
#[derive(Debug, Error)]
pub enum SessionError {
    /// An empty field; no request was made
    #[error(transparent)]
    MissingCredentials(#[from] FormError),

    /// The server answered success without a token or a user
    #[error("Malformed sign-in response: {0}")]
    MalformedResponse(String),

    /// The exchange failed; `message` is what the user is shown
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ClientError,
    },
}

impl SessionError {
    /// Classify a failed sign-in exchange
    pub fn from_client(err: ClientError) -> Self {
        match err {
            ClientError::MalformedResponse(reason) => Self::MalformedResponse(reason),
            ClientError::Serialization(e) => Self::MalformedResponse(e.to_string()),
            other => Self::Rejected {
                message: other.user_message(messages::LOGIN_FAILED),
                source: other,
            },
        }
    }

    /// Text for the failure notice
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredentials(e) => e.to_string(),
            Self::MalformedResponse(_) => messages::LOGIN_FAILED.to_string(),
            Self::Rejected { message, .. } => message.clone(),
        }
    }
}
