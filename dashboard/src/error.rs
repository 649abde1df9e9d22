use payloads::ClientError;

/// Why a read failed. Stored on cache entries and shared with every hook
/// reading the entry, so it only keeps the displayable parts of the
/// underlying [`ClientError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("The request timed out.")]
    Timeout,
    #[error("Network error. Please check your connection.")]
    Network,
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ClientError> for FetchError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::APIError(status, message) => Self::Api {
                status: status.as_u16(),
                message,
            },
            ClientError::Timeout(_) => Self::Timeout,
            ClientError::Network(_) => Self::Network,
            ClientError::Decode(e) => Self::Decode(e.to_string()),
        }
    }
}

/// Why a write failed. Every mutation hook returns this on its error path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// The caller left out a required id or payload. No request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The write was sent and failed. Nothing was invalidated.
    #[error(transparent)]
    Request(#[from] FetchError),
    /// The write succeeded but its response didn't match the expected
    /// shape. Affected keys were still invalidated.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl From<ClientError> for MutationError {
    fn from(error: ClientError) -> Self {
        Self::Request(error.into())
    }
}
