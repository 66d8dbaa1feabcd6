use thiserror::Error;

/// Everything that can go wrong talking to the alert service. All of
/// it surfaces to the user as a single message string.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A non-2xx response at any of the three HTTP steps.
    #[error("{context}: {status}")]
    Status { context: &'static str, status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("upload response missing uploadUrl")]
    MissingUploadUrl,

    #[error("could not read file: {0}")]
    FileRead(#[from] std::io::Error),
}

impl ApiError {
    pub(crate) const fn status(context: &'static str, status: u16) -> Self {
        Self::Status { context, status }
    }
}
