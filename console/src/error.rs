use common::JobId;
use thiserror::Error;

/// Failure of a single directory call. Never recovered inside the client.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error("job rejected by server ({status}): {message}")]
    Validation { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(e: reqwest::Error) -> Self {
        DirectoryError::Transport(TransportError::Http(e))
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(e: serde_json::Error) -> Self {
        DirectoryError::Transport(TransportError::Decode(e))
    }
}

impl DirectoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound(_))
    }
}

/// Why a create attempt did not produce a job.
#[derive(Debug, Error)]
pub enum CreateJobError {
    #[error("job draft failed client-side validation: {0:?}")]
    Invalid(common::FieldErrors),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
