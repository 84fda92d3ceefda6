use reqwest::StatusCode;

/// Errors returned by the reconciliation core.
///
/// Remote failures (`Kube`, `Request`, `Http`, `Decode`) are passed through as
/// they were observed. The remaining variants are semantic conditions that a
/// caller is expected to branch on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("job manager returned {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("failed to decode job manager response: {0}")]
    Decode(String),

    #[error("unable to submit job: invalid job id")]
    InvalidJobId,

    #[error("application {0} has no recorded job id")]
    MissingJobId(String),

    #[error("application {0} has no recorded savepoint trigger id")]
    MissingTriggerId(String),

    #[error("no cluster provisioner configured")]
    ProvisionerUnavailable,

    #[error("operation cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),

    /// Free-form failure reported by a collaborator implementation.
    #[error("{0}")]
    Remote(String),
}

impl Error {
    /// True for failures of a remote call, as opposed to semantic conditions.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Kube(_) | Error::Request(_) | Error::Http { .. } | Error::Decode(_) | Error::Remote(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
