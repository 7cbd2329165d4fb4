use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaginationError {
    /// Rejected before anything was sent.
    #[error("invalid pagination argument: {0}")]
    InvalidArgument(String),
    #[error("failed to render page {page}")]
    RenderFailure {
        page: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("pagination transport failed")]
    Transport(#[source] anyhow::Error),
}

impl PaginationError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
