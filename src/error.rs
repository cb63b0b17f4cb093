#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Network or HTTP-status failure on a page request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] duckdb::Error),

    /// Upstream served an unusable page. Escape hatch for [`FetchPages`]
    /// implementations outside this crate.
    ///
    /// [`FetchPages`]: crate::fetch::FetchPages
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The persistence collaborator rejected a batch. Escape hatch for
    /// [`ProductStore`] implementations outside this crate.
    ///
    /// [`ProductStore`]: crate::store::ProductStore
    #[error("persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
