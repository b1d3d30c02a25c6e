pub mod loader;

use crate::wordpress::types::Post;
use async_trait::async_trait;
use thiserror::Error;

/// One fetch unit from a paginated source. `has_more` reflects the source's
/// own total-page metadata; the loader applies its own empty-page policy on top.
#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub has_more: bool,
}

/// Errors a page fetch can surface. `NoMorePages` is the distinguished
/// past-the-end signal and is not treated as a fault by the loader.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server error ({0})")]
    Server(u16),
    #[error("malformed response: {0}")]
    Decoding(String),
    #[error("no more pages")]
    NoMorePages,
}

#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch one page of posts. Pages are 1-indexed.
    async fn fetch_page(&self, page: u32) -> Result<PostPage, FetchError>;
}
