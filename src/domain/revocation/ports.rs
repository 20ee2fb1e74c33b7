//! Boundary between the checker and the network.

use async_trait::async_trait;
use thiserror::Error;

/// A list body as returned by the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedList {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedList {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),

    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

#[async_trait]
pub trait ListFetcher: Send + Sync + 'static {
    /// Issues a GET for `url`. Non-2xx responses are returned, not raised.
    async fn fetch(&self, url: &str) -> Result<FetchedList, FetchError>;
}
