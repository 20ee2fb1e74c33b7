use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::config::FetchConfig;
use crate::domain::revocation::{FetchError, FetchedList, ListFetcher};

/// Accept header sent with every list request
pub const LIST_ACCEPT: &str =
    "application/json, application/x-x509-crl, application/pkix-crl, text/plain, */*";

/// Fetches revocation lists over HTTP(S) with reqwest
#[derive(Debug, Clone)]
pub struct HttpListFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpListFetcher {
    /// Returns an error if the HTTP client cannot be initialized
    pub fn new(service_name: &str, config: &FetchConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(format!(
            "{service_name}/{}",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            max_body_bytes: config.max_body_bytes,
        })
    }

    fn too_large(&self) -> FetchError {
        FetchError::TooLarge {
            limit: self.max_body_bytes,
        }
    }
}

#[async_trait]
impl ListFetcher for HttpListFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedList, FetchError> {
        debug!("Fetching revocation list from: {}", url);

        let mut response = self
            .client
            .get(url)
            .header(ACCEPT, LIST_ACCEPT)
            .send()
            .await?;

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(self.too_large());
        }

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        debug!(status, bytes = body.len(), "Fetched revocation list");
        Ok(FetchedList {
            status,
            content_type,
            body,
        })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Transport(error.to_string())
    }
}
