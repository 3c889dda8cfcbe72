//! HTTP remote
//!
//! `reqwest` client against a JSON collection endpoint: GET the full
//! collection, POST individual quotes. Rustls-only, no OpenSSL.

use std::time::Duration;

use reqwest::Client;

use super::{RemoteError, RemoteQuotes};
use crate::quote::Quote;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote collaborator speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    endpoint: String,
}

impl HttpRemote {
    /// Create a remote for `endpoint` (the collection URL, used for both GET
    /// and POST).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Override the shared client (custom timeouts, proxies)
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl RemoteQuotes for HttpRemote {
    async fn fetch_collection(&self) -> Result<Vec<Quote>, RemoteError> {
        let response = self
            .client
            .get(&self.endpoint)
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<Quote>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn post_quote(&self, quote: &Quote) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(quote)
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
