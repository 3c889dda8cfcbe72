//! Remote collaborators
//!
//! The endpoint and encoding are opaque to the core: it only asks for the
//! current remote collection and offers newly created quotes back. Transport
//! failures are ordinary error values here; the sync scheduler is the layer
//! that guarantees they never propagate further.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpRemote;

use crate::quote::Quote;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Transport error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Request-level failure (connect, timeout, TLS)
    #[cfg(feature = "http")]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The remote answered outside 2xx
    #[error("remote returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },
    /// The response body was not a quote collection
    #[error("remote payload was undecodable: {0}")]
    Decode(String),
    /// Catch-all for non-HTTP remotes (and test doubles)
    #[error("remote unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// REMOTE TRAIT
// ============================================================================

/// The network collaborator the sync scheduler talks to.
///
/// Implementations decide transport and encoding; the scheduler only sees
/// quote collections and [`RemoteError`]s.
#[allow(async_fn_in_trait)] // callers spawn with concrete types, never dyn
pub trait RemoteQuotes: Send + Sync {
    /// Fetch the remote collection
    async fn fetch_collection(&self) -> Result<Vec<Quote>, RemoteError>;

    /// Offer one locally created quote to the remote
    async fn post_quote(&self, quote: &Quote) -> Result<(), RemoteError>;
}
