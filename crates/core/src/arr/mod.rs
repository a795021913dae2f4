//! Radarr/Sonarr ("Arr") catalog service integration.
//!
//! Only the two calls reconciliation needs are modelled: listing the full
//! catalog for a kind, and posting a command for one item.

mod client;
mod types;

pub use client::{ArrClient, REQUEST_TIMEOUT};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to a catalog service.
#[derive(Debug, Error)]
pub enum ArrError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Could not connect to the service.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or rejected API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Catalog service operations used by the reconciler.
#[async_trait]
pub trait ArrApi: Send + Sync {
    /// Fetch the complete catalog of `kind` in one response.
    async fn list_catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogItem>, ArrError>;

    /// Post a command for a single item.
    async fn send_command(&self, command: &ArrCommand) -> Result<CommandAck, ArrError>;
}
