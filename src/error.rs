//! Error types for request planning
//!
//! Planning a request chain is infallible on its own; the only fault boundary
//! is the capability lookup delegated to a [`CapabilitiesProvider`].
//!
//! [`CapabilitiesProvider`]: crate::indexer::CapabilitiesProvider

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    /// The provider could not obtain capabilities (network, timeout, ...)
    #[error("capabilities unavailable for {indexer}: {reason}")]
    CapabilitiesUnavailable { indexer: String, reason: String },

    /// The caps document could not be read
    #[error("invalid capabilities document: {0}")]
    InvalidCapabilities(String),
}

impl IndexerError {
    pub fn unavailable(indexer: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::CapabilitiesUnavailable {
            indexer: indexer.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexerError>;
