//! Error types for dynflare
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for dynflare operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dynflare
#[derive(Error, Debug)]
pub enum Error {
    /// A remote service could not be reached
    #[error("Network error ({service}): {message}")]
    Network {
        /// Service name ("ip-lookup", "cloudflare")
        service: String,
        /// Transport error message
        message: String,
    },

    /// A remote service answered with a non-2xx status
    #[error("Unexpected status from {service}: {status} - {message}")]
    UnexpectedStatus {
        /// Service name
        service: String,
        /// HTTP status code
        status: u16,
        /// Description, including any response body
        message: String,
    },

    /// A remote service answered with a body that could not be used
    #[error("Invalid response from {service}: {message}")]
    InvalidResponse {
        /// Service name
        service: String,
        /// What was wrong with the body
        message: String,
    },

    /// The provider responded, but flagged the request as failed (`success: false`)
    #[error("Provider {provider} rejected the request: {errors}")]
    ProviderRejected {
        /// Provider name
        provider: String,
        /// Provider-reported errors, joined for display
        errors: String,
    },

    /// No baseline has been written yet
    #[error("Baseline not found: {0}")]
    BaselineNotFound(String),

    /// The stored baseline could not be read or parsed
    #[error("Baseline unreadable: {0}")]
    BaselineCorrupt(String),

    /// The baseline could not be persisted
    #[error("Baseline write failed: {0}")]
    BaselineWrite(String),

    /// A record update failed part-way through the target list
    ///
    /// Records before the failing one were already applied and are not rolled back.
    #[error("Failed to update record {target} ({applied} record(s) already updated): {source}")]
    UpdateFailed {
        /// Name of the record whose update failed
        target: String,
        /// Number of records successfully updated before the failure
        applied: usize,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },

    /// Every record was updated but the new baseline could not be persisted
    ///
    /// DNS state and the baseline have diverged until the next successful pass.
    #[error(
        "DNS records now point at {ip} ({updated} updated) but the baseline could not be saved: {source}"
    )]
    BaselineDiverged {
        /// The IP applied to every record
        ip: String,
        /// Number of records updated
        updated: usize,
        /// Underlying store error
        #[source]
        source: Box<Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

}

impl Error {
    /// Create a network error
    pub fn network(service: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Create an unexpected-status error
    pub fn unexpected_status(
        service: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::UnexpectedStatus {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    /// Create an invalid-response error
    pub fn invalid_response(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a provider-rejected error
    pub fn provider_rejected(provider: impl Into<String>, errors: impl Into<String>) -> Self {
        Self::ProviderRejected {
            provider: provider.into(),
            errors: errors.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a baseline write error
    pub fn baseline_write(msg: impl Into<String>) -> Self {
        Self::BaselineWrite(msg.into())
    }

    /// Whether the error came from talking to a remote service
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::UnexpectedStatus { .. } | Self::InvalidResponse { .. }
        )
    }
}
