//! NetBox client errors

use thiserror::Error;

/// Errors that can occur when interacting with the NetBox API
#[derive(Debug, Error)]
pub enum NetBoxError {
    /// Connection settings are missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The NetBox host name could not be resolved
    #[error("Unable to find address: {host}")]
    DnsResolution {
        /// Host that failed to resolve
        host: String,
    },

    /// The NetBox host refused or dropped the connection
    #[error("Unable to connect to NetBox host: {host}")]
    Connection {
        /// Host that could not be reached
        host: String,
    },

    /// The request did not complete within the configured timeout
    #[error("Connection to NetBox host {host} timed out")]
    Timeout {
        /// Host that timed out
        host: String,
    },

    /// Any other HTTP transport failure
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A read returned something other than 200 OK
    #[error("GET {path} failed: {status} - {body}")]
    UnexpectedStatus {
        /// Request path relative to the API root
        path: String,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// An address or prefix failed the local syntax check
    #[error("Invalid network {value}: {reason}")]
    InvalidNetwork {
        /// The rejected input
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// NetBox rejected a create request
    #[error("Unable to create {resource}: {message}")]
    Create {
        /// Resource family, e.g. "IP prefix"
        resource: &'static str,
        /// First validation message returned by NetBox
        message: String,
    },

    /// No record in the collection carries the requested natural key
    #[error("{resource} not found: {key}")]
    NotFound {
        /// Resource family, e.g. "vrf"
        resource: &'static str,
        /// Natural key that was looked up
        key: String,
    },

    /// NetBox did not answer a delete with 204 No Content
    #[error("Unable to delete {resource}: {key} (status {status})")]
    Delete {
        /// Resource family
        resource: &'static str,
        /// Natural key of the record
        key: String,
        /// HTTP status code returned by NetBox
        status: u16,
    },

    /// NetBox rejected an update request
    #[error("Unable to update {resource} {key}: {message}")]
    Update {
        /// Resource family
        resource: &'static str,
        /// Natural key of the record
        key: String,
        /// First validation message returned by NetBox
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NetBoxError {
    /// True for failures that happened before NetBox produced a response
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::DnsResolution { .. }
                | Self::Connection { .. }
                | Self::Timeout { .. }
                | Self::Transport(_)
        )
    }
}
