//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` so the
//! image service and the MCP host surface agree on one failure contract.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration
//! - `Error::InvalidArgument`: Request rejected by the service before any network call
//! - `Error::Remote`: Provider answered with a non-success HTTP status
//! - `Error::Transport`: Provider could not be reached or returned an unreadable body
//! - `Error::Validation`: Host-side parameter schema violations
//! - `Error::Internal`: Local failures such as HTTP client setup

use thiserror::Error;

/// Fallback message used when a transport failure carries no description.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Unified error type for the common library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (invalid env values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The parameter object cannot be served as given.
    ///
    /// Displays the bare message so callers see e.g.
    /// `Blur value must be between 1 and 10`.
    #[error("{0}")]
    InvalidArgument(String),

    /// The provider returned a non-success status.
    #[error("Error fetching {operation}: Failed to fetch {operation}: {status} {status_text}")]
    Remote {
        /// Which provider call failed
        operation: RemoteOperation,
        /// HTTP status code returned by the provider
        status: u16,
        /// Canonical reason phrase for the status
        status_text: String,
    },

    /// The provider could not be reached, or its body could not be decoded.
    #[error("Error fetching {operation}: {message}")]
    Transport {
        /// Which provider call failed
        operation: RemoteOperation,
        /// Underlying failure description
        message: String,
    },

    /// Host-side parameter validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local failure unrelated to the request (client setup, serialization)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new invalid-argument error.
    ///
    /// # Example
    ///
    /// ```
    /// use picsum_mcp_common::error::Error;
    ///
    /// let err = Error::invalid_argument("Blur value must be between 1 and 10");
    /// assert_eq!(err.to_string(), "Blur value must be between 1 and 10");
    /// ```
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a new remote error from a provider status.
    ///
    /// # Example
    ///
    /// ```
    /// use picsum_mcp_common::error::{Error, RemoteOperation};
    ///
    /// let err = Error::remote(RemoteOperation::List, 404, "Not Found");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Error fetching image list: Failed to fetch image list: 404 Not Found"
    /// );
    /// ```
    pub fn remote(operation: RemoteOperation, status: u16, status_text: impl Into<String>) -> Self {
        Error::Remote {
            operation,
            status,
            status_text: status_text.into(),
        }
    }

    /// Create a new transport error.
    ///
    /// An empty message is replaced by [`UNKNOWN_ERROR`].
    ///
    /// # Example
    ///
    /// ```
    /// use picsum_mcp_common::error::{Error, RemoteOperation};
    ///
    /// let err = Error::transport(RemoteOperation::Info, "");
    /// assert_eq!(err.to_string(), "Error fetching image info: Unknown error");
    /// ```
    pub fn transport(operation: RemoteOperation, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        Error::Transport { operation, message }
    }

    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    /// Whether the failure was caused by the caller's parameters rather than
    /// by the provider or the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Error::InvalidArgument(_) | Error::Validation(_))
    }
}

/// Provider call type for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    /// `GET {api}/list`
    List,
    /// `GET {api}/images/{id}`
    Info,
    /// Binary fetch of a constructed image URL
    Fetch,
}

impl std::fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteOperation::List => write!(f, "image list"),
            RemoteOperation::Info => write!(f, "image info"),
            RemoteOperation::Fetch => write!(f, "image"),
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
