//! Error types for the catalog subsystem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body returned by the catalog endpoints on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
    /// RFC 3339 / ISO-8601 time the error was produced
    pub timestamp: String,
}

/// Errors that can occur while reading the course catalog.
#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    /// The backing store could not be reached or the query failed
    #[error("Database error: {message}")]
    Database { message: String },

    /// A stored or received course document could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Network/HTTP request to the catalog endpoint failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// The catalog endpoint answered with an error body
    #[error("Catalog service error ({status}): {message}: {details} at {timestamp}")]
    Service {
        status: u16,
        message: String,
        details: String,
        timestamp: String,
    },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    UrlError { message: String },

    /// Reading a seed file failed
    #[error("IO error: {message}")]
    Io { message: String },

    /// Every retry attempt failed
    #[error("Catalog unavailable after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

impl CatalogError {
    /// Returns true if this error is potentially transient and retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::Database { .. } | CatalogError::Network { .. }
        )
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Database {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode {
                message: err.to_string(),
            }
        } else {
            CatalogError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::UrlError {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io {
            message: err.to_string(),
        }
    }
}
