//! Error taxonomy for molt
//!
//! Configuration, remote, transport, and local-state failures each get
//! their own variant so the command layer can decide what is fatal.

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum MoltError {
    /// Neither config.json nor the environment supplies an API key
    #[error("No API key. Run 'molt auth <key>' or set MOLTBOOK_API_KEY")]
    NoApiKey,

    /// The API key cannot be sent as an HTTP header value
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,

    /// config.json exists but does not decode as a config object
    #[error("Config file '{path}' is corrupt: {details}")]
    ConfigCorrupt { path: PathBuf, details: String },

    /// The server answered with a non-success status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The server could not be reached or did not answer in time
    #[error("Connection error: {0}")]
    Connection(String),

    /// A 2xx response whose body reports `success: false`
    #[error("Failed: {0}")]
    Rejected(String),

    /// A success response whose body is not the expected JSON
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Draft not found: {0}")]
    DraftNotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, MoltError>;
