use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// type alias for all operations on a [`RecordStore`] or [`ChirpService`] that could fail
/// with a [`ChirpyError`]
///
/// [`RecordStore`]: ./struct.RecordStore.html
/// [`ChirpService`]: ./struct.ChirpService.html
pub type Result<T> = std::result::Result<T, ChirpyError>;

/// The error variants returned by the record store and the layers above it.
///
/// `Init`, `Io` and `Malformed` are server-side failures. `NotFound` and `Conflict` are the
/// expected, client-visible outcomes of lookups and inserts, and callers should branch on them
/// (see [`ChirpyError::is_not_found`]) rather than treating every error alike.
#[derive(Debug, Error)]
pub enum ChirpyError {
    /// the backing store file could not be created or opened at start-up
    #[error("could not initialize store file {path:?}: {source}")]
    Init {
        /// the resolved path of the store file
        path: PathBuf,
        /// the underlying io error
        #[source]
        source: io::Error,
    },

    /// a read or write against the store file failed after start-up
    #[error("io error on store file {path:?}: {source}")]
    Io {
        /// the resolved path of the store file
        path: PathBuf,
        /// the underlying io error
        #[source]
        source: io::Error,
    },

    /// the contents of the store file could not be decoded
    #[error("malformed store: {0}")]
    Malformed(String),

    /// a chirp or user was not found, or the chirp collection is empty
    #[error("{0}")]
    NotFound(String),

    /// a user with the same email already exists
    #[error("{0}")]
    Conflict(String),

    /// a chirp body failed validation
    #[error("invalid chirp: {0}")]
    InvalidChirp(String),

    /// the caller is not allowed to act on the record
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// the caller presented a revoked token or a bad api key
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// a command line argument could not be parsed
    #[error("parsing error: {0}")]
    Parsing(String),

    /// a worker pool could not be started
    #[error("worker pool error: {0}")]
    Pool(String),
}

impl ChirpyError {
    /// returns `true` if this error is a [`ChirpyError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChirpyError::NotFound(_))
    }

    /// returns `true` if this error is a [`ChirpyError::Conflict`]
    pub fn is_conflict(&self) -> bool {
        matches!(self, ChirpyError::Conflict(_))
    }
}
