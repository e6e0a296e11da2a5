//! This module provides the record storage engine: the [`ChirpEngine`] trait describing the
//! operations available to request handlers, and [`RecordStore`], its single-file
//! implementation.
//!
//! The store is layered as:
//! - [`codec`]: whole image to/from JSON bytes
//! - [`StoreFile`]: whole-file read and replace
//! - id allocation for chirps and users
//! - [`RecordStore`]: the lock and the load-mutate-save cycle
use crate::model::{Chirp, User};
use crate::Result;

/// A trait for the operations a record storage engine offers to its callers.
///
/// Every call is synchronous and atomic with respect to every other call on the same engine,
/// including calls made through clones of it.
pub trait ChirpEngine: Clone + Send + 'static {
    /// creates a chirp with the next free chirp id
    fn create_chirp(&self, body: String, author_id: u64) -> Result<Chirp>;

    /// returns every chirp, ordered by ascending id
    ///
    /// # Errors
    ///
    /// Returns `ChirpyError::NotFound` if no chirps exist. Callers should read that as an empty
    /// result.
    fn list_chirps(&self) -> Result<Vec<Chirp>>;

    /// returns the chirp with the given `id`
    ///
    /// # Errors
    ///
    /// Returns `ChirpyError::NotFound` if the chirp does not exist.
    fn get_chirp(&self, id: u64) -> Result<Chirp>;

    /// deletes the chirp with the given `id`. No authorization is performed here.
    ///
    /// # Errors
    ///
    /// Returns `ChirpyError::NotFound` if the chirp does not exist.
    fn delete_chirp(&self, id: u64) -> Result<()>;

    /// creates a user with the next free user id
    ///
    /// # Errors
    ///
    /// Returns `ChirpyError::Conflict` if a user with the same `email` already exists.
    fn create_user(&self, email: String, password_hash: String) -> Result<User>;

    /// returns the user registered under `email`
    fn get_user_by_email(&self, email: &str) -> Result<User>;

    /// returns the user with the given `id`
    fn get_user_by_id(&self, id: u64) -> Result<User>;

    /// replaces the email and password hash of an existing user
    ///
    /// # Errors
    ///
    /// Returns `ChirpyError::NotFound` if the user does not exist, or `ChirpyError::Conflict` if
    /// a different user already holds `email`.
    fn update_user(&self, id: u64, email: String, password_hash: String) -> Result<User>;

    /// marks the user as a Chirpy Red member
    fn upgrade_user(&self, id: u64) -> Result<User>;

    /// adds `token` to the set of revoked tokens. Adding it again has no effect.
    fn add_revoked_token(&self, token: String) -> Result<()>;

    /// returns `true` if `token` has been revoked
    fn is_token_revoked(&self, token: &str) -> Result<bool>;
}

pub mod codec;
mod file;
mod ids;
mod store;

pub use self::file::StoreFile;
pub use self::store::RecordStore;
