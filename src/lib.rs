#![deny(missing_docs)]
//! A file-backed record store for a small social-posting service ("chirpy"), holding short text
//! posts ([`Chirp`]s), user accounts ([`User`]s) and revoked refresh tokens.
//!
//! This crate provides the [`RecordStore`] itself, the [`ChirpService`] rules that request
//! handlers apply around it, worker [`thread_pool`]s to drive it concurrently, and a `chirpy`
//! executable for administering a store file from the command line.
//!
//! ## Supported Storage Operations
//! The operations are described by the [`ChirpEngine`] trait:
//!
//! - chirps: create, list, get by id, delete
//! - users: create, get by email, get by id, update email/password, upgrade to Chirpy Red
//! - revoked tokens: add, check membership
//!
//! ## RecordStore
//! [`RecordStore`] implements [`ChirpEngine`] on top of a single JSON file. It is responsible for
//! the following tasks:
//! - guarding the file with one reader-writer lock shared by every clone of the store
//! - running every operation as a whole-file load, one change, whole-file save cycle
//! - handing out chirp and user ids that are never reused, even after deletions
//!
//! There is no in-memory cache, every operation sees the file as the previous operation left it.
//!
//! ## Store File
//! The store lives in a file named `database.json`, either in the process working directory or in
//! the directory given by [`StoreConfig`]. The file is created empty on first start; an empty file
//! is a valid, empty store. Its contents are pretty-printed JSON:
//!
//! ```text
//! {
//!   "chirps": { "1": { "id": 1, "body": "hello", "author_id": 1 } },
//!   "users": { "1": { "id": 1, "email": "a@x.com", "password": "<hash>", "is_chirpy_red": false } },
//!   "revoke_tokens": [ "<token>" ],
//!   "last_ids": { "chirps": 1, "users": 1 }
//! }
//! ```
//!
//! Writes replace the file in place without fsync, so a crash mid-write can corrupt it.
//!
//! ### Command line
//! The `chirpy` executable opens the store file and runs any operation against it, printing
//! results as JSON. See `chirpy --help`.

pub use config::{StoreConfig, DEFAULT_STORE_FILE};
pub use engine::{ChirpEngine, RecordStore, StoreFile};
pub use error::{ChirpyError, Result};
pub use model::{Chirp, LastIds, PublicUser, StoreImage, User};
pub use service::{
    clean_body, ChirpService, ServiceConfig, SortOrder, WebhookData, WebhookEvent, MAX_CHIRP_LEN,
    USER_UPGRADED_EVENT,
};
pub use thread_pool::{RayonThreadPool, SharedQueueThreadPool, ThreadPool};

mod config;
pub mod engine;
mod error;
mod model;
mod service;
pub mod thread_pool;
