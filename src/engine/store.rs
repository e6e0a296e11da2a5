use std::path::PathBuf;
use std::sync::Arc;

use clap::crate_version;
use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use super::codec;
use super::ids;
use super::{ChirpEngine, StoreFile};
use crate::config::StoreConfig;
use crate::error::{ChirpyError, Result};
use crate::model::{Chirp, StoreImage, User};

/// The primary struct for working with the chirpy record store.
///
/// All chirps, users and revoked tokens live in one JSON file. Every operation locks the file,
/// reads and decodes the whole [`StoreImage`], applies one change, and (for mutations) encodes
/// and writes the whole image back before unlocking. Nothing is cached between calls.
///
/// Cloning a `RecordStore` is cheap. Clones share the same lock, which is how the store is
/// handed to worker threads.
#[derive(Debug, Clone)]
pub struct RecordStore {
    file: Arc<RwLock<StoreFile>>,
}

impl RecordStore {
    /// opens the store file described by `config`, creating an empty one if it does not exist
    ///
    /// # Errors
    /// returns [`ChirpyError::Init`] if the store file could not be created
    #[instrument]
    pub fn open(config: &StoreConfig) -> Result<RecordStore> {
        info!("opening chirpy record store version {}", crate_version!());
        let file = StoreFile::ensure_exists(&config.path())?;
        Ok(RecordStore::with_file(file))
    }

    /// builds a store around an already initialized [`StoreFile`]
    pub fn with_file(file: StoreFile) -> RecordStore {
        RecordStore {
            file: Arc::new(RwLock::new(file)),
        }
    }

    /// the path of the backing store file
    pub fn path(&self) -> PathBuf {
        self.file.read().path().to_path_buf()
    }

    /// loads the image and runs `f` against it without writing anything back
    fn view<T>(&self, f: impl FnOnce(&StoreImage) -> Result<T>) -> Result<T> {
        // reads take the exclusive lock too, no two operations ever overlap on the file
        let file = self.file.write();
        let image = codec::decode(&file.read_all()?)?;
        f(&image)
    }

    /// loads the image, runs `f` against it and persists the result if `f` succeeded
    fn update<T>(&self, f: impl FnOnce(&mut StoreImage) -> Result<T>) -> Result<T> {
        let file = self.file.write();
        let mut image = codec::decode(&file.read_all()?)?;
        let out = f(&mut image)?;
        file.write_all(&codec::encode(&image)?)?;
        Ok(out)
    }
}

impl ChirpEngine for RecordStore {
    #[instrument(skip(self, body))]
    fn create_chirp(&self, body: String, author_id: u64) -> Result<Chirp> {
        let chirp = self.update(|image| {
            let id = ids::allocate(&image.chirps, &mut image.last_ids.chirps)?;
            let chirp = Chirp {
                id,
                body,
                author_id,
            };
            image.chirps.insert(id, chirp.clone());
            Ok(chirp)
        })?;
        debug!(id = chirp.id, "created chirp");
        Ok(chirp)
    }

    #[instrument(skip(self))]
    fn list_chirps(&self) -> Result<Vec<Chirp>> {
        self.view(|image| {
            if image.chirps.is_empty() {
                return Err(ChirpyError::NotFound("no chirps present".to_string()));
            }
            Ok(image.chirps.values().cloned().collect())
        })
    }

    #[instrument(skip(self))]
    fn get_chirp(&self, id: u64) -> Result<Chirp> {
        self.view(|image| {
            image
                .chirps
                .get(&id)
                .cloned()
                .ok_or_else(|| chirp_not_found(id))
        })
    }

    #[instrument(skip(self))]
    fn delete_chirp(&self, id: u64) -> Result<()> {
        self.update(|image| match image.chirps.remove(&id) {
            Some(_) => Ok(()),
            None => Err(chirp_not_found(id)),
        })?;
        debug!(id, "deleted chirp");
        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    fn create_user(&self, email: String, password_hash: String) -> Result<User> {
        let user = self.update(|image| {
            if image.user_by_email(&email).is_some() {
                return Err(ChirpyError::Conflict("user already exists".to_string()));
            }
            let id = ids::allocate(&image.users, &mut image.last_ids.users)?;
            let user = User {
                id,
                email,
                password: password_hash,
                is_chirpy_red: false,
            };
            image.users.insert(id, user.clone());
            Ok(user)
        })?;
        debug!(id = user.id, "created user");
        Ok(user)
    }

    #[instrument(skip(self))]
    fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.view(|image| {
            image
                .user_by_email(email)
                .cloned()
                .ok_or_else(|| ChirpyError::NotFound("user not found".to_string()))
        })
    }

    #[instrument(skip(self))]
    fn get_user_by_id(&self, id: u64) -> Result<User> {
        self.view(|image| image.users.get(&id).cloned().ok_or_else(user_not_found))
    }

    #[instrument(skip(self, password_hash))]
    fn update_user(&self, id: u64, email: String, password_hash: String) -> Result<User> {
        self.update(|image| {
            if !image.users.contains_key(&id) {
                return Err(user_not_found());
            }
            if image.user_by_email(&email).map_or(false, |other| other.id != id) {
                return Err(ChirpyError::Conflict("email already in use".to_string()));
            }
            let user = image.users.get_mut(&id).ok_or_else(user_not_found)?;
            user.email = email;
            user.password = password_hash;
            Ok(user.clone())
        })
    }

    #[instrument(skip(self))]
    fn upgrade_user(&self, id: u64) -> Result<User> {
        self.update(|image| {
            let user = image.users.get_mut(&id).ok_or_else(user_not_found)?;
            user.is_chirpy_red = true;
            Ok(user.clone())
        })
    }

    #[instrument(skip(self, token))]
    fn add_revoked_token(&self, token: String) -> Result<()> {
        let added = self.update(|image| Ok(image.revoke_tokens.insert(token)))?;
        debug!(added, "revoked token");
        Ok(())
    }

    #[instrument(skip(self, token))]
    fn is_token_revoked(&self, token: &str) -> Result<bool> {
        self.view(|image| Ok(image.revoke_tokens.contains(token)))
    }
}

fn chirp_not_found(id: u64) -> ChirpyError {
    ChirpyError::NotFound(format!("chirp {} not found", id))
}

fn user_not_found() -> ChirpyError {
    ChirpyError::NotFound("user not found".to_string())
}
