use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::engine::ChirpEngine;
use crate::error::{ChirpyError, Result};
use crate::model::{Chirp, PublicUser};

/// the longest chirp body accepted, in characters, after masking
pub const MAX_CHIRP_LEN: usize = 140;

/// the billing provider event that grants Chirpy Red
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

/// Settings the service needs beyond the store itself.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// api key the billing provider must present on webhook calls
    pub webhook_api_key: String,
}

/// Ordering of chirp listings, by chirp id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// lowest id first
    #[default]
    Asc,
    /// highest id first
    Desc,
}

impl FromStr for SortOrder {
    type Err = ChirpyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ChirpyError::Parsing(format!(
                "unknown sort order {:?}, expected asc or desc",
                other
            ))),
        }
    }
}

/// A webhook call from the billing provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// event name, e.g. `user.upgraded`
    pub event: String,
    /// event payload
    pub data: WebhookData,
}

/// Payload of a [`WebhookEvent`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookData {
    /// the user the event refers to
    pub user_id: u64,
}

/// `ChirpService` holds the rules request handlers apply around a [`ChirpEngine`]: chirp
/// validation and masking, author-only deletion, listing order, refresh-token checks and the
/// billing webhook.
///
/// Token signing and password hashing happen before the service is called; it only ever sees
/// already verified user ids and already hashed passwords.
#[derive(Debug, Clone)]
pub struct ChirpService<E: ChirpEngine> {
    engine: E,
    config: ServiceConfig,
}

impl<E: ChirpEngine> ChirpService<E> {
    /// Create a new `ChirpService` over the given [`ChirpEngine`].
    pub fn new(engine: E, config: ServiceConfig) -> Self {
        ChirpService { engine, config }
    }

    /// the underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// masks profane words in `body` and posts it as a chirp by `author_id`
    ///
    /// # Errors
    /// returns [`ChirpyError::InvalidChirp`] if the masked body is longer than
    /// [`MAX_CHIRP_LEN`] characters
    #[instrument(skip(self, body))]
    pub fn post_chirp(&self, author_id: u64, body: &str) -> Result<Chirp> {
        let cleaned = clean_body(body);
        let len = cleaned.chars().count();
        if len > MAX_CHIRP_LEN {
            return Err(ChirpyError::InvalidChirp(format!(
                "chirp is too long: {} characters, the limit is {}",
                len, MAX_CHIRP_LEN
            )));
        }
        self.engine.create_chirp(cleaned, author_id)
    }

    /// lists chirps in the given `sort` order, optionally only those by `author`.
    /// An empty store lists as an empty vector.
    #[instrument(skip(self))]
    pub fn chirps(&self, author: Option<u64>, sort: SortOrder) -> Result<Vec<Chirp>> {
        let mut chirps = match self.engine.list_chirps() {
            Ok(chirps) => chirps,
            Err(e) if e.is_not_found() => vec![],
            Err(e) => return Err(e),
        };
        if let Some(author_id) = author {
            chirps.retain(|chirp| chirp.author_id == author_id);
        }
        match sort {
            SortOrder::Asc => chirps.sort_by_key(|chirp| chirp.id),
            SortOrder::Desc => chirps.sort_by(|a, b| b.id.cmp(&a.id)),
        }
        Ok(chirps)
    }

    /// returns a single chirp
    pub fn chirp(&self, id: u64) -> Result<Chirp> {
        self.engine.get_chirp(id)
    }

    /// deletes chirp `chirp_id` on behalf of `requester_id`, who must be its author
    ///
    /// # Errors
    /// returns [`ChirpyError::NotFound`] if the chirp does not exist, or
    /// [`ChirpyError::Forbidden`] if `requester_id` did not write it
    #[instrument(skip(self))]
    pub fn delete_chirp(&self, requester_id: u64, chirp_id: u64) -> Result<()> {
        let chirp = self.engine.get_chirp(chirp_id)?;
        if chirp.author_id != requester_id {
            return Err(ChirpyError::Forbidden(format!(
                "user {} is not the author of chirp {}",
                requester_id, chirp_id
            )));
        }
        self.engine.delete_chirp(chirp_id)
    }

    /// registers a new user
    pub fn register(&self, email: &str, password_hash: &str) -> Result<PublicUser> {
        self.engine
            .create_user(email.to_string(), password_hash.to_string())
            .map(PublicUser::from)
    }

    /// replaces the email and password hash of `user_id`
    pub fn update_account(
        &self,
        user_id: u64,
        email: &str,
        password_hash: &str,
    ) -> Result<PublicUser> {
        self.engine
            .update_user(user_id, email.to_string(), password_hash.to_string())
            .map(PublicUser::from)
    }

    /// revokes a refresh token so that it can no longer be exchanged for access tokens
    pub fn revoke_refresh_token(&self, token: &str) -> Result<()> {
        self.engine.add_revoked_token(token.to_string())
    }

    /// checks that a refresh token has not been revoked
    ///
    /// # Errors
    /// returns [`ChirpyError::Unauthorized`] if the token was revoked
    pub fn check_refresh_token(&self, token: &str) -> Result<()> {
        if self.engine.is_token_revoked(token)? {
            return Err(ChirpyError::Unauthorized("token is revoked".to_string()));
        }
        Ok(())
    }

    /// handles a billing provider webhook call
    ///
    /// Events other than [`USER_UPGRADED_EVENT`] are acknowledged and ignored.
    ///
    /// # Errors
    /// returns [`ChirpyError::Unauthorized`] if `api_key` does not match the configured key, and
    /// [`ChirpyError::NotFound`] if the user to upgrade does not exist
    #[instrument(skip(self, api_key))]
    pub fn handle_webhook(&self, api_key: &str, event: &WebhookEvent) -> Result<()> {
        if api_key != self.config.webhook_api_key {
            return Err(ChirpyError::Unauthorized("invalid api key".to_string()));
        }
        if event.event != USER_UPGRADED_EVENT {
            debug!(event = %event.event, "ignoring webhook event");
            return Ok(());
        }
        self.engine.upgrade_user(event.data.user_id)?;
        Ok(())
    }
}

/// replaces every profane word in `body` with `****`.
///
/// Words are matched case-insensitively and whitespace between words collapses to a single space.
pub fn clean_body(body: &str) -> String {
    body.split_whitespace()
        .map(|word| {
            if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
