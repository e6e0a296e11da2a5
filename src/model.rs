use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

/// A short text post owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    /// the chirp id, unique among chirps
    pub id: u64,
    /// the (already masked) text of the chirp
    pub body: String,
    /// id of the user that posted the chirp
    #[serde(default)]
    pub author_id: u64,
}

/// A registered user, as persisted in the store
///
/// `password` holds an opaque password hash and must never be handed to API clients,
/// use [`PublicUser`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// the user id, unique among users
    pub id: u64,
    /// the user's email, unique among users
    pub email: String,
    /// opaque password hash
    pub password: String,
    /// set once the billing provider reports an upgrade
    #[serde(default)]
    pub is_chirpy_red: bool,
}

/// The client-facing view of a [`User`], without the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// the user id
    pub id: u64,
    /// the user's email
    pub email: String,
    /// premium account status
    pub is_chirpy_red: bool,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// the largest ids ever handed out, per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastIds {
    /// high-water mark of chirp ids
    #[serde(default)]
    pub chirps: u64,
    /// high-water mark of user ids
    #[serde(default)]
    pub users: u64,
}

/// The complete snapshot of everything held in the store file.
///
/// Every store operation loads one of these, applies a single change and writes it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreImage {
    /// chirps keyed by id
    #[serde(default, deserialize_with = "null_as_default")]
    pub chirps: BTreeMap<u64, Chirp>,
    /// users keyed by id
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: BTreeMap<u64, User>,
    /// refresh tokens that must no longer be honored
    #[serde(default, deserialize_with = "null_as_default")]
    pub revoke_tokens: BTreeSet<String>,
    /// id high-water marks
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_ids: LastIds,
}

impl StoreImage {
    /// returns the user with the given `email`, if any
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|user| user.email == email)
    }
}

// files written before any record existed hold `null` for the empty collections
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
