//! Encodes and decodes a whole [`StoreImage`] to and from pretty-printed JSON.
//!
//! The image only holds ordered maps and sets, so encoding an unchanged image always yields the
//! same bytes.
use crate::error::{ChirpyError, Result};
use crate::model::StoreImage;

/// serializes `image` into indented JSON bytes
pub fn encode(image: &StoreImage) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(image)
        .map_err(|e| ChirpyError::Malformed(format!("could not encode store image: {}", e)))
}

/// deserializes a [`StoreImage`] from `bytes`
///
/// A zero-length buffer is an empty store, not an error. A freshly created store file relies
/// on this.
///
/// # Errors
/// returns [`ChirpyError::Malformed`] if `bytes` are not a valid store image, or if a record
/// is filed under a key other than its own non-zero id
pub fn decode(bytes: &[u8]) -> Result<StoreImage> {
    if bytes.is_empty() {
        return Ok(StoreImage::default());
    }
    let image: StoreImage =
        serde_json::from_slice(bytes).map_err(|e| ChirpyError::Malformed(e.to_string()))?;
    check_keys("chirp", image.chirps.iter().map(|(key, chirp)| (*key, chirp.id)))?;
    check_keys("user", image.users.iter().map(|(key, user)| (*key, user.id)))?;
    Ok(image)
}

fn check_keys(kind: &str, entries: impl Iterator<Item = (u64, u64)>) -> Result<()> {
    for (key, id) in entries {
        if id == 0 || key != id {
            return Err(ChirpyError::Malformed(format!(
                "{} stored under key {} has id {}",
                kind, key, id
            )));
        }
    }
    Ok(())
}
