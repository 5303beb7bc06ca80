//! Salted, memory-hard password hashing.
//!
//! `hash` turns a password into a self-contained record
//! (`<salt-hex>:<key-hex>`) using scrypt with a fresh random salt. `verify`
//! re-derives the key from a candidate password and compares it in constant
//! time. Every operation has a blocking form and an async form; records
//! produced by either verify under both.
//!
//! ```
//! let record = hashkeep::hash("correct horse").unwrap();
//!
//! assert!(hashkeep::verify(&record, "correct horse").unwrap());
//! assert!(!hashkeep::verify(&record, "battery staple").unwrap());
//! assert!(!hashkeep::verify("not a record", "correct horse").unwrap());
//! ```

pub mod crypto;
mod error;
pub mod format;

pub use crate::crypto::KeyLength;
pub use crate::error::{Error, Result};
pub use crate::format::HashRecord;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Hashes and verifies passwords with a configured derived key length.
///
/// Serializable so the key length can sit in an application's own config:
///
/// ```
/// # use hashkeep::{Hasher, KeyLength};
/// let hasher: Hasher = serde_json::from_str(r#"{ "key_length": 256 }"#).unwrap();
/// assert_eq!(hasher.key_length(), KeyLength::Bytes256);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hasher {
    #[serde(default)]
    key_length: KeyLength,
}

impl Hasher {
    pub fn new(key_length: KeyLength) -> Self {
        Self { key_length }
    }

    /// Like [`Hasher::new`], for a length given as a byte count.
    pub fn with_key_bytes(len: usize) -> Result<Self> {
        Ok(Self::new(KeyLength::try_from(len)?))
    }

    pub fn key_length(&self) -> KeyLength {
        self.key_length
    }

    /// Hashes `password` with a fresh salt, blocking for the whole derivation.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = crypto::generate_salt()?;
        let key = crypto::derive_key(password.as_bytes(), &salt, self.key_length)?;
        Ok(format::encode(&salt, &key))
    }

    /// Async form of [`Hasher::hash`]. Polling outside a tokio runtime fails
    /// with [`Error::Derivation`].
    pub async fn hash_async(&self, password: &str) -> Result<String> {
        let salt = crypto::generate_salt()?;
        let key = crypto::derive_key_async(password.as_bytes(), &salt, self.key_length).await?;
        Ok(format::encode(&salt, &key))
    }

    /// Checks `password` against a stored record.
    ///
    /// Malformed records, records whose salt is not [`crypto::SALT_LEN`]
    /// bytes, and records with an unsupported key length yield `Ok(false)`.
    /// Only a failure of the derivation itself is an error.
    ///
    /// The configured key length plays no part here: the record's own key
    /// length is used, so a hasher reconfigured to a new length keeps
    /// accepting the records it issued before. The method exists so one
    /// `Hasher` value can serve both directions; [`verify`] is equivalent.
    pub fn verify(&self, record: &str, password: &str) -> Result<bool> {
        let Some((stored, len)) = parse_for_verify(record) else {
            return Ok(false);
        };

        let derived = crypto::derive_key(password.as_bytes(), stored.salt(), len)?;
        Ok(crypto::keys_match(&derived, stored.key()))
    }

    /// Async form of [`Hasher::verify`]. Polling outside a tokio runtime
    /// fails with [`Error::Derivation`].
    pub async fn verify_async(&self, record: &str, password: &str) -> Result<bool> {
        let Some((stored, len)) = parse_for_verify(record) else {
            return Ok(false);
        };

        let derived = crypto::derive_key_async(password.as_bytes(), stored.salt(), len).await?;
        Ok(crypto::keys_match(&derived, stored.key()))
    }

    /// Whether `record` should be replaced by a fresh hash from this hasher.
    ///
    /// True for malformed records and for records whose key length differs
    /// from the configured one. Intended to be called after a successful
    /// [`Hasher::verify`], while the plaintext is still at hand.
    pub fn needs_rehash(&self, record: &str) -> bool {
        match format::decode(record) {
            Some(stored) => stored.key_length() != Some(self.key_length),
            None => true,
        }
    }
}

fn parse_for_verify(record: &str) -> Option<(HashRecord, KeyLength)> {
    let Some(stored) = format::decode(record) else {
        trace!("rejecting malformed hash record");
        return None;
    };

    if stored.salt().len() != crypto::SALT_LEN {
        trace!(
            salt_len = stored.salt().len(),
            "rejecting hash record with wrong salt length"
        );
        return None;
    }

    let Some(len) = stored.key_length() else {
        trace!(
            key_len = stored.key().len(),
            "rejecting hash record with unsupported key length"
        );
        return None;
    };

    Some((stored, len))
}

/// Hashes `password` with the default 64-byte key.
pub fn hash(password: &str) -> Result<String> {
    Hasher::default().hash(password)
}

/// Hashes `password` with a key of `key_len` bytes.
///
/// `key_len` must be one of 64, 128, 256, 512 or 1024; anything else fails
/// with [`Error::InvalidKeyLength`] before a salt is drawn.
pub fn hash_with_length(password: &str, key_len: usize) -> Result<String> {
    Hasher::with_key_bytes(key_len)?.hash(password)
}

pub async fn hash_async(password: &str) -> Result<String> {
    Hasher::default().hash_async(password).await
}

pub async fn hash_with_length_async(password: &str, key_len: usize) -> Result<String> {
    Hasher::with_key_bytes(key_len)?.hash_async(password).await
}

/// Checks `password` against a record produced by any of the hash functions.
pub fn verify(record: &str, password: &str) -> Result<bool> {
    Hasher::default().verify(record, password)
}

pub async fn verify_async(record: &str, password: &str) -> Result<bool> {
    Hasher::default().verify_async(record, password).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let record = hash("pw").unwrap();

        assert!(verify(&record, "pw").unwrap());
        assert!(!verify(&record, "wrong").unwrap());
    }

    #[test]
    fn record_shape() {
        let record = hash_with_length("pw", 256).unwrap();
        let (salt_hex, key_hex) = record.split_once(':').unwrap();

        assert_eq!(salt_hex.len(), 2 * crypto::SALT_LEN);
        assert_eq!(key_hex.len(), 2 * 256);
        assert!(
            record
                .chars()
                .all(|c| c == ':' || c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn invalid_key_length_is_rejected() {
        assert!(matches!(
            hash_with_length("pw", 100),
            Err(Error::InvalidKeyLength(100))
        ));
        assert!(Hasher::with_key_bytes(65).is_err());
    }

    #[test]
    fn verify_uses_length_from_record() {
        let record = Hasher::new(KeyLength::Bytes512).hash("pw").unwrap();

        // default hasher is configured for 64 bytes, record carries 512
        assert!(Hasher::default().verify(&record, "pw").unwrap());
    }

    #[test]
    fn unsupported_length_in_record_is_a_mismatch() {
        let salt = [1u8; 16];
        let key = crypto::derive_key(b"pw", &salt, KeyLength::Bytes64).unwrap();
        // truncate to a length outside the allow-list
        let forged = format::encode(&salt, &key[..48]);

        assert!(!verify(&forged, "pw").unwrap());
    }

    #[test]
    fn short_salt_in_record_is_a_mismatch() {
        let salt = [1u8; 1];
        let key = crypto::derive_key(b"pw", &salt, KeyLength::Bytes64).unwrap();
        let short = format::encode(&salt, &key);

        assert!(format::decode(&short).is_some());
        assert!(!verify(&short, "pw").unwrap());
    }

    #[test]
    fn tampered_key_is_rejected() {
        let record = hash("pw").unwrap();
        let mut bytes = record.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'0' { b'1' } else { b'0' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(!verify(&tampered, "pw").unwrap());
    }

    #[test]
    fn needs_rehash_tracks_key_length() {
        let hasher = Hasher::new(KeyLength::Bytes128);
        let short = hash("pw").unwrap();
        let current = hasher.hash("pw").unwrap();

        assert!(hasher.needs_rehash(&short));
        assert!(!hasher.needs_rehash(&current));
        assert!(hasher.needs_rehash("garbage"));
    }

    #[tokio::test]
    async fn async_roundtrip() {
        let record = hash_async("pw").await.unwrap();

        assert!(verify_async(&record, "pw").await.unwrap());
        assert!(!verify_async(&record, "pw ").await.unwrap());
        assert!(!verify_async("onlysalt", "pw").await.unwrap());
    }

    #[tokio::test]
    async fn async_invalid_key_length_is_rejected() {
        assert!(matches!(
            hash_with_length_async("pw", 100).await,
            Err(Error::InvalidKeyLength(100))
        ));
    }
}
