//! Text encoding of hash records.
//!
//! A record is the hex-encoded salt and derived key joined by a single colon:
//!
//! ```text
//! <salt-hex>:<key-hex>
//! ```
//!
//! Encoding always emits lowercase hex. Decoding accepts either case.

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroizing;

use crate::crypto::{KeyLength, SALT_LEN};
use crate::error::Error;

/// Separator between the salt and key fields.
pub const SEPARATOR: char = ':';

// Longest fields worth decoding; anything larger cannot be a valid record.
const MAX_SALT_HEX_LEN: usize = 2 * SALT_LEN;
const MAX_KEY_HEX_LEN: usize = 2 * KeyLength::Bytes1024.bytes();

/// A decoded (salt, derived key) pair.
#[derive(Clone, PartialEq, Eq)]
pub struct HashRecord {
    salt: Vec<u8>,
    key: Zeroizing<Vec<u8>>,
}

impl HashRecord {
    pub fn new(salt: Vec<u8>, key: Vec<u8>) -> Self {
        Self {
            salt,
            key: Zeroizing::new(key),
        }
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The key length, if it is one of the supported sizes.
    pub fn key_length(&self) -> Option<KeyLength> {
        KeyLength::try_from(self.key.len()).ok()
    }
}

impl fmt::Debug for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRecord")
            .field("salt_len", &self.salt.len())
            .field("key_len", &self.key.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.salt, &self.key))
    }
}

impl FromStr for HashRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).ok_or(Error::MalformedRecord)
    }
}

/// Encodes a salt and key as `hex(salt):hex(key)`.
pub fn encode(salt: &[u8], key: &[u8]) -> String {
    let mut out = String::with_capacity(2 * (salt.len() + key.len()) + 1);
    out.push_str(&hex::encode(salt));
    out.push(SEPARATOR);
    out.push_str(&hex::encode(key));
    out
}

/// Parses a record produced by [`encode`].
///
/// Returns `None` unless the input has exactly one separator with a
/// non-empty, valid hex field on each side. Fields longer than a full salt
/// or the largest supported key are rejected before decoding.
pub fn decode(record: &str) -> Option<HashRecord> {
    let (salt_hex, key_hex) = record.split_once(SEPARATOR)?;

    if salt_hex.is_empty() || key_hex.is_empty() || key_hex.contains(SEPARATOR) {
        return None;
    }

    if salt_hex.len() > MAX_SALT_HEX_LEN || key_hex.len() > MAX_KEY_HEX_LEN {
        return None;
    }

    let salt = hex::decode(salt_hex).ok()?;
    let key = hex::decode(key_hex).ok()?;

    Some(HashRecord::new(salt, key))
}
