//! Cryptographic primitives for password hashing.
//!
//! Provides salt generation, scrypt key derivation, and constant-time
//! comparison of derived keys.

pub mod kdf;
pub mod random;

pub use kdf::{KeyLength, ScryptCost, derive_key, derive_key_async};
pub use random::generate_salt;

use subtle::ConstantTimeEq;

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;

/// Compares two derived keys in constant time.
///
/// Running time depends only on the lengths of `a` and `b`, never on where
/// their contents first differ. Slices of different length compare unequal.
#[must_use]
#[inline]
pub fn keys_match(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
