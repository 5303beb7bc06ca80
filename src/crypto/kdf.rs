use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Supported derived key sizes.
///
/// Stored records are checked against this list before any derivation work is
/// done, so a forged record cannot pick its own output length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum KeyLength {
    #[default]
    Bytes64,
    Bytes128,
    Bytes256,
    Bytes512,
    Bytes1024,
}

impl KeyLength {
    pub const ALL: [KeyLength; 5] = [
        KeyLength::Bytes64,
        KeyLength::Bytes128,
        KeyLength::Bytes256,
        KeyLength::Bytes512,
        KeyLength::Bytes1024,
    ];

    /// Number of bytes in a key of this length.
    pub const fn bytes(self) -> usize {
        match self {
            KeyLength::Bytes64 => 64,
            KeyLength::Bytes128 => 128,
            KeyLength::Bytes256 => 256,
            KeyLength::Bytes512 => 512,
            KeyLength::Bytes1024 => 1024,
        }
    }
}

impl TryFrom<usize> for KeyLength {
    type Error = Error;

    fn try_from(len: usize) -> Result<Self> {
        KeyLength::ALL
            .into_iter()
            .find(|l| l.bytes() == len)
            .ok_or(Error::InvalidKeyLength(len))
    }
}

impl From<KeyLength> for usize {
    fn from(len: KeyLength) -> usize {
        len.bytes()
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes())
    }
}

/// Scrypt cost parameters.
///
/// These are fixed for the crate: every record is produced and verified with
/// the same cost, so records carry only salt and key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptCost {
    log_n: u8,
    r: u32,
    p: u32,
}

impl ScryptCost {
    /// N = 2^14, r = 8, p = 1 (about 16 MiB per derivation).
    pub const CURRENT: Self = Self {
        log_n: 14,
        r: 8,
        p: 1,
    };

    pub fn log_n(&self) -> u8 {
        self.log_n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    fn params(&self) -> Result<scrypt::Params> {
        scrypt::Params::new(self.log_n, self.r, self.p)
            .map_err(|e| Error::Derivation(format!("invalid scrypt parameters: {e}")))
    }
}

/// Derive a key of `len` bytes from `password` and `salt`.
///
/// Blocks the calling thread for the full scrypt run. The output is
/// deterministic for a given (password, salt, len).
pub fn derive_key(password: &[u8], salt: &[u8], len: KeyLength) -> Result<Zeroizing<Vec<u8>>> {
    if salt.is_empty() {
        return Err(Error::Derivation("salt must not be empty".into()));
    }

    let params = ScryptCost::CURRENT.params()?;

    let mut key = Zeroizing::new(vec![0u8; len.bytes()]);
    scrypt::scrypt(password, salt, &params, &mut key)
        .map_err(|e| Error::Derivation(format!("scrypt failed: {e}")))?;

    debug!(key_len = len.bytes(), "derived key");
    Ok(key)
}

/// Same as [`derive_key`], but runs on tokio's blocking pool.
///
/// The caller is suspended while scrypt runs; no runtime worker thread is
/// held. There is no cancellation: dropping the future leaves the
/// derivation running to completion in the background. Polling outside a
/// tokio runtime fails with [`Error::Derivation`].
pub async fn derive_key_async(
    password: &[u8],
    salt: &[u8],
    len: KeyLength,
) -> Result<Zeroizing<Vec<u8>>> {
    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|e| Error::Derivation(format!("no async runtime: {e}")))?;

    let password = Zeroizing::new(password.to_vec());
    let salt = salt.to_vec();

    runtime
        .spawn_blocking(move || derive_key(&password, &salt, len))
        .await
        .map_err(|e| Error::Derivation(format!("derivation task did not complete: {e}")))?
}
