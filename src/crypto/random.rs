use super::SALT_LEN;
use crate::error::{Error, Result};
use getrandom::fill;

/// Draws a new salt from the OS random source. Never reuse one across records.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    fill(&mut salt).map_err(|e| Error::Random(e.to_string()))?;
    Ok(salt)
}
