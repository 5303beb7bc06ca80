use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The requested key length is not one of the supported sizes.
    #[error("unsupported key length: {0} bytes (expected one of 64, 128, 256, 512, 1024)")]
    InvalidKeyLength(usize),

    /// The key derivation function rejected its input or did not complete.
    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("OS random generator unavailable: {0}")]
    Random(String),

    /// Only reported by `HashRecord::from_str`; verification treats this as a mismatch.
    #[error("malformed hash record")]
    MalformedRecord,
}

pub type Result<T> = std::result::Result<T, Error>;
