//! Core types, constants and the error enum for ctr_file.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// AES block size in bytes. Every AES key size shares it, so it is also the IV
/// and trailer length.
pub const BLOCK_SIZE: usize = 16;

/// Required key length for encryption (AES-256).
pub const ENCRYPT_KEY_LEN: usize = 32;

/// Default chunk size for streaming (1 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Upper bound on the streaming chunk size (16 MiB).
pub const MAX_CHUNK_SIZE: usize = 16 << 20;

/// Options for streaming encryption and decryption.
///
/// The chunk size only affects how many bytes are read and written per I/O
/// call; the produced file is identical for every valid chunk size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StreamOptions {
    /// Bytes per read. `0` selects [`DEFAULT_CHUNK_SIZE`]; otherwise it must be
    /// a multiple of [`BLOCK_SIZE`] no larger than [`MAX_CHUNK_SIZE`].
    pub chunk_size: usize,
    /// When `true`, file-level operations fsync the destination before returning.
    pub sync: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            sync: true,
        }
    }
}

impl StreamOptions {
    /// Set the chunk size in bytes (`0` selects the default).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Enable/disable fsync of file destinations before returning.
    pub fn with_sync(mut self, on: bool) -> Self {
        self.sync = on;
        self
    }

    /// Resolve the chunk size actually used for I/O, rejecting invalid values.
    pub fn effective_chunk_size(&self) -> Result<usize, CtrFileError> {
        match self.chunk_size {
            0 => Ok(DEFAULT_CHUNK_SIZE),
            n if n % BLOCK_SIZE != 0 => Err(CtrFileError::Invalid(
                "chunk_size must be a multiple of the cipher block size",
            )),
            n if n > MAX_CHUNK_SIZE => Err(CtrFileError::Invalid("chunk_size exceeds 16 MiB")),
            n => Ok(n),
        }
    }
}

/// Library error type (no panics for expected failures).
#[derive(Error, Debug)]
pub enum CtrFileError {
    #[error("invalid AES key: must be {expected} bytes but {actual} bytes found")]
    InvalidKey { expected: usize, actual: usize },
    #[error("cannot create cipher from a {key_len}-byte key (expected 16, 24 or 32 bytes)")]
    CipherInit { key_len: usize },
    #[error("failed to generate IV")]
    Randomness(#[source] getrandom::Error),
    #[error("I/O error: {context}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("encrypted input is {len} bytes, too small for a {needed}-byte IV trailer")]
    TrailerTooShort { len: u64, needed: usize },
    #[error("failed to read IV trailer")]
    TrailerRead(#[source] io::Error),
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
}

impl CtrFileError {
    /// Adapter for `map_err` that tags an I/O error with the failing step.
    pub(crate) fn io(context: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { context, source }
    }

    /// True for both ways a trailer can fail to be recovered.
    pub fn is_trailer_error(&self) -> bool {
        matches!(self, Self::TrailerTooShort { .. } | Self::TrailerRead(_))
    }
}

/// Size of the encrypted file produced for `plain_len` plaintext bytes.
pub fn encrypted_len(plain_len: u64) -> u64 {
    plain_len + BLOCK_SIZE as u64
}

/// Plaintext length carried by an encrypted file of `encrypted_len` bytes, or
/// `None` when the file cannot even hold the trailer.
pub fn plaintext_len(encrypted_len: u64) -> Option<u64> {
    encrypted_len.checked_sub(BLOCK_SIZE as u64)
}
