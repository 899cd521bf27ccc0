//! Key checks, IV generation and the AES-CTR keystream.

use aes::cipher::BlockSizeUser;
use aes::{Aes128, Aes192, Aes256};
use ctr::Ctr128BE;
use ctr::cipher::{InvalidLength, KeyIvInit, StreamCipher, StreamCipherSeek};
use getrandom::fill as getrandom;

use crate::types::{CtrFileError, ENCRYPT_KEY_LEN};

type Aes128Ctr = Ctr128BE<Aes128>;
type Aes192Ctr = Ctr128BE<Aes192>;
type Aes256Ctr = Ctr128BE<Aes256>;

/// Reject any encryption key that is not exactly 32 bytes (AES-256).
pub fn validate_encrypt_key(key: &[u8]) -> Result<(), CtrFileError> {
    if key.len() != ENCRYPT_KEY_LEN {
        return Err(CtrFileError::InvalidKey {
            expected: ENCRYPT_KEY_LEN,
            actual: key.len(),
        });
    }
    Ok(())
}

/// Generate a fresh IV of `block_size` bytes from the OS CSPRNG.
///
/// Pass the block size of the cipher in use ([`CipherKind::block_size`]).
pub fn generate_iv(block_size: usize) -> Result<Vec<u8>, CtrFileError> {
    let mut iv = vec![0u8; block_size];
    getrandom(&mut iv).map_err(CtrFileError::Randomness)?;
    Ok(iv)
}

/// AES variant selected by key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherKind {
    Aes128,
    Aes192,
    Aes256,
}

impl CipherKind {
    /// Pick the AES variant for `key`, failing for lengths AES does not accept.
    pub fn for_key(key: &[u8]) -> Result<Self, CtrFileError> {
        match key.len() {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            key_len => Err(CtrFileError::CipherInit { key_len }),
        }
    }

    /// Block size of the underlying block cipher, which is also the IV length.
    pub fn block_size(self) -> usize {
        match self {
            Self::Aes128 => Aes128::block_size(),
            Self::Aes192 => Aes192::block_size(),
            Self::Aes256 => Aes256::block_size(),
        }
    }
}

/// AES in counter mode with a 128-bit big-endian counter seeded by the IV.
///
/// The keystream is addressable by absolute byte offset, so splitting the input
/// into chunks of any size never changes the output.
pub enum KeystreamCipher {
    Aes128(Aes128Ctr),
    Aes192(Aes192Ctr),
    Aes256(Aes256Ctr),
}

impl KeystreamCipher {
    /// Build the keystream for `key` and `iv`, positioned at offset 0.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CtrFileError> {
        let kind = CipherKind::for_key(key)?;
        if iv.len() != kind.block_size() {
            return Err(CtrFileError::Invalid("IV length must equal the block size"));
        }
        let init_err = |_: InvalidLength| CtrFileError::CipherInit { key_len: key.len() };
        Ok(match kind {
            CipherKind::Aes128 => {
                Self::Aes128(Aes128Ctr::new_from_slices(key, iv).map_err(init_err)?)
            }
            CipherKind::Aes192 => {
                Self::Aes192(Aes192Ctr::new_from_slices(key, iv).map_err(init_err)?)
            }
            CipherKind::Aes256 => {
                Self::Aes256(Aes256Ctr::new_from_slices(key, iv).map_err(init_err)?)
            }
        })
    }

    pub fn kind(&self) -> CipherKind {
        match self {
            Self::Aes128(_) => CipherKind::Aes128,
            Self::Aes192(_) => CipherKind::Aes192,
            Self::Aes256(_) => CipherKind::Aes256,
        }
    }

    /// XOR `buf` in place with the next `buf.len()` keystream bytes.
    pub fn apply_keystream(&mut self, buf: &mut [u8]) {
        match self {
            Self::Aes128(c) => c.apply_keystream(buf),
            Self::Aes192(c) => c.apply_keystream(buf),
            Self::Aes256(c) => c.apply_keystream(buf),
        }
    }

    /// Move the keystream to absolute byte offset `pos`.
    pub fn seek(&mut self, pos: u64) {
        match self {
            Self::Aes128(c) => c.seek(pos),
            Self::Aes192(c) => c.seek(pos),
            Self::Aes256(c) => c.seek(pos),
        }
    }

    /// Current absolute byte offset into the keystream.
    pub fn position(&self) -> u64 {
        match self {
            Self::Aes128(c) => c.current_pos(),
            Self::Aes192(c) => c.current_pos(),
            Self::Aes256(c) => c.current_pos(),
        }
    }
}
