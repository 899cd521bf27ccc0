#![forbid(unsafe_code)]
//! # ctr_file — streaming AES-CTR encryption for files.
//!
//! `ctr_file` encrypts and decrypts files of any size in constant memory using
//! AES in counter mode. The random IV is stored as a **trailer** after the
//! ciphertext instead of a header:
//!
//! ```text
//! [ciphertext: N bytes][IV: 16 bytes]
//! ```
//!
//! There is no magic number, version or authentication tag, so an encrypted
//! file is always exactly 16 bytes longer than its plaintext.
//!
//! ## Features
//! - **File encryption/decryption** in fixed-size chunks (default 1 KiB)
//! - **Generic streams**: any `Read` source for encryption, any `Read + Seek`
//!   source for decryption
//! - **Byte array helpers** producing the same format in memory
//! - Encryption always uses AES-256 (32-byte keys); decryption accepts AES-128,
//!   AES-192 and AES-256 keys
//!
//! ## Example: Encrypt and decrypt a file
//! ```no_run
//! use ctr_file::{decrypt_file, encrypt_file};
//! use std::path::Path;
//!
//! let key = [0x42u8; 32];
//! encrypt_file(&key, Path::new("notes.txt"), Path::new("notes.txt.enc")).unwrap();
//! decrypt_file(&key, Path::new("notes.txt.enc"), Path::new("notes.out.txt")).unwrap();
//! ```
//!
//! ## Example: Encrypt and decrypt a byte array
//! ```
//! use ctr_file::{decrypt_bytes, encrypt_bytes, BLOCK_SIZE};
//!
//! let key = [7u8; 32];
//! let ct = encrypt_bytes(&key, b"Hello, world!").unwrap();
//! assert_eq!(ct.len(), 13 + BLOCK_SIZE);
//! assert_eq!(decrypt_bytes(&key, &ct).unwrap(), b"Hello, world!");
//! ```
//!
//! Safety notes
//! - Confidentiality only. Tampered or truncated ciphertext decrypts silently to
//!   wrong plaintext; authenticate files separately if that matters.
//! - Keys are used as given. Derive them with a proper KDF.
//! - A failed call may leave a partially written destination file behind.

mod crypto;
mod file;
mod streaming;
mod types;

// Re-export public API from modules
pub use crypto::{CipherKind, KeystreamCipher, generate_iv, validate_encrypt_key};
pub use file::{decrypt_file, decrypt_file_with, encrypt_file, encrypt_file_with};
pub use streaming::{decrypt_bytes, decrypt_stream, encrypt_bytes, encrypt_stream};
pub use types::*;
