//! File-level encryption and decryption.
//!
//! Destinations are created or truncated in place. On failure a partially
//! written destination is left behind and must not be trusted.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::crypto::{CipherKind, validate_encrypt_key};
use crate::streaming::{decrypt_inner, encrypt_inner};
use crate::types::{CtrFileError, StreamOptions};

/// Create or truncate `path`, returning the handle once it is ready for writing.
fn create_output(path: &Path) -> Result<File, CtrFileError> {
    File::create(path).map_err(CtrFileError::io("creating destination file"))
}

fn finish_output(out: &File, opts: &StreamOptions) -> Result<(), CtrFileError> {
    if opts.sync {
        out.sync_all()
            .map_err(CtrFileError::io("syncing destination file"))?;
    }
    Ok(())
}

/// Encrypt `source` into `dest` with AES-256-CTR using default options.
///
/// The output is the ciphertext followed by the 16-byte random IV.
///
/// # Errors
///
/// - [`CtrFileError::InvalidKey`] if `key` is not 32 bytes; no file is touched.
/// - [`CtrFileError::Io`] if `source` cannot be read or `dest` cannot be written.
/// - [`CtrFileError::Randomness`] if the OS random source fails.
pub fn encrypt_file(key: &[u8], source: &Path, dest: &Path) -> Result<(), CtrFileError> {
    encrypt_file_with(key, source, dest, &StreamOptions::default())
}

/// Like [`encrypt_file`] with explicit [`StreamOptions`].
pub fn encrypt_file_with(
    key: &[u8],
    source: &Path,
    dest: &Path,
    opts: &StreamOptions,
) -> Result<(), CtrFileError> {
    validate_encrypt_key(key)?;
    let chunk_size = opts.effective_chunk_size()?;
    debug!(source = %source.display(), dest = %dest.display(), chunk_size, "encrypting file");

    let mut infile = File::open(source).map_err(CtrFileError::io("opening source file"))?;
    let (n, outfile) = encrypt_inner(key, &mut infile, chunk_size, || create_output(dest))?;
    finish_output(&outfile, opts)?;

    debug!(dest = %dest.display(), plaintext_bytes = n, "file encrypted");
    Ok(())
}

/// Decrypt `source` (ciphertext followed by the IV trailer) into `dest` using
/// default options.
///
/// `key` may be 16, 24 or 32 bytes. Without an authentication tag a wrong key
/// is not detected: it simply produces wrong plaintext.
///
/// # Errors
///
/// - [`CtrFileError::CipherInit`] if AES rejects the key length.
/// - [`CtrFileError::TrailerTooShort`] if `source` is smaller than the IV.
/// - [`CtrFileError::TrailerRead`] if the IV cannot be read back.
/// - [`CtrFileError::Io`] for any other read, stat or write failure.
pub fn decrypt_file(key: &[u8], source: &Path, dest: &Path) -> Result<(), CtrFileError> {
    decrypt_file_with(key, source, dest, &StreamOptions::default())
}

/// Like [`decrypt_file`] with explicit [`StreamOptions`].
pub fn decrypt_file_with(
    key: &[u8],
    source: &Path,
    dest: &Path,
    opts: &StreamOptions,
) -> Result<(), CtrFileError> {
    let chunk_size = opts.effective_chunk_size()?;
    debug!(source = %source.display(), dest = %dest.display(), chunk_size, "decrypting file");

    let mut infile = File::open(source).map_err(CtrFileError::io("opening source file"))?;
    let kind = CipherKind::for_key(key)?;
    let total = infile
        .metadata()
        .map_err(CtrFileError::io("reading source file metadata"))?
        .len();

    let (n, outfile) =
        decrypt_inner(key, kind, &mut infile, total, chunk_size, || create_output(dest))?;
    finish_output(&outfile, opts)?;

    debug!(dest = %dest.display(), plaintext_bytes = n, "file decrypted");
    Ok(())
}
