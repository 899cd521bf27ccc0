//! Chunked AES-CTR encryption and decryption over readers and writers.
//!
//! Layout produced and consumed here: `ciphertext || iv`, with no header.

use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom, Write};

use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::crypto::{CipherKind, KeystreamCipher, generate_iv, validate_encrypt_key};
use crate::types::{CtrFileError, StreamOptions};

/// Read into `buf`, retrying on `Interrupted`. Returns 0 only at end of input.
fn read_chunk<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match r.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            res => return res,
        }
    }
}

/// XOR every chunk read from `input` with the keystream and write it to `output`.
///
/// With `limit`, at most that many bytes are transformed and written; anything
/// the reader returns beyond it is read but dropped. Returns the bytes written.
fn transform_chunks<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    cipher: &mut KeystreamCipher,
    chunk_size: usize,
    limit: Option<u64>,
) -> Result<u64, CtrFileError> {
    let mut buf = vec![0u8; chunk_size];
    let mut remaining = limit;
    let mut written = 0u64;

    let res = loop {
        let n = match read_chunk(input, &mut buf).map_err(CtrFileError::io("reading input")) {
            Ok(0) => break Ok(written),
            Ok(n) => n,
            Err(e) => break Err(e),
        };

        let take = match remaining {
            Some(left) => {
                let take = (n as u64).min(left) as usize;
                remaining = Some(left - take as u64);
                take
            }
            None => n,
        };
        if take == 0 {
            continue;
        }

        let chunk = &mut buf[..take];
        cipher.apply_keystream(chunk);
        if let Err(e) = output
            .write_all(chunk)
            .map_err(CtrFileError::io("writing output"))
        {
            break Err(e);
        }
        written += take as u64;
        trace!(offset = cipher.position(), bytes = take, "chunk");
    };

    // Wipe the whole buffer (covers any leftover bytes from the last read)
    buf.zeroize();
    res
}

/// Encrypt everything from `input` into `output` as `ciphertext || iv`.
///
/// The key must be 32 bytes. Returns the number of plaintext bytes encrypted.
pub fn encrypt_stream<R: Read, W: Write>(
    key: &[u8],
    mut input: R,
    output: W,
    opts: &StreamOptions,
) -> Result<u64, CtrFileError> {
    validate_encrypt_key(key)?;
    let chunk_size = opts.effective_chunk_size()?;
    encrypt_inner(key, &mut input, chunk_size, || Ok(output)).map(|(n, _)| n)
}

/// Shared encrypt path. `open_output` runs only once key, cipher and IV are
/// ready, so no destination exists when any of those fail. The writer is
/// handed back together with the plaintext byte count.
pub(crate) fn encrypt_inner<R, W, F>(
    key: &[u8],
    input: &mut R,
    chunk_size: usize,
    open_output: F,
) -> Result<(u64, W), CtrFileError>
where
    R: Read,
    W: Write,
    F: FnOnce() -> Result<W, CtrFileError>,
{
    let kind = CipherKind::for_key(key)?;
    let iv = generate_iv(kind.block_size())?;
    let mut cipher = KeystreamCipher::new(key, &iv)?;
    let mut output = open_output()?;

    let n = transform_chunks(input, &mut output, &mut cipher, chunk_size, None)?;

    output
        .write_all(&iv)
        .map_err(CtrFileError::io("writing IV trailer"))?;
    output.flush().map_err(CtrFileError::io("flushing output"))?;
    debug!(plaintext_bytes = n, ?kind, "encrypted stream");
    Ok((n, output))
}

/// Decrypt a `ciphertext || iv` stream from `input` into `output`.
///
/// Accepts 16, 24 or 32 byte keys. The trailer is located by seeking, so
/// `input` must be seekable. Returns the number of plaintext bytes written.
pub fn decrypt_stream<R: Read + Seek, W: Write>(
    key: &[u8],
    mut input: R,
    output: W,
    opts: &StreamOptions,
) -> Result<u64, CtrFileError> {
    let chunk_size = opts.effective_chunk_size()?;
    let kind = CipherKind::for_key(key)?;
    let total = input
        .seek(SeekFrom::End(0))
        .map_err(CtrFileError::io("measuring input"))?;
    decrypt_inner(key, kind, &mut input, total, chunk_size, || Ok(output)).map(|(n, _)| n)
}

/// Shared decrypt path once the cipher kind and total input size are known.
pub(crate) fn decrypt_inner<R, W, F>(
    key: &[u8],
    kind: CipherKind,
    input: &mut R,
    total: u64,
    chunk_size: usize,
    open_output: F,
) -> Result<(u64, W), CtrFileError>
where
    R: Read + Seek,
    W: Write,
    F: FnOnce() -> Result<W, CtrFileError>,
{
    let iv_len = kind.block_size();
    let msg_len = total
        .checked_sub(iv_len as u64)
        .ok_or(CtrFileError::TrailerTooShort {
            len: total,
            needed: iv_len,
        })?;
    if msg_len == 0 {
        debug!("encrypted input holds only an IV trailer");
    }

    let iv = read_trailer(input, msg_len, iv_len)?;
    let mut cipher = KeystreamCipher::new(key, &iv)?;
    let mut output = open_output()?;

    let n = transform_chunks(input, &mut output, &mut cipher, chunk_size, Some(msg_len))?;
    output.flush().map_err(CtrFileError::io("flushing output"))?;
    debug!(plaintext_bytes = n, ?kind, "decrypted stream");
    Ok((n, output))
}

/// Read `iv_len` bytes at `offset`, then rewind the cursor to the start.
fn read_trailer<R: Read + Seek>(
    input: &mut R,
    offset: u64,
    iv_len: usize,
) -> Result<Vec<u8>, CtrFileError> {
    let mut iv = vec![0u8; iv_len];
    input
        .seek(SeekFrom::Start(offset))
        .map_err(CtrFileError::TrailerRead)?;
    input.read_exact(&mut iv).map_err(CtrFileError::TrailerRead)?;
    input
        .seek(SeekFrom::Start(0))
        .map_err(CtrFileError::io("rewinding input"))?;
    Ok(iv)
}

/// Encrypt a byte slice into `ciphertext || iv`.
pub fn encrypt_bytes(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CtrFileError> {
    let mut out = Vec::with_capacity(crate::types::encrypted_len(plaintext.len() as u64) as usize);
    encrypt_stream(key, plaintext, &mut out, &StreamOptions::default())?;
    Ok(out)
}

/// Decrypt a `ciphertext || iv` byte slice.
///
/// There is no authentication tag: a wrong key or tampered input yields
/// garbage plaintext rather than an error.
pub fn decrypt_bytes(key: &[u8], data: &[u8]) -> Result<Vec<u8>, CtrFileError> {
    let mut out = Vec::with_capacity(data.len());
    decrypt_stream(key, Cursor::new(data), &mut out, &StreamOptions::default())?;
    Ok(out)
}
