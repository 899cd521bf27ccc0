//! Truncated trailers and corrupted ciphertext: typed errors or silent garbage,
//! never a panic.

use std::fs;

use ctr_file::{CtrFileError, decrypt_bytes, decrypt_file, encrypt_bytes, encrypt_file};
use tempfile::tempdir;

const KEY: [u8; 32] = [0x5C; 32];

#[test]
fn files_shorter_than_trailer_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");

    for len in 0..16usize {
        let enc = dir.path().join(format!("short-{len}.enc"));
        fs::write(&enc, vec![0xAA; len]).unwrap();

        let err = decrypt_file(&KEY, &enc, &out).unwrap_err();
        assert!(
            matches!(err, CtrFileError::TrailerTooShort { len: l, needed: 16 } if l == len as u64),
            "len={len}: {err:?}"
        );
        assert!(err.is_trailer_error());
    }
    assert!(!out.exists(), "no destination when the trailer is missing");
}

#[test]
fn truncated_ciphertext_decrypts_without_panic() {
    let msg = vec![0x11u8; 100];
    let ct = encrypt_bytes(&KEY, &msg).unwrap();

    // Dropping bytes shifts the trailer: the IV read back is wrong, so is the output.
    let pt = decrypt_bytes(&KEY, &ct[..ct.len() - 5]).unwrap();
    assert_eq!(pt.len(), 100 - 5);
    assert_ne!(pt, msg[..95]);
}

#[test]
fn flipped_ciphertext_bit_flips_same_plaintext_bit() {
    let msg = b"message to protect".to_vec();
    let mut ct = encrypt_bytes(&KEY, &msg).unwrap();
    ct[3] ^= 0x01;

    let pt = decrypt_bytes(&KEY, &ct).unwrap();
    let mut expected = msg.clone();
    expected[3] ^= 0x01;
    assert_eq!(pt, expected, "no integrity protection: CTR is malleable");
}

#[test]
fn corrupted_trailer_garbles_everything() {
    let msg = vec![0u8; 64];
    let mut ct = encrypt_bytes(&KEY, &msg).unwrap();
    let last = ct.len() - 1;
    ct[last] ^= 0x80;

    let pt = decrypt_bytes(&KEY, &ct).unwrap();
    assert_eq!(pt.len(), msg.len());
    assert_ne!(pt, msg);
}

#[test]
fn mid_body_tamper_on_disk_still_decrypts() {
    let dir = tempdir().unwrap();
    let in_path = dir.path().join("in.bin");
    let enc = dir.path().join("out.enc");
    let back = dir.path().join("back.bin");
    fs::write(&in_path, vec![0x42u8; 4096]).unwrap();

    encrypt_file(&KEY, &in_path, &enc).unwrap();
    let mut ct = fs::read(&enc).unwrap();
    let mid = ct.len() / 2;
    for byte in &mut ct[mid - 8..mid + 8] {
        *byte ^= 0xA5;
    }
    fs::write(&enc, &ct).unwrap();

    decrypt_file(&KEY, &enc, &back).unwrap();
    let pt = fs::read(&back).unwrap();
    assert_eq!(pt.len(), 4096);
    assert_eq!(pt.iter().filter(|&&b| b != 0x42).count(), 16);
}

#[test]
fn random_garbage_never_panics() {
    for len in [16usize, 17, 31, 1040, 3000] {
        let junk: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();
        for key_len in [16usize, 24, 32] {
            let pt = decrypt_bytes(&vec![9u8; key_len], &junk).unwrap();
            assert_eq!(pt.len(), len - 16);
        }
    }
}
