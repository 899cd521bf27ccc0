//! NIST SP 800-38A CTR vectors laid out as `ciphertext || iv` files.

use std::fs;

use ctr_file::{KeystreamCipher, decrypt_bytes, decrypt_file};
use tempfile::tempdir;

const COUNTER: &str = "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";

const PLAINTEXT: &str = concat!(
    "6bc1bee22e409f96e93d7e117393172a",
    "ae2d8a571e03ac9c9eb76fac45af8e51",
    "30c81c46a35ce411e5fbc1191a0a52ef",
    "f69f2445df4f9b17ad2b417be66c3710",
);

// F.5.1 CTR-AES128.Encrypt
const KEY_128: &str = "2b7e151628aed2a6abf7158809cf4f3c";
const CIPHERTEXT_128: &str = concat!(
    "874d6191b620e3261bef6864990db6ce",
    "9806f66b7970fdff8617187bb9fffdff",
    "5ae4df3edbd5d35e5b4f09020db03eab",
    "1e031dda2fbe03d1792170a0f3009cee",
);

// F.5.5 CTR-AES256.Encrypt
const KEY_256: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";
const CIPHERTEXT_256: &str = concat!(
    "601ec313775789a5b7a7f504bbf3d228",
    "f443e3ca4d62b59aca84e990cacaf5c5",
    "2b0930daa23de94ce87017ba2d84988d",
    "dfc9c58db67aada613c2dd08457941a6",
);

fn trailer_file(ciphertext_hex: &str) -> Vec<u8> {
    let mut data = hex::decode(ciphertext_hex).unwrap();
    data.extend(hex::decode(COUNTER).unwrap());
    data
}

#[test]
fn aes128_vector_decrypts() {
    let key = hex::decode(KEY_128).unwrap();
    let pt = decrypt_bytes(&key, &trailer_file(CIPHERTEXT_128)).unwrap();
    assert_eq!(hex::encode(pt), PLAINTEXT);
}

#[test]
fn aes256_vector_decrypts_from_file() {
    let dir = tempdir().unwrap();
    let enc = dir.path().join("vector.enc");
    let out = dir.path().join("vector.txt");
    fs::write(&enc, trailer_file(CIPHERTEXT_256)).unwrap();

    let key = hex::decode(KEY_256).unwrap();
    decrypt_file(&key, &enc, &out).unwrap();
    assert_eq!(hex::encode(fs::read(&out).unwrap()), PLAINTEXT);
}

#[test]
fn partial_final_block_is_truncated_not_padded() {
    let key = hex::decode(KEY_256).unwrap();
    let full = hex::decode(CIPHERTEXT_256).unwrap();
    let mut data = full[..21].to_vec();
    data.extend(hex::decode(COUNTER).unwrap());

    let pt = decrypt_bytes(&key, &data).unwrap();
    assert_eq!(hex::encode(pt), &PLAINTEXT[..42]);
}

#[test]
fn aes192_keystream_file_decrypts() {
    let key = [0x8e; 24];
    let iv = hex::decode(COUNTER).unwrap();
    let msg = hex::decode(PLAINTEXT).unwrap();

    let mut data = msg.clone();
    KeystreamCipher::new(&key, &iv)
        .unwrap()
        .apply_keystream(&mut data);
    data.extend(&iv);

    assert_eq!(decrypt_bytes(&key, &data).unwrap(), msg);
}
