//! AES-256-GCM seal and open with associated data.
//!
//! Ciphertext and authentication tag travel separately on the wire, so
//! this wrapper returns and accepts them as distinct values rather than a
//! single concatenated blob. Every failure inside the cipher collapses to
//! [`CaskError::AeadFailed`]: a wrong key, a flipped ciphertext bit, and
//! mismatched associated data are indistinguishable to the caller.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::errors::CaskError;
use crate::kdf::SymmetricKey;

/// AES-GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Encrypt `plaintext` under `key` and `nonce`, authenticating `aad`.
///
/// Returns the ciphertext and the 16-byte tag separately.
///
/// # Errors
///
/// - [`CaskError::InvalidNonceLength`] if `nonce` is not 12 bytes.
/// - [`CaskError::AeadFailed`] for any failure inside the cipher,
///   including a key of the wrong length.
pub fn seal(
    plaintext: &[u8],
    key: &SymmetricKey,
    nonce: &[u8],
    aad: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), CaskError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CaskError::InvalidNonceLength);
    }
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CaskError::AeadFailed)?;
    let mut combined = cipher
        .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|_| CaskError::AeadFailed)?;
    let tag = combined.split_off(combined.len() - TAG_SIZE);
    Ok((combined, tag))
}

/// Decrypt `ciphertext` with its detached `tag`.
///
/// # Errors
///
/// - [`CaskError::InvalidNonceLength`] if `nonce` is not 12 bytes.
/// - [`CaskError::InvalidTagLength`] if `tag` is not 16 bytes.
/// - [`CaskError::AeadFailed`] for every other failure, authentication
///   failure included.
pub fn open(
    ciphertext: &[u8],
    tag: &[u8],
    key: &SymmetricKey,
    nonce: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CaskError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CaskError::InvalidNonceLength);
    }
    if tag.len() != TAG_SIZE {
        return Err(CaskError::InvalidTagLength);
    }
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CaskError::AeadFailed)?;
    let mut combined = Vec::with_capacity(ciphertext.len() + TAG_SIZE);
    combined.extend_from_slice(ciphertext);
    combined.extend_from_slice(tag);
    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: &combined, aad })
        .map_err(|_| CaskError::AeadFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_nonce() -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        for (i, b) in nonce.iter_mut().enumerate() {
            *b = i as u8;
        }
        nonce
    }

    #[test]
    fn seal_open_round_trip() {
        let key = SymmetricKey::generate().unwrap();
        let nonce = test_nonce();
        let (ct, tag) = seal(b"hello pq", &key, &nonce, &[]).unwrap();
        assert_eq!(ct.len(), 8);
        assert_eq!(tag.len(), TAG_SIZE);
        let pt = open(&ct, &tag, &key, &nonce, &[]).unwrap();
        assert_eq!(pt, b"hello pq");
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = SymmetricKey::generate().unwrap();
        let nonce = test_nonce();
        let (mut ct, tag) = seal(b"hello pq", &key, &nonce, &[]).unwrap();
        ct[0] ^= 0x01;
        assert_eq!(open(&ct, &tag, &key, &nonce, &[]).unwrap_err(), CaskError::AeadFailed);
    }

    #[test]
    fn tampered_tag_fails() {
        let key = SymmetricKey::generate().unwrap();
        let nonce = test_nonce();
        let (ct, mut tag) = seal(b"hello pq", &key, &nonce, &[]).unwrap();
        tag[0] ^= 0x01;
        assert_eq!(open(&ct, &tag, &key, &nonce, &[]).unwrap_err(), CaskError::AeadFailed);
    }

    #[test]
    fn wrong_key_fails() {
        let key = SymmetricKey::generate().unwrap();
        let other = SymmetricKey::generate().unwrap();
        let nonce = test_nonce();
        let (ct, tag) = seal(b"hello pq", &key, &nonce, &[]).unwrap();
        assert_eq!(open(&ct, &tag, &other, &nonce, &[]).unwrap_err(), CaskError::AeadFailed);
    }

    #[test]
    fn aad_mismatch_fails() {
        let key = SymmetricKey::generate().unwrap();
        let nonce = test_nonce();
        let (ct, tag) = seal(b"payload", &key, &nonce, b"context").unwrap();
        assert!(open(&ct, &tag, &key, &nonce, b"context").is_ok());
        assert_eq!(
            open(&ct, &tag, &key, &nonce, b"other").unwrap_err(),
            CaskError::AeadFailed
        );
        assert_eq!(open(&ct, &tag, &key, &nonce, &[]).unwrap_err(), CaskError::AeadFailed);
    }

    #[test]
    fn nonce_length_is_validated() {
        let key = SymmetricKey::generate().unwrap();
        assert_eq!(
            seal(b"x", &key, &[0u8; 11], &[]).unwrap_err(),
            CaskError::InvalidNonceLength
        );
        assert_eq!(
            seal(b"x", &key, &[0u8; 13], &[]).unwrap_err(),
            CaskError::InvalidNonceLength
        );
        assert_eq!(
            open(&[], &[0u8; TAG_SIZE], &key, &[0u8; 11], &[]).unwrap_err(),
            CaskError::InvalidNonceLength
        );
    }

    #[test]
    fn tag_length_is_validated() {
        let key = SymmetricKey::generate().unwrap();
        let nonce = test_nonce();
        assert_eq!(
            open(&[], &[0u8; 15], &key, &nonce, &[]).unwrap_err(),
            CaskError::InvalidTagLength
        );
        assert_eq!(
            open(&[], &[0u8; 17], &key, &nonce, &[]).unwrap_err(),
            CaskError::InvalidTagLength
        );
    }

    #[test]
    fn short_key_fails_as_aead() {
        let key = SymmetricKey::from_bytes(&[0u8; 16]);
        let nonce = test_nonce();
        assert_eq!(seal(b"x", &key, &nonce, &[]).unwrap_err(), CaskError::AeadFailed);
    }

    #[test]
    fn empty_plaintext_round_trip() {
        let key = SymmetricKey::generate().unwrap();
        let nonce = test_nonce();
        let (ct, tag) = seal(b"", &key, &nonce, &[]).unwrap();
        assert!(ct.is_empty());
        assert_eq!(open(&ct, &tag, &key, &nonce, &[]).unwrap(), b"");
    }
}
