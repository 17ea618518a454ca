//! HKDF-SHA-256 key derivation and the owned symmetric key type.

use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::CaskError;

/// Length in bytes of an AES-256 key, and of a data encryption key.
pub const KEY_SIZE: usize = 32;

/// Largest KDF output this library will produce.
pub const MAX_OUTPUT_SIZE: usize = 1024;

/// An owned symmetric key. Zeroized on drop.
///
/// Holds whatever length the caller derived; the AEAD layer requires 32
/// bytes and rejects anything else at use time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: Vec<u8>,
}

impl SymmetricKey {
    /// Generate a fresh random 256-bit key.
    ///
    /// # Errors
    ///
    /// Returns [`CaskError::KeyGenerationFailed`] if the secure random
    /// source is unavailable.
    pub fn generate() -> Result<Self, CaskError> {
        let mut bytes = vec![0u8; KEY_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| CaskError::KeyGenerationFailed)?;
        Ok(Self { bytes })
    }

    /// Copy caller-supplied bytes into an owned key.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Key material.
    ///
    /// # Security
    ///
    /// Avoid logging or persisting the returned bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length key.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymmetricKey([REDACTED; {}])", self.bytes.len())
    }
}

/// Derive a symmetric key of `length` bytes with HKDF-SHA-256.
///
/// `salt` and `info` bind the derivation to its context and purpose.
///
/// # Errors
///
/// Returns [`CaskError::InvalidKdfOutputLength`] if `length` is 0 or
/// exceeds [`MAX_OUTPUT_SIZE`].
pub fn derive(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
    length: usize,
) -> Result<SymmetricKey, CaskError> {
    Ok(SymmetricKey {
        bytes: derive_bytes(ikm, salt, info, length)?,
    })
}

/// Derive `length` raw bytes with HKDF-SHA-256 (extract then expand).
///
/// # Errors
///
/// Returns [`CaskError::InvalidKdfOutputLength`] if `length` is 0 or
/// exceeds [`MAX_OUTPUT_SIZE`].
pub fn derive_bytes(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
    length: usize,
) -> Result<Vec<u8>, CaskError> {
    if length == 0 || length > MAX_OUTPUT_SIZE {
        return Err(CaskError::InvalidKdfOutputLength);
    }
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut okm = vec![0u8; length];
    let Ok(()) = hk.expand(info, &mut okm) else {
        unreachable!("output length is within the HKDF-SHA-256 bound");
    };
    Ok(okm)
}
