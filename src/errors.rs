//! Error types for pqcask operations.

use thiserror::Error;

/// Errors that can occur while producing or consuming containers.
///
/// The set is deliberately coarse: every cryptographic failure during an
/// AEAD operation surfaces as [`CaskError::AeadFailed`], whether the cause
/// was a wrong key, a tampered ciphertext, or mismatched associated data.
/// Callers must not be able to tell these apart.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CaskError {
    /// A base64 string could not be decoded.
    #[error("invalid base64")]
    InvalidBase64,

    /// Raw bytes do not form a valid public key.
    #[error("invalid key representation")]
    InvalidKeyRepresentation,

    /// The secure random source failed while generating key material.
    #[error("key generation failed")]
    KeyGenerationFailed,

    /// ML-KEM encapsulation failed.
    #[error("KEM encapsulation failed")]
    KemEncapsulationFailed,

    /// ML-KEM decapsulation failed.
    #[error("KEM decapsulation failed")]
    KemDecapsulationFailed,

    /// Raw bytes do not form a valid KEM ciphertext.
    #[error("invalid ciphertext representation")]
    InvalidCiphertextRepresentation,

    /// A KDF output length outside the supported range was requested.
    #[error("invalid KDF output length")]
    InvalidKdfOutputLength,

    /// An AEAD nonce of the wrong length was supplied.
    #[error("invalid nonce length")]
    InvalidNonceLength,

    /// An AEAD authentication tag of the wrong length was supplied.
    #[error("invalid tag length")]
    InvalidTagLength,

    /// AEAD encryption or decryption failed.
    #[error("aead failure")]
    AeadFailed,

    /// Wrapped DEK bytes are structurally invalid.
    #[error("invalid wrapped DEK representation")]
    InvalidWrappedDekRepresentation,

    /// The container declares a format version this library does not speak.
    #[error("unsupported container version")]
    UnsupportedVersion,

    /// The container bytes violate the v1 structure.
    #[error("invalid container format")]
    InvalidFormat,

    /// A declared size exceeds the v1 limits.
    #[error("container limits exceeded")]
    LimitsExceeded,

    /// The supplied key pair cannot unlock any recipient entry.
    #[error("access denied")]
    AccessDenied,

    /// A recipient entry unlocked but the payload did not authenticate.
    #[error("cannot open container")]
    CannotOpen,
}
