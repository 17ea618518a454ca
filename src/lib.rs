//! # pqcask
//!
//! Multi-recipient post-quantum encrypted containers with a strict,
//! versioned binary format.
//!
//! A container holds one opaque payload encrypted once under a random
//! data encryption key (DEK). The DEK is wrapped independently for each
//! authorized recipient using a key derived from an ML-KEM-768
//! encapsulation, so any recipient holding a matching private key can
//! recover the payload while recipients remain indistinguishable from
//! one another without their keys.
//!
//! ## Algorithm Suite
//!
//! - **Key Encapsulation:** ML-KEM-768 (FIPS 203) for per-recipient key
//!   wrapping
//! - **Key Derivation:** HKDF-SHA-256, bound to container and recipient
//!   context
//! - **Symmetric Encryption:** AES-256-GCM for payload and DEK wrapping
//! - **Wire Format:** length-prefixed little-endian binary, magic `PQCK`,
//!   version 1
//!
//! ## Features
//!
//! - Multi-recipient encryption: encrypt once for up to 100 recipients
//! - Recipient identity by SHA-256 fingerprint of the raw public key
//! - DoS-resistant decoding with hard size limits
//! - Forward-compatible header within v1
//! - Pure Rust: no C dependencies
//!
//! ## Example
//!
//! ```rust
//! use pqcask::{generate_key_pair, open, seal, CaskError};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Generate recipient key pairs
//! let (pub_a, priv_a) = generate_key_pair()?;
//! let (pub_b, priv_b) = generate_key_pair()?;
//!
//! // Encrypt a payload once for both recipients
//! let container = seal(b"Hello, post-quantum world!", &[pub_a.clone(), pub_b.clone()])?;
//!
//! // Each recipient can open it
//! assert_eq!(open(&container, &pub_a, &priv_a)?, b"Hello, post-quantum world!");
//! assert_eq!(open(&container, &pub_b, &priv_b)?, b"Hello, post-quantum world!");
//!
//! // Anyone else is refused without learning why
//! let (pub_c, priv_c) = generate_key_pair()?;
//! assert_eq!(open(&container, &pub_c, &priv_c), Err(CaskError::AccessDenied));
//! # Ok(())
//! # }
//! ```
//!
//! ## Security Considerations
//!
//! - Cryptographic failures are reported without detail: wrong key,
//!   tampered bytes, and mismatched context are indistinguishable
//! - Transient DEK plaintext is zeroized before buffers are released
//! - All randomness comes from the operating system's secure source;
//!   never inject deterministic randomness
//! - Private keys are never serialized or persisted by this library
//!
//! ## License
//!
//! Licensed under the Apache License, Version 2.0.

pub mod aead;
pub mod codec;
pub mod container;
pub mod envelope;
pub mod errors;
pub mod fingerprint;
pub mod format;
pub mod kdf;
pub mod kem;
pub mod wrap;

pub use container::{
    AlgorithmId, CipherParts, Container, ContainerHeader, ContainerId, RecipientEntry,
};
pub use envelope::{open, seal};
pub use errors::CaskError;
pub use fingerprint::Fingerprint;
pub use kdf::SymmetricKey;
pub use kem::{generate_key_pair, KemCiphertext, PrivateKey, PublicKey, SharedSecret};
