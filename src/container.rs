//! Container v1 value types.
//!
//! Plain data with validating constructors. No I/O and no cryptography
//! here; every fixed-length invariant is enforced at construction so the
//! codec and wrap layers can rely on it.

use uuid::Uuid;

use crate::aead;
use crate::errors::CaskError;
use crate::fingerprint::Fingerprint;

/// Algorithm suite identifier carried in the container header.
///
/// A single suite is registered. The decoder preserves unknown values so
/// containers can still be structurally inspected; consumers must check
/// [`AlgorithmId::is_registered`] before attempting any cryptography.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlgorithmId(u16);

impl AlgorithmId {
    /// The registered v1 suite: ML-KEM-768 + HKDF-SHA-256 + AES-256-GCM.
    pub const MLKEM768_HKDF_SHA256_AES256GCM: AlgorithmId = AlgorithmId(0x0001);

    /// Wrap a raw identifier value.
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    /// The raw identifier value.
    pub fn value(self) -> u16 {
        self.0
    }

    /// True for the single registered suite.
    pub fn is_registered(self) -> bool {
        self == Self::MLKEM768_HKDF_SHA256_AES256GCM
    }
}

/// Random 16-byte container identifier.
///
/// UUID-shaped but carried and compared as opaque bytes. Binds every
/// per-recipient DEK wrap to its container through the KDF salt and the
/// wrap AAD.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId {
    bytes: [u8; Self::SIZE],
}

impl ContainerId {
    /// Identifier length in bytes.
    pub const SIZE: usize = 16;

    /// Generate a uniformly random identifier.
    pub fn random() -> Self {
        Self {
            bytes: Uuid::new_v4().into_bytes(),
        }
    }

    /// Build an identifier from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CaskError::InvalidFormat`] for any length other than 16.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CaskError> {
        if bytes.len() != Self::SIZE {
            return Err(CaskError::InvalidFormat);
        }
        let mut id = [0u8; Self::SIZE];
        id.copy_from_slice(bytes);
        Ok(Self { bytes: id })
    }

    /// Identifier bytes.
    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContainerId({})", hex::encode(self.bytes))
    }
}

/// Fixed 40-byte container header.
///
/// Layout: algorithm id (2) | container id (16) | recipient count (2) |
/// flags (4) | reserved (16). No flag bits are defined in v1; the field
/// is preserved verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerHeader {
    algorithm_id: AlgorithmId,
    container_id: ContainerId,
    recipients_count: u16,
    flags: u32,
    reserved: [u8; Self::RESERVED_SIZE],
}

impl ContainerHeader {
    /// Serialized header length in v1.
    pub const SIZE: usize = 40;

    /// Length of the reserved trailer.
    pub const RESERVED_SIZE: usize = 16;

    /// Build a header.
    ///
    /// # Errors
    ///
    /// Returns [`CaskError::InvalidFormat`] unless `reserved` is exactly
    /// 16 bytes.
    pub fn new(
        algorithm_id: AlgorithmId,
        container_id: ContainerId,
        recipients_count: u16,
        flags: u32,
        reserved: &[u8],
    ) -> Result<Self, CaskError> {
        if reserved.len() != Self::RESERVED_SIZE {
            return Err(CaskError::InvalidFormat);
        }
        let mut r = [0u8; Self::RESERVED_SIZE];
        r.copy_from_slice(reserved);
        Ok(Self {
            algorithm_id,
            container_id,
            recipients_count,
            flags,
            reserved: r,
        })
    }

    /// Algorithm suite identifier.
    pub fn algorithm_id(&self) -> AlgorithmId {
        self.algorithm_id
    }

    /// Container identifier.
    pub fn container_id(&self) -> &ContainerId {
        &self.container_id
    }

    /// Declared number of recipient entries.
    pub fn recipients_count(&self) -> u16 {
        self.recipients_count
    }

    /// Flags field, preserved verbatim.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Reserved trailer, preserved verbatim.
    pub fn reserved(&self) -> &[u8; Self::RESERVED_SIZE] {
        &self.reserved
    }
}

/// One per-recipient entry: identity plus the material to recover the DEK.
///
/// Entries are order-significant on the wire but carry no semantic
/// ordering; consumers locate theirs by fingerprint. Size limits are
/// enforced by the codec, not here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientEntry {
    /// Fingerprint of the recipient public key.
    pub key_id: Fingerprint,
    /// ML-KEM ciphertext transporting the wrap secret.
    pub kem_ciphertext: Vec<u8>,
    /// DEK sealed under the recipient wrap key.
    pub wrapped_dek: Vec<u8>,
}

impl RecipientEntry {
    /// Assemble an entry.
    pub fn new(key_id: Fingerprint, kem_ciphertext: Vec<u8>, wrapped_dek: Vec<u8>) -> Self {
        Self {
            key_id,
            kem_ciphertext,
            wrapped_dek,
        }
    }
}

/// The sealed payload: IV, ciphertext, and detached authentication tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CipherParts {
    iv: [u8; aead::NONCE_SIZE],
    ciphertext: Vec<u8>,
    auth_tag: [u8; aead::TAG_SIZE],
}

impl CipherParts {
    /// Assemble cipher parts.
    ///
    /// # Errors
    ///
    /// Returns [`CaskError::InvalidFormat`] unless `iv` is exactly 12
    /// bytes and `auth_tag` exactly 16.
    pub fn new(iv: &[u8], ciphertext: Vec<u8>, auth_tag: &[u8]) -> Result<Self, CaskError> {
        if iv.len() != aead::NONCE_SIZE || auth_tag.len() != aead::TAG_SIZE {
            return Err(CaskError::InvalidFormat);
        }
        let mut iv_arr = [0u8; aead::NONCE_SIZE];
        iv_arr.copy_from_slice(iv);
        let mut tag_arr = [0u8; aead::TAG_SIZE];
        tag_arr.copy_from_slice(auth_tag);
        Ok(Self {
            iv: iv_arr,
            ciphertext,
            auth_tag: tag_arr,
        })
    }

    /// AEAD nonce for the payload.
    pub fn iv(&self) -> &[u8; aead::NONCE_SIZE] {
        &self.iv
    }

    /// Payload ciphertext.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Detached authentication tag.
    pub fn auth_tag(&self) -> &[u8; aead::TAG_SIZE] {
        &self.auth_tag
    }
}

/// A fully decoded v1 container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    /// Fixed header.
    pub header: ContainerHeader,
    /// Recipient entries in wire order.
    pub recipients: Vec<RecipientEntry>,
    /// Sealed payload.
    pub cipher: CipherParts,
}
