//! Recipient identity as a SHA-256 fingerprint of the raw public key.

use sha2::{Digest, Sha256};

use crate::errors::CaskError;
use crate::kem::PublicKey;

/// A 32-byte public key fingerprint.
///
/// Defined as SHA-256 over the raw ML-KEM-768 key encoding. This is the
/// recipient identity carried on the wire; equality is byte equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    bytes: [u8; Self::SIZE],
}

impl Fingerprint {
    /// Fingerprint length in bytes.
    pub const SIZE: usize = 32;

    /// Fingerprint of a public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self {
            bytes: Sha256::digest(public_key.as_bytes()).into(),
        }
    }

    /// Build a fingerprint from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CaskError::InvalidFormat`] for any length other than 32.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CaskError> {
        if bytes.len() != Self::SIZE {
            return Err(CaskError::InvalidFormat);
        }
        let mut fp = [0u8; Self::SIZE];
        fp.copy_from_slice(bytes);
        Ok(Self { bytes: fp })
    }

    /// Fingerprint bytes.
    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.bytes
    }

    /// Grouped lowercase hex for out-of-band verification.
    ///
    /// 4-byte groups separated by single spaces, 71 characters total,
    /// e.g. `0011aabb 22334455 ...`.
    pub fn grouped_hex(&self) -> String {
        let mut out = String::with_capacity(71);
        for (i, chunk) in self.bytes.chunks(4).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&hex::encode(chunk));
        }
        out
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.grouped_hex())
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({})", hex::encode(self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kem;

    #[test]
    fn fingerprint_is_stable() {
        let (pk, _) = kem::generate_key_pair().unwrap();
        let a = Fingerprint::from_public_key(&pk);
        let b = Fingerprint::from_public_key(&pk);
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_survives_key_export_round_trip() {
        let (pk, _) = kem::generate_key_pair().unwrap();
        let reimported = PublicKey::from_base64(&pk.to_base64()).unwrap();
        assert_eq!(
            Fingerprint::from_public_key(&pk),
            Fingerprint::from_public_key(&reimported)
        );
    }

    #[test]
    fn distinct_keys_have_distinct_fingerprints() {
        let (pk1, _) = kem::generate_key_pair().unwrap();
        let (pk2, _) = kem::generate_key_pair().unwrap();
        assert_ne!(
            Fingerprint::from_public_key(&pk1),
            Fingerprint::from_public_key(&pk2)
        );
    }

    #[test]
    fn from_bytes_requires_exactly_32() {
        assert_eq!(Fingerprint::from_bytes(&[0u8; 31]).unwrap_err(), CaskError::InvalidFormat);
        assert_eq!(Fingerprint::from_bytes(&[0u8; 33]).unwrap_err(), CaskError::InvalidFormat);
        let fp = Fingerprint::from_bytes(&[0x11; 32]).unwrap();
        assert_eq!(fp.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn grouped_hex_layout() {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        let fp = Fingerprint::from_bytes(&bytes).unwrap();
        let hex = fp.grouped_hex();
        assert_eq!(hex.len(), 71);
        assert_eq!(hex.matches(' ').count(), 7);
        assert!(hex.starts_with("00010203 04050607"));
        assert!(hex.ends_with("1c1d1e1f"));
        assert_eq!(hex, hex.to_lowercase());
        assert!(!hex.ends_with(' '));
    }
}
