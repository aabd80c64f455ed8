//! Crypto primitives for the Orbit wallet.
//!
//! Password hashing (Argon2id), SLIP-0010 ed25519 key derivation, and
//! ed25519 transaction signing. Everything here delegates to audited
//! RustCrypto / dalek implementations; this crate only fixes parameters.

use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

pub mod hd;
pub mod keys;

pub use hd::{derive_account_key, slip10_derive_path};
pub use keys::{verify_signature, Keypair};

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid KDF parameters: {0}")]
    KdfParams(String),

    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid signature")]
    InvalidSignature,
}

/// Argon2id (v0x13) password hash with explicit cost parameters.
///
/// `m_cost` is in KiB. Output length is `dk_len` bytes.
pub fn argon2id_hash(
    password: &[u8],
    salt: &[u8],
    t_cost: u32,
    m_cost: u32,
    parallelism: u32,
    dk_len: u32,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let params = Params::new(m_cost, t_cost, parallelism, Some(dk_len as usize))
        .map_err(|e| CryptoError::KdfParams(e.to_string()))?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = Zeroizing::new(vec![0u8; dk_len as usize]);
    argon
        .hash_password_into(password, salt, &mut out)
        .map_err(|e| CryptoError::Kdf(e.to_string()))?;
    Ok(out)
}

/// SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argon2id_deterministic() {
        let salt = [1u8; 16];
        let a = argon2id_hash(b"1234", &salt, 1, 64, 1, 32).unwrap();
        let b = argon2id_hash(b"1234", &salt, 1, 64, 1, 32).unwrap();
        assert_eq!(a.len(), 32);
        assert_eq!(*a, *b);
    }

    #[test]
    fn test_argon2id_salt_and_password_matter() {
        let base = argon2id_hash(b"1234", &[1u8; 16], 1, 64, 1, 32).unwrap();
        let other_salt = argon2id_hash(b"1234", &[2u8; 16], 1, 64, 1, 32).unwrap();
        let other_pass = argon2id_hash(b"4321", &[1u8; 16], 1, 64, 1, 32).unwrap();
        assert_ne!(*base, *other_salt);
        assert_ne!(*base, *other_pass);
    }

    #[test]
    fn test_argon2id_rejects_bad_params() {
        // Memory below 8 KiB per lane is invalid.
        let result = argon2id_hash(b"x", &[0u8; 16], 1, 1, 1, 32);
        assert!(matches!(result, Err(CryptoError::KdfParams(_))));
    }

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
