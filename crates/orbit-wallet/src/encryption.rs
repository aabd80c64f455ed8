//! Secret encryption.
//!
//! Encrypts secrets using Argon2id key derivation + AES-256-GCM. The result
//! is a self-describing JSON envelope carrying every parameter needed for
//! decryption (except the passphrase). Binary fields are hex.
//!
//! ```json
//! {
//!   "version": 1,
//!   "kdf": "argon2id",
//!   "kdfparams": { "t_cost": 3, "m_cost": 65536, "parallelism": 4, "dklen": 32, "salt": "…" },
//!   "cipher": "aes-256-gcm",
//!   "iv": "…",
//!   "ciphertext": "…"
//! }
//! ```

use crate::error::WalletError;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Current envelope format version.
pub const ENVELOPE_VERSION: u32 = 1;

pub const KDF_ARGON2ID: &str = "argon2id";
pub const CIPHER_AES_256_GCM: &str = "aes-256-gcm";

const SALT_LEN: usize = 32;
const IV_LEN: usize = 12;
const KEY_LEN: u32 = 32;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub t_cost: u32,
    /// Memory cost in KiB.
    pub m_cost: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// OWASP recommended minimums: 3 passes over 64 MiB with 4 lanes.
    fn default() -> Self {
        Self {
            t_cost: 3,
            m_cost: 65536,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// Minimal cost, for tests only.
    pub fn insecure_fast() -> Self {
        Self {
            t_cost: 1,
            m_cost: 64,
            parallelism: 1,
        }
    }
}

/// KDF parameters as recorded in an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeKdfParams {
    pub t_cost: u32,
    pub m_cost: u32,
    pub parallelism: u32,
    pub dklen: u32,
    pub salt: String,
}

/// An encrypted secret. Opaque to everything except [`open`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    pub version: u32,
    pub kdf: String,
    pub kdfparams: EnvelopeKdfParams,
    pub cipher: String,
    pub iv: String,
    pub ciphertext: String,
}

impl EncryptedSecret {
    pub fn to_json(&self) -> Result<String, WalletError> {
        serde_json::to_string(self).map_err(|e| WalletError::Encryption(e.to_string()))
    }

    /// Parse a stored envelope. Malformed input is reported as
    /// [`WalletError::DecryptionFailed`] like any other corruption.
    pub fn from_json(json: &str) -> Result<Self, WalletError> {
        serde_json::from_str(json).map_err(|e| {
            log::debug!("envelope parse failed: {}", e);
            WalletError::DecryptionFailed
        })
    }
}

fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
    params: &KdfParams,
    dk_len: u32,
) -> Result<Zeroizing<Vec<u8>>, WalletError> {
    orbit_crypto::argon2id_hash(
        passphrase,
        salt,
        params.t_cost,
        params.m_cost,
        params.parallelism,
        dk_len,
    )
    .map_err(|e| WalletError::Encryption(e.to_string()))
}

/// Encrypt `plaintext` under `passphrase` with a fresh salt and IV.
pub fn seal(
    plaintext: &[u8],
    passphrase: &[u8],
    params: &KdfParams,
) -> Result<EncryptedSecret, WalletError> {
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut iv);

    let key = derive_key(passphrase, &salt, params, KEY_LEN)?;
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;

    Ok(EncryptedSecret {
        version: ENVELOPE_VERSION,
        kdf: KDF_ARGON2ID.to_string(),
        kdfparams: EnvelopeKdfParams {
            t_cost: params.t_cost,
            m_cost: params.m_cost,
            parallelism: params.parallelism,
            dklen: KEY_LEN,
            salt: hex::encode(salt),
        },
        cipher: CIPHER_AES_256_GCM.to_string(),
        iv: hex::encode(iv),
        ciphertext: hex::encode(ciphertext),
    })
}

/// Decrypt an envelope.
///
/// Every failure (wrong passphrase, tampered ciphertext, unknown algorithm,
/// malformed fields) returns [`WalletError::DecryptionFailed`]; the cause is
/// only logged at debug level.
pub fn open(envelope: &EncryptedSecret, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>, WalletError> {
    let fail = |reason: &str| {
        log::debug!("envelope rejected: {}", reason);
        WalletError::DecryptionFailed
    };

    if envelope.version != ENVELOPE_VERSION {
        return Err(fail("unsupported version"));
    }
    if envelope.kdf != KDF_ARGON2ID || envelope.cipher != CIPHER_AES_256_GCM {
        return Err(fail("unsupported algorithm"));
    }
    if envelope.kdfparams.dklen != KEY_LEN {
        return Err(fail("unsupported key length"));
    }

    let salt = hex::decode(&envelope.kdfparams.salt).map_err(|_| fail("salt is not hex"))?;
    let iv = hex::decode(&envelope.iv).map_err(|_| fail("iv is not hex"))?;
    let ciphertext =
        hex::decode(&envelope.ciphertext).map_err(|_| fail("ciphertext is not hex"))?;
    if iv.len() != IV_LEN {
        return Err(fail("bad iv length"));
    }

    let params = KdfParams {
        t_cost: envelope.kdfparams.t_cost,
        m_cost: envelope.kdfparams.m_cost,
        parallelism: envelope.kdfparams.parallelism,
    };
    let key = derive_key(passphrase, &salt, &params, KEY_LEN).map_err(|_| fail("kdf"))?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| fail("key length"))?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), ciphertext.as_slice())
        .map_err(|_| fail("authentication failed"))?;

    Ok(Zeroizing::new(plaintext))
}

/// Re-encrypt under a new passphrase (fresh salt and IV).
pub fn reseal(
    envelope: &EncryptedSecret,
    old_passphrase: &[u8],
    new_passphrase: &[u8],
    params: &KdfParams,
) -> Result<EncryptedSecret, WalletError> {
    let plaintext = open(envelope, old_passphrase)?;
    seal(&plaintext, new_passphrase, params)
}
