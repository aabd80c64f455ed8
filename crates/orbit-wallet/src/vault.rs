//! Encrypted mnemonic vault.
//!
//! The mnemonic only ever exists in plaintext in memory: it is sealed with
//! the user's passphrase (see [`crate::encryption`]) and stored under the
//! `mnemonicWords` slot. The vault also remembers a SHA-256 fingerprint of
//! every phrase it issued this session so `generate` never repeats one.

use crate::encryption::{self, EncryptedSecret, KdfParams};
use crate::error::WalletError;
use crate::storage::KeyValueStore;
use orbit_crypto::Keypair;
use orbit_types::constants::storage_keys;
use orbit_types::{Address, MnemonicWords};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Attempts before `generate` gives up finding an unissued phrase.
const MAX_GENERATE_ATTEMPTS: usize = 8;

pub struct MnemonicVault {
    store: Arc<dyn KeyValueStore>,
    kdf: KdfParams,
    issued: Mutex<HashSet<[u8; 32]>>,
}

impl MnemonicVault {
    pub fn new(store: Arc<dyn KeyValueStore>, kdf: KdfParams) -> Self {
        Self {
            store,
            kdf,
            issued: Mutex::new(HashSet::new()),
        }
    }

    fn fingerprint(words: &MnemonicWords) -> [u8; 32] {
        orbit_crypto::sha256(words.phrase().as_bytes())
    }

    fn remember(&self, words: &MnemonicWords) -> Result<bool, WalletError> {
        let mut issued = self
            .issued
            .lock()
            .map_err(|_| WalletError::Other("vault lock poisoned".into()))?;
        Ok(issued.insert(Self::fingerprint(words)))
    }

    /// Generate a fresh 24-word mnemonic not issued earlier this session.
    pub fn generate(&self) -> Result<MnemonicWords, WalletError> {
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let words = MnemonicWords::generate()?;
            if self.remember(&words)? {
                log::debug!("generated new {}-word mnemonic", words.len());
                return Ok(words);
            }
            log::warn!("generated mnemonic collided with an issued one, retrying");
        }
        Err(WalletError::Other("could not generate a fresh mnemonic".into()))
    }

    /// Accept a user-supplied phrase (wallet restore).
    ///
    /// The phrase is validated against the BIP-39 wordlist and checksum.
    /// Restoring a phrase already issued this session is allowed.
    pub fn restore(&self, phrase: &str) -> Result<MnemonicWords, WalletError> {
        let words = MnemonicWords::parse(phrase)?;
        self.remember(&words)?;
        Ok(words)
    }

    /// Seal `words` under `passphrase` and persist the envelope.
    pub fn encrypt_and_store(
        &self,
        words: &MnemonicWords,
        passphrase: &str,
    ) -> Result<EncryptedSecret, WalletError> {
        if words.is_empty() {
            return Err(WalletError::Encryption("no words to encrypt".into()));
        }
        if passphrase.is_empty() {
            return Err(WalletError::Encryption("passphrase is empty".into()));
        }

        let envelope = encryption::seal(words.phrase().as_bytes(), passphrase.as_bytes(), &self.kdf)?;
        self.store
            .set(storage_keys::MNEMONIC_WORDS, &envelope.to_json()?)?;
        log::info!("mnemonic sealed and stored");
        Ok(envelope)
    }

    /// Decrypt an envelope back into words.
    pub fn decrypt(
        &self,
        envelope: &EncryptedSecret,
        passphrase: &str,
    ) -> Result<MnemonicWords, WalletError> {
        let plaintext = encryption::open(envelope, passphrase.as_bytes())?;
        let phrase = std::str::from_utf8(&plaintext).map_err(|_| {
            log::debug!("decrypted mnemonic is not UTF-8");
            WalletError::DecryptionFailed
        })?;
        let words = MnemonicWords::from_words_unchecked(phrase.split_whitespace());
        if words.is_empty() {
            return Err(WalletError::DecryptionFailed);
        }
        Ok(words)
    }

    /// The stored envelope, if a wallet exists.
    pub fn load_envelope(&self) -> Result<Option<EncryptedSecret>, WalletError> {
        match self.store.get(storage_keys::MNEMONIC_WORDS)? {
            Some(json) => EncryptedSecret::from_json(&json).map(Some),
            None => Ok(None),
        }
    }

    pub fn has_secret(&self) -> Result<bool, WalletError> {
        Ok(self.store.get(storage_keys::MNEMONIC_WORDS)?.is_some())
    }

    /// Load the stored envelope and decrypt it.
    pub fn unlock(&self, passphrase: &str) -> Result<MnemonicWords, WalletError> {
        let envelope = self.load_envelope()?.ok_or(WalletError::NoWallet)?;
        self.decrypt(&envelope, passphrase)
    }

    /// Re-encrypt the stored mnemonic under a new passphrase.
    pub fn change_passphrase(&self, old: &str, new: &str) -> Result<(), WalletError> {
        if new.is_empty() {
            return Err(WalletError::Encryption("passphrase is empty".into()));
        }
        let envelope = self.load_envelope()?.ok_or(WalletError::NoWallet)?;
        let resealed = encryption::reseal(&envelope, old.as_bytes(), new.as_bytes(), &self.kdf)?;
        self.store
            .set(storage_keys::MNEMONIC_WORDS, &resealed.to_json()?)?;
        log::info!("mnemonic passphrase changed");
        Ok(())
    }
}

/// Account keypair at `m/44'/508'/0'/0'/0'`.
pub fn derive_keypair(words: &MnemonicWords) -> Result<Keypair, WalletError> {
    let seed = words.to_seed()?;
    let secret = orbit_crypto::derive_account_key(&seed[..], 0, 0);
    Ok(Keypair::from_secret(&secret))
}

/// Wallet address of the first account.
pub fn derive_address(words: &MnemonicWords) -> Result<Address, WalletError> {
    Ok(Address::from_public_key(derive_keypair(words)?.public_key()))
}
