//! BIP-39 mnemonic phrases.
//!
//! Wallets are backed by a 24-word English BIP-39 phrase. The seed used for
//! key derivation is the standard PBKDF2 BIP-39 seed with an empty
//! passphrase.

use crate::constants::MNEMONIC_WORD_COUNT;
use bip39::{Language, Mnemonic};
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

#[derive(Debug, Error)]
pub enum MnemonicError {
    #[error("expected 12, 15, 18, 21 or 24 words, got {0}")]
    WrongWordCount(usize),

    #[error("unknown word \"{word}\" at position {position}")]
    UnknownWord { word: String, position: usize },

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid mnemonic: {0}")]
    Invalid(String),
}

impl From<bip39::Error> for MnemonicError {
    fn from(e: bip39::Error) -> Self {
        match e {
            bip39::Error::BadWordCount(n) => MnemonicError::WrongWordCount(n),
            bip39::Error::InvalidChecksum => MnemonicError::ChecksumMismatch,
            other => MnemonicError::Invalid(other.to_string()),
        }
    }
}

/// An ordered mnemonic word sequence.
///
/// The words are wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct MnemonicWords {
    words: Vec<String>,
}

impl MnemonicWords {
    /// Generate a fresh random 24-word phrase.
    pub fn generate() -> Result<Self, MnemonicError> {
        let mnemonic = Mnemonic::generate_in(Language::English, MNEMONIC_WORD_COUNT)?;
        let phrase = Zeroizing::new(mnemonic.to_string());
        Ok(Self::from_words_unchecked(phrase.split_whitespace()))
    }

    /// Parse and validate a phrase (wordlist membership and checksum).
    ///
    /// Whitespace is normalised and words are lower-cased.
    pub fn parse(phrase: &str) -> Result<Self, MnemonicError> {
        let normalized = Zeroizing::new(
            phrase
                .split_whitespace()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join(" "),
        );

        for (i, word) in normalized.split(' ').enumerate() {
            if !word.is_empty() && Language::English.find_word(word).is_none() {
                return Err(MnemonicError::UnknownWord {
                    word: word.to_string(),
                    position: i + 1,
                });
            }
        }

        Mnemonic::parse_in(Language::English, normalized.as_str())?;
        Ok(Self::from_words_unchecked(normalized.split(' ')))
    }

    /// Wrap decrypted words without wordlist validation.
    ///
    /// Used when the words come back out of the vault: the vault stores
    /// whatever sequence it was given.
    pub fn from_words_unchecked<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: words.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Space-joined phrase. The caller owns wiping the returned buffer.
    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.words.join(" "))
    }

    /// 64-byte BIP-39 seed (empty BIP-39 passphrase).
    pub fn to_seed(&self) -> Result<Zeroizing<[u8; 64]>, MnemonicError> {
        let phrase = self.phrase();
        let mnemonic = Mnemonic::parse_in(Language::English, phrase.as_str())?;
        Ok(Zeroizing::new(mnemonic.to_seed("")))
    }
}

impl Drop for MnemonicWords {
    fn drop(&mut self) {
        self.words.zeroize();
    }
}

impl fmt::Debug for MnemonicWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MnemonicWords(<{} words redacted>)", self.words.len())
    }
}

/// Check if a single word is in the BIP-39 English wordlist.
pub fn is_valid_word(word: &str) -> bool {
    Language::English.find_word(word).is_some()
}
