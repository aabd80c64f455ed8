//! First-run flow: introduce the app, create the wallet, and make the user
//! acknowledge that the recovery phrase is their responsibility.

use crate::error::WalletError;
use crate::storage::KeyValueStore;
use crate::vault::{self, MnemonicVault};
use orbit_types::constants::storage_keys;
use orbit_types::{Address, MnemonicWords};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Welcome,
    About,
    Generate,
    Disclaimer,
    Done,
}

pub struct Onboarding<'a> {
    vault: &'a MnemonicVault,
    store: &'a dyn KeyValueStore,
    step: OnboardingStep,
    words: Option<MnemonicWords>,
}

impl<'a> Onboarding<'a> {
    pub fn new(vault: &'a MnemonicVault, store: &'a dyn KeyValueStore) -> Self {
        Self {
            vault,
            store,
            step: OnboardingStep::Welcome,
            words: None,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    /// Words generated or restored in this flow, for display.
    pub fn words(&self) -> Option<&MnemonicWords> {
        self.words.as_ref()
    }

    /// Advance one step.
    pub fn next(&mut self) -> Result<OnboardingStep, WalletError> {
        self.step = match self.step {
            OnboardingStep::Welcome => OnboardingStep::About,
            OnboardingStep::About => OnboardingStep::Generate,
            OnboardingStep::Generate => {
                if self.words.is_none() {
                    return Err(WalletError::Onboarding("generate a wallet first".into()));
                }
                OnboardingStep::Disclaimer
            }
            OnboardingStep::Disclaimer => {
                return Err(WalletError::Onboarding(
                    "acknowledge the disclaimer to continue".into(),
                ))
            }
            OnboardingStep::Done => OnboardingStep::Done,
        };
        Ok(self.step)
    }

    fn expect_step(&self, step: OnboardingStep) -> Result<(), WalletError> {
        if self.step != step {
            return Err(WalletError::Onboarding(format!(
                "not available at step {:?}",
                self.step
            )));
        }
        Ok(())
    }

    /// Generate a new phrase (replacing any shown before).
    pub fn generate(&mut self) -> Result<&MnemonicWords, WalletError> {
        self.expect_step(OnboardingStep::Generate)?;
        Ok(self.words.insert(self.vault.generate()?))
    }

    /// Use an existing phrase instead of generating one.
    pub fn restore(&mut self, phrase: &str) -> Result<&MnemonicWords, WalletError> {
        self.expect_step(OnboardingStep::Generate)?;
        Ok(self.words.insert(self.vault.restore(phrase)?))
    }

    /// "I understand": seal the phrase under `passphrase`, record the
    /// wallet address and mark onboarding complete.
    pub fn acknowledge(&mut self, passphrase: &str) -> Result<Address, WalletError> {
        self.expect_step(OnboardingStep::Disclaimer)?;
        let words = self
            .words
            .as_ref()
            .ok_or_else(|| WalletError::Onboarding("no wallet generated".into()))?;

        let address = vault::derive_address(words)?;
        self.vault.encrypt_and_store(words, passphrase)?;
        self.store
            .set(storage_keys::WALLET_ADDRESS, &address.to_bech32())?;
        self.store.set(storage_keys::HAS_VISITED, "true")?;

        self.words = None;
        self.step = OnboardingStep::Done;
        log::info!("onboarding complete for {}", address);
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::KdfParams;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryStore>, MnemonicVault) {
        let store = Arc::new(MemoryStore::new());
        let vault = MnemonicVault::new(store.clone(), KdfParams::insecure_fast());
        (store, vault)
    }

    #[test]
    fn test_full_flow() {
        let (store, vault) = setup();
        let mut flow = Onboarding::new(&vault, store.as_ref());

        assert_eq!(flow.next().unwrap(), OnboardingStep::About);
        assert_eq!(flow.next().unwrap(), OnboardingStep::Generate);
        assert!(flow.next().is_err());

        let phrase = flow.generate().unwrap().phrase();
        assert_eq!(flow.next().unwrap(), OnboardingStep::Disclaimer);
        assert!(flow.next().is_err());

        let address = flow.acknowledge("1234").unwrap();
        assert_eq!(flow.step(), OnboardingStep::Done);
        assert!(flow.words().is_none());

        assert_eq!(
            store.get(storage_keys::WALLET_ADDRESS).unwrap(),
            Some(address.to_bech32())
        );
        assert_eq!(store.get(storage_keys::HAS_VISITED).unwrap().as_deref(), Some("true"));
        assert_eq!(vault.unlock("1234").unwrap().phrase(), phrase);
    }

    #[test]
    fn test_actions_out_of_order() {
        let (store, vault) = setup();
        let mut flow = Onboarding::new(&vault, store.as_ref());
        assert!(flow.generate().is_err());
        assert!(flow.acknowledge("1234").is_err());
        assert!(store.get(storage_keys::HAS_VISITED).unwrap().is_none());
    }

    #[test]
    fn test_restore_path() {
        let (store, vault) = setup();
        let mut flow = Onboarding::new(&vault, store.as_ref());
        flow.next().unwrap();
        flow.next().unwrap();
        flow.restore(
            "moral volcano peasant pass circle pen over picture flat shop clap goat \
             never lyrics gather prepare woman film husband gravity behind test tiger improve",
        )
        .unwrap();
        flow.next().unwrap();
        let address = flow.acknowledge("654321").unwrap();
        assert_eq!(
            address.to_bech32(),
            "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th"
        );
    }
}
