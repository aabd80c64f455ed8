//! SLIP-0010 hierarchical derivation for ed25519.
//!
//! Ed25519 only supports hardened derivation; the hardened bit is set on
//! every index automatically. Account keys live at
//! `m/44'/508'/account'/0'/index'`.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

const HARDENED: u32 = 0x8000_0000;

/// SLIP-0044 coin type of EGLD.
const COIN_TYPE: u32 = 508;

fn hmac_split(key: &[u8], parts: &[&[u8]]) -> (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>) {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
    for part in parts {
        mac.update(part);
    }
    let mut result = Zeroizing::new([0u8; 64]);
    result.copy_from_slice(&mac.finalize().into_bytes());

    let mut left = Zeroizing::new([0u8; 32]);
    let mut right = Zeroizing::new([0u8; 32]);
    left.copy_from_slice(&result[..32]);
    right.copy_from_slice(&result[32..]);
    (left, right)
}

/// Master key and chain code from a BIP-39 seed.
fn master_key(seed: &[u8]) -> (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>) {
    hmac_split(b"ed25519 seed", &[seed])
}

/// Hardened child of `(key, chain_code)`.
fn derive_child(
    key: &[u8; 32],
    chain_code: &[u8; 32],
    index: u32,
) -> (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>) {
    let hardened = index | HARDENED;
    let index_bytes = hardened.to_be_bytes();
    hmac_split(chain_code, &[&[0x00u8][..], &key[..], &index_bytes[..]])
}

/// Derive the private key at `path` (each index hardened).
pub fn slip10_derive_path(seed: &[u8], path: &[u32]) -> Zeroizing<[u8; 32]> {
    let (mut key, mut chain_code) = master_key(seed);
    for &index in path {
        let (k, c) = derive_child(&key, &chain_code, index);
        key = k;
        chain_code = c;
    }
    key
}

/// Derive the private key of `account`/`index` along the EGLD BIP-44 path.
pub fn derive_account_key(seed: &[u8], account: u32, index: u32) -> Zeroizing<[u8; 32]> {
    slip10_derive_path(seed, &[44, COIN_TYPE, account, 0, index])
}

#[cfg(test)]
mod tests {
    use super::*;

    // SLIP-0010 test vector 1 for ed25519.
    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn test_slip10_master_vector() {
        let seed = hex::decode(SEED).unwrap();
        let (key, chain_code) = master_key(&seed);
        assert_eq!(
            hex::encode(*key),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(*chain_code),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
    }

    #[test]
    fn test_slip10_first_hardened_child_vector() {
        let seed = hex::decode(SEED).unwrap();
        let key = slip10_derive_path(&seed, &[0]);
        assert_eq!(
            hex::encode(*key),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn test_empty_path_is_master() {
        let seed = hex::decode(SEED).unwrap();
        assert_eq!(*slip10_derive_path(&seed, &[]), *master_key(&seed).0);
    }

    #[test]
    fn test_account_indices_differ() {
        let seed = [5u8; 64];
        let a = derive_account_key(&seed, 0, 0);
        let b = derive_account_key(&seed, 0, 1);
        let c = derive_account_key(&seed, 1, 0);
        assert_ne!(*a, *b);
        assert_ne!(*a, *c);
    }
}
