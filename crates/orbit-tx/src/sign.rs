//! Transaction signing.
//!
//! The signature is ed25519 over the compact JSON serialization of the
//! unsigned transaction (see [`crate::types::Transaction`] for field order).

use crate::types::Transaction;
use crate::TxError;
use orbit_crypto::Keypair;
use orbit_types::Address;

/// Bytes that get signed: the JSON of the transaction without signature.
pub fn signing_payload(tx: &Transaction) -> Result<Vec<u8>, TxError> {
    let mut unsigned = tx.clone();
    unsigned.signature = None;
    serde_json::to_vec(&unsigned).map_err(|e| TxError::Serialize(e.to_string()))
}

/// Sign a transaction with the sender's keypair.
///
/// Fails if the keypair does not belong to the transaction's sender.
pub fn sign_transaction(mut tx: Transaction, keypair: &Keypair) -> Result<Transaction, TxError> {
    let signer = Address::from_public_key(keypair.public_key());
    if signer.to_bech32() != tx.sender {
        return Err(TxError::Signing(format!(
            "keypair address {} does not match sender {}",
            signer, tx.sender
        )));
    }

    let payload = signing_payload(&tx)?;
    tx.signature = Some(hex::encode(keypair.sign(&payload)));
    Ok(tx)
}

/// Verify a signed transaction against its sender address.
pub fn verify_transaction(tx: &Transaction) -> Result<(), TxError> {
    let sig_hex = tx
        .signature
        .as_deref()
        .ok_or_else(|| TxError::Signing("transaction is not signed".into()))?;
    let sig_bytes = hex::decode(sig_hex).map_err(|e| TxError::Signing(e.to_string()))?;
    let sig: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| TxError::Signing("signature must be 64 bytes".into()))?;

    let sender = Address::from_bech32(&tx.sender)
        .map_err(|e| TxError::Invalid(format!("sender: {}", e)))?;
    let payload = signing_payload(tx)?;
    orbit_crypto::verify_signature(sender.public_key(), &payload, &sig)
        .map_err(|e| TxError::Signing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransactionBuilder;
    use crate::types::Payment;

    fn alice() -> Keypair {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(
            &hex::decode("413f42575f7f26fad3317a778771212fdb80245850981e48b58a4f25e344e8f9")
                .unwrap(),
        );
        Keypair::from_secret(&secret)
    }

    fn unsigned_from(kp: &Keypair) -> Transaction {
        TransactionBuilder::new("D")
            .nonce(7)
            .sender(Address::from_public_key(kp.public_key()))
            .receiver(Address::from_public_key([0u8; 32]))
            .payment(Payment::Egld(1_000_000_000_000_000_000))
            .build()
            .unwrap()
    }

    #[test]
    fn test_sign_known_vector() {
        let kp = alice();
        let signed = sign_transaction(unsigned_from(&kp), &kp).unwrap();
        assert_eq!(
            signed.signature.as_deref().unwrap(),
            "77070362e04372658b12d2f3407773df34a8e914b3473f9f39a49710cfdbec77\
             e22225cbf8c07b1999800b72d0043b7152c1c2f838ef6e7a23d9d3aad2c1c40c"
        );
        assert!(verify_transaction(&signed).is_ok());
    }

    #[test]
    fn test_tampered_transaction_fails_verification() {
        let kp = alice();
        let mut signed = sign_transaction(unsigned_from(&kp), &kp).unwrap();
        signed.value += 1;
        assert!(verify_transaction(&signed).is_err());
    }

    #[test]
    fn test_wrong_keypair_rejected() {
        let kp = alice();
        let other = Keypair::from_secret(&[2u8; 32]);
        let err = sign_transaction(unsigned_from(&kp), &other).unwrap_err();
        assert!(matches!(err, TxError::Signing(_)));
    }

    #[test]
    fn test_unsigned_fails_verification() {
        let kp = alice();
        assert!(verify_transaction(&unsigned_from(&kp)).is_err());
    }
}
