//! Transaction builder.
//!
//! Assembles sender, receiver, payment, nonce and gas into an unsigned
//! [`Transaction`]. ESDT payments are encoded as an `ESDTTransfer` call in
//! the data field with a zero EGLD value.

use crate::fee::GasSchedule;
use crate::types::{Payment, Transaction};
use crate::TxError;
use orbit_types::amount::to_even_hex;
use orbit_types::constants::TX_VERSION;
use orbit_types::Address;

/// Encode the data field of an `ESDTTransfer` built-in call.
pub fn esdt_transfer_data(token: &str, amount: u128) -> Vec<u8> {
    format!(
        "ESDTTransfer@{}@{}",
        hex::encode(token.as_bytes()),
        to_even_hex(amount)
    )
    .into_bytes()
}

/// Builder for constructing transfer transactions.
pub struct TransactionBuilder {
    chain_id: String,
    nonce: Option<u64>,
    sender: Option<Address>,
    receiver: Option<Address>,
    payment: Option<Payment>,
    gas: GasSchedule,
    gas_price: Option<u64>,
}

impl TransactionBuilder {
    pub fn new(chain_id: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            nonce: None,
            sender: None,
            receiver: None,
            payment: None,
            gas: GasSchedule::default(),
            gas_price: None,
        }
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn receiver(mut self, receiver: Address) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn gas_schedule(mut self, gas: GasSchedule) -> Self {
        self.gas = gas;
        self
    }

    /// Override the gas price (defaults to the schedule minimum).
    pub fn gas_price(mut self, price: u64) -> Self {
        self.gas_price = Some(price);
        self
    }

    /// Build the unsigned transaction.
    pub fn build(self) -> Result<Transaction, TxError> {
        let nonce = self.nonce.ok_or(TxError::Missing("nonce"))?;
        let sender = self.sender.ok_or(TxError::Missing("sender"))?;
        let receiver = self.receiver.ok_or(TxError::Missing("receiver"))?;
        let payment = self.payment.ok_or(TxError::Missing("payment"))?;

        if payment.amount() == 0 {
            return Err(TxError::Invalid("amount must be greater than zero".into()));
        }
        if self.chain_id.is_empty() {
            return Err(TxError::Invalid("chain id is empty".into()));
        }

        let gas_price = self.gas_price.unwrap_or(self.gas.min_gas_price);
        if gas_price < self.gas.min_gas_price {
            return Err(TxError::Invalid(format!(
                "gas price {} below network minimum {}",
                gas_price, self.gas.min_gas_price
            )));
        }

        let (value, data) = match &payment {
            Payment::Egld(amount) => (*amount, Vec::new()),
            Payment::Esdt { token, amount } => {
                if token.is_empty() {
                    return Err(TxError::Invalid("token identifier is empty".into()));
                }
                (0, esdt_transfer_data(token, *amount))
            }
        };
        let gas_limit = self.gas.transfer_gas_limit(data.len(), payment.is_esdt());

        Ok(Transaction {
            nonce,
            value,
            receiver: receiver.to_bech32(),
            sender: sender.to_bech32(),
            gas_price,
            gas_limit,
            data,
            chain_id: self.chain_id,
            version: TX_VERSION,
            signature: None,
        })
    }
}
