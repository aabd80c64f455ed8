//! Gas estimation.
//!
//! A move-balance transaction costs the network's minimum gas limit plus a
//! fixed amount per byte of the data field. ESDT transfers additionally pay
//! for the `ESDTTransfer` built-in function.

use orbit_types::constants::{
    DEFAULT_GAS_PER_DATA_BYTE, DEFAULT_MIN_GAS_LIMIT, DEFAULT_MIN_GAS_PRICE,
    ESDT_TRANSFER_EXTRA_GAS,
};

/// Gas parameters of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSchedule {
    pub min_gas_price: u64,
    pub min_gas_limit: u64,
    pub gas_per_data_byte: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            min_gas_price: DEFAULT_MIN_GAS_PRICE,
            min_gas_limit: DEFAULT_MIN_GAS_LIMIT,
            gas_per_data_byte: DEFAULT_GAS_PER_DATA_BYTE,
        }
    }
}

impl From<&orbit_rpc::NetworkConfig> for GasSchedule {
    fn from(cfg: &orbit_rpc::NetworkConfig) -> Self {
        Self {
            min_gas_price: cfg.min_gas_price,
            min_gas_limit: cfg.min_gas_limit,
            gas_per_data_byte: cfg.gas_per_data_byte,
        }
    }
}

impl GasSchedule {
    /// Gas limit for a transfer carrying `data_len` bytes of data.
    pub fn transfer_gas_limit(&self, data_len: usize, is_esdt: bool) -> u64 {
        let mut gas = self.min_gas_limit + self.gas_per_data_byte * data_len as u64;
        if is_esdt {
            gas += ESDT_TRANSFER_EXTRA_GAS;
        }
        gas
    }

    /// Fee ceiling for such a transfer at the minimum gas price.
    pub fn estimate_transfer_fee(&self, data_len: usize, is_esdt: bool) -> u128 {
        self.transfer_gas_limit(data_len, is_esdt) as u128 * self.min_gas_price as u128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_transfer_gas() {
        let g = GasSchedule::default();
        assert_eq!(g.transfer_gas_limit(0, false), 50_000);
        assert_eq!(g.transfer_gas_limit(4, false), 56_000);
    }

    #[test]
    fn test_esdt_transfer_gas() {
        let g = GasSchedule::default();
        // "ESDTTransfer@4f52422d613162326333@03e8" is 38 bytes.
        assert_eq!(g.transfer_gas_limit(38, true), 50_000 + 38 * 1_500 + 250_000);
    }

    #[test]
    fn test_fee_estimate() {
        let g = GasSchedule::default();
        assert_eq!(g.estimate_transfer_fee(0, false), 50_000_000_000_000);
    }
}
