//! Orbit RPC client library.
//!
//! Provides async HTTP clients for the MultiversX gateway REST API and for
//! the reward relayer that pays out mining claims.
//!
//! # Example
//!
//! ```ignore
//! use orbit_rpc::GatewayClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = GatewayClient::new("https://devnet-gateway.multiversx.com");
//!     let config = gateway.get_network_config().await.unwrap();
//!     println!("Chain: {}", config.chain_id);
//! }
//! ```

pub mod error;
pub mod client;
pub mod gateway;
pub mod relayer;

pub use client::{RpcClient, RpcConfig};
pub use gateway::{AccountInfo, EsdtBalance, GatewayClient, NetworkConfig};
pub use relayer::{ClaimReceipt, ClaimRequest, RelayerClient};
pub use error::RpcError;
