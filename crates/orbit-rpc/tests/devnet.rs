//! Devnet integration tests for the gateway client.
//!
//! Run with: cargo test -p orbit-rpc --test devnet -- --ignored
//!
//! Uses DEVNET_GATEWAY_URL (default: https://devnet-gateway.multiversx.com).

use orbit_rpc::GatewayClient;

const ALICE: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";

fn gateway() -> GatewayClient {
    let url = std::env::var("DEVNET_GATEWAY_URL")
        .unwrap_or_else(|_| "https://devnet-gateway.multiversx.com".to_string());
    GatewayClient::new(&url)
}

#[tokio::test]
#[ignore]
async fn test_network_config() {
    let cfg = gateway().get_network_config().await.expect("get_network_config failed");
    assert_eq!(cfg.chain_id, "D");
    assert!(cfg.min_gas_limit >= 50_000);
    println!("Min gas price: {}", cfg.min_gas_price);
}

#[tokio::test]
#[ignore]
async fn test_alice_account() {
    let acct = gateway().get_account(ALICE).await.expect("get_account failed");
    assert_eq!(acct.address, ALICE);
    println!("Alice nonce: {}, balance: {}", acct.nonce, acct.balance);
}

#[tokio::test]
#[ignore]
async fn test_alice_tokens() {
    let tokens = gateway()
        .get_esdt_balances(ALICE)
        .await
        .expect("get_esdt_balances failed");
    for (id, bal) in &tokens {
        println!("{}: {}", id, bal.balance);
    }
}
