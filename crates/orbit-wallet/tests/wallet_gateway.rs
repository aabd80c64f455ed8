//! Balance and transfer flows against a mocked gateway.

use orbit_tx::Payment;
use orbit_types::{Address, MnemonicWords};
use orbit_wallet::{OrbitConfig, Wallet, WalletError};
use serde_json::json;

const ALICE_PHRASE: &str = "moral volcano peasant pass circle pen over picture flat shop clap goat \
                            never lyrics gather prepare woman film husband gravity behind test tiger improve";
const ALICE: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";

fn wallet(url: &str) -> Wallet {
    let mut cfg = OrbitConfig::default();
    cfg.gateway_url = url.to_string();
    cfg.reward_token = "ORB-a1b2c3".into();
    Wallet::new(cfg)
}

async fn mock_account(server: &mut mockito::ServerGuard, nonce: u64, balance: &str) {
    server
        .mock("GET", format!("/address/{}", ALICE).as_str())
        .with_status(200)
        .with_body(
            json!({
                "data": {"account": {"address": ALICE, "nonce": nonce, "balance": balance}},
                "error": "", "code": "successful"
            })
            .to_string(),
        )
        .create_async()
        .await;
}

async fn mock_network_config(server: &mut mockito::ServerGuard) {
    server
        .mock("GET", "/network/config")
        .with_status(200)
        .with_body(
            json!({
                "data": {"config": {
                    "erd_chain_id": "D",
                    "erd_min_gas_price": 1000000000u64,
                    "erd_min_gas_limit": 50000,
                    "erd_gas_per_data_byte": 1500
                }},
                "error": "", "code": "successful"
            })
            .to_string(),
        )
        .create_async()
        .await;
}

#[tokio::test]
async fn test_balances() {
    let mut server = mockito::Server::new_async().await;
    mock_account(&mut server, 0, "2500000000000000000").await;
    server
        .mock("GET", format!("/address/{}/esdt", ALICE).as_str())
        .with_status(200)
        .with_body(
            json!({
                "data": {"esdts": {"ORB-a1b2c3": {"tokenIdentifier": "ORB-a1b2c3", "balance": "4000"}}},
                "error": "", "code": "successful"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let w = wallet(&server.url());
    let address = Address::from_bech32(ALICE).unwrap();
    let balances = w.balances(&address).await.unwrap();
    assert_eq!(balances.egld, 2_500_000_000_000_000_000);
    assert_eq!(balances.reward, 4_000);
}

#[tokio::test]
async fn test_balances_fall_back_to_zero() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", format!("/address/{}", ALICE).as_str())
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let w = wallet(&server.url());
    let report = w.balances_or_zero(&Address::from_bech32(ALICE).unwrap()).await;
    assert_eq!(report.balances.egld, 0);
    assert_eq!(report.balances.reward, 0);
    assert!(matches!(report.warning, Some(WalletError::Rpc(_))));
}

#[tokio::test]
async fn test_send_egld_signs_and_submits() {
    let mut server = mockito::Server::new_async().await;
    mock_account(&mut server, 7, "2000000000000000000").await;
    mock_network_config(&mut server).await;
    let send = server
        .mock("POST", "/transaction/send")
        .match_body(mockito::Matcher::PartialJson(json!({
            "nonce": 7,
            "value": "1000000000000000000",
            "sender": ALICE,
            "chainID": "D",
            "gasLimit": 50000,
            "signature": "77070362e04372658b12d2f3407773df34a8e914b3473f9f39a49710cfdbec77e22225cbf8c07b1999800b72d0043b7152c1c2f838ef6e7a23d9d3aad2c1c40c"
        })))
        .with_status(200)
        .with_body(r#"{"data":{"txHash":"c0ffee"},"error":"","code":"successful"}"#)
        .create_async()
        .await;

    let words = MnemonicWords::parse(ALICE_PHRASE).unwrap();
    let receiver = Address::from_public_key([0u8; 32]);
    let hash = wallet(&server.url())
        .send(&words, &receiver, Payment::Egld(1_000_000_000_000_000_000))
        .await
        .unwrap();
    assert_eq!(hash, "c0ffee");
    send.assert_async().await;
}

#[tokio::test]
async fn test_send_insufficient_balance() {
    let mut server = mockito::Server::new_async().await;
    mock_account(&mut server, 0, "1000").await;
    mock_network_config(&mut server).await;
    let send = server
        .mock("POST", "/transaction/send")
        .expect(0)
        .create_async()
        .await;

    let words = MnemonicWords::parse(ALICE_PHRASE).unwrap();
    let err = wallet(&server.url())
        .send(&words, &Address::from_public_key([0u8; 32]), Payment::Egld(1))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InsufficientBalance { .. }));
    send.assert_async().await;
}
