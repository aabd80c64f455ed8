//! Reward relayer client.
//!
//! Mining rewards are paid by a server-side signer. The wallet only asks
//! the relayer to pay out a finished window; it never holds the payer key.
//! The relayer answers with the gateway envelope format.

use crate::client::{RpcClient, RpcConfig};
use crate::error::RpcError;
use serde::{Deserialize, Serialize};

/// Claim for one elapsed accrual window.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    /// Bech32 address receiving the reward.
    pub address: String,
    /// Reward units, as a decimal string.
    pub amount: String,
    /// Window start, millisecond epoch.
    pub window_start: i64,
    /// Window end, millisecond epoch.
    pub window_end: i64,
}

/// Relayer acknowledgement of a paid claim.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReceipt {
    /// Hash of the reward transfer transaction.
    pub tx_hash: String,
}

/// Async client for the reward relayer.
pub struct RelayerClient {
    client: RpcClient,
}

impl RelayerClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: RpcClient::new(url),
        }
    }

    pub fn with_config(config: RpcConfig) -> Self {
        Self {
            client: RpcClient::with_config(config),
        }
    }

    pub fn url(&self) -> &str {
        self.client.url()
    }

    /// Ask the relayer to transfer the reward of a finished window.
    pub async fn submit_claim(&self, request: &ClaimRequest) -> Result<ClaimReceipt, RpcError> {
        let body = serde_json::to_value(request)?;
        let data = self.client.post("/claims", &body).await?;
        Ok(serde_json::from_value(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> ClaimRequest {
        ClaimRequest {
            address: "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th".into(),
            amount: "2000".into(),
            window_start: 1_700_000_000_000,
            window_end: 1_700_007_200_000,
        }
    }

    #[test]
    fn test_request_wire_format() {
        let v = serde_json::to_value(request()).unwrap();
        assert_eq!(v["amount"], "2000");
        assert_eq!(v["windowStart"], 1_700_000_000_000i64);
        assert_eq!(v["windowEnd"], 1_700_007_200_000i64);
    }

    #[tokio::test]
    async fn test_submit_claim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/claims")
            .match_body(mockito::Matcher::Json(serde_json::to_value(request()).unwrap()))
            .with_status(200)
            .with_body(r#"{"data":{"txHash":"f00d"},"error":"","code":"successful"}"#)
            .create_async()
            .await;

        let relayer = RelayerClient::new(&server.url());
        let receipt = relayer.submit_claim(&request()).await.unwrap();
        assert_eq!(receipt.tx_hash, "f00d");
    }

    #[tokio::test]
    async fn test_submit_claim_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/claims")
            .with_status(409)
            .with_body(json!({"data": null, "error": "window already claimed", "code": "conflict"}).to_string())
            .create_async()
            .await;

        let relayer = RelayerClient::new(&server.url());
        let err = relayer.submit_claim(&request()).await.unwrap_err();
        assert!(matches!(err, RpcError::Api { ref code, .. } if code == "conflict"));
    }
}
