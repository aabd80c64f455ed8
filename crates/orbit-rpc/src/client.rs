//! Base REST client for the MultiversX gateway envelope.
//!
//! Every gateway endpoint answers with `{"data": ..., "error": "", "code":
//! "successful"}`. `get()` and `post()` unwrap that envelope and return
//! `data`. Requests are attempted exactly once; callers decide whether a
//! user action is retried.

use crate::error::{RpcError, CODE_SUCCESSFUL};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Gateway response envelope.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

/// Configuration for an RPC client.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Base URL (e.g., `https://devnet-gateway.multiversx.com`).
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://devnet-gateway.multiversx.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Async REST client for gateway-style JSON endpoints.
pub struct RpcClient {
    client: reqwest::Client,
    config: RpcConfig,
}

impl RpcClient {
    /// Create a new client with the given URL.
    pub fn new(url: &str) -> Self {
        Self::with_config(RpcConfig {
            url: url.to_string(),
            ..Default::default()
        })
    }

    /// Create a new client with full configuration.
    pub fn with_config(mut config: RpcConfig) -> Self {
        config.url = config.url.trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(4)
            .build()
            .expect("failed to create HTTP client");

        Self { client, config }
    }

    /// Get the configured base URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// GET an endpoint and return the envelope's `data`.
    pub async fn get(&self, endpoint: &str) -> Result<Value, RpcError> {
        let url = format!("{}{}", self.config.url, endpoint);
        log::debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .headers(Self::build_headers())
            .send()
            .await
            .map_err(|e| RpcError::Http {
                method: "GET".to_string(),
                url: url.clone(),
                source: e,
            })?;

        Self::read_envelope("GET", &url, endpoint, resp).await
    }

    /// POST a JSON body to an endpoint and return the envelope's `data`.
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, RpcError> {
        let url = format!("{}{}", self.config.url, endpoint);
        log::debug!("POST {}", url);

        let resp = self
            .client
            .post(&url)
            .headers(Self::build_headers())
            .json(body)
            .send()
            .await
            .map_err(|e| RpcError::Http {
                method: "POST".to_string(),
                url: url.clone(),
                source: e,
            })?;

        Self::read_envelope("POST", &url, endpoint, resp).await
    }

    async fn read_envelope(
        method: &str,
        url: &str,
        endpoint: &str,
        resp: reqwest::Response,
    ) -> Result<Value, RpcError> {
        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| RpcError::Http {
            method: method.to_string(),
            url: url.to_string(),
            source: e,
        })?;

        // Gateway errors come back as an envelope with a 4xx/5xx status.
        // Anything unparseable is reported with the raw body.
        let envelope: Envelope = match serde_json::from_str(&text) {
            Ok(env) => env,
            Err(e) if status < 400 => return Err(RpcError::Json(e)),
            Err(_) => {
                return Err(RpcError::HttpStatus {
                    method: method.to_string(),
                    url: url.to_string(),
                    status,
                    body: text.chars().take(500).collect(),
                })
            }
        };

        if status >= 400 || (!envelope.code.is_empty() && envelope.code != CODE_SUCCESSFUL) {
            log::warn!("{} {} failed: {} {}", method, url, envelope.code, envelope.error);
            return Err(RpcError::Api {
                code: if envelope.code.is_empty() {
                    status.to_string()
                } else {
                    envelope.code
                },
                message: envelope.error,
                context: endpoint.to_string(),
            });
        }

        envelope.data.ok_or(RpcError::NoData {
            context: endpoint.to_string(),
        })
    }

    /// Simple connectivity check (GET /network/config).
    pub async fn is_connected(&self) -> bool {
        self.get("/network/config").await.is_ok()
    }
}
