//! Thin proxy over the TONAPI account endpoint. No transfers are ever
//! executed here; the transfer route is a mock echo until real settlement
//! lands.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TonError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Upstream { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct TonClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TonClient {
    pub fn new(http: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Fetch a wallet balance in nanotons from `{base}/v2/accounts/{address}`.
    ///
    /// TONAPI has shipped the balance both at the top level and nested under
    /// `ton`; absent both, the balance is zero.
    pub async fn get_balance(&self, address: &str) -> Result<i64, TonError> {
        let url = format!("{}/v2/accounts/{}", self.base_url, address);

        let mut req = self.http.get(&url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TonError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = resp.json().await?;
        let balance = value_as_i64(data.get("balance"))
            .or_else(|| value_as_i64(data.get("ton").and_then(|t| t.get("balance"))))
            .unwrap_or(0);

        Ok(balance)
    }
}

fn value_as_i64(v: Option<&Value>) -> Option<i64> {
    let v = v?;
    v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}
