use crate::domain::model::{Account, AccountFilter};
use crate::domain::ports::AccountFetcher;
use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use async_trait::async_trait;
use base64::Engine;
use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// `getMultipleAccounts` accepts at most this many keys per call.
pub const MAX_MULTIPLE_ACCOUNTS: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl FromStr for Commitment {
    type Err = SnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(SnsError::InvalidConfigValueError {
                field: "rpc.commitment".to_string(),
                value: other.to_string(),
                reason: "expected processed, confirmed or finalized".to_string(),
            }),
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

/// Account as encoded by the node with `"encoding": "base64"`.
#[derive(Deserialize)]
struct UiAccount {
    lamports: u64,
    owner: Pubkey,
    data: (String, String),
    executable: bool,
}

impl TryFrom<UiAccount> for Account {
    type Error = SnsError;

    fn try_from(ui: UiAccount) -> Result<Self> {
        let (encoded, encoding) = ui.data;
        if encoding != "base64" {
            return Err(SnsError::InvalidAccountData {
                message: format!("unexpected account encoding {}", encoding),
            });
        }
        Ok(Account {
            lamports: ui.lamports,
            owner: ui.owner,
            data: base64::engine::general_purpose::STANDARD.decode(encoded)?,
            executable: ui.executable,
        })
    }
}

#[derive(Deserialize)]
struct KeyedUiAccount {
    pubkey: Pubkey,
    account: UiAccount,
}

#[derive(Deserialize)]
struct TokenAmountEntry {
    address: Pubkey,
}

/// Solana JSON-RPC client over reqwest.
pub struct RpcClient {
    client: Client,
    url: String,
    commitment: Commitment,
    timeout: Duration,
    retry_attempts: u32,
    retry_delay: Duration,
    batch_size: usize,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            commitment: Commitment::default(),
            timeout: Duration::from_secs(30),
            retry_attempts: 2,
            retry_delay: Duration::from_millis(250),
            batch_size: MAX_MULTIPLE_ACCOUNTS,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    /// Chunk size for `getMultipleAccounts`, clamped to `1..=100`.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_MULTIPLE_ACCOUNTS);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    fn account_config(&self) -> Value {
        json!({ "encoding": "base64", "commitment": self.commitment.as_str() })
    }

    /// Sends one JSON-RPC call, retrying transport failures, HTTP 429 and 5xx.
    /// Error objects returned by the node are final.
    pub async fn send<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        let mut attempt = 0;
        loop {
            match self.post(&body).await {
                Ok(value) => return Self::decode(method, value),
                Err(err) if attempt < self.retry_attempts && is_retryable(&err) => {
                    attempt += 1;
                    warn!(method, attempt, error = %err, "🔄 RPC request failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn post(&self, body: &Value) -> Result<Value> {
        debug!(url = %self.url, method = %body["method"], "sending RPC request");
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SnsError::Rpc {
                code: i64::from(status.as_u16()),
                message: format!("HTTP {}: {}", status, message.trim()),
            });
        }
        Ok(response.json().await?)
    }

    fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T> {
        let response: RpcResponse<T> = serde_json::from_value(value)?;
        if let Some(error) = response.error {
            debug!(method, code = error.code, "RPC error object");
            return Err(SnsError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response.result.ok_or_else(|| SnsError::Rpc {
            code: 0,
            message: format!("{} returned neither result nor error", method),
        })
    }

    async fn get_multiple_accounts_chunk(&self, keys: &[Pubkey]) -> Result<Vec<Option<Account>>> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let response: WithContext<Vec<Option<UiAccount>>> = self
            .send("getMultipleAccounts", json!([keys, self.account_config()]))
            .await?;
        if response.value.len() != keys.len() {
            return Err(SnsError::InvalidAccountData {
                message: format!(
                    "asked for {} accounts, node returned {}",
                    keys.len(),
                    response.value.len()
                ),
            });
        }
        response
            .value
            .into_iter()
            .map(|account| account.map(Account::try_from).transpose())
            .collect()
    }
}

fn is_retryable(err: &SnsError) -> bool {
    match err {
        SnsError::HttpError(_) => true,
        SnsError::Rpc { code, .. } => {
            *code == i64::from(StatusCode::TOO_MANY_REQUESTS.as_u16()) || (500..600).contains(code)
        }
        _ => false,
    }
}

#[async_trait]
impl AccountFetcher for RpcClient {
    async fn get_account(&self, key: &Pubkey) -> Result<Option<Account>> {
        let response: WithContext<Option<UiAccount>> = self
            .send(
                "getAccountInfo",
                json!([key.to_string(), self.account_config()]),
            )
            .await?;
        response.value.map(Account::try_from).transpose()
    }

    async fn get_multiple_accounts(&self, keys: &[Pubkey]) -> Result<Vec<Option<Account>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let chunks = try_join_all(
            keys.chunks(self.batch_size)
                .map(|chunk| self.get_multiple_accounts_chunk(chunk)),
        )
        .await?;
        Ok(chunks.into_iter().flatten().collect())
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Account)>> {
        let mut config = self.account_config();
        config["filters"] = Value::Array(filters.iter().map(AccountFilter::to_json).collect());
        let accounts: Vec<KeyedUiAccount> = self
            .send(
                "getProgramAccounts",
                json!([program_id.to_string(), config]),
            )
            .await?;
        accounts
            .into_iter()
            .map(|keyed| Ok((keyed.pubkey, Account::try_from(keyed.account)?)))
            .collect()
    }

    async fn get_token_largest_accounts(&self, mint: &Pubkey) -> Result<Vec<Pubkey>> {
        let response: WithContext<Vec<TokenAmountEntry>> = self
            .send(
                "getTokenLargestAccounts",
                json!([mint.to_string(), { "commitment": self.commitment.as_str() }]),
            )
            .await?;
        Ok(response.value.into_iter().map(|e| e.address).collect())
    }
}
