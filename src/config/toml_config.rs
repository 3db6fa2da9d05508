use crate::adapters::rpc::{Commitment, RpcClient, MAX_MULTIPLE_ACCOUNTS};
use crate::core::cluster::Cluster;
use crate::core::resolve::{AllowPda, ResolveConfig};
use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use crate::utils::validation::{validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsConfig {
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub resolve: ResolveSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Falls back to the public endpoint of the selected cluster.
    pub url: Option<String>,
    pub commitment: Option<Commitment>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub name: Option<Cluster>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveSection {
    pub allow_pda: Option<AllowPda>,
    /// Base58 program ids accepted when `allow_pda = true`.
    pub program_ids: Option<Vec<String>>,
}

impl SnsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SnsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${SNS_RPC_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SnsError::ConfigError {
            message: e.to_string(),
        })?;
        Ok(re
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned())
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster.name.unwrap_or_default()
    }

    pub fn rpc_url(&self) -> String {
        self.rpc
            .url
            .clone()
            .unwrap_or_else(|| self.cluster().default_rpc_url().to_string())
    }

    pub fn commitment(&self) -> Commitment {
        self.rpc.commitment.unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.rpc.timeout_seconds.unwrap_or(30))
    }

    pub fn retry_attempts(&self) -> u32 {
        self.rpc.retry_attempts.unwrap_or(2)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.rpc.retry_delay_ms.unwrap_or(250))
    }

    pub fn batch_size(&self) -> usize {
        self.rpc.batch_size.unwrap_or(MAX_MULTIPLE_ACCOUNTS)
    }

    pub fn resolve_config(&self) -> Result<ResolveConfig> {
        let program_ids = self
            .resolve
            .program_ids
            .iter()
            .flatten()
            .map(|id| id.parse::<Pubkey>())
            .collect::<Result<Vec<_>>>()
            .map_err(|_| SnsError::InvalidConfigValueError {
                field: "resolve.program_ids".to_string(),
                value: format!("{:?}", self.resolve.program_ids),
                reason: "every entry must be a base58 public key".to_string(),
            })?;
        Ok(ResolveConfig {
            allow_pda: self.resolve.allow_pda.unwrap_or_default(),
            program_ids,
        })
    }

    pub fn build_client(&self) -> RpcClient {
        RpcClient::new(self.rpc_url())
            .with_commitment(self.commitment())
            .with_timeout(self.timeout())
            .with_retries(self.retry_attempts(), self.retry_delay())
            .with_batch_size(self.batch_size())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(url) = &self.rpc.url {
            validate_url("rpc.url", url)?;
        }
        if let Some(timeout) = self.rpc.timeout_seconds {
            validate_range("rpc.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(attempts) = self.rpc.retry_attempts {
            validate_range("rpc.retry_attempts", attempts, 0, 10)?;
        }
        if let Some(batch_size) = self.rpc.batch_size {
            validate_range("rpc.batch_size", batch_size, 1, MAX_MULTIPLE_ACCOUNTS)?;
        }

        let resolve = self.resolve_config()?;
        if resolve.allow_pda == AllowPda::Yes && resolve.program_ids.is_empty() {
            return Err(SnsError::MissingConfigError {
                field: "resolve.program_ids".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for SnsConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
