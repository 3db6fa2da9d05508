use crate::domain::pubkey::Pubkey;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// An account as returned by the RPC node, data already base64-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub lamports: u64,
    pub owner: Pubkey,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub executable: bool,
}

impl Account {
    pub fn new(owner: Pubkey, data: Vec<u8>) -> Self {
        Self {
            lamports: 0,
            owner,
            data,
            executable: false,
        }
    }
}

/// `getProgramAccounts` filter. Memcmp bytes travel base58 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    Memcmp { offset: usize, bytes: Vec<u8> },
    DataSize(u64),
}

impl AccountFilter {
    pub fn memcmp(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        AccountFilter::Memcmp {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AccountFilter::Memcmp { offset, bytes } => serde_json::json!({
                "memcmp": {
                    "offset": offset,
                    "bytes": bs58::encode(bytes).into_string(),
                }
            }),
            AccountFilter::DataSize(size) => serde_json::json!({ "dataSize": size }),
        }
    }

    /// Local evaluation of the filter, used by in-memory fetchers.
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::Memcmp { offset, bytes } => data
                .get(*offset..offset + bytes.len())
                .map(|window| window == bytes.as_slice())
                .unwrap_or(false),
            AccountFilter::DataSize(size) => data.len() as u64 == *size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "programId": self.program_id,
            "keys": self.accounts,
            "data": base64::engine::general_purpose::STANDARD.encode(&self.data),
        })
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)
    }
}
