use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NAME_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("namesLPneVptA9Z5rqUDD9tMTWEJwofgaYwp8cawRkX");
pub const TOKEN_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::from_str_const("11111111111111111111111111111111");
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Class of every records v2 account.
pub const CENTRAL_STATE_RECORD_V2: Pubkey =
    Pubkey::from_str_const("2pMnqHvei2N5oDcVGCRdZx48gqti199wr5CsyTTafsbo");

/// Verifier of CNAME and url records v2.
pub const GUARDIAN_ID: Pubkey =
    Pubkey::from_str_const("ExXjtfdQe8JacoqP9Z535WzQKjF4CzW1TTRKRgpxvya3");

pub const HASH_PREFIX: &str = "SPL Name Service";
pub const MINT_PREFIX: &[u8; 14] = b"tokenized_name";
pub const NFT_RECORD_PREFIX: &[u8; 10] = b"nft_record";
pub const FAVOURITE_DOMAIN_PREFIX: &[u8; 16] = b"favourite_domain";

/// Program addresses that differ between clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterAddresses {
    /// The `.sol` TLD account.
    pub root_domain_account: Pubkey,
    pub reverse_lookup_class: Pubkey,
    pub name_tokenizer_id: Pubkey,
    pub name_offers_id: Pubkey,
    pub registrar_id: Pubkey,
}

const MAINNET: ClusterAddresses = ClusterAddresses {
    root_domain_account: Pubkey::from_str_const("58PwtjSDuFHuUkYjH9BYnnQKHfwo9reZhC2zMJv9JPkx"),
    reverse_lookup_class: Pubkey::from_str_const("33m47vH6Eav6jr5Ry86XjhRft2jRBLDnDgPSHoquXi2Z"),
    name_tokenizer_id: Pubkey::from_str_const("nftD3vbNkNqfj2Sd3HZwbpw4BxxKWr4AjGb9X38JeZk"),
    name_offers_id: Pubkey::from_str_const("85iDfUvr3HJyLM2zcq5BXSiDvUWfw6cSE1FfNBo8Ap29"),
    registrar_id: Pubkey::from_str_const("jCebN34bUfdeUYJT13J1yG16XWQpt5PDx6Mse9GUqhR"),
};

// TODO: the tokenizer has no separate devnet deployment yet; switch once one is published.
const DEVNET: ClusterAddresses = ClusterAddresses {
    root_domain_account: Pubkey::from_str_const("5eoDkP6vCQBXqDV9YN2NdUs3nmML3dMRNmEYpiyVNBm2"),
    reverse_lookup_class: Pubkey::from_str_const("7NbD1vprif6apthEZAqhRfYuhrqnuderB8qpnfXGCc8H"),
    name_tokenizer_id: Pubkey::from_str_const("nftD3vbNkNqfj2Sd3HZwbpw4BxxKWr4AjGb9X38JeZk"),
    name_offers_id: Pubkey::from_str_const("nameaSUMPQLdPzSimWStRKQyuwwiKscgWnZ6FSsT4zn"),
    registrar_id: Pubkey::from_str_const("snshBoEQ9jx4QoHBpZDQPYdNCtw7RMxJvYrKFEhwaPJ"),
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    #[default]
    #[serde(alias = "mainnet-beta")]
    Mainnet,
    Devnet,
}

impl Cluster {
    pub const fn addresses(self) -> &'static ClusterAddresses {
        match self {
            Cluster::Mainnet => &MAINNET,
            Cluster::Devnet => &DEVNET,
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Cluster::Mainnet => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
        }
    }
}

impl FromStr for Cluster {
    type Err = SnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            "devnet" => Ok(Cluster::Devnet),
            other => Err(SnsError::InvalidConfigValueError {
                field: "cluster".to_string(),
                value: other.to_string(),
                reason: "expected mainnet or devnet".to_string(),
            }),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Mainnet => f.write_str("mainnet"),
            Cluster::Devnet => f.write_str("devnet"),
        }
    }
}
