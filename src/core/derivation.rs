//! Address derivation for name accounts, reverse lookups and tokenized domains.

use crate::core::cluster::{
    Cluster, ASSOCIATED_TOKEN_PROGRAM_ID, FAVOURITE_DOMAIN_PREFIX, HASH_PREFIX, MINT_PREFIX,
    NAME_PROGRAM_ID, NFT_RECORD_PREFIX, TOKEN_PROGRAM_ID,
};
use crate::core::record::RecordVersion;
use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use sha2::{Digest, Sha256};

/// Prefix prepended to a label before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePrefix {
    Main,
    Sub,
    Record(RecordVersion),
}

impl NamePrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            NamePrefix::Main => "",
            NamePrefix::Sub => "\0",
            NamePrefix::Record(RecordVersion::V1) => "\x01",
            NamePrefix::Record(RecordVersion::V2) => "\x02",
        }
    }
}

pub fn get_hashed_name(name: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(HASH_PREFIX.as_bytes());
    hasher.update(name.as_bytes());
    hasher.finalize().into()
}

/// Name program PDA with seeds `[hashed_name, class, parent]`; absent keys are zeroed.
pub fn get_name_account_key(
    hashed_name: &[u8; 32],
    name_class: Option<&Pubkey>,
    parent: Option<&Pubkey>,
) -> Result<Pubkey> {
    let class = name_class.copied().unwrap_or_default();
    let parent = parent.copied().unwrap_or_default();
    let (key, _) = Pubkey::find_program_address(
        &[hashed_name, class.as_ref(), parent.as_ref()],
        &NAME_PROGRAM_ID,
    )?;
    Ok(key)
}

pub fn derive(name: &str, parent: &Pubkey, name_class: Option<&Pubkey>) -> Result<Pubkey> {
    get_name_account_key(&get_hashed_name(name), name_class, Some(parent))
}

pub fn trim_tld(domain: &str) -> &str {
    domain.strip_suffix(".sol").unwrap_or(domain)
}

/// Splits `sub.name.sol` into labels, rejecting empty labels and deeper nesting.
pub fn split_domain(domain: &str) -> Result<Vec<&str>> {
    let labels: Vec<&str> = trim_tld(domain).split('.').collect();
    if labels.len() > 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(SnsError::InvalidDomain);
    }
    Ok(labels)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainKey {
    pub key: Pubkey,
    pub parent: Pubkey,
    pub is_sub: bool,
}

pub fn get_domain_key_with_parent(cluster: Cluster, domain: &str) -> Result<DomainKey> {
    let root = cluster.addresses().root_domain_account;
    match split_domain(domain)?.as_slice() {
        [name] => Ok(DomainKey {
            key: derive(name, &root, None)?,
            parent: root,
            is_sub: false,
        }),
        [sub, name] => {
            let parent = derive(name, &root, None)?;
            let label = format!("{}{}", NamePrefix::Sub.as_str(), sub);
            Ok(DomainKey {
                key: derive(&label, &parent, None)?,
                parent,
                is_sub: true,
            })
        }
        _ => Err(SnsError::InvalidDomain),
    }
}

pub fn get_domain_key(cluster: Cluster, domain: &str) -> Result<Pubkey> {
    get_domain_key_with_parent(cluster, domain).map(|d| d.key)
}

/// Reverse lookup account of `domain_key`. Subdomain reverses are parented by the parent domain.
pub fn derive_reverse(
    cluster: Cluster,
    domain_key: &Pubkey,
    parent: Option<&Pubkey>,
) -> Result<Pubkey> {
    let hashed = get_hashed_name(&domain_key.to_string());
    get_name_account_key(
        &hashed,
        Some(&cluster.addresses().reverse_lookup_class),
        parent,
    )
}

pub fn get_reverse_key(cluster: Cluster, domain: &str) -> Result<Pubkey> {
    let domain_key = get_domain_key_with_parent(cluster, domain)?;
    let parent = domain_key.is_sub.then_some(&domain_key.parent);
    derive_reverse(cluster, &domain_key.key, parent)
}

/// Mint of the NFT created when a domain is tokenized.
pub fn get_domain_mint(cluster: Cluster, domain_key: &Pubkey) -> Result<Pubkey> {
    let (mint, _) = Pubkey::find_program_address(
        &[MINT_PREFIX, domain_key.as_ref()],
        &cluster.addresses().name_tokenizer_id,
    )?;
    Ok(mint)
}

pub fn get_nft_record_key(cluster: Cluster, domain_key: &Pubkey) -> Result<Pubkey> {
    let (key, _) = Pubkey::find_program_address(
        &[NFT_RECORD_PREFIX, domain_key.as_ref()],
        &cluster.addresses().name_tokenizer_id,
    )?;
    Ok(key)
}

pub fn derive_favourite_domain_key(cluster: Cluster, owner: &Pubkey) -> Result<Pubkey> {
    let (key, _) = Pubkey::find_program_address(
        &[FAVOURITE_DOMAIN_PREFIX, owner.as_ref()],
        &cluster.addresses().name_offers_id,
    )?;
    Ok(key)
}

pub fn get_associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Result<Pubkey> {
    let (key, _) = Pubkey::find_program_address(
        &[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(key)
}
