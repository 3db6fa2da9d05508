//! Read-side operations: ownership resolution, records, reverse lookups and primary domains.

use crate::core::cluster::{Cluster, NAME_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::core::derivation::{
    derive_favourite_domain_key, derive_reverse, get_associated_token_address, get_domain_key,
    get_domain_mint, get_nft_record_key,
};
use crate::core::record::v1::{
    check_sol_record, deserialize_record, sol_record_message, SOL_RECORD_LEN,
};
use crate::core::record::v2::ParsedRecordV2;
use crate::core::record::{get_record_v1_key, get_record_v2_key, Record};
use crate::core::state::{
    deserialize_reverse, FavouriteDomain, Mint, NameRegistryHeader, NftRecord, NftRecordTag,
    TokenAccount, Validation,
};
use crate::domain::model::{Account, AccountFilter};
use crate::domain::ports::AccountFetcher;
use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A name registry header and the data stored behind it.
pub type Registry = (NameRegistryHeader, Vec<u8>);

/// Whether a domain owned by a program address may resolve to that address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAllowPda")]
pub enum AllowPda {
    #[default]
    No,
    /// Only when the owning program is listed in `ResolveConfig::program_ids`.
    Yes,
    Any,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAllowPda {
    Flag(bool),
    Text(String),
}

impl TryFrom<RawAllowPda> for AllowPda {
    type Error = SnsError;

    fn try_from(raw: RawAllowPda) -> Result<Self> {
        match raw {
            RawAllowPda::Flag(true) => Ok(AllowPda::Yes),
            RawAllowPda::Flag(false) => Ok(AllowPda::No),
            RawAllowPda::Text(text) => text.parse(),
        }
    }
}

impl FromStr for AllowPda {
    type Err = SnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "false" | "no" => Ok(AllowPda::No),
            "true" | "yes" => Ok(AllowPda::Yes),
            "any" => Ok(AllowPda::Any),
            other => Err(SnsError::InvalidConfigValueError {
                field: "resolve.allow_pda".to_string(),
                value: other.to_string(),
                reason: "expected true, false or any".to_string(),
            }),
        }
    }
}

impl Serialize for AllowPda {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl fmt::Display for AllowPda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowPda::No => f.write_str("false"),
            AllowPda::Yes => f.write_str("true"),
            AllowPda::Any => f.write_str("any"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveConfig {
    pub allow_pda: AllowPda,
    pub program_ids: Vec<Pubkey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryDomain {
    pub domain: Pubkey,
    /// Name without the `.sol` suffix.
    pub reverse: String,
    /// The wallet no longer owns the domain it picked.
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizedDomain {
    pub key: Pubkey,
    pub mint: Pubkey,
    pub reverse: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedRecordV2 {
    pub record: Record,
    pub content: String,
    pub stale: bool,
    pub roa_verified: bool,
}

pub struct Resolver<F: AccountFetcher> {
    fetcher: F,
    cluster: Cluster,
    config: ResolveConfig,
}

impl<F: AccountFetcher> Resolver<F> {
    pub fn new(fetcher: F, cluster: Cluster) -> Self {
        Self {
            fetcher,
            cluster,
            config: ResolveConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolveConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn root(&self) -> Pubkey {
        self.cluster.addresses().root_domain_account
    }

    pub async fn resolve_name_registry(&self, key: &Pubkey) -> Result<Option<Registry>> {
        match self.fetcher.get_account(key).await? {
            Some(account) => NameRegistryHeader::unpack(&account.data).map(Some),
            None => Ok(None),
        }
    }

    pub async fn resolve_name_registry_batch(
        &self,
        keys: &[Pubkey],
    ) -> Result<Vec<Option<Registry>>> {
        self.fetcher
            .get_multiple_accounts(keys)
            .await?
            .into_iter()
            .map(|account| {
                account
                    .map(|a| NameRegistryHeader::unpack(&a.data))
                    .transpose()
            })
            .collect()
    }

    /// Resolves the wallet a domain points to.
    ///
    /// Tokenized domains resolve to the NFT holder. Otherwise a SOL record signed by the
    /// current owner wins (v2 first, then v1), and finally the registry owner, which must
    /// pass the program address policy of [`ResolveConfig`] when it is off-curve.
    pub async fn resolve_owner(&self, domain: &str) -> Result<Pubkey> {
        let domain_key = get_domain_key(self.cluster, domain)?;
        let nft_record_key = get_nft_record_key(self.cluster, &domain_key)?;
        let sol_v1_key = get_record_v1_key(self.cluster, domain, Record::Sol)?;
        let sol_v2_key = get_record_v2_key(self.cluster, domain, Record::Sol)?;

        let accounts = self
            .fetcher
            .get_multiple_accounts(&[nft_record_key, sol_v1_key, sol_v2_key, domain_key])
            .await?;
        let [nft_record, sol_v1, sol_v2, registry]: [Option<Account>; 4] =
            accounts
                .try_into()
                .map_err(|_| SnsError::InvalidAccountData {
                    message: "RPC returned the wrong number of accounts".to_string(),
                })?;

        let registry =
            registry.ok_or_else(|| SnsError::DomainDoesNotExist(domain.to_string()))?;
        let (header, _) = NameRegistryHeader::unpack(&registry.data)?;

        if let Some(account) = nft_record {
            if NftRecord::parse(&account.data)?.is_active() {
                debug!(domain, "domain is tokenized");
                return self
                    .resolve_nft_owner(&domain_key)
                    .await?
                    .ok_or(SnsError::CouldNotFindNftOwner);
            }
        }

        if let Some(account) = sol_v2 {
            match sol_record_v2_destination(&account.data, &header.owner) {
                Ok(Some(destination)) => return Ok(destination),
                Ok(None) => debug!(domain, "SOL record v2 is stale"),
                Err(err) => {
                    warn!(domain, error = %err, "invalid SOL record v2, using the registry owner");
                    return Ok(header.owner);
                }
            }
        }

        if let Some(account) = sol_v1 {
            if let Some(destination) =
                sol_record_v1_destination(&account.data, &sol_v1_key, &header.owner)?
            {
                return Ok(destination);
            }
            debug!(domain, "SOL record v1 is not signed by the owner");
        }

        if !header.owner.is_on_curve() {
            return self.check_pda_owner(&header.owner).await;
        }

        Ok(header.owner)
    }

    async fn check_pda_owner(&self, owner: &Pubkey) -> Result<Pubkey> {
        match self.config.allow_pda {
            AllowPda::Any => Ok(*owner),
            AllowPda::Yes => {
                let program = self.fetcher.get_account(owner).await?.map(|a| a.owner);
                match program {
                    Some(program) if self.config.program_ids.contains(&program) => Ok(*owner),
                    other => Err(SnsError::PdaOwnerNotAllowed {
                        program: other.map(|p| p.to_string()),
                    }),
                }
            }
            AllowPda::No => Err(SnsError::PdaOwnerNotAllowed { program: None }),
        }
    }

    /// Holder of the domain NFT, if the domain is tokenized and the token exists.
    pub async fn resolve_nft_owner(&self, domain_key: &Pubkey) -> Result<Option<Pubkey>> {
        let mint = get_domain_mint(self.cluster, domain_key)?;
        let largest = match self.fetcher.get_token_largest_accounts(&mint).await {
            Ok(accounts) => accounts,
            Err(err) if err.is_invalid_params() => {
                debug!(%mint, "domain mint does not exist");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let Some(holder) = largest.first() else {
            return Ok(None);
        };

        let accounts = self.fetcher.get_multiple_accounts(&[mint, *holder]).await?;
        if let Some(Some(mint_account)) = accounts.first() {
            if Mint::unpack(&mint_account.data)?.supply != 1 {
                return Ok(None);
            }
        }
        match accounts.get(1) {
            Some(Some(account)) => {
                let token = TokenAccount::unpack(&account.data)?;
                Ok((token.amount == 1).then_some(token.owner))
            }
            _ => Ok(None),
        }
    }

    /// Registry of `domain_key` and its effective owner, NFT holder first.
    pub async fn get_domain_owner(
        &self,
        domain_key: &Pubkey,
    ) -> Result<Option<(NameRegistryHeader, Pubkey)>> {
        let Some((header, _)) = self.resolve_name_registry(domain_key).await? else {
            return Ok(None);
        };
        let owner = self
            .resolve_nft_owner(domain_key)
            .await?
            .unwrap_or(header.owner);
        Ok(Some((header, owner)))
    }

    /// Raw v1 record account of `domain`.
    pub async fn resolve_record(&self, domain: &str, record: Record) -> Result<Option<Registry>> {
        let key = get_record_v1_key(self.cluster, domain, record)?;
        self.resolve_name_registry(&key).await
    }

    pub async fn get_record_v1(&self, domain: &str, record: Record) -> Result<Option<String>> {
        let domain_key = get_domain_key(self.cluster, domain)?;
        let record_key = get_record_v1_key(self.cluster, domain, record)?;
        let mut registries = self
            .resolve_name_registry_batch(&[record_key, domain_key])
            .await?;
        let domain_registry = registries.pop().flatten();
        let Some((_, data)) = registries.pop().flatten() else {
            return Ok(None);
        };

        // SOL 紀錄必須由網域擁有者簽署
        let signer = domain_registry
            .map(|(header, _)| header.owner)
            .unwrap_or_default();
        deserialize_record(&data, record, &record_key, &signer).map(Some)
    }

    pub async fn get_record_v2(
        &self,
        domain: &str,
        record: Record,
    ) -> Result<Option<ParsedRecordV2>> {
        let key = get_record_v2_key(self.cluster, domain, record)?;
        match self.fetcher.get_account(&key).await? {
            Some(account) => ParsedRecordV2::parse(record, &account.data).map(Some),
            None => Ok(None),
        }
    }

    /// Batched [`Self::get_record_v2`]. Malformed accounts come back as `None`.
    pub async fn get_records_v2(
        &self,
        domain: &str,
        records: &[Record],
    ) -> Result<Vec<Option<ParsedRecordV2>>> {
        let keys = records
            .iter()
            .map(|record| get_record_v2_key(self.cluster, domain, *record))
            .collect::<Result<Vec<_>>>()?;
        let accounts = self.fetcher.get_multiple_accounts(&keys).await?;

        Ok(records
            .iter()
            .zip(accounts)
            .map(|(record, account)| {
                let account = account?;
                match ParsedRecordV2::parse(*record, &account.data) {
                    Ok(parsed) => Some(parsed),
                    Err(err) => {
                        warn!(domain, %record, error = %err, "skipping malformed record v2");
                        None
                    }
                }
            })
            .collect())
    }

    /// Existing v2 records of `domain` with their content decoded and checked against the owner.
    pub async fn get_domain_records_v2(
        &self,
        domain: &str,
        records: &[Record],
    ) -> Result<Vec<VerifiedRecordV2>> {
        let domain_key = get_domain_key(self.cluster, domain)?;
        let (_, owner) = self
            .get_domain_owner(&domain_key)
            .await?
            .ok_or_else(|| SnsError::DomainDoesNotExist(domain.to_string()))?;

        let mut verified = Vec::new();
        for parsed in self.get_records_v2(domain, records).await?.into_iter().flatten() {
            let content = match parsed.deserialize_content() {
                Ok(content) => content,
                Err(err) => {
                    let record = parsed.kind;
                    warn!(domain, %record, error = %err, "undecodable record content");
                    continue;
                }
            };
            verified.push(VerifiedRecordV2 {
                record: parsed.kind,
                content,
                stale: parsed.verify_staleness(&owner).is_err(),
                roa_verified: parsed.verify_roa().is_ok(),
            });
        }
        Ok(verified)
    }

    /// Reverse lookup of a single label. `parent` must be set for subdomains.
    pub async fn resolve_reverse(
        &self,
        domain_key: &Pubkey,
        parent: Option<&Pubkey>,
    ) -> Result<Option<String>> {
        let reverse_key = derive_reverse(self.cluster, domain_key, parent)?;
        match self.resolve_name_registry(&reverse_key).await? {
            Some((_, data)) => deserialize_reverse(&data, parent.is_some()).map(Some),
            None => Ok(None),
        }
    }

    /// Reverse lookups of second-level domains, in order.
    pub async fn resolve_reverse_batch(
        &self,
        domain_keys: &[Pubkey],
    ) -> Result<Vec<Option<String>>> {
        let reverse_keys = domain_keys
            .iter()
            .map(|key| derive_reverse(self.cluster, key, None))
            .collect::<Result<Vec<_>>>()?;
        self.resolve_name_registry_batch(&reverse_keys)
            .await?
            .into_iter()
            .map(|registry| {
                registry
                    .map(|(_, data)| deserialize_reverse(&data, false))
                    .transpose()
            })
            .collect()
    }

    /// Full name of `domain_key` (`name` or `sub.name`, no TLD).
    pub async fn reverse_lookup(&self, domain_key: &Pubkey) -> Result<Option<String>> {
        let Some((header, _)) = self.resolve_name_registry(domain_key).await? else {
            return Ok(None);
        };
        self.reverse_with_header(domain_key, &header).await
    }

    async fn reverse_with_header(
        &self,
        domain_key: &Pubkey,
        header: &NameRegistryHeader,
    ) -> Result<Option<String>> {
        if header.parent_name == self.root() {
            return self.resolve_reverse(domain_key, None).await;
        }
        let sub = self
            .resolve_reverse(domain_key, Some(&header.parent_name))
            .await?;
        let parent = self.resolve_reverse(&header.parent_name, None).await?;
        Ok(match (sub, parent) {
            (Some(sub), Some(parent)) => Some(format!("{}.{}", sub, parent)),
            _ => None,
        })
    }

    /// Second-level domains held directly by `owner` (tokenized ones are excluded).
    pub async fn get_domains_owner(&self, owner: &Pubkey) -> Result<Vec<Pubkey>> {
        let filters = [
            AccountFilter::memcmp(0, self.root().to_bytes()),
            AccountFilter::memcmp(32, owner.to_bytes()),
        ];
        let accounts = self
            .fetcher
            .get_program_accounts(&NAME_PROGRAM_ID, &filters)
            .await?;
        info!(%owner, count = accounts.len(), "found domains");
        Ok(accounts.into_iter().map(|(key, _)| key).collect())
    }

    pub async fn get_domain_keys_with_reverses(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<(Pubkey, Option<String>)>> {
        let keys = self.get_domains_owner(owner).await?;
        let reverses = self.resolve_reverse_batch(&keys).await?;
        Ok(keys.into_iter().zip(reverses).collect())
    }

    /// Labels of the live subdomains of `parent_key` that have a reverse lookup, sorted.
    pub async fn get_subdomains(&self, parent_key: &Pubkey) -> Result<Vec<String>> {
        let reverse_filters = [
            AccountFilter::memcmp(0, parent_key.to_bytes()),
            AccountFilter::memcmp(64, self.cluster.addresses().reverse_lookup_class.to_bytes()),
        ];
        let child_filters = [AccountFilter::memcmp(0, parent_key.to_bytes())];
        let (reverses, children) = futures::try_join!(
            self.fetcher.get_program_accounts(&NAME_PROGRAM_ID, &reverse_filters),
            self.fetcher.get_program_accounts(&NAME_PROGRAM_ID, &child_filters),
        )?;

        // 子網域帳戶已刪除時，殘留的反查帳戶不列出
        let live = children
            .iter()
            .map(|(key, _)| derive_reverse(self.cluster, key, Some(parent_key)))
            .collect::<Result<HashSet<_>>>()?;

        let mut labels = Vec::with_capacity(reverses.len());
        for (key, account) in reverses {
            if !live.contains(&key) {
                debug!(%key, "reverse account without a live subdomain");
                continue;
            }
            match reverse_from_account(&account) {
                Ok(label) => labels.push(label),
                Err(err) => warn!(%key, error = %err, "skipping unreadable reverse account"),
            }
        }
        labels.sort();
        Ok(labels)
    }

    pub async fn get_favourite_domain(&self, owner: &Pubkey) -> Result<Option<Pubkey>> {
        let key = derive_favourite_domain_key(self.cluster, owner)?;
        match self.fetcher.get_account(&key).await? {
            Some(account) => Ok(Some(FavouriteDomain::parse(&account.data)?.name_account)),
            None => Ok(None),
        }
    }

    pub async fn get_primary_domain(&self, owner: &Pubkey) -> Result<Option<PrimaryDomain>> {
        let Some(domain) = self.get_favourite_domain(owner).await? else {
            return Ok(None);
        };
        let Some((header, domain_owner)) = self.get_domain_owner(&domain).await? else {
            return Ok(None);
        };
        let Some(reverse) = self.reverse_with_header(&domain, &header).await? else {
            return Ok(None);
        };
        Ok(Some(PrimaryDomain {
            domain,
            reverse,
            stale: *owner != domain_owner,
        }))
    }

    /// Primary domain names of many wallets. Stale picks come back as `None`.
    pub async fn get_primary_domains(&self, wallets: &[Pubkey]) -> Result<Vec<Option<String>>> {
        struct Candidate {
            wallet: usize,
            header: NameRegistryHeader,
            reverse_key: Pubkey,
            parent_reverse_key: Option<Pubkey>,
            ata: Pubkey,
        }

        let favourite_keys = wallets
            .iter()
            .map(|wallet| derive_favourite_domain_key(self.cluster, wallet))
            .collect::<Result<Vec<_>>>()?;
        let mut picked = Vec::new();
        for (idx, account) in self
            .fetcher
            .get_multiple_accounts(&favourite_keys)
            .await?
            .into_iter()
            .enumerate()
        {
            let Some(account) = account else {
                continue;
            };
            match FavouriteDomain::parse(&account.data) {
                Ok(favourite) => picked.push((idx, favourite.name_account)),
                Err(err) => {
                    warn!(wallet = %wallets[idx], error = %err, "⚠️ skipping unreadable favourite")
                }
            }
        }

        let domain_keys: Vec<Pubkey> = picked.iter().map(|(_, key)| *key).collect();
        let registries = self.resolve_name_registry_batch(&domain_keys).await?;

        let mut candidates = Vec::new();
        for ((wallet, domain), registry) in picked.into_iter().zip(registries) {
            let Some((header, _)) = registry else {
                continue;
            };
            let is_sub = header.parent_name != self.root();
            let reverse_key =
                derive_reverse(self.cluster, &domain, is_sub.then_some(&header.parent_name))?;
            let parent_reverse_key = if is_sub {
                Some(derive_reverse(self.cluster, &header.parent_name, None)?)
            } else {
                None
            };
            let mint = get_domain_mint(self.cluster, &domain)?;
            candidates.push(Candidate {
                wallet,
                header,
                reverse_key,
                parent_reverse_key,
                ata: get_associated_token_address(&wallets[wallet], &mint)?,
            });
        }

        let mut needed = Vec::with_capacity(candidates.len() * 3);
        for candidate in &candidates {
            needed.push(candidate.reverse_key);
            needed.extend(candidate.parent_reverse_key);
            needed.push(candidate.ata);
        }
        let fetched: HashMap<Pubkey, Account> = needed
            .iter()
            .copied()
            .zip(self.fetcher.get_multiple_accounts(&needed).await?)
            .filter_map(|(key, account)| account.map(|a| (key, a)))
            .collect();

        let mut result = vec![None; wallets.len()];
        for candidate in candidates {
            let Some(reverse) = fetched.get(&candidate.reverse_key) else {
                continue;
            };
            let suffix = match candidate.parent_reverse_key.and_then(|k| fetched.get(&k)) {
                Some(account) if account.owner == NAME_PROGRAM_ID => {
                    format!(".{}", reverse_from_account(account)?)
                }
                _ => String::new(),
            };

            let fresh = candidate.header.owner == wallets[candidate.wallet]
                || fetched
                    .get(&candidate.ata)
                    .and_then(|account| TokenAccount::unpack(&account.data).ok())
                    .is_some_and(|token| token.amount == 1);
            if fresh {
                result[candidate.wallet] =
                    Some(format!("{}{}", reverse_from_account(reverse)?, suffix));
            }
        }
        Ok(result)
    }

    /// Active NFT records of the domains tokenized in `owner`'s wallet.
    pub async fn get_nft_records(&self, owner: &Pubkey) -> Result<Vec<NftRecord>> {
        let filters = [
            AccountFilter::memcmp(TokenAccount::OWNER_OFFSET, owner.to_bytes()),
            AccountFilter::memcmp(TokenAccount::AMOUNT_OFFSET, 1u64.to_le_bytes()),
            AccountFilter::DataSize(TokenAccount::LEN as u64),
        ];
        let token_accounts = self
            .fetcher
            .get_program_accounts(&TOKEN_PROGRAM_ID, &filters)
            .await?;
        let mints = token_accounts
            .iter()
            .map(|(_, account)| TokenAccount::unpack(&account.data).map(|t| t.mint))
            .collect::<Result<Vec<_>>>()?;
        debug!(%owner, tokens = mints.len(), "looking up NFT records");

        let records = try_join_all(mints.iter().map(|mint| self.get_nft_record_from_mint(mint)))
            .await?;
        Ok(records.into_iter().flatten().collect())
    }

    pub async fn get_nft_record_from_mint(&self, mint: &Pubkey) -> Result<Option<NftRecord>> {
        let filters = [
            AccountFilter::DataSize(NftRecord::LEN as u64),
            AccountFilter::memcmp(0, vec![NftRecordTag::ActiveRecord as u8]),
            AccountFilter::memcmp(NftRecord::NFT_MINT_OFFSET, mint.to_bytes()),
        ];
        let found = self
            .fetcher
            .get_program_accounts(&self.cluster.addresses().name_tokenizer_id, &filters)
            .await?;
        match found.as_slice() {
            [(_, account)] => NftRecord::parse(&account.data).map(Some),
            _ => Ok(None),
        }
    }

    pub async fn get_tokenized_domains(&self, owner: &Pubkey) -> Result<Vec<TokenizedDomain>> {
        let records = self.get_nft_records(owner).await?;
        let keys: Vec<Pubkey> = records.iter().map(|r| r.name_account).collect();
        let reverses = self.resolve_reverse_batch(&keys).await?;
        Ok(records
            .iter()
            .zip(reverses)
            .filter_map(|(record, reverse)| {
                reverse.map(|reverse| TokenizedDomain {
                    key: record.name_account,
                    mint: record.nft_mint,
                    reverse,
                })
            })
            .collect())
    }
}

fn reverse_from_account(account: &Account) -> Result<String> {
    let (_, data) = NameRegistryHeader::unpack(&account.data)?;
    deserialize_reverse(&data, true)
}

/// `Ok(None)` when the record was written by a previous owner.
fn sol_record_v2_destination(data: &[u8], owner: &Pubkey) -> Result<Option<Pubkey>> {
    let record = ParsedRecordV2::parse(Record::Sol, data)?;
    if record.content.len() != 32 {
        return Err(SnsError::InvalidRecordData);
    }
    if record.staleness_validation()? != Validation::Solana
        || record.roa_validation()? != Validation::Solana
    {
        return Err(SnsError::UnverifiedRecord);
    }
    if record.verify_staleness(owner).is_err() {
        return Ok(None);
    }
    if record.roa_id != record.content {
        return Err(SnsError::UnverifiedRecord);
    }
    Pubkey::try_from(record.content.as_slice()).map(Some)
}

fn sol_record_v1_destination(
    data: &[u8],
    record_key: &Pubkey,
    owner: &Pubkey,
) -> Result<Option<Pubkey>> {
    let start = NameRegistryHeader::LEN;
    let Some(payload) = data.get(start..start + SOL_RECORD_LEN) else {
        return Ok(None);
    };
    let (destination, signature) = payload.split_at(32);
    let message = sol_record_message(destination, record_key);
    if check_sol_record(&message, signature, owner)? {
        Pubkey::try_from(destination).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cluster::GUARDIAN_ID;
    use crate::core::derivation::{get_domain_key_with_parent, get_reverse_key};
    use crate::core::record::v2::{pack_record_v2, serialize_record_v2_content};
    use crate::core::state::serialize_reverse;
    use async_trait::async_trait;
    use ed25519_dalek::{Signer, SigningKey};
    use std::collections::BTreeMap;

    const CLUSTER: Cluster = Cluster::Mainnet;

    /// In-memory chain state keyed by address.
    #[derive(Default)]
    struct MockFetcher {
        accounts: BTreeMap<Pubkey, Account>,
    }

    impl MockFetcher {
        fn insert(&mut self, key: Pubkey, account: Account) {
            self.accounts.insert(key, account);
        }

        fn insert_name(
            &mut self,
            key: Pubkey,
            parent: Pubkey,
            owner: Pubkey,
            class: Pubkey,
            payload: &[u8],
        ) {
            let mut data = borsh::to_vec(&NameRegistryHeader {
                parent_name: parent,
                owner,
                class,
            })
            .unwrap();
            data.extend_from_slice(payload);
            self.insert(key, Account::new(NAME_PROGRAM_ID, data));
        }

        fn insert_token_account(&mut self, key: Pubkey, mint: Pubkey, owner: Pubkey, amount: u64) {
            let mut data = vec![0u8; TokenAccount::LEN];
            data[..32].copy_from_slice(mint.as_ref());
            data[32..64].copy_from_slice(owner.as_ref());
            data[64..72].copy_from_slice(&amount.to_le_bytes());
            self.insert(key, Account::new(TOKEN_PROGRAM_ID, data));
        }

        fn insert_mint(&mut self, key: Pubkey, supply: u64) {
            let mut data = vec![0u8; Mint::LEN];
            data[36..44].copy_from_slice(&supply.to_le_bytes());
            data[45] = 1;
            self.insert(key, Account::new(TOKEN_PROGRAM_ID, data));
        }
    }

    #[async_trait]
    impl AccountFetcher for MockFetcher {
        async fn get_account(&self, key: &Pubkey) -> Result<Option<Account>> {
            Ok(self.accounts.get(key).cloned())
        }

        async fn get_multiple_accounts(&self, keys: &[Pubkey]) -> Result<Vec<Option<Account>>> {
            Ok(keys.iter().map(|k| self.accounts.get(k).cloned()).collect())
        }

        async fn get_program_accounts(
            &self,
            program_id: &Pubkey,
            filters: &[AccountFilter],
        ) -> Result<Vec<(Pubkey, Account)>> {
            Ok(self
                .accounts
                .iter()
                .filter(|(_, a)| a.owner == *program_id)
                .filter(|(_, a)| filters.iter().all(|f| f.matches(&a.data)))
                .map(|(k, a)| (*k, a.clone()))
                .collect())
        }

        async fn get_token_largest_accounts(&self, mint: &Pubkey) -> Result<Vec<Pubkey>> {
            if !self.accounts.contains_key(mint) {
                return Err(SnsError::Rpc {
                    code: -32602,
                    message: "Invalid param: could not find mint".to_string(),
                });
            }
            let mut holders: Vec<(u64, Pubkey)> = self
                .accounts
                .iter()
                .filter(|(_, a)| a.owner == TOKEN_PROGRAM_ID && a.data.len() == TokenAccount::LEN)
                .filter_map(|(k, a)| {
                    let token = TokenAccount::unpack(&a.data).ok()?;
                    (token.mint == *mint).then_some((token.amount, *k))
                })
                .collect();
            holders.sort_by(|a, b| b.0.cmp(&a.0));
            Ok(holders.into_iter().map(|(_, k)| k).collect())
        }
    }

    fn wallet(seed: u8) -> (SigningKey, Pubkey) {
        let secret = SigningKey::from_bytes(&[seed; 32]);
        let key = Pubkey::new_from_array(secret.verifying_key().to_bytes());
        (secret, key)
    }

    fn root() -> Pubkey {
        CLUSTER.addresses().root_domain_account
    }

    fn reverse_class() -> Pubkey {
        CLUSTER.addresses().reverse_lookup_class
    }

    /// Registers `name` (second level) with its reverse account.
    fn register(mock: &mut MockFetcher, name: &str, owner: Pubkey) -> Pubkey {
        let key = get_domain_key(CLUSTER, name).unwrap();
        mock.insert_name(key, root(), owner, Pubkey::default(), &[]);
        mock.insert_name(
            get_reverse_key(CLUSTER, name).unwrap(),
            Pubkey::default(),
            Pubkey::default(),
            reverse_class(),
            &serialize_reverse(name),
        );
        key
    }

    fn register_sub(mock: &mut MockFetcher, domain: &str, owner: Pubkey) -> Pubkey {
        let derived = get_domain_key_with_parent(CLUSTER, domain).unwrap();
        let label = domain.split('.').next().unwrap();
        mock.insert_name(derived.key, derived.parent, owner, Pubkey::default(), &[]);
        mock.insert_name(
            get_reverse_key(CLUSTER, domain).unwrap(),
            derived.parent,
            Pubkey::default(),
            reverse_class(),
            &serialize_reverse(&format!("\0{}", label)),
        );
        derived.key
    }

    fn sol_v1_payload(secret: &SigningKey, destination: &Pubkey, record_key: &Pubkey) -> Vec<u8> {
        let message = sol_record_message(destination.as_ref(), record_key);
        let mut payload = destination.to_bytes().to_vec();
        payload.extend_from_slice(&secret.sign(&message).to_bytes());
        payload
    }

    fn insert_sol_v2(
        mock: &mut MockFetcher,
        domain: &str,
        staleness: &Pubkey,
        roa: &Pubkey,
        content: &Pubkey,
    ) {
        let registry = NameRegistryHeader {
            parent_name: get_domain_key(CLUSTER, domain).unwrap(),
            owner: *staleness,
            class: crate::core::cluster::CENTRAL_STATE_RECORD_V2,
        };
        let data = pack_record_v2(
            &registry,
            (Validation::Solana, staleness.as_ref()),
            (Validation::Solana, roa.as_ref()),
            content.as_ref(),
        )
        .unwrap();
        mock.insert(
            get_record_v2_key(CLUSTER, domain, Record::Sol).unwrap(),
            Account::new(NAME_PROGRAM_ID, data),
        );
    }

    /// Tokenizes `domain`: NFT record, mint and holder token account.
    fn tokenize(mock: &mut MockFetcher, domain_key: Pubkey, holder: Option<Pubkey>) -> Pubkey {
        let mint = get_domain_mint(CLUSTER, &domain_key).unwrap();
        let record = NftRecord {
            tag: NftRecordTag::ActiveRecord as u8,
            nonce: 255,
            name_account: domain_key,
            owner: Pubkey::default(),
            nft_mint: mint,
        };
        mock.insert(
            get_nft_record_key(CLUSTER, &domain_key).unwrap(),
            Account::new(
                CLUSTER.addresses().name_tokenizer_id,
                borsh::to_vec(&record).unwrap(),
            ),
        );
        mock.insert_mint(mint, 1);
        if let Some(holder) = holder {
            mock.insert_token_account(Pubkey::new_from_array([42; 32]), mint, holder, 1);
        }
        mint
    }

    #[tokio::test]
    async fn test_resolve_plain_owner() {
        let (_, owner) = wallet(1);
        let mut mock = MockFetcher::default();
        register(&mut mock, "bonfida", owner);

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(resolver.resolve_owner("bonfida.sol").await.unwrap(), owner);
    }

    #[tokio::test]
    async fn test_resolve_missing_domain() {
        let resolver = Resolver::new(MockFetcher::default(), CLUSTER);
        let err = resolver.resolve_owner("nothing-here").await.unwrap_err();
        assert!(matches!(err, SnsError::DomainDoesNotExist(d) if d == "nothing-here"));
    }

    #[tokio::test]
    async fn test_resolve_sol_record_v1() {
        let (secret, owner) = wallet(1);
        let (_, destination) = wallet(2);
        let mut mock = MockFetcher::default();
        let domain_key = register(&mut mock, "bonfida", owner);
        let record_key = get_record_v1_key(CLUSTER, "bonfida", Record::Sol).unwrap();
        mock.insert_name(
            record_key,
            domain_key,
            owner,
            Pubkey::default(),
            &sol_v1_payload(&secret, &destination, &record_key),
        );

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(resolver.resolve_owner("bonfida").await.unwrap(), destination);
        assert_eq!(
            resolver.get_record_v1("bonfida", Record::Sol).await.unwrap(),
            Some(destination.to_string())
        );
    }

    #[tokio::test]
    async fn test_sol_record_v1_signed_by_previous_owner_is_ignored() {
        let (previous, _) = wallet(3);
        let (_, owner) = wallet(1);
        let (_, destination) = wallet(2);
        let mut mock = MockFetcher::default();
        let domain_key = register(&mut mock, "bonfida", owner);
        let record_key = get_record_v1_key(CLUSTER, "bonfida", Record::Sol).unwrap();
        mock.insert_name(
            record_key,
            domain_key,
            owner,
            Pubkey::default(),
            &sol_v1_payload(&previous, &destination, &record_key),
        );

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(resolver.resolve_owner("bonfida").await.unwrap(), owner);
    }

    #[tokio::test]
    async fn test_resolve_sol_record_v2() {
        let (_, owner) = wallet(1);
        let (_, destination) = wallet(2);
        let mut mock = MockFetcher::default();
        register(&mut mock, "bonfida", owner);
        insert_sol_v2(&mut mock, "bonfida", &owner, &destination, &destination);

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(resolver.resolve_owner("bonfida").await.unwrap(), destination);
    }

    #[tokio::test]
    async fn test_stale_sol_record_v2_falls_through() {
        let (_, owner) = wallet(1);
        let (_, previous) = wallet(3);
        let (_, destination) = wallet(2);
        let mut mock = MockFetcher::default();
        register(&mut mock, "bonfida", owner);
        insert_sol_v2(&mut mock, "bonfida", &previous, &destination, &destination);

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(resolver.resolve_owner("bonfida").await.unwrap(), owner);
    }

    #[tokio::test]
    async fn test_unverified_sol_record_v2_returns_owner() {
        let (_, owner) = wallet(1);
        let (_, destination) = wallet(2);
        let (_, other) = wallet(4);
        let mut mock = MockFetcher::default();
        let domain_key = register(&mut mock, "bonfida", owner);
        insert_sol_v2(&mut mock, "bonfida", &owner, &other, &destination);

        // 即使有有效的 v1 紀錄，v2 驗證失敗仍回傳擁有者
        let (secret, _) = wallet(1);
        let record_key = get_record_v1_key(CLUSTER, "bonfida", Record::Sol).unwrap();
        mock.insert_name(
            record_key,
            domain_key,
            owner,
            Pubkey::default(),
            &sol_v1_payload(&secret, &destination, &record_key),
        );

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(resolver.resolve_owner("bonfida").await.unwrap(), owner);
    }

    #[tokio::test]
    async fn test_resolve_tokenized_domain() {
        let (_, holder) = wallet(5);
        let mut mock = MockFetcher::default();
        let tokenizer_state = Pubkey::new_from_array([77; 32]);
        let domain_key = register(&mut mock, "bonfida", tokenizer_state);
        tokenize(&mut mock, domain_key, Some(holder));

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(resolver.resolve_owner("bonfida").await.unwrap(), holder);
        assert_eq!(
            resolver.resolve_nft_owner(&domain_key).await.unwrap(),
            Some(holder)
        );
    }

    #[tokio::test]
    async fn test_tokenized_domain_without_holder() {
        let mut mock = MockFetcher::default();
        let domain_key = register(&mut mock, "bonfida", Pubkey::new_from_array([77; 32]));
        tokenize(&mut mock, domain_key, None);

        let resolver = Resolver::new(mock, CLUSTER);
        assert!(matches!(
            resolver.resolve_owner("bonfida").await,
            Err(SnsError::CouldNotFindNftOwner)
        ));
    }

    #[tokio::test]
    async fn test_nft_owner_of_untokenized_domain() {
        let (_, owner) = wallet(1);
        let mut mock = MockFetcher::default();
        let domain_key = register(&mut mock, "bonfida", owner);

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(resolver.resolve_nft_owner(&domain_key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pda_owner_policies() {
        let program = Pubkey::new_from_array([9; 32]);
        let (pda, _) = Pubkey::find_program_address(&[b"vault"], &program).unwrap();
        let mut mock = MockFetcher::default();
        register(&mut mock, "bonfida", pda);
        mock.insert(pda, Account::new(program, vec![]));

        let resolver = Resolver::new(mock, CLUSTER);
        assert!(matches!(
            resolver.resolve_owner("bonfida").await,
            Err(SnsError::PdaOwnerNotAllowed { program: None })
        ));

        let resolver = resolver.with_config(ResolveConfig {
            allow_pda: AllowPda::Any,
            program_ids: vec![],
        });
        assert_eq!(resolver.resolve_owner("bonfida").await.unwrap(), pda);

        let resolver = resolver.with_config(ResolveConfig {
            allow_pda: AllowPda::Yes,
            program_ids: vec![program],
        });
        assert_eq!(resolver.resolve_owner("bonfida").await.unwrap(), pda);

        let resolver = resolver.with_config(ResolveConfig {
            allow_pda: AllowPda::Yes,
            program_ids: vec![],
        });
        let err = resolver.resolve_owner("bonfida").await.unwrap_err();
        assert!(matches!(
            err,
            SnsError::PdaOwnerNotAllowed { program: Some(p) } if p == program.to_string()
        ));
    }

    #[tokio::test]
    async fn test_reverse_lookups() {
        let (_, owner) = wallet(1);
        let mut mock = MockFetcher::default();
        let parent = register(&mut mock, "bonfida", owner);
        let sub = register_sub(&mut mock, "dex.bonfida", owner);
        register(&mut mock, "solana", owner);

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(
            resolver.reverse_lookup(&parent).await.unwrap().as_deref(),
            Some("bonfida")
        );
        assert_eq!(
            resolver.reverse_lookup(&sub).await.unwrap().as_deref(),
            Some("dex.bonfida")
        );
        assert_eq!(
            resolver.resolve_reverse(&sub, Some(&parent)).await.unwrap().as_deref(),
            Some("dex")
        );

        let solana = get_domain_key(CLUSTER, "solana").unwrap();
        let missing = get_domain_key(CLUSTER, "missing").unwrap();
        assert_eq!(
            resolver
                .resolve_reverse_batch(&[parent, missing, solana])
                .await
                .unwrap(),
            vec![Some("bonfida".to_string()), None, Some("solana".to_string())]
        );
    }

    #[tokio::test]
    async fn test_domains_and_subdomains() {
        let (_, owner) = wallet(1);
        let (_, someone_else) = wallet(2);
        let mut mock = MockFetcher::default();
        let bonfida = register(&mut mock, "bonfida", owner);
        register(&mut mock, "solana", owner);
        register(&mut mock, "other", someone_else);
        register_sub(&mut mock, "dex.bonfida", owner);
        register_sub(&mut mock, "app.bonfida", someone_else);

        let resolver = Resolver::new(mock, CLUSTER);
        let mut names: Vec<String> = resolver
            .get_domain_keys_with_reverses(&owner)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|(_, reverse)| reverse)
            .collect();
        names.sort();
        assert_eq!(names, vec!["bonfida", "solana"]);

        assert_eq!(
            resolver.get_subdomains(&bonfida).await.unwrap(),
            vec!["app", "dex"]
        );
    }

    #[tokio::test]
    async fn test_subdomains_skip_leftover_reverses() {
        let (_, owner) = wallet(1);
        let mut mock = MockFetcher::default();
        let bonfida = register(&mut mock, "bonfida", owner);
        let dex = register_sub(&mut mock, "dex.bonfida", owner);
        register_sub(&mut mock, "app.bonfida", owner);

        // dex 已刪除，只剩反查帳戶
        mock.accounts.remove(&dex);
        assert!(mock
            .accounts
            .contains_key(&get_reverse_key(CLUSTER, "dex.bonfida").unwrap()));

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(resolver.get_subdomains(&bonfida).await.unwrap(), vec!["app"]);
    }

    #[tokio::test]
    async fn test_primary_domain() {
        let (_, owner) = wallet(1);
        let (_, buyer) = wallet(2);
        let mut mock = MockFetcher::default();
        let domain = register(&mut mock, "bonfida", owner);
        let sub = register_sub(&mut mock, "dex.bonfida", buyer);

        for (wallet, name_account) in [(owner, domain), (buyer, sub)] {
            let mut data = vec![FavouriteDomain::TAG];
            data.extend_from_slice(name_account.as_ref());
            mock.insert(
                derive_favourite_domain_key(CLUSTER, &wallet).unwrap(),
                Account::new(CLUSTER.addresses().name_offers_id, data),
            );
        }

        let resolver = Resolver::new(mock, CLUSTER);
        let primary = resolver.get_primary_domain(&owner).await.unwrap().unwrap();
        assert_eq!(primary.domain, domain);
        assert_eq!(primary.reverse, "bonfida");
        assert!(!primary.stale);

        let primary = resolver.get_primary_domain(&buyer).await.unwrap().unwrap();
        assert_eq!(primary.reverse, "dex.bonfida");
        assert!(!primary.stale);

        let (_, nobody) = wallet(9);
        assert_eq!(resolver.get_primary_domain(&nobody).await.unwrap(), None);

        assert_eq!(
            resolver
                .get_primary_domains(&[owner, nobody, buyer])
                .await
                .unwrap(),
            vec![
                Some("bonfida".to_string()),
                None,
                Some("dex.bonfida".to_string())
            ]
        );
    }

    fn set_favourite(mock: &mut MockFetcher, wallet: &Pubkey, name_account: &Pubkey) {
        let mut data = vec![FavouriteDomain::TAG];
        data.extend_from_slice(name_account.as_ref());
        mock.insert(
            derive_favourite_domain_key(CLUSTER, wallet).unwrap(),
            Account::new(CLUSTER.addresses().name_offers_id, data),
        );
    }

    #[tokio::test]
    async fn test_primary_domains_of_tokenized_names() {
        let (_, holder) = wallet(3);
        let (_, elsewhere) = wallet(4);
        let tokenizer_state = Pubkey::new_from_array([77; 32]);
        let mut mock = MockFetcher::default();

        // NFT 在錢包的 ATA 裡
        let held = register(&mut mock, "bonfida", tokenizer_state);
        let held_mint = tokenize(&mut mock, held, None);
        let ata = get_associated_token_address(&holder, &held_mint).unwrap();
        mock.insert_token_account(ata, held_mint, holder, 1);
        set_favourite(&mut mock, &holder, &held);

        // NFT 在別的代幣帳戶，不算
        let moved = register(&mut mock, "solana", tokenizer_state);
        tokenize(&mut mock, moved, Some(elsewhere));
        set_favourite(&mut mock, &elsewhere, &moved);

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(
            resolver
                .get_primary_domains(&[holder, elsewhere])
                .await
                .unwrap(),
            vec![Some("bonfida".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_unreadable_favourite_does_not_fail_batch() {
        let (_, owner) = wallet(1);
        let (_, broken) = wallet(2);
        let mut mock = MockFetcher::default();
        let domain = register(&mut mock, "bonfida", owner);
        set_favourite(&mut mock, &owner, &domain);

        let mut data = vec![FavouriteDomain::TAG + 1];
        data.extend_from_slice(domain.as_ref());
        mock.insert(
            derive_favourite_domain_key(CLUSTER, &broken).unwrap(),
            Account::new(CLUSTER.addresses().name_offers_id, data),
        );

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(
            resolver.get_primary_domains(&[broken, owner]).await.unwrap(),
            vec![None, Some("bonfida".to_string())]
        );
    }

    #[tokio::test]
    async fn test_stale_primary_domain() {
        let (_, seller) = wallet(1);
        let (_, buyer) = wallet(2);
        let mut mock = MockFetcher::default();
        let domain = register(&mut mock, "bonfida", buyer);
        let mut data = vec![FavouriteDomain::TAG];
        data.extend_from_slice(domain.as_ref());
        mock.insert(
            derive_favourite_domain_key(CLUSTER, &seller).unwrap(),
            Account::new(CLUSTER.addresses().name_offers_id, data),
        );

        let resolver = Resolver::new(mock, CLUSTER);
        let primary = resolver.get_primary_domain(&seller).await.unwrap().unwrap();
        assert!(primary.stale);
        assert_eq!(resolver.get_primary_domains(&[seller]).await.unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_tokenized_domains_of_wallet() {
        let (_, holder) = wallet(5);
        let mut mock = MockFetcher::default();
        let tokenizer_state = Pubkey::new_from_array([77; 32]);
        let domain_key = register(&mut mock, "bonfida", tokenizer_state);
        let mint = tokenize(&mut mock, domain_key, Some(holder));

        let resolver = Resolver::new(mock, CLUSTER);
        let records = resolver.get_nft_records(&holder).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].nft_mint, mint);

        let domains = resolver.get_tokenized_domains(&holder).await.unwrap();
        assert_eq!(
            domains,
            vec![TokenizedDomain {
                key: domain_key,
                mint,
                reverse: "bonfida".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_records_v1_and_v2() {
        let (_, owner) = wallet(1);
        let mut mock = MockFetcher::default();
        let domain_key = register(&mut mock, "bonfida", owner);

        let mut url = b"https://sns.id".to_vec();
        url.resize(32, 0);
        mock.insert_name(
            get_record_v1_key(CLUSTER, "bonfida", Record::Url).unwrap(),
            domain_key,
            owner,
            Pubkey::default(),
            &url,
        );

        let content = serialize_record_v2_content("sns.id", Record::CNAME).unwrap();
        let registry = NameRegistryHeader {
            parent_name: domain_key,
            owner,
            class: crate::core::cluster::CENTRAL_STATE_RECORD_V2,
        };
        mock.insert(
            get_record_v2_key(CLUSTER, "bonfida", Record::CNAME).unwrap(),
            Account::new(
                NAME_PROGRAM_ID,
                pack_record_v2(
                    &registry,
                    (Validation::Solana, owner.as_ref()),
                    (Validation::Solana, GUARDIAN_ID.as_ref()),
                    &content,
                )
                .unwrap(),
            ),
        );

        // TXT 沒有驗證者，任何 RoA 都不算數
        let txt = serialize_record_v2_content("hello", Record::TXT).unwrap();
        let stranger = Pubkey::new_from_array([9; 32]);
        mock.insert(
            get_record_v2_key(CLUSTER, "bonfida", Record::TXT).unwrap(),
            Account::new(
                NAME_PROGRAM_ID,
                pack_record_v2(
                    &registry,
                    (Validation::Solana, owner.as_ref()),
                    (Validation::Solana, stranger.as_ref()),
                    &txt,
                )
                .unwrap(),
            ),
        );

        let resolver = Resolver::new(mock, CLUSTER);
        assert_eq!(
            resolver.get_record_v1("bonfida", Record::Url).await.unwrap(),
            Some("https://sns.id".to_string())
        );
        assert_eq!(resolver.get_record_v1("bonfida", Record::Ipfs).await.unwrap(), None);

        let records = resolver
            .get_domain_records_v2("bonfida", &[Record::CNAME, Record::TXT])
            .await
            .unwrap();
        assert_eq!(
            records,
            vec![
                VerifiedRecordV2 {
                    record: Record::CNAME,
                    content: "sns.id".to_string(),
                    stale: false,
                    roa_verified: true,
                },
                VerifiedRecordV2 {
                    record: Record::TXT,
                    content: "hello".to_string(),
                    stale: false,
                    roa_verified: false,
                },
            ]
        );
    }

    #[test]
    fn test_allow_pda_parsing() {
        assert_eq!("any".parse::<AllowPda>().unwrap(), AllowPda::Any);
        assert_eq!("TRUE".parse::<AllowPda>().unwrap(), AllowPda::Yes);
        assert_eq!("false".parse::<AllowPda>().unwrap(), AllowPda::No);
        assert!("maybe".parse::<AllowPda>().is_err());

        #[derive(Deserialize)]
        struct Wrapper {
            allow_pda: AllowPda,
        }
        let flag: Wrapper = toml::from_str("allow_pda = true").unwrap();
        assert_eq!(flag.allow_pda, AllowPda::Yes);
        let text: Wrapper = toml::from_str("allow_pda = \"any\"").unwrap();
        assert_eq!(text.allow_pda, AllowPda::Any);
    }
}
