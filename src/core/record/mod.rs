pub mod v1;
pub mod v2;

use crate::core::cluster::{Cluster, CENTRAL_STATE_RECORD_V2, GUARDIAN_ID};
use crate::core::derivation::{derive, get_domain_key, NamePrefix};
use crate::core::state::Validation;
use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Record {
    Ipfs,
    Arwv,
    Sol,
    Eth,
    Btc,
    Ltc,
    Doge,
    Email,
    Url,
    Discord,
    Github,
    Reddit,
    Twitter,
    Telegram,
    Pic,
    Shdw,
    Point,
    Bsc,
    Injective,
    Backpack,
    A,
    AAAA,
    CNAME,
    TXT,
    BASE,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordVersion {
    V1 = 1,
    V2 = 2,
}

impl Record {
    pub const ALL: [Record; 25] = [
        Record::Ipfs,
        Record::Arwv,
        Record::Sol,
        Record::Eth,
        Record::Btc,
        Record::Ltc,
        Record::Doge,
        Record::Email,
        Record::Url,
        Record::Discord,
        Record::Github,
        Record::Reddit,
        Record::Twitter,
        Record::Telegram,
        Record::Pic,
        Record::Shdw,
        Record::Point,
        Record::Bsc,
        Record::Injective,
        Record::Backpack,
        Record::A,
        Record::AAAA,
        Record::CNAME,
        Record::TXT,
        Record::BASE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Record::Ipfs => "IPFS",
            Record::Arwv => "ARWV",
            Record::Sol => "SOL",
            Record::Eth => "ETH",
            Record::Btc => "BTC",
            Record::Ltc => "LTC",
            Record::Doge => "DOGE",
            Record::Email => "email",
            Record::Url => "url",
            Record::Discord => "discord",
            Record::Github => "github",
            Record::Reddit => "reddit",
            Record::Twitter => "twitter",
            Record::Telegram => "telegram",
            Record::Pic => "pic",
            Record::Shdw => "SHDW",
            Record::Point => "POINT",
            Record::Bsc => "BSC",
            Record::Injective => "INJ",
            Record::Backpack => "backpack",
            Record::A => "A",
            Record::AAAA => "AAAA",
            Record::CNAME => "CNAME",
            Record::TXT => "TXT",
            Record::BASE => "BASE",
        }
    }

    /// Records stored as plain UTF-8 text.
    pub fn utf8_encoded(&self) -> bool {
        matches!(
            self,
            Record::Ipfs
                | Record::Arwv
                | Record::Btc
                | Record::Ltc
                | Record::Doge
                | Record::Email
                | Record::Url
                | Record::Discord
                | Record::Github
                | Record::Reddit
                | Record::Twitter
                | Record::Telegram
                | Record::Pic
                | Record::Shdw
                | Record::Point
                | Record::Backpack
                | Record::TXT
                | Record::CNAME
        )
    }

    pub fn is_evm(&self) -> bool {
        matches!(self, Record::Eth | Record::Bsc | Record::BASE)
    }

    /// Records whose right of association is proven with a secp256k1 signature.
    pub fn roa_validation(&self) -> Validation {
        match self {
            Record::Eth | Record::Bsc | Record::BASE | Record::Injective => Validation::Ethereum,
            _ => Validation::Solana,
        }
    }

    /// Records signed by the address they contain.
    pub fn is_self_signed(&self) -> bool {
        matches!(self, Record::Eth | Record::Injective | Record::Sol)
    }

    pub fn guardian(&self) -> Option<Pubkey> {
        match self {
            Record::CNAME | Record::Url => Some(GUARDIAN_ID),
            _ => None,
        }
    }
}

impl FromStr for Record {
    type Err = SnsError;

    fn from_str(input: &str) -> Result<Self> {
        Record::ALL
            .iter()
            .find(|r| r.as_str() == input)
            .or_else(|| {
                Record::ALL
                    .iter()
                    .find(|r| r.as_str().eq_ignore_ascii_case(input))
            })
            .copied()
            .ok_or_else(|| SnsError::UnrecognizedRecord(input.to_string()))
    }
}

impl From<Record> for &'static str {
    fn from(record: Record) -> Self {
        record.as_str()
    }
}

impl TryFrom<String> for Record {
    type Error = SnsError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn get_record_class(version: RecordVersion) -> Option<Pubkey> {
    match version {
        RecordVersion::V2 => Some(CENTRAL_STATE_RECORD_V2),
        RecordVersion::V1 => None,
    }
}

/// Record account of `domain`: the record label is hashed under the domain (or subdomain) key.
pub fn get_record_key(
    cluster: Cluster,
    domain: &str,
    record: Record,
    version: RecordVersion,
) -> Result<Pubkey> {
    let parent = get_domain_key(cluster, domain)?;
    let label = format!("{}{}", NamePrefix::Record(version).as_str(), record.as_str());
    derive(&label, &parent, get_record_class(version).as_ref())
}

pub fn get_record_v1_key(cluster: Cluster, domain: &str, record: Record) -> Result<Pubkey> {
    get_record_key(cluster, domain, record, RecordVersion::V1)
}

pub fn get_record_v2_key(cluster: Cluster, domain: &str, record: Record) -> Result<Pubkey> {
    get_record_key(cluster, domain, record, RecordVersion::V2)
}

fn injective_hrp() -> Result<Hrp> {
    Hrp::parse("inj").map_err(|_| SnsError::InvalidInjectiveAddress)
}

pub(crate) fn encode_injective(bytes: &[u8]) -> Result<String> {
    bech32::encode::<Bech32>(injective_hrp()?, bytes).map_err(|_| SnsError::InvalidInjectiveAddress)
}

pub(crate) fn decode_injective(content: &str) -> Result<Vec<u8>> {
    if !content.starts_with("inj1") {
        return Err(SnsError::InvalidInjectiveAddress);
    }
    let (_, data) = bech32::decode(content).map_err(|_| SnsError::InvalidInjectiveAddress)?;
    if data.len() != 20 {
        return Err(SnsError::InvalidInjectiveAddress);
    }
    Ok(data)
}

pub(crate) fn decode_evm(content: &str) -> Result<Vec<u8>> {
    let hex_part = content
        .strip_prefix("0x")
        .ok_or(SnsError::InvalidEvmAddress)?;
    let decoded = hex::decode(hex_part).map_err(|_| SnsError::InvalidEvmAddress)?;
    if decoded.len() != 20 {
        return Err(SnsError::InvalidEvmAddress);
    }
    Ok(decoded)
}

pub(crate) fn encode_evm(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub(crate) fn decode_ipv4(content: &str) -> Result<Vec<u8>> {
    let ip = content
        .parse::<Ipv4Addr>()
        .map_err(|_| SnsError::InvalidIpv4)?;
    Ok(ip.octets().to_vec())
}

pub(crate) fn decode_ipv6(content: &str) -> Result<Vec<u8>> {
    let ip = content
        .parse::<Ipv6Addr>()
        .map_err(|_| SnsError::InvalidIpv6)?;
    Ok(ip.octets().to_vec())
}

pub(crate) fn encode_ipv4(bytes: &[u8]) -> Result<String> {
    let octets: [u8; 4] = bytes.try_into().map_err(|_| SnsError::InvalidRecordData)?;
    Ok(Ipv4Addr::from(octets).to_string())
}

pub(crate) fn encode_ipv6(bytes: &[u8]) -> Result<String> {
    let octets: [u8; 16] = bytes.try_into().map_err(|_| SnsError::InvalidRecordData)?;
    Ok(Ipv6Addr::from(octets).to_string())
}

pub(crate) fn punycode_encode(content: &str) -> Result<String> {
    punycode::encode(content).map_err(|_| SnsError::Punycode)
}

pub(crate) fn punycode_decode(content: &str) -> Result<String> {
    punycode::decode(content).map_err(|_| SnsError::Punycode)
}
