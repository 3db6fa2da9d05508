//! Layouts of the on-chain accounts read by the resolver.

use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;

fn invalid(message: impl Into<String>) -> SnsError {
    SnsError::InvalidAccountData {
        message: message.into(),
    }
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let bytes: [u8; 8] = data
        .get(offset..offset + 8)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| invalid("account too short"))?;
    Ok(u64::from_le_bytes(bytes))
}

fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    data.get(offset..offset + 32)
        .ok_or_else(|| invalid("account too short"))
        .and_then(Pubkey::try_from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, BorshSerialize, BorshDeserialize)]
pub struct NameRegistryHeader {
    pub parent_name: Pubkey,
    pub owner: Pubkey,
    pub class: Pubkey,
}

impl NameRegistryHeader {
    pub const LEN: usize = 96;

    /// Splits a name account into its header and the free-form data behind it.
    pub fn unpack(data: &[u8]) -> Result<(Self, Vec<u8>)> {
        let header_bytes = data
            .get(..Self::LEN)
            .ok_or_else(|| invalid("name registry shorter than its header"))?;
        let header = Self::try_from_slice(header_bytes).map_err(|e| invalid(e.to_string()))?;
        Ok((header, data[Self::LEN..].to_vec()))
    }
}

/// Decodes the payload of a reverse lookup account (`u32` length + UTF-8).
pub fn deserialize_reverse(data: &[u8], trim_first_nul: bool) -> Result<String> {
    let len_bytes: [u8; 4] = data
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or(SnsError::InvalidReverse)?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    let bytes = data.get(4..4 + len).ok_or(SnsError::InvalidReverse)?;
    let reverse = String::from_utf8(bytes.to_vec()).map_err(|_| SnsError::InvalidReverse)?;
    if trim_first_nul {
        if let Some(stripped) = reverse.strip_prefix('\0') {
            return Ok(stripped.to_string());
        }
    }
    Ok(reverse)
}

/// Inverse of [`deserialize_reverse`], the layout written by the name program's create call.
pub fn serialize_reverse(name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + name.len());
    out.extend_from_slice(&(name.len() as u32).to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FavouriteDomain {
    pub tag: u8,
    pub name_account: Pubkey,
}

impl FavouriteDomain {
    pub const TAG: u8 = 4;

    pub fn parse(mut data: &[u8]) -> Result<Self> {
        let parsed = Self::deserialize(&mut data).map_err(|e| invalid(e.to_string()))?;
        if parsed.tag != Self::TAG {
            return Err(invalid(format!(
                "favourite domain tag {} (expected {})",
                parsed.tag,
                Self::TAG
            )));
        }
        Ok(parsed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NftRecordTag {
    Uninitialized = 0,
    CentralState = 1,
    ActiveRecord = 2,
    InactiveRecord = 3,
}

impl TryFrom<u8> for NftRecordTag {
    type Error = SnsError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(NftRecordTag::Uninitialized),
            1 => Ok(NftRecordTag::CentralState),
            2 => Ok(NftRecordTag::ActiveRecord),
            3 => Ok(NftRecordTag::InactiveRecord),
            other => Err(invalid(format!("unknown nft record tag {}", other))),
        }
    }
}

/// Name tokenizer record linking a domain to its NFT mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct NftRecord {
    pub tag: u8,
    pub nonce: u8,
    pub name_account: Pubkey,
    pub owner: Pubkey,
    pub nft_mint: Pubkey,
}

impl NftRecord {
    pub const LEN: usize = 1 + 1 + 32 + 32 + 32;
    pub const NFT_MINT_OFFSET: usize = 66;

    pub fn parse(mut data: &[u8]) -> Result<Self> {
        let record = Self::deserialize(&mut data).map_err(|e| invalid(e.to_string()))?;
        NftRecordTag::try_from(record.tag)?;
        Ok(record)
    }

    pub fn is_active(&self) -> bool {
        self.tag == NftRecordTag::ActiveRecord as u8
    }
}

/// The subset of an SPL token mint the resolver needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mint {
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
}

impl Mint {
    pub const LEN: usize = 82;

    pub fn unpack(data: &[u8]) -> Result<Self> {
        if data.len() != Self::LEN {
            return Err(invalid(format!("mint of {} bytes", data.len())));
        }
        Ok(Self {
            supply: read_u64(data, 36)?,
            decimals: data[44],
            is_initialized: data[45] != 0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

impl TokenAccount {
    pub const LEN: usize = 165;
    pub const OWNER_OFFSET: usize = 32;
    pub const AMOUNT_OFFSET: usize = 64;

    pub fn unpack(data: &[u8]) -> Result<Self> {
        if data.len() != Self::LEN {
            return Err(invalid(format!("token account of {} bytes", data.len())));
        }
        Ok(Self {
            mint: read_pubkey(data, 0)?,
            owner: read_pubkey(data, Self::OWNER_OFFSET)?,
            amount: read_u64(data, Self::AMOUNT_OFFSET)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Validation {
    None = 0,
    Solana = 1,
    Ethereum = 2,
    UnverifiedSolana = 3,
}

impl Validation {
    /// Byte length of the id that follows the record header for this validation.
    pub fn id_len(self) -> usize {
        match self {
            Validation::None => 0,
            Validation::Ethereum => 20,
            Validation::Solana | Validation::UnverifiedSolana => 32,
        }
    }
}

impl TryFrom<u16> for Validation {
    type Error = SnsError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(Validation::None),
            1 => Ok(Validation::Solana),
            2 => Ok(Validation::Ethereum),
            3 => Ok(Validation::UnverifiedSolana),
            _ => Err(SnsError::InvalidRecordData),
        }
    }
}

/// Header of a records v2 account, right after the name registry header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, BorshSerialize, BorshDeserialize)]
pub struct RecordHeader {
    pub staleness_validation: u16,
    pub right_of_association_validation: u16,
    pub content_length: u32,
}

impl RecordHeader {
    pub const LEN: usize = 8;

    pub fn from_account_data(data: &[u8]) -> Result<Self> {
        let start = NameRegistryHeader::LEN;
        let bytes = data
            .get(start..start + Self::LEN)
            .ok_or(SnsError::InvalidRecordData)?;
        Self::try_from_slice(bytes).map_err(|_| SnsError::InvalidRecordData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_registry_unpack() {
        let parent = Pubkey::new_from_array([1; 32]);
        let owner = Pubkey::new_from_array([2; 32]);
        let mut data = borsh::to_vec(&NameRegistryHeader {
            parent_name: parent,
            owner,
            class: Pubkey::default(),
        })
        .unwrap();
        data.extend_from_slice(b"hello");

        let (header, rest) = NameRegistryHeader::unpack(&data).unwrap();
        assert_eq!(header.parent_name, parent);
        assert_eq!(header.owner, owner);
        assert_eq!(rest, b"hello");

        assert!(NameRegistryHeader::unpack(&data[..50]).is_err());
    }

    #[test]
    fn test_reverse_round_trip_and_nul_trim() {
        let data = serialize_reverse("bonfida");
        assert_eq!(deserialize_reverse(&data, false).unwrap(), "bonfida");

        let sub = serialize_reverse("\0dex");
        assert_eq!(deserialize_reverse(&sub, true).unwrap(), "dex");
        assert_eq!(deserialize_reverse(&sub, false).unwrap(), "\0dex");
    }

    #[test]
    fn test_reverse_bounds() {
        assert!(matches!(
            deserialize_reverse(&[1, 0], false),
            Err(SnsError::InvalidReverse)
        ));
        // 長度欄位大於實際資料
        assert!(matches!(
            deserialize_reverse(&[10, 0, 0, 0, b'a'], false),
            Err(SnsError::InvalidReverse)
        ));
    }

    #[test]
    fn test_favourite_domain_tag() {
        let name = Pubkey::new_from_array([9; 32]);
        let mut data = vec![4u8];
        data.extend_from_slice(name.as_ref());
        assert_eq!(FavouriteDomain::parse(&data).unwrap().name_account, name);

        data[0] = 3;
        assert!(FavouriteDomain::parse(&data).is_err());
    }

    #[test]
    fn test_nft_record_layout() {
        let record = NftRecord {
            tag: 2,
            nonce: 254,
            name_account: Pubkey::new_from_array([1; 32]),
            owner: Pubkey::new_from_array([2; 32]),
            nft_mint: Pubkey::new_from_array([3; 32]),
        };
        let data = borsh::to_vec(&record).unwrap();
        assert_eq!(data.len(), NftRecord::LEN);
        assert_eq!(&data[NftRecord::NFT_MINT_OFFSET..], record.nft_mint.as_ref());
        let parsed = NftRecord::parse(&data).unwrap();
        assert!(parsed.is_active());
    }

    #[test]
    fn test_token_layouts() {
        let mut mint = vec![0u8; Mint::LEN];
        mint[36..44].copy_from_slice(&1u64.to_le_bytes());
        mint[45] = 1;
        let parsed = Mint::unpack(&mint).unwrap();
        assert_eq!(parsed.supply, 1);
        assert!(parsed.is_initialized);

        let mut account = vec![0u8; TokenAccount::LEN];
        account[..32].copy_from_slice(&[5; 32]);
        account[32..64].copy_from_slice(&[6; 32]);
        account[64..72].copy_from_slice(&1u64.to_le_bytes());
        let parsed = TokenAccount::unpack(&account).unwrap();
        assert_eq!(parsed.mint, Pubkey::new_from_array([5; 32]));
        assert_eq!(parsed.owner, Pubkey::new_from_array([6; 32]));
        assert_eq!(parsed.amount, 1);

        assert!(TokenAccount::unpack(&account[..100]).is_err());
    }

    #[test]
    fn test_record_header_offset() {
        let mut data = vec![0u8; NameRegistryHeader::LEN];
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&20u32.to_le_bytes());
        let header = RecordHeader::from_account_data(&data).unwrap();
        assert_eq!(header.staleness_validation, 1);
        assert_eq!(header.right_of_association_validation, 2);
        assert_eq!(header.content_length, 20);
        assert_eq!(Validation::try_from(2).unwrap().id_len(), 20);
    }
}
