//! Records v2: content stored behind a record header carrying staleness and
//! right-of-association validations.

use super::{
    decode_evm, decode_injective, decode_ipv4, decode_ipv6, encode_evm, encode_injective,
    encode_ipv4, encode_ipv6, punycode_decode, punycode_encode, Record,
};
use crate::core::state::{NameRegistryHeader, RecordHeader, Validation};
use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use serde::Serialize;
use std::str::FromStr;

pub fn serialize_record_v2_content(content: &str, record: Record) -> Result<Vec<u8>> {
    if record.utf8_encoded() {
        if matches!(record, Record::CNAME | Record::TXT) {
            return Ok(punycode_encode(content)?.into_bytes());
        }
        return Ok(content.as_bytes().to_vec());
    }
    match record {
        Record::Sol => Ok(Pubkey::from_str(content)?.to_bytes().to_vec()),
        Record::Eth | Record::Bsc | Record::BASE => decode_evm(content),
        Record::Injective => decode_injective(content),
        Record::A => decode_ipv4(content),
        Record::AAAA => decode_ipv6(content),
        _ => Err(SnsError::InvalidRecordData),
    }
}

pub fn deserialize_record_v2_content(content: &[u8], record: Record) -> Result<String> {
    if record.utf8_encoded() {
        let decoded = String::from_utf8(content.to_vec())?;
        if matches!(record, Record::CNAME | Record::TXT) {
            return punycode_decode(&decoded);
        }
        return Ok(decoded);
    }
    match record {
        Record::Sol => Ok(Pubkey::try_from(content)?.to_string()),
        Record::Eth | Record::Bsc | Record::BASE => {
            if content.len() != 20 {
                return Err(SnsError::InvalidRecordData);
            }
            Ok(encode_evm(content))
        }
        Record::Injective => encode_injective(content),
        Record::A => encode_ipv4(content),
        Record::AAAA => encode_ipv6(content),
        _ => Err(SnsError::InvalidRecordData),
    }
}

/// A records v2 account split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRecordV2 {
    pub kind: Record,
    pub registry: NameRegistryHeader,
    pub header: RecordHeader,
    pub staleness_id: Vec<u8>,
    pub roa_id: Vec<u8>,
    /// Raw content bytes.
    pub content: Vec<u8>,
}

impl ParsedRecordV2 {
    /// Layout: name registry header, record header, staleness id, RoA id, content.
    pub fn parse(kind: Record, account_data: &[u8]) -> Result<Self> {
        let (registry, _) =
            NameRegistryHeader::unpack(account_data).map_err(|_| SnsError::InvalidRecordData)?;
        let header = RecordHeader::from_account_data(account_data)?;
        let staleness = Validation::try_from(header.staleness_validation)?;
        let roa = Validation::try_from(header.right_of_association_validation)?;

        let mut offset = NameRegistryHeader::LEN + RecordHeader::LEN;
        let mut take = |len: usize| -> Result<Vec<u8>> {
            let slice = account_data
                .get(offset..offset + len)
                .ok_or(SnsError::InvalidRecordData)?;
            offset += len;
            Ok(slice.to_vec())
        };

        let staleness_id = take(staleness.id_len())?;
        let roa_id = take(roa.id_len())?;
        let content = take(header.content_length as usize)?;

        Ok(Self {
            kind,
            registry,
            header,
            staleness_id,
            roa_id,
            content,
        })
    }

    pub fn staleness_validation(&self) -> Result<Validation> {
        Validation::try_from(self.header.staleness_validation)
    }

    pub fn roa_validation(&self) -> Result<Validation> {
        Validation::try_from(self.header.right_of_association_validation)
    }

    pub fn deserialize_content(&self) -> Result<String> {
        deserialize_record_v2_content(&self.content, self.kind)
    }

    /// A record is fresh when the current domain owner signed it.
    pub fn verify_staleness(&self, owner: &Pubkey) -> Result<()> {
        if self.header.staleness_validation != Validation::Solana as u16
            || self.staleness_id != owner.as_ref()
        {
            return Err(SnsError::StaleRecord);
        }
        Ok(())
    }

    /// Checks that the RoA id matches the expected verifier for this kind of record.
    pub fn verify_roa(&self) -> Result<()> {
        if self.header.right_of_association_validation != self.kind.roa_validation() as u16 {
            return Err(SnsError::UnverifiedRecord);
        }
        let verified = match self.kind.guardian() {
            Some(guardian) => self.roa_id == guardian.as_ref(),
            None if self.kind.is_self_signed() => self.roa_id == self.content,
            // 沒有驗證者的紀錄一律視為未驗證
            None => false,
        };
        if !verified {
            return Err(SnsError::UnverifiedRecord);
        }
        Ok(())
    }
}

/// Writes the account layout read by [`ParsedRecordV2::parse`].
pub fn pack_record_v2(
    registry: &NameRegistryHeader,
    staleness: (Validation, &[u8]),
    roa: (Validation, &[u8]),
    content: &[u8],
) -> Result<Vec<u8>> {
    if staleness.1.len() != staleness.0.id_len() || roa.1.len() != roa.0.id_len() {
        return Err(SnsError::InvalidRecordData);
    }
    let header = RecordHeader {
        staleness_validation: staleness.0 as u16,
        right_of_association_validation: roa.0 as u16,
        content_length: content.len() as u32,
    };
    let mut data = borsh::to_vec(registry).map_err(|_| SnsError::InvalidRecordData)?;
    data.extend(borsh::to_vec(&header).map_err(|_| SnsError::InvalidRecordData)?);
    data.extend_from_slice(staleness.1);
    data.extend_from_slice(roa.1);
    data.extend_from_slice(content);
    Ok(data)
}
