//! Records v1: raw record data stored directly in a name account under the domain.

use super::{
    decode_evm, decode_injective, decode_ipv4, decode_ipv6, encode_evm, encode_injective,
    encode_ipv4, encode_ipv6, punycode_encode, Record,
};
use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use ed25519_dalek::{Signature, VerifyingKey};

pub const SOL_RECORD_LEN: usize = 96;

/// Ed25519 strict verification. A signer that is not a curve point never verifies.
pub fn check_sol_record(message: &[u8], signature: &[u8], signer: &Pubkey) -> Result<bool> {
    let signature = Signature::from_slice(signature).map_err(|_| SnsError::InvalidRecordData)?;
    let key = match VerifyingKey::from_bytes(signer.as_array()) {
        Ok(key) => key,
        Err(_) => return Ok(false),
    };
    Ok(key.verify_strict(message, &signature).is_ok())
}

/// Message signed by the owner of a SOL record: hex of `destination ‖ record key`, as ASCII.
pub fn sol_record_message(destination: &[u8], record_key: &Pubkey) -> Vec<u8> {
    let mut raw = Vec::with_capacity(64);
    raw.extend_from_slice(destination);
    raw.extend_from_slice(record_key.as_ref());
    hex::encode(raw).into_bytes()
}

pub fn get_record_size(record: Record) -> Option<usize> {
    match record {
        Record::Sol => Some(SOL_RECORD_LEN),
        Record::Eth | Record::Bsc | Record::Injective => Some(20),
        Record::A => Some(4),
        Record::AAAA => Some(16),
        _ => None,
    }
}

fn is_valid_legacy(record: Record, text: &str) -> bool {
    match record {
        Record::Injective => decode_injective(text).is_ok(),
        Record::Eth | Record::Bsc => decode_evm(text).is_ok(),
        Record::A => decode_ipv4(text).is_ok(),
        Record::AAAA => decode_ipv6(text).is_ok(),
        _ => false,
    }
}

/// Decodes v1 record data (the bytes after the name registry header).
///
/// `signer` is the account expected to have signed a SOL record, normally the domain owner.
pub fn deserialize_record(
    data: &[u8],
    record: Record,
    record_key: &Pubkey,
    signer: &Pubkey,
) -> Result<String> {
    let size = match get_record_size(record) {
        Some(size) => size,
        None => {
            let text = String::from_utf8(data.to_vec())?;
            return Ok(text.trim_end_matches('\0').to_string());
        }
    };

    let idx = data
        .iter()
        .rposition(|&byte| byte != 0)
        .map_or(0, |pos| pos + 1);

    // 舊版紀錄以 UTF-8 文字儲存
    if idx != size {
        if let Ok(text) = std::str::from_utf8(&data[..idx]) {
            if is_valid_legacy(record, text) {
                return Ok(text.to_string());
            }
        }
        if idx > size || data.len() < size {
            return Err(SnsError::InvalidRecordData);
        }
    }

    let sized = &data[..size];
    match record {
        Record::Sol => {
            let (destination, signature) = sized.split_at(32);
            let message = sol_record_message(destination, record_key);
            if check_sol_record(&message, signature, signer)? {
                Ok(Pubkey::try_from(destination)?.to_string())
            } else {
                Err(SnsError::UnverifiedRecord)
            }
        }
        Record::Eth | Record::Bsc => Ok(encode_evm(sized)),
        Record::Injective => encode_injective(sized),
        Record::A => encode_ipv4(sized),
        Record::AAAA => encode_ipv6(sized),
        _ => Err(SnsError::InvalidRecordData),
    }
}

pub fn serialize_record(content: &str, record: Record) -> Result<Vec<u8>> {
    match record {
        Record::CNAME | Record::TXT => Ok(punycode_encode(content)?.into_bytes()),
        Record::Eth | Record::Bsc => decode_evm(content),
        Record::Injective => decode_injective(content),
        Record::A => decode_ipv4(content),
        Record::AAAA => decode_ipv6(content),
        Record::Sol => Err(SnsError::SolRecordNotSupported),
        _ => Ok(content.as_bytes().to_vec()),
    }
}
