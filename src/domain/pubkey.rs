use crate::utils::error::{Result, SnsError};
use borsh::{BorshDeserialize, BorshSerialize};
use curve25519_dalek::edwards::CompressedEdwardsY;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

pub const PUBKEY_BYTES: usize = 32;
pub const MAX_SEED_LEN: usize = 32;
pub const MAX_SEEDS: usize = 16;
const PDA_MARKER: &[u8; 21] = b"ProgramDerivedAddress";

/// A 32-byte Solana account address.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

const fn base58_digit(c: u8) -> Option<u32> {
    let digit = match c {
        b'1'..=b'9' => c - b'1',
        b'A'..=b'H' => c - b'A' + 9,
        b'J'..=b'N' => c - b'J' + 17,
        b'P'..=b'Z' => c - b'P' + 22,
        b'a'..=b'k' => c - b'a' + 33,
        b'm'..=b'z' => c - b'm' + 44,
        _ => return None,
    };
    Some(digit as u32)
}

impl Pubkey {
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Decodes a base58 address at compile time. Invalid input fails the build.
    pub const fn from_str_const(s: &str) -> Self {
        let input = s.as_bytes();
        let mut out = [0u8; PUBKEY_BYTES];
        let mut i = 0;
        while i < input.len() {
            let mut carry = match base58_digit(input[i]) {
                Some(d) => d,
                None => panic!("invalid base58 character"),
            };
            let mut j = PUBKEY_BYTES;
            while j > 0 {
                j -= 1;
                carry += (out[j] as u32) * 58;
                out[j] = (carry & 0xff) as u8;
                carry >>= 8;
            }
            if carry != 0 {
                panic!("base58 value does not fit in 32 bytes");
            }
            i += 1;
        }
        Self(out)
    }

    pub const fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_array(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// True when the bytes decompress to an Ed25519 point, i.e. the key can have a private key.
    pub fn is_on_curve(&self) -> bool {
        CompressedEdwardsY(self.0).decompress().is_some()
    }

    pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey> {
        if seeds.len() > MAX_SEEDS {
            return Err(SnsError::InvalidSeeds);
        }
        let mut hasher = Sha256::new();
        for seed in seeds {
            if seed.len() > MAX_SEED_LEN {
                return Err(SnsError::InvalidSeeds);
            }
            hasher.update(seed);
        }
        hasher.update(program_id.0);
        hasher.update(PDA_MARKER);
        let hash: [u8; PUBKEY_BYTES] = hasher.finalize().into();

        let candidate = Pubkey(hash);
        if candidate.is_on_curve() {
            return Err(SnsError::InvalidSeeds);
        }
        Ok(candidate)
    }

    /// Searches bump seeds from 255 downwards for the first off-curve address.
    pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
        if seeds.len() >= MAX_SEEDS || seeds.iter().any(|s| s.len() > MAX_SEED_LEN) {
            return Err(SnsError::InvalidSeeds);
        }
        for bump in (0..=u8::MAX).rev() {
            let bump_seed = [bump];
            let mut with_bump: Vec<&[u8]> = seeds.to_vec();
            with_bump.push(&bump_seed);
            // 只剩 on-curve 會失敗，換下一個 bump
            if let Ok(key) = Self::create_program_address(&with_bump, program_id) {
                return Ok((key, bump));
            }
        }
        Err(SnsError::InvalidSeeds)
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Pubkey {
    type Error = SnsError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let array: [u8; PUBKEY_BYTES] = bytes.try_into().map_err(|_| SnsError::InvalidPubkey)?;
        Ok(Self(array))
    }
}

impl FromStr for Pubkey {
    type Err = SnsError;

    fn from_str(s: &str) -> Result<Self> {
        // 44 chars is the longest base58 encoding of 32 bytes
        if s.is_empty() || s.len() > 44 {
            return Err(SnsError::InvalidPubkey);
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| SnsError::InvalidPubkey)?;
        Pubkey::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(serde::de::Error::custom)
    }
}
