//! Offline instruction builders for the name program, the name offers program and the registrar.
//!
//! Nothing here signs or sends; callers get an [`Instruction`] to hand to a wallet.

use crate::core::cluster::{Cluster, NAME_PROGRAM_ID, SYSTEM_PROGRAM_ID};
use crate::core::derivation::{
    derive_favourite_domain_key, get_domain_key_with_parent, get_reverse_key,
};
use crate::domain::model::{AccountMeta, Instruction};
use crate::domain::pubkey::Pubkey;
use crate::utils::error::{Result, SnsError};
use borsh::BorshSerialize;

/// Name program instruction data. Borsh writes the variant index as the `u8` tag.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub enum NameInstruction {
    Create {
        hashed_name: Vec<u8>,
        lamports: u64,
        space: u32,
    },
    Update {
        offset: u32,
        data: Vec<u8>,
    },
    Transfer {
        new_owner: Pubkey,
    },
    Delete,
    Realloc {
        space: u32,
    },
}

const REGISTER_FAVOURITE_TAG: u8 = 6;
const BURN_TAG: u8 = 16;

fn pack(instruction: &NameInstruction) -> Result<Vec<u8>> {
    borsh::to_vec(instruction).map_err(|e| SnsError::InvalidAccountData {
        message: e.to_string(),
    })
}

#[allow(clippy::too_many_arguments)]
pub fn create_name_registry(
    name_key: Pubkey,
    name_owner: Pubkey,
    payer: Pubkey,
    hashed_name: [u8; 32],
    lamports: u64,
    space: u32,
    name_class: Option<Pubkey>,
    parent: Option<(Pubkey, Pubkey)>,
) -> Result<Instruction> {
    let data = pack(&NameInstruction::Create {
        hashed_name: hashed_name.to_vec(),
        lamports,
        space,
    })?;

    let mut accounts = vec![
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new(payer, true),
        AccountMeta::new(name_key, false),
        AccountMeta::new_readonly(name_owner, false),
    ];
    match name_class {
        Some(class) => accounts.push(AccountMeta::new_readonly(class, true)),
        None => accounts.push(AccountMeta::new_readonly(Pubkey::default(), false)),
    }
    match parent {
        Some((parent_key, parent_owner)) => {
            accounts.push(AccountMeta::new_readonly(parent_key, false));
            accounts.push(AccountMeta::new_readonly(parent_owner, true));
        }
        None => accounts.push(AccountMeta::new_readonly(Pubkey::default(), false)),
    }

    Ok(Instruction {
        program_id: NAME_PROGRAM_ID,
        accounts,
        data,
    })
}

pub fn update_name_registry(
    name_key: Pubkey,
    offset: u32,
    input: Vec<u8>,
    update_signer: Pubkey,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: NAME_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(name_key, false),
            AccountMeta::new_readonly(update_signer, true),
        ],
        data: pack(&NameInstruction::Update {
            offset,
            data: input,
        })?,
    })
}

/// Transfer of a name account. A parent owner signs in place of the current owner
/// when transferring a subdomain it controls.
pub fn transfer_name(
    name_key: Pubkey,
    new_owner: Pubkey,
    current_owner: Pubkey,
    name_class: Option<Pubkey>,
    parent: Option<(Pubkey, Pubkey)>,
) -> Result<Instruction> {
    let signer = parent.map(|(_, owner)| owner).unwrap_or(current_owner);
    let mut accounts = vec![
        AccountMeta::new(name_key, false),
        AccountMeta::new_readonly(signer, true),
    ];
    if let Some(class) = name_class {
        accounts.push(AccountMeta::new_readonly(class, true));
    }
    if let Some((parent_key, _)) = parent {
        if name_class.is_none() {
            accounts.push(AccountMeta::new_readonly(Pubkey::default(), false));
        }
        accounts.push(AccountMeta::new_readonly(parent_key, false));
    }

    Ok(Instruction {
        program_id: NAME_PROGRAM_ID,
        accounts,
        data: pack(&NameInstruction::Transfer { new_owner })?,
    })
}

pub fn delete_name_registry(
    name_key: Pubkey,
    refund_target: Pubkey,
    name_owner: Pubkey,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: NAME_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(name_key, false),
            AccountMeta::new_readonly(name_owner, true),
            AccountMeta::new(refund_target, false),
        ],
        data: pack(&NameInstruction::Delete)?,
    })
}

pub fn realloc_name_account(
    name_key: Pubkey,
    payer: Pubkey,
    name_owner: Pubkey,
    space: u32,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: NAME_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new(payer, true),
            AccountMeta::new(name_key, false),
            AccountMeta::new_readonly(name_owner, true),
        ],
        data: pack(&NameInstruction::Realloc { space })?,
    })
}

/// Sets `name_key` as the primary domain of `owner`. `parent` is required for subdomains.
pub fn register_favourite(
    cluster: Cluster,
    name_key: Pubkey,
    owner: Pubkey,
    parent: Option<Pubkey>,
) -> Result<Instruction> {
    let favourite = derive_favourite_domain_key(cluster, &owner)?;
    let mut accounts = vec![
        AccountMeta::new_readonly(name_key, false),
        AccountMeta::new(favourite, false),
        AccountMeta::new(owner, true),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];
    if let Some(parent) = parent {
        accounts.push(AccountMeta::new_readonly(parent, false));
    }
    Ok(Instruction {
        program_id: cluster.addresses().name_offers_id,
        accounts,
        data: vec![REGISTER_FAVOURITE_TAG],
    })
}

/// Burns a second-level domain through the registrar, refunding rent to `target`.
pub fn burn_domain(
    cluster: Cluster,
    domain: &str,
    owner: Pubkey,
    target: Pubkey,
) -> Result<Instruction> {
    let addresses = cluster.addresses();
    let domain_key = get_domain_key_with_parent(cluster, domain)?;
    if domain_key.is_sub {
        return Err(SnsError::InvalidDomain);
    }
    let key = domain_key.key;
    let (state, _) = Pubkey::find_program_address(&[key.as_ref()], &addresses.registrar_id)?;
    let (reselling_state, _) =
        Pubkey::find_program_address(&[key.as_ref(), &[1u8, 1u8]], &addresses.registrar_id)?;

    Ok(Instruction {
        program_id: addresses.registrar_id,
        accounts: vec![
            AccountMeta::new_readonly(NAME_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new(key, false),
            AccountMeta::new(get_reverse_key(cluster, domain)?, false),
            AccountMeta::new(reselling_state, false),
            AccountMeta::new(state, false),
            AccountMeta::new_readonly(addresses.reverse_lookup_class, false),
            AccountMeta::new_readonly(owner, true),
            AccountMeta::new(target, false),
        ],
        data: vec![BURN_TAG],
    })
}
