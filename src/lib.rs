pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::Cli;

pub use crate::adapters::{Commitment, RpcClient};
pub use crate::config::SnsConfig;
pub use crate::core::cluster::Cluster;
pub use crate::core::record::{Record, RecordVersion};
pub use crate::core::resolve::{AllowPda, PrimaryDomain, ResolveConfig, Resolver};
pub use crate::domain::pubkey::Pubkey;
pub use crate::utils::error::{Result, SnsError};
