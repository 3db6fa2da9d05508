use crate::adapters::rpc::Commitment;
use crate::config::SnsConfig;
use crate::core::cluster::Cluster;
use crate::core::record::Record;
use crate::core::resolve::AllowPda;
use crate::domain::pubkey::Pubkey;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sns")]
#[command(about = "Query Solana Name Service domains, records and primary domains")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// RPC endpoint, overrides `rpc.url`
    #[arg(long, short = 'u', env = "SNS_RPC_URL", global = true)]
    pub url: Option<String>,

    #[arg(long, global = true)]
    pub cluster: Option<Cluster>,

    #[arg(long, global = true)]
    pub commitment: Option<Commitment>,

    /// Resolve domains owned by program addresses: true, false or any
    #[arg(long, global = true)]
    pub allow_pda: Option<AllowPda>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve the wallet a domain points to
    Resolve {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Show the name registry of a domain
    Lookup {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Find the name of a domain account
    ReverseLookup { key: Pubkey },
    /// List domains held by a wallet, tokenized ones included
    Domains {
        #[arg(required = true)]
        owners: Vec<Pubkey>,
    },
    /// List subdomains of a domain
    Subdomains { domain: String },
    /// Show the primary domain of a wallet
    Favourite {
        #[arg(required = true)]
        owners: Vec<Pubkey>,
    },
    /// Print the derived account key of a domain
    Key {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    #[command(subcommand)]
    Record(RecordCommand),
    /// Build unsigned instructions
    #[command(subcommand)]
    Instruction(InstructionCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum RecordCommand {
    /// Read records of a domain
    Get {
        #[arg(long, short = 'd')]
        domain: String,
        #[arg(long, short = 'r', value_delimiter = ',', required = true)]
        record: Vec<Record>,
        /// Read records v2 and report their validation status
        #[arg(long)]
        v2: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum InstructionCommand {
    /// Transfer a domain to a new owner
    Transfer {
        domain: String,
        #[arg(long)]
        new_owner: Pubkey,
        /// Current owner; fetched from the registry when omitted
        #[arg(long)]
        owner: Option<Pubkey>,
    },
    /// Burn a second-level domain
    Burn {
        domain: String,
        #[arg(long)]
        owner: Pubkey,
        /// Rent refund target, defaults to the owner
        #[arg(long)]
        refund: Option<Pubkey>,
    },
    /// Set a domain as the primary domain of its owner
    Favourite {
        domain: String,
        #[arg(long)]
        owner: Pubkey,
    },
}

impl Cli {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut SnsConfig) {
        if let Some(url) = &self.url {
            config.rpc.url = Some(url.clone());
        }
        if let Some(cluster) = self.cluster {
            config.cluster.name = Some(cluster);
        }
        if let Some(commitment) = self.commitment {
            config.rpc.commitment = Some(commitment);
        }
        if let Some(allow_pda) = self.allow_pda {
            config.resolve.allow_pda = Some(allow_pda);
        }
    }
}
