pub mod cluster;
pub mod derivation;
pub mod instruction;
pub mod record;
pub mod resolve;
pub mod state;

pub use crate::domain::ports::AccountFetcher;
pub use crate::utils::error::Result;
pub use resolve::{AllowPda, ResolveConfig, Resolver};
