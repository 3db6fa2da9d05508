use crate::domain::model::{Account, AccountFilter};
use crate::domain::pubkey::Pubkey;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read access to chain state. `RpcClient` talks JSON-RPC; tests plug in maps.
#[async_trait]
pub trait AccountFetcher: Send + Sync {
    async fn get_account(&self, key: &Pubkey) -> Result<Option<Account>>;

    /// Results are in the same order as `keys`.
    async fn get_multiple_accounts(&self, keys: &[Pubkey]) -> Result<Vec<Option<Account>>>;

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Account)>>;

    /// Token accounts of `mint`, largest balance first.
    async fn get_token_largest_accounts(&self, mint: &Pubkey) -> Result<Vec<Pubkey>>;
}
