//! Blockchain row operations

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::entity::{blockchains, redirects, sync_check_options};
use crate::error::PersistenceError;
use crate::model::{BlockchainPatch, SyncCheckOptionsPatch};

type Result<T> = std::result::Result<T, PersistenceError>;

/// Row operations on the blockchain tables
#[async_trait]
pub trait BlockchainQueries: Send {
    async fn insert_blockchain(&mut self, row: blockchains::Model) -> Result<()>;

    async fn insert_sync_check_options(&mut self, row: sync_check_options::Model) -> Result<()>;

    async fn insert_redirect(&mut self, row: redirects::Model) -> Result<()>;

    async fn update_blockchain(
        &mut self,
        blockchain_id: &str,
        patch: BlockchainPatch,
        updated_at: NaiveDateTime,
    ) -> Result<()>;

    async fn upsert_sync_check_options(
        &mut self,
        blockchain_id: &str,
        patch: SyncCheckOptionsPatch,
    ) -> Result<()>;

    async fn activate_blockchain(
        &mut self,
        blockchain_id: &str,
        active: bool,
        updated_at: NaiveDateTime,
    ) -> Result<()>;

    async fn delete_redirect(&mut self, blockchain_id: &str, domain: &str) -> Result<()>;

    async fn select_blockchains(&mut self) -> Result<Vec<blockchains::Model>>;

    async fn select_sync_check_options(&mut self) -> Result<Vec<sync_check_options::Model>>;

    async fn select_redirects(&mut self) -> Result<Vec<redirects::Model>>;
}
