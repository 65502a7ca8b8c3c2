use async_trait::async_trait;
use chrono::NaiveDateTime;
use portal_db_common::Patch;

use super::{MemoryTransaction, Result, insert_unique, require_parent};
use crate::entity::{blockchains, redirects, sync_check_options};
use crate::model::{BlockchainPatch, SyncCheckOptionsPatch};
use crate::traits::BlockchainQueries;

#[async_trait]
impl BlockchainQueries for MemoryTransaction {
    async fn insert_blockchain(&mut self, row: blockchains::Model) -> Result<()> {
        self.check_fault("blockchains")?;
        let key = row.blockchain_id.clone();
        insert_unique(&mut self.work.blockchains, "blockchains", key, row)
    }

    async fn insert_sync_check_options(&mut self, row: sync_check_options::Model) -> Result<()> {
        self.check_fault("sync_check_options")?;
        require_parent(
            &self.work.blockchains,
            "sync_check_options",
            &row.blockchain_id,
        )?;
        let key = row.blockchain_id.clone();
        insert_unique(
            &mut self.work.sync_check_options,
            "sync_check_options",
            key,
            row,
        )
    }

    async fn insert_redirect(&mut self, row: redirects::Model) -> Result<()> {
        self.check_fault("redirects")?;
        require_parent(&self.work.blockchains, "redirects", &row.blockchain_id)?;
        let key = (row.blockchain_id.clone(), row.domain.clone());
        insert_unique(&mut self.work.redirects, "redirects", key, row)
    }

    async fn update_blockchain(
        &mut self,
        blockchain_id: &str,
        patch: BlockchainPatch,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        self.check_fault("blockchains")?;
        let Some(row) = self.work.blockchains.get_mut(blockchain_id) else {
            return Ok(());
        };
        if let Patch::Set(name) = patch.blockchain {
            row.blockchain = name;
        }
        patch.altruist.apply_to(&mut row.altruist);
        patch
            .blockchain_aliases
            .apply_to(&mut row.blockchain_aliases);
        patch.chain_id.apply_to(&mut row.chain_id);
        patch.chain_id_check.apply_to(&mut row.chain_id_check);
        patch.description.apply_to(&mut row.description);
        patch.enforce_result.apply_to(&mut row.enforce_result);
        patch.log_limit_blocks.apply_to(&mut row.log_limit_blocks);
        patch.network.apply_to(&mut row.network);
        patch.path.apply_to(&mut row.path);
        patch.request_timeout.apply_to(&mut row.request_timeout);
        patch.ticker.apply_to(&mut row.ticker);
        row.updated_at = updated_at;
        Ok(())
    }

    async fn upsert_sync_check_options(
        &mut self,
        blockchain_id: &str,
        patch: SyncCheckOptionsPatch,
    ) -> Result<()> {
        self.check_fault("sync_check_options")?;
        require_parent(&self.work.blockchains, "sync_check_options", blockchain_id)?;
        let row = self
            .work
            .sync_check_options
            .entry(blockchain_id.to_string())
            .or_insert_with(|| sync_check_options::Model {
                blockchain_id: blockchain_id.to_string(),
                synccheck: None,
                body: None,
                path: None,
                result_key: None,
                allowance: None,
            });
        patch.synccheck.apply_to(&mut row.synccheck);
        patch.body.apply_to(&mut row.body);
        patch.path.apply_to(&mut row.path);
        patch.result_key.apply_to(&mut row.result_key);
        patch.allowance.apply_to(&mut row.allowance);
        Ok(())
    }

    async fn activate_blockchain(
        &mut self,
        blockchain_id: &str,
        active: bool,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        self.check_fault("blockchains")?;
        if let Some(row) = self.work.blockchains.get_mut(blockchain_id) {
            row.active = active;
            row.updated_at = updated_at;
        }
        Ok(())
    }

    async fn delete_redirect(&mut self, blockchain_id: &str, domain: &str) -> Result<()> {
        self.check_fault("redirects")?;
        self.work
            .redirects
            .remove(&(blockchain_id.to_string(), domain.to_string()));
        Ok(())
    }

    async fn select_blockchains(&mut self) -> Result<Vec<blockchains::Model>> {
        Ok(self.work.blockchains.values().cloned().collect())
    }

    async fn select_sync_check_options(&mut self) -> Result<Vec<sync_check_options::Model>> {
        Ok(self.work.sync_check_options.values().cloned().collect())
    }

    async fn select_redirects(&mut self) -> Result<Vec<redirects::Model>> {
        Ok(self.work.redirects.values().cloned().collect())
    }
}
