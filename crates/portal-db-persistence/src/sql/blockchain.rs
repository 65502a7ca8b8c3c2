use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use super::{SqlTransaction, Supplied, patch_value, required_value};
use crate::entity::{blockchains, redirects, sync_check_options};
use crate::error::PersistenceError;
use crate::model::{BlockchainPatch, SyncCheckOptionsPatch};
use crate::traits::BlockchainQueries;

type Result<T> = std::result::Result<T, PersistenceError>;

#[async_trait]
impl BlockchainQueries for SqlTransaction {
    async fn insert_blockchain(&mut self, row: blockchains::Model) -> Result<()> {
        blockchains::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn insert_sync_check_options(&mut self, row: sync_check_options::Model) -> Result<()> {
        sync_check_options::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn insert_redirect(&mut self, row: redirects::Model) -> Result<()> {
        redirects::Entity::insert(row.into_active_model())
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn update_blockchain(
        &mut self,
        blockchain_id: &str,
        patch: BlockchainPatch,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        let active = blockchains::ActiveModel {
            altruist: patch_value(patch.altruist),
            blockchain: required_value(patch.blockchain),
            blockchain_aliases: patch_value(patch.blockchain_aliases),
            chain_id: patch_value(patch.chain_id),
            chain_id_check: patch_value(patch.chain_id_check),
            description: patch_value(patch.description),
            enforce_result: patch_value(patch.enforce_result),
            log_limit_blocks: patch_value(patch.log_limit_blocks),
            network: patch_value(patch.network),
            path: patch_value(patch.path),
            request_timeout: patch_value(patch.request_timeout),
            ticker: patch_value(patch.ticker),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        blockchains::Entity::update_many()
            .set(active)
            .filter(blockchains::Column::BlockchainId.eq(blockchain_id))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn upsert_sync_check_options(
        &mut self,
        blockchain_id: &str,
        patch: SyncCheckOptionsPatch,
    ) -> Result<()> {
        use sync_check_options::Column;

        let mut supplied = Supplied::new();
        let active = sync_check_options::ActiveModel {
            blockchain_id: Set(blockchain_id.to_string()),
            synccheck: supplied.value(patch.synccheck, Column::Synccheck),
            body: supplied.value(patch.body, Column::Body),
            path: supplied.value(patch.path, Column::Path),
            result_key: supplied.value(patch.result_key, Column::ResultKey),
            allowance: supplied.value(patch.allowance, Column::Allowance),
        };
        if supplied.is_empty() {
            return Ok(());
        }

        sync_check_options::Entity::insert(active)
            .on_conflict(
                OnConflict::column(Column::BlockchainId)
                    .update_columns(supplied.into_columns())
                    .to_owned(),
            )
            .exec_without_returning(&self.tx)
            .await?;
        Ok(())
    }

    async fn activate_blockchain(
        &mut self,
        blockchain_id: &str,
        active: bool,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        let model = blockchains::ActiveModel {
            active: Set(active),
            updated_at: Set(updated_at),
            ..Default::default()
        };
        blockchains::Entity::update_many()
            .set(model)
            .filter(blockchains::Column::BlockchainId.eq(blockchain_id))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn delete_redirect(&mut self, blockchain_id: &str, domain: &str) -> Result<()> {
        redirects::Entity::delete_many()
            .filter(redirects::Column::BlockchainId.eq(blockchain_id))
            .filter(redirects::Column::Domain.eq(domain))
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn select_blockchains(&mut self) -> Result<Vec<blockchains::Model>> {
        Ok(blockchains::Entity::find()
            .order_by_asc(blockchains::Column::BlockchainId)
            .all(&self.tx)
            .await?)
    }

    async fn select_sync_check_options(&mut self) -> Result<Vec<sync_check_options::Model>> {
        Ok(sync_check_options::Entity::find().all(&self.tx).await?)
    }

    async fn select_redirects(&mut self) -> Result<Vec<redirects::Model>> {
        Ok(redirects::Entity::find().all(&self.tx).await?)
    }
}
