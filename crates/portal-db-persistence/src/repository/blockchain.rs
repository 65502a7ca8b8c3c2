//! Blockchain aggregate: blockchains plus sync_check_options and redirects

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use portal_db_common::nullable::{nullable, or_zero};
use portal_db_common::utils::{generate_id, now};
use portal_db_common::validation::{
    require_id, validate_blockchain, validate_blockchain_update, validate_redirect,
};
use portal_db_common::{
    Blockchain, Redirect, SyncCheckOptions, UpdateBlockchain, UpdateSyncCheckOptions,
    ValidationError,
};
use tracing::info;

use super::{Repository, finish};
use crate::entity::{blockchains, redirects, sync_check_options};
use crate::error::Result;
use crate::model::{BlockchainPatch, SyncCheckOptionsPatch};
use crate::traits::{AggregateReader, AggregateWriter, BlockchainQueries, Store};

#[async_trait]
impl<S: Store> AggregateWriter<Blockchain> for Repository<S> {
    /// Chains usually arrive with their relay chain id already set; an id is
    /// generated only when none was supplied.
    async fn create(&self, mut chain: Blockchain) -> Result<Blockchain> {
        validate_blockchain(&chain)?;

        if chain.id.is_empty() {
            chain.id = generate_id();
        }
        let timestamp = now();
        chain.created_at = Some(timestamp);
        chain.updated_at = Some(timestamp);
        for redirect in &mut chain.redirects {
            redirect.blockchain_id = chain.id.clone();
            redirect.created_at = Some(timestamp);
            redirect.updated_at = Some(timestamp);
        }
        if let Some(options) = chain.sync_check_options.as_mut() {
            options.blockchain_id = chain.id.clone();
        }
        let rows = BlockchainRows::from_blockchain(&chain, timestamp);

        self.deadline("create_blockchain", async {
            let mut tx = self.store().begin().await?;
            let result = rows.insert(&mut tx).await;
            finish("create_blockchain", tx, result).await
        })
        .await?;

        info!(blockchain_id = %chain.id, blockchain = %chain.blockchain, "Created blockchain");
        Ok(chain)
    }

    async fn update(&self, id: &str, update: UpdateBlockchain) -> Result<()> {
        require_id(id)?;
        validate_blockchain_update(&update)?;

        let parent = update.has_parent_fields().then(|| blockchain_patch(&update));
        let sync_check = update
            .sync_check_options
            .as_ref()
            .filter(|options| !options.is_empty())
            .map(sync_check_patch);
        let timestamp = now();

        self.deadline("update_blockchain", async {
            let mut tx = self.store().begin().await?;
            let result = async {
                if let Some(patch) = parent {
                    tx.update_blockchain(id, patch, timestamp).await?;
                }
                if let Some(patch) = sync_check {
                    tx.upsert_sync_check_options(id, patch).await?;
                }
                Ok(())
            }
            .await;
            finish("update_blockchain", tx, result).await
        })
        .await?;

        info!(blockchain_id = %id, "Updated blockchain");
        Ok(())
    }

    /// Deactivates the chain
    async fn remove(&self, id: &str) -> Result<()> {
        self.activate_blockchain(id, false).await
    }
}

#[async_trait]
impl<S: Store> AggregateReader<Blockchain> for Repository<S> {
    async fn read_all(&self) -> Result<Vec<Blockchain>> {
        self.deadline("read_blockchains", async {
            let mut tx = self.store().begin().await?;
            let result = select_blockchains(&mut tx).await;
            finish("read_blockchains", tx, result).await
        })
        .await
    }
}

impl<S: Store> Repository<S> {
    /// Add a redirect to an existing blockchain
    pub async fn write_redirect(&self, mut redirect: Redirect) -> Result<Redirect> {
        validate_redirect(&redirect)?;
        let timestamp = now();
        redirect.created_at = Some(timestamp);
        redirect.updated_at = Some(timestamp);
        let row = redirect_row(&redirect.blockchain_id, &redirect, timestamp);

        self.deadline("write_redirect", async {
            let mut tx = self.store().begin().await?;
            let result = tx.insert_redirect(row).await.map_err(Into::into);
            finish("write_redirect", tx, result).await
        })
        .await?;

        info!(
            blockchain_id = %redirect.blockchain_id,
            domain = %redirect.domain,
            "Created redirect"
        );
        Ok(redirect)
    }

    /// Delete the redirect identified by chain and domain
    pub async fn remove_redirect(&self, blockchain_id: &str, domain: &str) -> Result<()> {
        require_id(blockchain_id)?;
        if domain.is_empty() {
            return Err(ValidationError::MissingRequiredField("domain").into());
        }

        self.deadline("remove_redirect", async {
            let mut tx = self.store().begin().await?;
            let result = tx
                .delete_redirect(blockchain_id, domain)
                .await
                .map_err(Into::into);
            finish("remove_redirect", tx, result).await
        })
        .await?;

        info!(blockchain_id = %blockchain_id, domain = %domain, "Removed redirect");
        Ok(())
    }

    /// Switch a chain on or off
    pub async fn activate_blockchain(&self, id: &str, active: bool) -> Result<()> {
        require_id(id)?;
        let timestamp = now();

        self.deadline("activate_blockchain", async {
            let mut tx = self.store().begin().await?;
            let result = tx
                .activate_blockchain(id, active, timestamp)
                .await
                .map_err(Into::into);
            finish("activate_blockchain", tx, result).await
        })
        .await?;

        info!(blockchain_id = %id, active, "Set blockchain activity");
        Ok(())
    }
}

struct BlockchainRows {
    blockchain: blockchains::Model,
    sync_check: Option<sync_check_options::Model>,
    redirects: Vec<redirects::Model>,
}

impl BlockchainRows {
    fn from_blockchain(chain: &Blockchain, timestamp: NaiveDateTime) -> Self {
        let id = chain.id.as_str();
        Self {
            blockchain: blockchains::Model {
                blockchain_id: chain.id.clone(),
                altruist: nullable(chain.altruist.clone()),
                blockchain: chain.blockchain.clone(),
                chain_id: nullable(chain.chain_id.clone()),
                chain_id_check: nullable(chain.chain_id_check.clone()),
                path: nullable(chain.path.clone()),
                description: nullable(chain.description.clone()),
                enforce_result: nullable(chain.enforce_result.clone()),
                network: nullable(chain.network.clone()),
                ticker: nullable(chain.ticker.clone()),
                blockchain_aliases: nullable(chain.blockchain_aliases.clone()),
                log_limit_blocks: nullable(chain.log_limit_blocks),
                request_timeout: nullable(chain.request_timeout),
                active: chain.active,
                created_at: timestamp,
                updated_at: timestamp,
            },
            sync_check: chain
                .sync_check_options
                .as_ref()
                .map(|options| sync_check_row(id, options))
                .filter(sync_check_options::Model::is_not_null),
            redirects: chain
                .redirects
                .iter()
                .map(|redirect| redirect_row(id, redirect, timestamp))
                .collect(),
        }
    }

    async fn insert<Q: BlockchainQueries>(self, tx: &mut Q) -> Result<()> {
        tx.insert_blockchain(self.blockchain).await?;
        if let Some(row) = self.sync_check {
            tx.insert_sync_check_options(row).await?;
        }
        for row in self.redirects {
            tx.insert_redirect(row).await?;
        }
        Ok(())
    }
}

fn sync_check_row(id: &str, options: &SyncCheckOptions) -> sync_check_options::Model {
    sync_check_options::Model {
        blockchain_id: id.to_string(),
        synccheck: nullable(options.sync_check.clone()),
        body: nullable(options.body.clone()),
        path: nullable(options.path.clone()),
        result_key: nullable(options.result_key.clone()),
        allowance: nullable(options.allowance),
    }
}

fn redirect_row(
    blockchain_id: &str,
    redirect: &Redirect,
    timestamp: NaiveDateTime,
) -> redirects::Model {
    redirects::Model {
        blockchain_id: blockchain_id.to_string(),
        domain: redirect.domain.clone(),
        alias: redirect.alias.clone(),
        loadbalancer: redirect.load_balancer_id.clone(),
        created_at: timestamp,
        updated_at: timestamp,
    }
}

fn blockchain_patch(update: &UpdateBlockchain) -> BlockchainPatch {
    BlockchainPatch {
        altruist: update.altruist.clone(),
        blockchain: update.blockchain.clone(),
        blockchain_aliases: update.blockchain_aliases.clone(),
        chain_id: update.chain_id.clone(),
        chain_id_check: update.chain_id_check.clone(),
        description: update.description.clone(),
        enforce_result: update.enforce_result.clone(),
        log_limit_blocks: update.log_limit_blocks.clone(),
        network: update.network.clone(),
        path: update.path.clone(),
        request_timeout: update.request_timeout.clone(),
        ticker: update.ticker.clone(),
    }
}

fn sync_check_patch(update: &UpdateSyncCheckOptions) -> SyncCheckOptionsPatch {
    SyncCheckOptionsPatch {
        synccheck: update.sync_check.clone(),
        body: update.body.clone(),
        path: update.path.clone(),
        result_key: update.result_key.clone(),
        allowance: update.allowance.clone(),
    }
}

async fn select_blockchains<Q: BlockchainQueries>(tx: &mut Q) -> Result<Vec<Blockchain>> {
    let mut sync_checks: HashMap<String, sync_check_options::Model> = tx
        .select_sync_check_options()
        .await?
        .into_iter()
        .map(|row| (row.blockchain_id.clone(), row))
        .collect();

    let mut chain_redirects: HashMap<String, Vec<Redirect>> = HashMap::new();
    for row in tx.select_redirects().await? {
        chain_redirects
            .entry(row.blockchain_id.clone())
            .or_default()
            .push(Redirect {
                blockchain_id: row.blockchain_id,
                alias: row.alias,
                domain: row.domain,
                load_balancer_id: row.loadbalancer,
                created_at: Some(row.created_at),
                updated_at: Some(row.updated_at),
            });
    }

    let chains = tx
        .select_blockchains()
        .await?
        .into_iter()
        .map(|row| Blockchain {
            sync_check_options: sync_checks
                .remove(&row.blockchain_id)
                .map(|s| SyncCheckOptions {
                    blockchain_id: s.blockchain_id,
                    sync_check: or_zero(s.synccheck),
                    body: or_zero(s.body),
                    path: or_zero(s.path),
                    result_key: or_zero(s.result_key),
                    allowance: or_zero(s.allowance),
                }),
            redirects: chain_redirects
                .remove(&row.blockchain_id)
                .unwrap_or_default(),
            id: row.blockchain_id,
            altruist: or_zero(row.altruist),
            blockchain: row.blockchain,
            chain_id: or_zero(row.chain_id),
            chain_id_check: or_zero(row.chain_id_check),
            description: or_zero(row.description),
            enforce_result: or_zero(row.enforce_result),
            network: or_zero(row.network),
            path: or_zero(row.path),
            ticker: or_zero(row.ticker),
            blockchain_aliases: or_zero(row.blockchain_aliases),
            log_limit_blocks: or_zero(row.log_limit_blocks),
            request_timeout: or_zero(row.request_timeout),
            active: row.active,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
        .collect();
    Ok(chains)
}
