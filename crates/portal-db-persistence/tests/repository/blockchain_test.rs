//! Blockchain aggregate tests against the in-memory store

use portal_db_common::{
    Blockchain, ID_LENGTH, Patch, Redirect, UpdateBlockchain, UpdateSyncCheckOptions,
    ValidationError,
};
use portal_db_persistence::{
    AggregateReader, AggregateWriter, Error, MemoryStore, PersistenceError, Repository,
};

use crate::common;

async fn read_one(repo: &Repository<MemoryStore>, id: &str) -> Blockchain {
    AggregateReader::<Blockchain>::read_all(repo)
        .await
        .unwrap()
        .into_iter()
        .find(|chain| chain.id == id)
        .expect("blockchain not found")
}

fn redirect(blockchain_id: &str, domain: &str) -> Redirect {
    Redirect {
        blockchain_id: blockchain_id.to_string(),
        alias: "eth".to_string(),
        domain: domain.to_string(),
        load_balancer_id: "lb-2".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_keeps_supplied_id() {
    let (repo, _store) = common::repository().await;

    let created = AggregateWriter::<Blockchain>::create(&repo, common::blockchain("0021"))
        .await
        .unwrap();
    assert_eq!(created.id, "0021");
    assert_eq!(created.redirects[0].blockchain_id, "0021");
    assert_eq!(
        created.sync_check_options.as_ref().unwrap().blockchain_id,
        "0021"
    );

    let chain = read_one(&repo, "0021").await;
    assert_eq!(chain.blockchain, "eth-mainnet");
    assert_eq!(chain.ticker, "ETH");
    assert_eq!(chain.blockchain_aliases, vec!["eth-mainnet", "eth"]);
    assert_eq!(chain.log_limit_blocks, 100_000);
    assert!(chain.active);

    let sync = chain.sync_check_options.unwrap();
    assert_eq!(sync.blockchain_id, "0021");
    assert_eq!(sync.sync_check, r#"{"method":"eth_blockNumber"}"#);
    assert_eq!(sync.result_key, "result");
    assert_eq!(sync.allowance, 5);

    assert_eq!(chain.redirects.len(), 1);
    assert_eq!(chain.redirects[0].domain, "eth.example.com");
    assert_eq!(chain.redirects[0].load_balancer_id, "lb-1");
}

#[tokio::test]
async fn test_create_generates_missing_id() {
    let (repo, _store) = common::repository().await;

    let mut chain = common::blockchain("");
    chain.redirects.clear();
    chain.sync_check_options = None;
    let created = AggregateWriter::<Blockchain>::create(&repo, chain)
        .await
        .unwrap();
    assert_eq!(created.id.len(), ID_LENGTH);

    let chain = read_one(&repo, &created.id).await;
    assert!(chain.redirects.is_empty());
    assert!(chain.sync_check_options.is_none());
}

#[tokio::test]
async fn test_create_rejects_invalid_chain() {
    let (repo, store) = common::repository().await;
    let before = store.snapshot().await.row_count();

    let mut chain = common::blockchain("0021");
    chain.blockchain.clear();
    let err = AggregateWriter::<Blockchain>::create(&repo, chain)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::MissingRequiredField("blockchain"))
    );

    let mut chain = common::blockchain("0021");
    chain.redirects[0].load_balancer_id.clear();
    let err = AggregateWriter::<Blockchain>::create(&repo, chain)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::MissingRequiredField("load_balancer_id"))
    );

    assert_eq!(store.snapshot().await.row_count(), before);
}

#[tokio::test]
async fn test_duplicate_id_is_rejected_by_store() {
    let (repo, _store) = common::repository().await;
    AggregateWriter::<Blockchain>::create(&repo, common::blockchain("0021"))
        .await
        .unwrap();

    let err = AggregateWriter::<Blockchain>::create(&repo, common::blockchain("0021"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Persistence(PersistenceError::UniqueViolation {
            table: "blockchains",
            ..
        })
    ));
}

#[tokio::test]
async fn test_update_chain_and_sync_check() {
    let (repo, _store) = common::repository().await;
    AggregateWriter::<Blockchain>::create(&repo, common::blockchain("0021"))
        .await
        .unwrap();

    let update = UpdateBlockchain {
        ticker: Patch::Set("POKT".to_string()),
        description: Patch::Clear,
        sync_check_options: Some(UpdateSyncCheckOptions {
            allowance: Patch::Set(10),
            sync_check: Patch::Set(r#"{"method":"eth_syncing"}"#.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    AggregateWriter::<Blockchain>::update(&repo, "0021", update)
        .await
        .unwrap();

    let chain = read_one(&repo, "0021").await;
    assert_eq!(chain.ticker, "POKT");
    assert_eq!(chain.description, "");
    assert_eq!(chain.network, "ETH-1");
    let sync = chain.sync_check_options.unwrap();
    assert_eq!(sync.allowance, 10);
    assert_eq!(sync.sync_check, r#"{"method":"eth_syncing"}"#);
    assert_eq!(sync.result_key, "result");
}

#[tokio::test]
async fn test_update_cannot_clear_blockchain_name() {
    let (repo, _store) = common::repository().await;

    let update = UpdateBlockchain {
        blockchain: Patch::Clear,
        ..Default::default()
    };
    let err = AggregateWriter::<Blockchain>::update(&repo, "0021", update)
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::MissingRequiredField("blockchain"))
    );

    let err = AggregateWriter::<Blockchain>::update(&repo, "0021", UpdateBlockchain::default())
        .await
        .unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::NoFieldsToUpdate));
}

#[tokio::test]
async fn test_activate_and_remove() {
    let (repo, _store) = common::repository().await;
    AggregateWriter::<Blockchain>::create(&repo, common::blockchain("0021"))
        .await
        .unwrap();

    repo.activate_blockchain("0021", false).await.unwrap();
    assert!(!read_one(&repo, "0021").await.active);

    repo.activate_blockchain("0021", true).await.unwrap();
    assert!(read_one(&repo, "0021").await.active);

    AggregateWriter::<Blockchain>::remove(&repo, "0021")
        .await
        .unwrap();
    let chain = read_one(&repo, "0021").await;
    assert!(!chain.active);
    assert_eq!(chain.redirects.len(), 1);
}

#[tokio::test]
async fn test_redirect_lifecycle() {
    let (repo, _store) = common::repository().await;
    AggregateWriter::<Blockchain>::create(&repo, common::blockchain("0021"))
        .await
        .unwrap();

    let written = repo
        .write_redirect(redirect("0021", "new.example.com"))
        .await
        .unwrap();
    assert!(written.created_at.is_some());

    let chain = read_one(&repo, "0021").await;
    assert_eq!(chain.redirects.len(), 2);
    let added = chain
        .redirects
        .iter()
        .find(|r| r.domain == "new.example.com")
        .unwrap();
    assert_eq!(added.load_balancer_id, "lb-2");

    repo.remove_redirect("0021", "new.example.com")
        .await
        .unwrap();
    let chain = read_one(&repo, "0021").await;
    assert_eq!(chain.redirects.len(), 1);
    assert_eq!(chain.redirects[0].domain, "eth.example.com");
}

#[tokio::test]
async fn test_redirect_validation() {
    let (repo, _store) = common::repository().await;

    let err = repo
        .write_redirect(redirect("", "new.example.com"))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::MissingRequiredField("blockchain_id"))
    );

    let err = repo.remove_redirect("0021", "").await.unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::MissingRequiredField("domain"))
    );

    let err = repo.remove_redirect("", "eth.example.com").await.unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::MissingId));

    let err = repo
        .write_redirect(redirect("9999", "new.example.com"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Persistence(PersistenceError::ForeignKeyViolation {
            table: "redirects",
            ..
        })
    ));
}
