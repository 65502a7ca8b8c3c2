//! Common test utilities
//!
//! - Aggregate fixtures and a seeded in-memory repository
//! - TestDatabase: PostgreSQL connection management for the database suite

#![allow(dead_code)]

pub mod db;

pub use db::TestDatabase;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use portal_db_common::{
    AppLimit, AppStatus, Application, Blockchain, GatewayAat, GatewaySettings, LoadBalancer,
    NotificationSettings, PayPlanType, Redirect, RoleName, StickyOptions, SyncCheckOptions,
    UserAccess, WhitelistContract,
};
use portal_db_persistence::entity::pay_plans;
use portal_db_persistence::{MemoryStore, Repository};

pub const FREETIER_DAILY_LIMIT: i32 = 250_000;

/// Unique suffix for rows written to a shared database
pub fn unique_test_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test_{}", timestamp)
}

pub fn pay_plans() -> Vec<pay_plans::Model> {
    [
        ("FREETIER_V0", FREETIER_DAILY_LIMIT),
        ("PAY_AS_YOU_GO_V0", 0),
        ("ENTERPRISE", 0),
        ("TEST_PLAN_V0", 100),
    ]
    .into_iter()
    .map(|(plan_type, daily_limit)| pay_plans::Model {
        plan_type: plan_type.to_string(),
        daily_limit,
    })
    .collect()
}

/// A memory store with the pay plan table loaded
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.seed_pay_plans(pay_plans()).await;
    store
}

pub async fn repository() -> (Repository<MemoryStore>, MemoryStore) {
    let store = seeded_store().await;
    let repo = Repository::new(store.clone()).with_timeout(Duration::from_secs(5));
    (repo, store)
}

pub fn application() -> Application {
    Application {
        user_id: "user-1".to_string(),
        name: "pokt-wallet".to_string(),
        contact_email: "dev@example.com".to_string(),
        description: "wallet backend".to_string(),
        owner: "owner-1".to_string(),
        url: "https://wallet.example.com".to_string(),
        status: Some(AppStatus::InService),
        gateway_aat: Some(GatewayAat {
            address: "a1b2c3".to_string(),
            application_public_key: "pubkey".to_string(),
            application_signature: "signature".to_string(),
            client_public_key: "client".to_string(),
            private_key: "private".to_string(),
            version: "0.0.1".to_string(),
            ..Default::default()
        }),
        gateway_settings: Some(GatewaySettings {
            secret_key: "secret".to_string(),
            secret_key_required: true,
            whitelist_origins: vec!["https://wallet.example.com".to_string()],
            whitelist_contracts: vec![WhitelistContract {
                blockchain_id: "0021".to_string(),
                contracts: vec!["0xdead".to_string()],
            }],
            ..Default::default()
        }),
        limit: Some(AppLimit::new(PayPlanType::FreetierV0, 0)),
        notification_settings: Some(NotificationSettings {
            signed_up: true,
            half: true,
            full: true,
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn load_balancer(app_ids: &[&str]) -> LoadBalancer {
    LoadBalancer {
        name: "wallet-lb".to_string(),
        request_timeout: 5_000,
        gigastake: true,
        application_ids: app_ids.iter().map(|id| id.to_string()).collect(),
        sticky_options: Some(StickyOptions {
            duration: "60".to_string(),
            sticky_origins: vec!["chrome-extension://".to_string()],
            sticky_max: 300,
            stickiness: true,
            ..Default::default()
        }),
        users: vec![
            UserAccess::new("user-1", RoleName::Member, "owner@example.com"),
            UserAccess::new("user-2", RoleName::Admin, "admin@example.com"),
        ],
        ..Default::default()
    }
}

pub fn blockchain(id: &str) -> Blockchain {
    Blockchain {
        id: id.to_string(),
        altruist: "https://altruist.example.com".to_string(),
        blockchain: "eth-mainnet".to_string(),
        chain_id: "1".to_string(),
        description: "Ethereum".to_string(),
        network: "ETH-1".to_string(),
        ticker: "ETH".to_string(),
        blockchain_aliases: vec!["eth-mainnet".to_string(), "eth".to_string()],
        log_limit_blocks: 100_000,
        request_timeout: 2_000,
        active: true,
        sync_check_options: Some(SyncCheckOptions {
            sync_check: r#"{"method":"eth_blockNumber"}"#.to_string(),
            result_key: "result".to_string(),
            allowance: 5,
            ..Default::default()
        }),
        redirects: vec![Redirect {
            alias: "eth-mainnet".to_string(),
            domain: "eth.example.com".to_string(),
            load_balancer_id: "lb-1".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    }
}
