use super::*;
use crate::config::DatabaseConfig;
use crate::context::Context;
use crate::domain::{Model, Provider, ProviderType};
use crate::error::FlowRunError;
use crate::health::Pinger;
use crate::logging::Logger;
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

fn sqlite_config(dir: &TempDir) -> DatabaseConfig {
    let path = dir.path().join("flowrun.db");
    DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_open_conns: 5,
        max_idle_conns: 2,
        conn_max_lifetime: Duration::from_secs(300),
    }
}

async fn open_test_database(dir: &TempDir) -> Database {
    Database::open(&sqlite_config(dir), Logger::disabled())
        .await
        .unwrap()
}

fn test_provider() -> Provider {
    Provider::builder()
        .id(Uuid::new_v4())
        .name("openrouter")
        .account_id(Uuid::new_v4())
        .provider_type(ProviderType::OpenRouter)
        .api_key("sk-or-v1-test")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_open_and_ping() {
    let dir = TempDir::new().unwrap();
    let database = open_test_database(&dir).await;

    let ctx = Context::with_timeout(Duration::from_secs(5));
    database.ping(&ctx).await.unwrap();
    assert!(!database.is_closed());
}

#[tokio::test]
async fn test_ping_through_pinger_trait() {
    let dir = TempDir::new().unwrap();
    let database = open_test_database(&dir).await;
    let pinger: &dyn Pinger = &database;

    pinger.ping(&Context::background()).await.unwrap();
}

#[tokio::test]
async fn test_provider_round_trip() {
    let dir = TempDir::new().unwrap();
    let database = open_test_database(&dir).await;
    let provider = test_provider();

    database.insert_provider(&provider).await.unwrap();
    let found = database.find_provider(provider.id).await.unwrap();

    assert_eq!(found, Some(provider));
}

#[tokio::test]
async fn test_model_round_trip() {
    let dir = TempDir::new().unwrap();
    let database = open_test_database(&dir).await;
    let provider = test_provider();
    database.insert_provider(&provider).await.unwrap();

    let model = Model::builder()
        .id(Uuid::new_v4())
        .name("  Llama 3.1 70B  ")
        .account_id(provider.account_id)
        .provider_id(provider.id)
        .build()
        .unwrap();

    database.insert_model(&model).await.unwrap();
    let found = database.find_model(model.id).await.unwrap().unwrap();

    assert_eq!(found, model);
    assert_eq!(found.name, "  Llama 3.1 70B  ");
}

#[tokio::test]
async fn test_missing_records_are_none() {
    let dir = TempDir::new().unwrap();
    let database = open_test_database(&dir).await;

    assert!(database.find_provider(Uuid::new_v4()).await.unwrap().is_none());
    assert!(database.find_model(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_provider_not_inserted() {
    let dir = TempDir::new().unwrap();
    let database = open_test_database(&dir).await;

    let mut provider = test_provider();
    provider.name = "has spaces".to_string();

    let err = database.insert_provider(&provider).await.unwrap_err();
    assert!(matches!(err, FlowRunError::Validation(_)));
    assert!(database.find_provider(provider.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_schema_sync_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let provider = test_provider();

    {
        let database = open_test_database(&dir).await;
        database.insert_provider(&provider).await.unwrap();
        database.close(&Context::background()).await.unwrap();
    }

    let reopened = open_test_database(&dir).await;
    let found = reopened.find_provider(provider.id).await.unwrap();
    assert_eq!(found, Some(provider));
}

#[tokio::test]
async fn test_registered_records_cover_both_tables() {
    let tables: Vec<&str> = REGISTERED_RECORDS.iter().map(|(table, _)| *table).collect();
    assert_eq!(tables, vec!["providers", "models"]);
}

#[tokio::test]
async fn test_invalid_config_rejected_before_connecting() {
    let dir = TempDir::new().unwrap();
    let mut config = sqlite_config(&dir);
    config.max_open_conns = 0;

    let err = Database::open(&config, Logger::disabled()).await.err().unwrap();
    match err {
        FlowRunError::Validation(e) => assert!(e.has_field("max_open_conns")),
        other => panic!("expected validation error, got {}", other),
    }
    assert!(!dir.path().join("flowrun.db").exists());
}

#[tokio::test]
async fn test_unreachable_database_fails_open() {
    let dir = TempDir::new().unwrap();
    let mut config = sqlite_config(&dir);
    config.url = format!(
        "sqlite://{}?mode=rw",
        dir.path().join("missing").join("flowrun.db").display()
    );

    let err = Database::open(&config, Logger::disabled()).await.err().unwrap();
    assert!(matches!(err, FlowRunError::Connection(_)), "got {}", err);
}

#[tokio::test]
async fn test_idle_above_open_is_clamped() {
    let dir = TempDir::new().unwrap();
    let mut config = sqlite_config(&dir);
    config.max_open_conns = 1;
    config.max_idle_conns = 10;

    let database = Database::open(&config, Logger::disabled()).await.unwrap();
    database.ping(&Context::background()).await.unwrap();
}

#[tokio::test]
async fn test_ping_after_close_fails() {
    let dir = TempDir::new().unwrap();
    let database = open_test_database(&dir).await;

    database.close(&Context::background()).await.unwrap();
    assert!(database.is_closed());

    let err = database.ping(&Context::background()).await.unwrap_err();
    assert!(matches!(err, FlowRunError::Connection(_)), "got {}", err);
}

#[tokio::test]
async fn test_ping_with_cancelled_context() {
    let dir = TempDir::new().unwrap();
    let database = open_test_database(&dir).await;
    let ctx = Context::background();
    ctx.cancel();

    // A ready ping may still win the race; a pending one must report cancellation
    match database.ping(&ctx).await {
        Ok(()) => {}
        Err(e) => assert!(e.is_deadline(), "got {}", e),
    }
}
